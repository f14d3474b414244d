//! Shared state for the log server.

use std::sync::Arc;
use std::time::Instant;

use logscope_core::{JsonFileBacking, LogService, LogStore};
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ServerResult;

/// Shared state handed to every request handler.
#[derive(Debug)]
pub struct AppState {
    /// Server configuration.
    config: Arc<ServerConfig>,
    /// Ingestion and query façade.
    service: LogService,
    /// Server start time.
    start_time: Instant,
}

impl AppState {
    /// Create state around an existing service.
    pub fn new(config: ServerConfig, service: LogService) -> Self {
        Self {
            config: Arc::new(config),
            service,
            start_time: Instant::now(),
        }
    }

    /// Open the store described by `config` and build state around it.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file cannot be created or read.
    pub fn open(config: ServerConfig) -> ServerResult<Self> {
        let store = if config.ephemeral {
            info!("using in-memory log store");
            LogStore::in_memory()
        } else {
            info!(path = %config.data_file.display(), "opening log data file");
            LogStore::open(JsonFileBacking::open(&config.data_file)?)?
        };

        Ok(Self::new(config, LogService::new(Arc::new(store))))
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the log service.
    #[must_use]
    pub const fn service(&self) -> &LogService {
        &self.service
    }

    /// Get server uptime in seconds.
    #[must_use]
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
