//! Command-line argument parsing with clap.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use crate::config::{ServerConfig, DEFAULT_DATA_FILE, DEFAULT_PORT};

/// Logscope - structured log ingestion and query server.
#[derive(Parser, Debug, Clone)]
#[command(name = "logscope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Interface to listen on.
    #[arg(long, env = "LOGSCOPE_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// JSON file log records are persisted to.
    #[arg(short, long, env = "LOGSCOPE_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    /// Keep records in memory only; nothing is written to disk.
    #[arg(long)]
    pub ephemeral: bool,

    /// Allowed CORS origin (repeatable; any origin when omitted).
    #[arg(long = "cors-origin", value_name = "ORIGIN")]
    pub cors_origins: Vec<String>,

    /// Emit logs as JSON lines.
    #[arg(long, env = "LOGSCOPE_LOG_JSON")]
    pub log_json: bool,
}

impl Cli {
    /// Address the server binds to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Build the server configuration from the parsed arguments.
    #[must_use]
    pub fn into_config(self) -> ServerConfig {
        let config = ServerConfig::new(self.bind_addr())
            .with_data_file(self.data_file)
            .with_ephemeral(self.ephemeral);

        self.cors_origins
            .into_iter()
            .fold(config, ServerConfig::with_cors_origin)
    }
}
