//! logscope - structured log ingestion and query server.

use std::process::ExitCode;

use clap::Parser;
use logscope_server::{Cli, LogServer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = cli.into_config();
    info!(
        addr = %config.bind_addr,
        data_file = %config.data_file.display(),
        ephemeral = config.ephemeral,
        "Starting logscope"
    );

    let server = match LogServer::open(config) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "failed to open log store");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.serve_with_shutdown(shutdown_signal()).await {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl-C, shutting down"),
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
