//! # logscope-server
//!
//! HTTP API for ingesting and querying structured logs, built on axum.
//!
//! ## Example
//!
//! ```rust,no_run
//! use logscope_server::{LogServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), logscope_server::ServerError> {
//!     let config = ServerConfig::default().with_ephemeral(true);
//!     let server = LogServer::open(config)?;
//!     server.serve().await
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/health` | GET | Liveness check |
//! | `/logs` | POST | Ingest one log record |
//! | `/logs` | GET | Filtered records, most recent first |
//! | `/logs/facets` | GET | Level and resource counts for a filter |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use cli::Cli;
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::LogServer;
pub use state::AppState;
