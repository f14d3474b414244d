//! # logscope-core
//!
//! Validation, storage and querying of structured log records.
//!
//! This crate provides:
//!
//! - [`LogRecord`] — A validated log record
//! - [`validate`] — The required-field and type contract for incoming records
//! - [`LogStore`] — Append-only, thread-safe record storage
//! - [`LogBacking`] — Persistence seam, with [`JsonFileBacking`] and [`MemoryBacking`]
//! - [`FilterSpec`] / [`query`] — The filter and ordering engine
//! - [`LogService`] — The façade outer layers call into
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use logscope_core::{FilterParams, LogService, LogStore};
//! use serde_json::json;
//!
//! let service = LogService::new(Arc::new(LogStore::in_memory()));
//!
//! service.ingest(&json!({
//!     "level": "info",
//!     "message": "boot",
//!     "resourceId": "r1",
//!     "timestamp": "2023-09-15T08:00:00Z",
//!     "traceId": "t1",
//!     "spanId": "s1",
//!     "commit": "c1",
//!     "metadata": {}
//! }))?;
//!
//! let params = FilterParams {
//!     level: Some("INFO".to_string()),
//!     ..FilterParams::default()
//! };
//! assert_eq!(service.query(&params).len(), 1);
//! # Ok::<(), logscope_core::IngestError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod file_store;
pub mod filter;
pub mod query;
pub mod service;
pub mod store;
pub mod traits;
pub mod types;
pub mod validator;

// Re-export main types
pub use error::{LogError, Result, ValidationErrors};
pub use file_store::JsonFileBacking;
pub use filter::{parse_instant, FilterParams, FilterSpec, TimeRange};
pub use query::{query, Facets};
pub use service::{IngestError, LogService};
pub use store::{LogStore, SharedLogStore};
pub use traits::{LogBacking, MemoryBacking};
pub use types::{LogLevel, LogRecord, LogRecordBuilder, Timestamp};
pub use validator::{validate, REQUIRED_FIELDS};
