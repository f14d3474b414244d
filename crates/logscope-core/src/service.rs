//! Ingestion and query façade.
//!
//! [`LogService`] is what an outer layer (the HTTP server) talks to. It turns
//! untyped payloads into validated records and raw query parameters into a
//! [`FilterSpec`], and never lets a validation problem escape as anything but
//! a structured [`IngestError::Invalid`].

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::error::{LogError, ValidationErrors};
use crate::filter::{FilterParams, FilterSpec};
use crate::query::{query, Facets};
use crate::store::SharedLogStore;
use crate::types::LogRecord;
use crate::validator::validate;

/// Why a write was not accepted.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The payload was null or an empty object or array.
    #[error("request body is missing or empty")]
    EmptyBody,

    /// The payload failed validation. Nothing was stored.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// The record was valid but could not be persisted.
    #[error("failed to persist log record: {0}")]
    Persistence(#[source] LogError),
}

/// Entry point for ingesting and querying logs.
#[derive(Debug, Clone)]
pub struct LogService {
    store: SharedLogStore,
}

impl LogService {
    /// Creates a service over a shared store.
    #[must_use]
    pub const fn new(store: SharedLogStore) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &SharedLogStore {
        &self.store
    }

    /// Validates `payload` and appends it.
    ///
    /// Returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::EmptyBody`] for an empty payload,
    /// [`IngestError::Invalid`] with every validation problem, or
    /// [`IngestError::Persistence`] if the store could not save it.
    pub fn ingest(&self, payload: &Value) -> Result<LogRecord, IngestError> {
        if is_empty_payload(payload) {
            return Err(IngestError::EmptyBody);
        }

        let record = validate(payload)?;
        let stored = self.store.append(record).map_err(IngestError::Persistence)?;

        debug!(
            level = %stored.level(),
            resource_id = stored.resource_id(),
            trace_id = stored.trace_id(),
            "ingested log record"
        );
        Ok(stored)
    }

    /// Returns the records matching `params`, most recent first.
    #[must_use]
    pub fn query(&self, params: &FilterParams) -> Vec<LogRecord> {
        let spec = FilterSpec::from_params(params);
        let results = query(self.store.snapshot(), &spec);
        debug!(matched = results.len(), filtered = !spec.is_empty(), "queried log records");
        results
    }

    /// Returns level and resource counts over the records matching `params`.
    #[must_use]
    pub fn facets(&self, params: &FilterParams) -> Facets {
        Facets::from_records(&self.query(params))
    }
}

fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
