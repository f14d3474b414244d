//! Validation of untyped candidate records.
//!
//! [`validate`] is the only way a [`LogRecord`] comes into existence, which is
//! what lets the store and the query engine assume every field is present and
//! well-formed.

use serde_json::{Map, Value};

use crate::error::ValidationErrors;
use crate::types::{LogLevel, LogRecord, Timestamp};

/// Field names every candidate must carry, in reporting order.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "level",
    "message",
    "resourceId",
    "timestamp",
    "traceId",
    "spanId",
    "commit",
    "metadata",
];

const INVALID_LEVEL: &str = "Invalid level. Must be one of: error, warn, info, debug";
const INVALID_MESSAGE: &str = "Message must be a non-empty string";
const INVALID_RESOURCE_ID: &str = "ResourceId must be a non-empty string";
const INVALID_TIMESTAMP: &str =
    "Invalid timestamp. Must be ISO 8601 format (e.g., 2023-09-15T08:00:00Z)";
const INVALID_TRACE_ID: &str = "TraceId must be a non-empty string";
const INVALID_SPAN_ID: &str = "SpanId must be a non-empty string";
const INVALID_COMMIT: &str = "Commit must be a non-empty string";
const INVALID_METADATA: &str = "Metadata must be a valid JSON object";

/// Collects failures from a run of checks.
#[derive(Debug, Default)]
struct Checks {
    errors: Vec<String>,
}

impl Checks {
    /// Records `message` when `value` is `None`.
    fn require<T>(&mut self, value: Option<T>, message: &str) -> Option<T> {
        if value.is_none() {
            self.errors.push(message.to_string());
        }
        value
    }

    fn into_errors(self) -> ValidationErrors {
        ValidationErrors::new(self.errors)
    }
}

/// Validates a candidate record.
///
/// Presence of all [`REQUIRED_FIELDS`] is checked first; if any are missing
/// only the missing-field errors are returned. A key holding `null` counts as
/// present and then fails its type check. A candidate that is not an object
/// has no fields at all.
///
/// Once the candidate is structurally complete every field check runs and
/// all failures are reported together, so a client can fix everything in one
/// round trip.
///
/// # Errors
///
/// Returns every problem found, in check order.
pub fn validate(candidate: &Value) -> Result<LogRecord, ValidationErrors> {
    let empty = Map::new();
    let fields = candidate.as_object().unwrap_or(&empty);

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|name| !fields.contains_key(**name))
        .map(|name| format!("Missing required field: {name}"))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationErrors::new(missing));
    }

    let field = |name: &str| fields.get(name).unwrap_or(&Value::Null);
    let mut checks = Checks::default();

    let level = checks.require(
        field("level").as_str().and_then(LogLevel::parse),
        INVALID_LEVEL,
    );
    let message = checks.require(non_empty_string(field("message")), INVALID_MESSAGE);
    let resource_id = checks.require(non_empty_string(field("resourceId")), INVALID_RESOURCE_ID);
    let timestamp = checks.require(
        field("timestamp").as_str().and_then(Timestamp::parse),
        INVALID_TIMESTAMP,
    );
    let trace_id = checks.require(non_empty_string(field("traceId")), INVALID_TRACE_ID);
    let span_id = checks.require(non_empty_string(field("spanId")), INVALID_SPAN_ID);
    let commit = checks.require(non_empty_string(field("commit")), INVALID_COMMIT);
    let metadata = checks.require(field("metadata").as_object().cloned(), INVALID_METADATA);

    match (
        level,
        message,
        resource_id,
        timestamp,
        trace_id,
        span_id,
        commit,
        metadata,
    ) {
        (
            Some(level),
            Some(message),
            Some(resource_id),
            Some(timestamp),
            Some(trace_id),
            Some(span_id),
            Some(commit),
            Some(metadata),
        ) => Ok(LogRecord {
            level,
            message,
            resource_id,
            timestamp,
            trace_id,
            span_id,
            commit,
            metadata,
        }),
        _ => Err(checks.into_errors()),
    }
}

/// A string that is not blank. The original text is kept, untrimmed.
fn non_empty_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
