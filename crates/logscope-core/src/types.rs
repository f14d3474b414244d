//! Core types for log records.
//!
//! This module provides:
//! - [`LogLevel`] — The four accepted severity levels
//! - [`Timestamp`] — An ISO-8601 UTC instant that keeps its original text
//! - [`LogRecord`] — A validated, immutable log record
//! - [`LogRecordBuilder`] — Assembles a candidate and runs it through validation

use std::fmt;

use chrono::{DateTime, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ValidationErrors;
use crate::validator::validate;

/// `YYYY-MM-DDTHH:MM:SS[.mmm]Z`, ASCII digits only.
static ISO_8601_UTC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]{3})?Z$")
        .unwrap_or_else(|_| unreachable!())
});

/// Log severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error conditions
    Error,
    /// Warning conditions
    Warn,
    /// General information
    Info,
    /// Debugging information
    Debug,
}

impl LogLevel {
    /// Every accepted level, most severe first.
    pub const ALL: [Self; 4] = [Self::Error, Self::Warn, Self::Info, Self::Debug];

    /// Parses a level name, ignoring ASCII case.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(name))
    }

    /// Returns the normalized (lowercase) name of this level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A UTC instant accepted from a client.
///
/// The text the client sent is kept as-is so a stored record echoes back
/// exactly; comparisons go through the parsed instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp {
    raw: String,
    instant: DateTime<Utc>,
}

impl Timestamp {
    /// Parses `YYYY-MM-DDTHH:MM:SS[.mmm]Z`.
    ///
    /// Both the shape and the calendar must be valid: `2023-13-01T00:00:00Z`
    /// has the right shape but is rejected by the date parser. Leap seconds
    /// (`23:59:60`) are rejected too.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if !ISO_8601_UTC.is_match(raw) {
            return None;
        }
        let instant = DateTime::parse_from_rfc3339(raw)
            .ok()?
            .with_timezone(&Utc);
        // chrono encodes a `:60` leap second as an oversized nanosecond field.
        if instant.nanosecond() >= 1_000_000_000 {
            return None;
        }
        Some(Self {
            raw: raw.to_string(),
            instant,
        })
    }

    /// The text as it was accepted.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed instant.
    #[must_use]
    pub const fn instant(&self) -> DateTime<Utc> {
        self.instant
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

/// A validated log record.
///
/// Records can only be obtained through [`validate`] (directly, through
/// [`LogRecordBuilder`], or by deserializing), so every instance satisfies
/// the required-field contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub(crate) level: LogLevel,
    pub(crate) message: String,
    pub(crate) resource_id: String,
    pub(crate) timestamp: Timestamp,
    pub(crate) trace_id: String,
    pub(crate) span_id: String,
    pub(crate) commit: String,
    pub(crate) metadata: Map<String, Value>,
}

impl LogRecord {
    /// Creates a new record builder.
    #[must_use]
    pub fn builder() -> LogRecordBuilder {
        LogRecordBuilder::default()
    }

    /// Severity level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// The log message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Resource that emitted the log.
    #[must_use]
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    /// When the event happened.
    #[must_use]
    pub const fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    /// Distributed trace identifier.
    #[must_use]
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Span identifier within the trace.
    #[must_use]
    pub fn span_id(&self) -> &str {
        &self.span_id
    }

    /// Commit of the code that emitted the log.
    #[must_use]
    pub fn commit(&self) -> &str {
        &self.commit
    }

    /// Free-form structured metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
}

impl<'de> Deserialize<'de> for LogRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let candidate = Value::deserialize(deserializer)?;
        validate(&candidate).map_err(D::Error::custom)
    }
}

/// Builder for log records.
///
/// Fields left unset are absent from the candidate, so [`build`](Self::build)
/// reports them as missing exactly like a client payload would.
#[derive(Debug, Default, Clone)]
pub struct LogRecordBuilder {
    fields: Map<String, Value>,
    metadata: Map<String, Value>,
}

impl LogRecordBuilder {
    fn set(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.insert(key.to_string(), Value::String(value.into()));
        self
    }

    /// Sets the level name.
    #[must_use]
    pub fn level(self, level: impl Into<String>) -> Self {
        self.set("level", level)
    }

    /// Sets the message.
    #[must_use]
    pub fn message(self, message: impl Into<String>) -> Self {
        self.set("message", message)
    }

    /// Sets the resource ID.
    #[must_use]
    pub fn resource_id(self, resource_id: impl Into<String>) -> Self {
        self.set("resourceId", resource_id)
    }

    /// Sets the timestamp text.
    #[must_use]
    pub fn timestamp(self, timestamp: impl Into<String>) -> Self {
        self.set("timestamp", timestamp)
    }

    /// Sets the trace ID.
    #[must_use]
    pub fn trace_id(self, trace_id: impl Into<String>) -> Self {
        self.set("traceId", trace_id)
    }

    /// Sets the span ID.
    #[must_use]
    pub fn span_id(self, span_id: impl Into<String>) -> Self {
        self.set("spanId", span_id)
    }

    /// Sets the commit.
    #[must_use]
    pub fn commit(self, commit: impl Into<String>) -> Self {
        self.set("commit", commit)
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn metadata_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Returns the candidate as an untyped JSON object.
    #[must_use]
    pub fn into_value(self) -> Value {
        let mut fields = self.fields;
        fields.insert("metadata".to_string(), Value::Object(self.metadata));
        Value::Object(fields)
    }

    /// Validates the candidate and returns the record.
    ///
    /// # Errors
    ///
    /// Returns every validation problem found in the candidate.
    pub fn build(self) -> Result<LogRecord, ValidationErrors> {
        validate(&self.into_value())
    }
}
