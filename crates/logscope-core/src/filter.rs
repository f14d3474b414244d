//! Filter criteria for querying logs.
//!
//! This module provides:
//! - [`FilterParams`] — Raw, optional string parameters as they arrive from a caller
//! - [`FilterSpec`] — Parsed criteria the query engine evaluates
//! - [`TimeRange`] — Inclusive time bounds

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::LogRecord;

/// Untyped query parameters. Every field is optional; an empty string means
/// the same as an absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    /// One level name, or several separated by commas.
    #[serde(default)]
    pub level: Option<String>,
    /// Substring of the message.
    #[serde(default)]
    pub message: Option<String>,
    /// Substring of the resource ID.
    #[serde(default, rename = "resourceId")]
    pub resource_id: Option<String>,
    /// Substring of the trace ID.
    #[serde(default, rename = "traceId")]
    pub trace_id: Option<String>,
    /// Substring of the span ID.
    #[serde(default, rename = "spanId")]
    pub span_id: Option<String>,
    /// Substring of the commit.
    #[serde(default)]
    pub commit: Option<String>,
    /// Inclusive lower time bound.
    #[serde(default)]
    pub timestamp_start: Option<String>,
    /// Inclusive upper time bound.
    #[serde(default)]
    pub timestamp_end: Option<String>,
}

impl FilterParams {
    /// Builds parameters from decoded query-string pairs.
    ///
    /// A key given more than once keeps its last value. Unknown keys are
    /// ignored.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "level" => &mut params.level,
                "message" => &mut params.message,
                "resourceId" => &mut params.resource_id,
                "traceId" => &mut params.trace_id,
                "spanId" => &mut params.span_id,
                "commit" => &mut params.commit,
                "timestamp_start" => &mut params.timestamp_start,
                "timestamp_end" => &mut params.timestamp_end,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        params
    }
}

/// Time range for filtering logs. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    /// Earliest accepted instant.
    pub start: Option<DateTime<Utc>>,
    /// Latest accepted instant.
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// Creates a new time range with the given bounds.
    #[must_use]
    pub const fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Checks if an instant falls within this range.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if instant < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if instant > end {
                return false;
            }
        }
        true
    }
}

/// Parsed filter criteria. Omitted criteria impose no constraint; provided
/// ones are combined with AND.
///
/// Text needles are stored lowercased. Levels match by exact
/// (case-insensitive) name while the other text fields match by substring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub(crate) levels: Vec<String>,
    pub(crate) message: Option<String>,
    pub(crate) resource_id: Option<String>,
    pub(crate) trace_id: Option<String>,
    pub(crate) span_id: Option<String>,
    pub(crate) commit: Option<String>,
    pub(crate) time_range: TimeRange,
}

impl FilterSpec {
    /// Creates an empty filter that matches every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filter from raw parameters.
    ///
    /// Empty values are ignored. A time bound that cannot be parsed is
    /// dropped with a warning instead of failing the query.
    #[must_use]
    pub fn from_params(params: &FilterParams) -> Self {
        let mut spec = Self::new();

        // Names are compared verbatim, so a blank or padded name matches nothing.
        if let Some(levels) = provided(params.level.as_ref()) {
            for name in levels.split(',') {
                spec = spec.with_level(name);
            }
        }
        if let Some(message) = provided(params.message.as_ref()) {
            spec = spec.with_message(message);
        }
        if let Some(resource_id) = provided(params.resource_id.as_ref()) {
            spec = spec.with_resource_id(resource_id);
        }
        if let Some(trace_id) = provided(params.trace_id.as_ref()) {
            spec = spec.with_trace_id(trace_id);
        }
        if let Some(span_id) = provided(params.span_id.as_ref()) {
            spec = spec.with_span_id(span_id);
        }
        if let Some(commit) = provided(params.commit.as_ref()) {
            spec = spec.with_commit(commit);
        }

        let start = provided(params.timestamp_start.as_ref())
            .and_then(|raw| parse_bound("timestamp_start", raw));
        let end = provided(params.timestamp_end.as_ref())
            .and_then(|raw| parse_bound("timestamp_end", raw));
        spec.with_time_range(TimeRange::new(start, end))
    }

    /// Adds an accepted level name. Several levels are alternatives.
    #[must_use]
    pub fn with_level(mut self, level: &str) -> Self {
        self.levels.push(level.to_lowercase());
        self
    }

    /// Adds a message substring filter.
    #[must_use]
    pub fn with_message(mut self, text: &str) -> Self {
        self.message = Some(text.to_lowercase());
        self
    }

    /// Adds a resource ID substring filter.
    #[must_use]
    pub fn with_resource_id(mut self, text: &str) -> Self {
        self.resource_id = Some(text.to_lowercase());
        self
    }

    /// Adds a trace ID substring filter.
    #[must_use]
    pub fn with_trace_id(mut self, text: &str) -> Self {
        self.trace_id = Some(text.to_lowercase());
        self
    }

    /// Adds a span ID substring filter.
    #[must_use]
    pub fn with_span_id(mut self, text: &str) -> Self {
        self.span_id = Some(text.to_lowercase());
        self
    }

    /// Adds a commit substring filter.
    #[must_use]
    pub fn with_commit(mut self, text: &str) -> Self {
        self.commit = Some(text.to_lowercase());
        self
    }

    /// Sets the time range filter.
    #[must_use]
    pub const fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = time_range;
        self
    }

    /// The time range applied by this filter.
    #[must_use]
    pub const fn time_range(&self) -> TimeRange {
        self.time_range
    }

    /// True when no criterion is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Checks if a record satisfies every criterion of this filter.
    #[must_use]
    pub fn matches(&self, record: &LogRecord) -> bool {
        if !self.levels.is_empty()
            && !self
                .levels
                .iter()
                .any(|level| level == record.level().as_str())
        {
            return false;
        }

        let substrings = [
            (&self.message, record.message()),
            (&self.resource_id, record.resource_id()),
            (&self.trace_id, record.trace_id()),
            (&self.span_id, record.span_id()),
            (&self.commit, record.commit()),
        ];
        for (needle, haystack) in substrings {
            if let Some(needle) = needle {
                if !haystack.to_lowercase().contains(needle.as_str()) {
                    return false;
                }
            }
        }

        self.time_range.contains(record.timestamp().instant())
    }
}

fn provided(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

fn parse_bound(name: &'static str, raw: &str) -> Option<DateTime<Utc>> {
    let parsed = parse_instant(raw);
    if parsed.is_none() {
        warn!(param = name, value = raw, "ignoring unparsable time bound");
    }
    parsed
}

/// Parses a time bound leniently.
///
/// Accepts RFC 3339 with any offset, a zoneless `YYYY-MM-DDTHH:MM[:SS[.fff]]`
/// (read as UTC), or a bare `YYYY-MM-DD` (UTC midnight).
#[must_use]
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
