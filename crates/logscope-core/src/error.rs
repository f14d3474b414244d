//! Error types for the log core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the store and its backings.
#[derive(Debug, Error)]
pub enum LogError {
    /// An I/O error occurred while touching the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing file exists but does not hold a record array.
    #[error("corrupt backing store {path}: {reason}")]
    CorruptBacking {
        /// Location of the offending file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, LogError>;

/// Every problem found while validating one candidate record.
///
/// Messages are client-facing and returned verbatim in the `details`
/// array of a rejected write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid log record: {}", .0.join("; "))]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    /// Wraps a non-empty list of messages.
    #[must_use]
    pub fn new(messages: Vec<String>) -> Self {
        Self(messages)
    }

    /// The collected messages, in the order the checks ran.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// Consumes the error and returns the messages.
    #[must_use]
    pub fn into_messages(self) -> Vec<String> {
        self.0
    }

    /// Number of problems found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no problem was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if any message equals `message`.
    #[must_use]
    pub fn contains(&self, message: &str) -> bool {
        self.0.iter().any(|m| m == message)
    }
}
