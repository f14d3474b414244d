//! Traits for persistence backends.
//!
//! This module provides the [`LogBacking`] trait the [`LogStore`](crate::LogStore)
//! writes through, so the in-memory record set can be mirrored to a file,
//! to nothing at all, or to a test double.

use crate::error::Result;
use crate::types::LogRecord;

/// Durable home of the record set.
///
/// Implementors hold the full record set as last saved. A successful
/// [`load`](Self::load) returns exactly what the last successful
/// [`save`](Self::save) wrote.
pub trait LogBacking: Send + Sync {
    /// Reads every persisted record, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted state cannot be read.
    fn load(&self) -> Result<Vec<LogRecord>>;

    /// Replaces the persisted state with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write does not complete. The previous state
    /// must then still be readable.
    fn save(&self, records: &[LogRecord]) -> Result<()>;
}

/// A backing that keeps nothing. Records live only as long as the store.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryBacking;

impl LogBacking for MemoryBacking {
    fn load(&self) -> Result<Vec<LogRecord>> {
        Ok(Vec::new())
    }

    fn save(&self, _records: &[LogRecord]) -> Result<()> {
        Ok(())
    }
}
