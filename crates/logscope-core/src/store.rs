//! In-memory record store mirrored to a backing.
//!
//! This module provides:
//! - [`LogStore`] — Thread-safe, append-only record storage
//! - [`SharedLogStore`] — Shared handle used by the service layer

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::traits::{LogBacking, MemoryBacking};
use crate::types::LogRecord;

/// Thread-safe, append-only store of validated records.
///
/// The store owns both the in-memory sequence and its backing. An append is
/// committed to memory only once the backing has accepted the full record
/// set, so memory and the last successful write never diverge.
pub struct LogStore {
    /// All records, in insertion order
    records: RwLock<Vec<LogRecord>>,
    /// Where the record set is persisted
    backing: Box<dyn LogBacking>,
}

impl LogStore {
    /// Opens a store over `backing`, loading whatever it holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing cannot be read.
    pub fn open(backing: impl LogBacking + 'static) -> Result<Self> {
        let records = backing.load()?;
        info!(count = records.len(), "loaded log records");
        Ok(Self {
            records: RwLock::new(records),
            backing: Box::new(backing),
        })
    }

    /// Creates an empty store that persists nothing.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            backing: Box::new(MemoryBacking),
        }
    }

    /// Appends a record and persists the new record set.
    ///
    /// Returns the stored copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing rejects the write; the record is then
    /// not kept in memory either.
    pub fn append(&self, record: LogRecord) -> Result<LogRecord> {
        let stored = record.clone();
        let mut records = self.records.write();

        records.push(record);
        if let Err(err) = self.backing.save(&records) {
            records.pop();
            error!(error = %err, "failed to persist log record");
            return Err(err);
        }

        debug!(total = records.len(), "appended log record");
        Ok(stored)
    }

    /// Returns a copy of every record, in insertion order.
    ///
    /// Later appends are not visible through the returned value.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LogRecord> {
        self.records.read().clone()
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl std::fmt::Debug for LogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStore")
            .field("records", &self.len())
            .finish_non_exhaustive()
    }
}

/// Shared log store handle.
pub type SharedLogStore = Arc<LogStore>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogError;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    fn make_record(message: &str) -> LogRecord {
        LogRecord::builder()
            .level("info")
            .message(message)
            .resource_id("r1")
            .timestamp("2023-09-15T08:00:00Z")
            .trace_id("t1")
            .span_id("s1")
            .commit("c1")
            .build()
            .expect("valid record")
    }

    /// Records every save; can be told to fail.
    #[derive(Default)]
    struct RecordingBacking {
        saved: Arc<Mutex<Vec<Vec<LogRecord>>>>,
        fail: Arc<AtomicBool>,
        initial: Vec<LogRecord>,
    }

    impl LogBacking for RecordingBacking {
        fn load(&self) -> Result<Vec<LogRecord>> {
            Ok(self.initial.clone())
        }

        fn save(&self, records: &[LogRecord]) -> Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(LogError::Io(std::io::Error::other("disk full")));
            }
            self.saved.lock().push(records.to_vec());
            Ok(())
        }
    }

    #[test]
    fn append_returns_stored_copy() {
        let store = LogStore::in_memory();
        let record = make_record("boot");

        let stored = store.append(record.clone()).expect("append");
        assert_eq!(stored, record);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let store = LogStore::in_memory();
        for message in ["first", "second", "third"] {
            store.append(make_record(message)).expect("append");
        }

        let messages: Vec<String> = store
            .snapshot()
            .iter()
            .map(|r| r.message().to_string())
            .collect();
        assert_eq!(messages, ["first", "second", "third"]);
    }

    #[test]
    fn snapshot_is_independent_of_later_appends() {
        let store = LogStore::in_memory();
        store.append(make_record("before")).expect("append");

        let snapshot = store.snapshot();
        store.append(make_record("after")).expect("append");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn every_append_saves_the_full_set() {
        let backing = RecordingBacking::default();
        let saved = Arc::clone(&backing.saved);
        let store = LogStore::open(backing).expect("open");

        store.append(make_record("a")).expect("append");
        store.append(make_record("b")).expect("append");

        let saved = saved.lock();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].len(), 1);
        assert_eq!(saved[1].len(), 2);
    }

    #[test]
    fn failed_save_is_not_kept_in_memory() {
        let backing = RecordingBacking::default();
        let fail = Arc::clone(&backing.fail);
        let store = LogStore::open(backing).expect("open");

        store.append(make_record("kept")).expect("append");
        fail.store(true, Ordering::SeqCst);

        let result = store.append(make_record("lost"));
        assert!(matches!(result, Err(LogError::Io(_))));
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot()[0].message(), "kept");
    }

    #[test]
    fn open_loads_existing_records() {
        let backing = RecordingBacking {
            initial: vec![make_record("old")],
            ..RecordingBacking::default()
        };
        let store = LogStore::open(backing).expect("open");

        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn concurrent_appends_are_all_kept() {
        let store = Arc::new(LogStore::in_memory());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for j in 0..25 {
                        store
                            .append(make_record(&format!("writer {i} entry {j}")))
                            .expect("append");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("writer thread");
        }

        assert_eq!(store.len(), 200);
    }

    #[test]
    fn debug_reports_record_count() {
        let store = LogStore::in_memory();
        store.append(make_record("x")).expect("append");
        assert!(format!("{store:?}").contains("records: 1"));
    }
}
