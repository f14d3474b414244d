//! The query engine.
//!
//! [`query`] narrows a record set by a [`FilterSpec`] and orders the result
//! newest first. [`Facets`] summarizes a result set for faceted navigation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::filter::FilterSpec;
use crate::types::{LogLevel, LogRecord};

/// Returns the records matching `spec`, most recent first.
///
/// The sort is stable, so records with equal timestamps keep their insertion
/// order.
#[must_use]
pub fn query(mut records: Vec<LogRecord>, spec: &FilterSpec) -> Vec<LogRecord> {
    records.retain(|record| spec.matches(record));
    records.sort_by(|a, b| b.timestamp().instant().cmp(&a.timestamp().instant()));
    records
}

/// Per-level and per-resource counts over a set of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// Number of records counted.
    pub total: usize,
    /// Count per level name. Every level is present, possibly with zero.
    pub levels: BTreeMap<String, usize>,
    /// Count per resource ID.
    pub resources: BTreeMap<String, usize>,
}

impl Facets {
    /// Counts the given records.
    #[must_use]
    pub fn from_records(records: &[LogRecord]) -> Self {
        let mut levels: BTreeMap<String, usize> = LogLevel::ALL
            .iter()
            .map(|level| (level.as_str().to_string(), 0))
            .collect();
        let mut resources = BTreeMap::new();

        for record in records {
            *levels.entry(record.level().as_str().to_string()).or_default() += 1;
            *resources
                .entry(record.resource_id().to_string())
                .or_default() += 1;
        }

        Self {
            total: records.len(),
            levels,
            resources,
        }
    }
}
