//! JSON file backing.
//!
//! The whole record set lives in one file holding a single JSON array. Each
//! save rewrites the file in full: the new contents go to a sibling temp file
//! which is then renamed over the original, so a reader never sees a
//! half-written array.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::{LogError, Result};
use crate::traits::LogBacking;
use crate::types::LogRecord;
use crate::validator::validate;

/// File-backed persistence for a [`LogStore`](crate::LogStore).
#[derive(Debug, Clone)]
pub struct JsonFileBacking {
    path: PathBuf,
}

impl JsonFileBacking {
    /// Opens the backing file, creating its directory and an empty array if
    /// they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the initial file cannot be
    /// created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let backing = Self { path };
        if !backing.path.exists() {
            backing.save(&[])?;
            info!(path = %backing.path.display(), "created log data file");
        }
        Ok(backing)
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LogBacking for JsonFileBacking {
    /// Reads the array back, re-validating every element.
    ///
    /// Elements that fail validation are skipped so the store never holds a
    /// malformed record. Skipped elements are not kept anywhere: the next
    /// [`save`](LogBacking::save) rewrites the file from the loaded set and
    /// erases them, so the count is logged at error level. An empty file
    /// reads as no records; any other non-array content is rejected rather
    /// than silently overwritten by the next save.
    fn load(&self) -> Result<Vec<LogRecord>> {
        let bytes = fs::read(&self.path)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let Value::Array(items) = serde_json::from_slice::<Value>(&bytes)? else {
            return Err(LogError::CorruptBacking {
                path: self.path.clone(),
                reason: "expected a JSON array of log records".to_string(),
            });
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match validate(item) {
                Ok(record) => records.push(record),
                Err(errors) => {
                    warn!(index, %errors, "skipping invalid persisted log record");
                }
            }
        }

        let skipped = items.len() - records.len();
        if skipped > 0 {
            error!(
                path = %self.path.display(),
                skipped,
                "invalid log records will be dropped from the data file on the next write"
            );
        }
        Ok(records)
    }

    fn save(&self, records: &[LogRecord]) -> Result<()> {
        let temp = self.temp_path();
        let bytes = serde_json::to_vec_pretty(records)?;
        fs::write(&temp, bytes)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
