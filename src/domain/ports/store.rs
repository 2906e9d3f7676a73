use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::entities::crash_report::CrashRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("artifact read failed: {0}")]
    ReadFailed(String),
    #[error("artifact write failed: {0}")]
    WriteFailed(String),
    #[error("artifact delete failed: {0}")]
    DeleteFailed(String),
    #[error("artifact not found: {0}")]
    NotFound(String),
}

/// Directory listing entry for a stored crash report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub path: PathBuf,
    pub modified_at: DateTime<Utc>,
}

/// Persistence for forensic artifacts: the append-only status log and the
/// per-event crash reports. Single-writer; see the daemon task.
pub trait ForensicStore: Send + Sync {
    /// Append one complete line to the status log.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the append fails.
    fn append_status(&self, line: &str) -> Result<(), StoreError>;

    /// Persist a crash record keyed by `captured_at` (one-second
    /// resolution) and return the path actually written. A name collision
    /// must yield a distinct path, never an overwrite.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if serialization or the write fails.
    fn write_report(
        &self,
        captured_at: DateTime<Utc>,
        record: &CrashRecord,
    ) -> Result<PathBuf, StoreError>;

    /// List stored reports with their modification times, in no
    /// particular order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the listing fails. A missing report
    /// directory is an empty listing, not an error.
    fn list_reports(&self) -> Result<Vec<ReportEntry>, StoreError>;

    /// Read back one stored report.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file is missing, unreadable, or not a
    /// valid record.
    fn read_report(&self, path: &Path) -> Result<CrashRecord, StoreError>;

    /// Delete one stored report.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the deletion fails.
    fn delete_report(&self, path: &Path) -> Result<(), StoreError>;
}
