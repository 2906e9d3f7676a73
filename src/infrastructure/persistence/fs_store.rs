use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::domain::entities::crash_report::CrashRecord;
use crate::domain::ports::store::{ForensicStore, ReportEntry, StoreError};

/// Filesystem-backed forensic store: one pretty-printed JSON file per
/// crash report under the crash directory, plus an append-only status
/// log.
///
/// Report files are named `crash_YYYYMMDD_HHMMSS.log`; a second capture
/// in the same second gets a numeric suffix instead of overwriting the
/// first.
pub struct FsForensicStore {
    crash_dir: PathBuf,
    status_log: PathBuf,
}

impl FsForensicStore {
    /// Build a store from raw (possibly `~`-prefixed) paths.
    #[must_use]
    pub fn new(crash_dir: &str, status_log: &str) -> Self {
        Self {
            crash_dir: PathBuf::from(shellexpand::tilde(crash_dir).as_ref()),
            status_log: PathBuf::from(shellexpand::tilde(status_log).as_ref()),
        }
    }

    /// Create the artifact directories eagerly, so the first capture in
    /// a crash situation does not also have to create them.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if a directory cannot be created.
    pub fn prepare(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.crash_dir).map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        if let Some(parent) = self.status_log.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        }
        Ok(())
    }

    fn next_report_path(&self, captured_at: DateTime<Utc>) -> PathBuf {
        let stem = format!("crash_{}", captured_at.format("%Y%m%d_%H%M%S"));
        let mut candidate = self.crash_dir.join(format!("{stem}.log"));
        let mut suffix = 2u32;
        while candidate.exists() {
            candidate = self.crash_dir.join(format!("{stem}_{suffix}.log"));
            suffix += 1;
        }
        candidate
    }
}

fn is_report_name(name: &str) -> bool {
    name.starts_with("crash_") && name.ends_with(".log")
}

impl ForensicStore for FsForensicStore {
    fn append_status(&self, line: &str) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.status_log)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        writeln!(file, "{line}").map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    fn write_report(
        &self,
        captured_at: DateTime<Utc>,
        record: &CrashRecord,
    ) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.crash_dir).map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        let path = self.next_report_path(captured_at);
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        fs::write(&path, json).map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        Ok(path)
    }

    fn list_reports(&self) -> Result<Vec<ReportEntry>, StoreError> {
        if !self.crash_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.crash_dir)
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?
            .flatten()
            .filter(|entry| is_report_name(&entry.file_name().to_string_lossy()))
            .filter_map(|entry| {
                // A report swept away mid-listing is not an error.
                let modified = entry.metadata().and_then(|m| m.modified()).ok()?;
                Some(ReportEntry {
                    path: entry.path(),
                    modified_at: DateTime::<Utc>::from(modified),
                })
            })
            .collect();
        Ok(entries)
    }

    fn read_report(&self, path: &Path) -> Result<CrashRecord, StoreError> {
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(path.display().to_string()),
            _ => StoreError::ReadFailed(e.to_string()),
        })?;
        serde_json::from_str(&contents).map_err(|e| StoreError::ReadFailed(e.to_string()))
    }

    fn delete_report(&self, path: &Path) -> Result<(), StoreError> {
        fs::remove_file(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(path.display().to_string()),
            _ => StoreError::DeleteFailed(e.to_string()),
        })
    }
}
