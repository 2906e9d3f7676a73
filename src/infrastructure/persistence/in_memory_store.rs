use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::domain::entities::crash_report::CrashRecord;
use crate::domain::ports::store::{ForensicStore, ReportEntry, StoreError};

struct ReportFile {
    path: PathBuf,
    modified_at: DateTime<Utc>,
    record: CrashRecord,
}

/// In-memory store for testing purposes.
///
/// Report paths are bare file names following the on-disk naming scheme,
/// so path-based assertions carry over to the filesystem store.
pub struct InMemoryStore {
    status_lines: Mutex<Vec<String>>,
    reports: Mutex<Vec<ReportFile>>,
    fail_writes: bool,
}

impl InMemoryStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status_lines: Mutex::new(Vec::new()),
            reports: Mutex::new(Vec::new()),
            fail_writes: false,
        }
    }

    /// A store whose writes all fail, for degradation paths.
    #[must_use]
    pub const fn failing() -> Self {
        Self {
            status_lines: Mutex::new(Vec::new()),
            reports: Mutex::new(Vec::new()),
            fail_writes: true,
        }
    }

    /// Stored records in insertion order.
    #[must_use]
    pub fn records(&self) -> Vec<CrashRecord> {
        self.reports
            .lock()
            .map(|reports| reports.iter().map(|f| f.record.clone()).collect())
            .unwrap_or_default()
    }

    /// Appended status lines in insertion order.
    #[must_use]
    pub fn status_lines(&self) -> Vec<String> {
        self.status_lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Rewrite the modification time of the report at `index`
    /// (insertion order), mimicking an old file on disk.
    pub fn backdate_report(&self, index: usize, modified_at: DateTime<Utc>) {
        if let Ok(mut reports) = self.reports.lock() {
            if let Some(report) = reports.get_mut(index) {
                report.modified_at = modified_at;
            }
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ForensicStore for InMemoryStore {
    fn append_status(&self, line: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::WriteFailed("simulated write failure".into()));
        }
        self.status_lines
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?
            .push(line.to_string());
        Ok(())
    }

    fn write_report(
        &self,
        captured_at: DateTime<Utc>,
        record: &CrashRecord,
    ) -> Result<PathBuf, StoreError> {
        if self.fail_writes {
            return Err(StoreError::WriteFailed("simulated write failure".into()));
        }
        let mut reports = self
            .reports
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?;

        let stem = format!("crash_{}", captured_at.format("%Y%m%d_%H%M%S"));
        let mut candidate = PathBuf::from(format!("{stem}.log"));
        let mut suffix = 2u32;
        while reports.iter().any(|r| r.path == candidate) {
            candidate = PathBuf::from(format!("{stem}_{suffix}.log"));
            suffix += 1;
        }

        reports.push(ReportFile {
            path: candidate.clone(),
            modified_at: captured_at,
            record: record.clone(),
        });
        drop(reports);
        Ok(candidate)
    }

    fn list_reports(&self) -> Result<Vec<ReportEntry>, StoreError> {
        Ok(self
            .reports
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?
            .iter()
            .map(|r| ReportEntry {
                path: r.path.clone(),
                modified_at: r.modified_at,
            })
            .collect())
    }

    fn read_report(&self, path: &Path) -> Result<CrashRecord, StoreError> {
        self.reports
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?
            .iter()
            .find(|r| r.path == path)
            .map(|r| r.record.clone())
            .ok_or_else(|| StoreError::NotFound(path.display().to_string()))
    }

    fn delete_report(&self, path: &Path) -> Result<(), StoreError> {
        let mut reports = self
            .reports
            .lock()
            .map_err(|_| StoreError::DeleteFailed("lock poisoned".into()))?;
        let before = reports.len();
        reports.retain(|r| r.path != path);
        if reports.len() == before {
            return Err(StoreError::NotFound(path.display().to_string()));
        }
        drop(reports);
        Ok(())
    }
}
