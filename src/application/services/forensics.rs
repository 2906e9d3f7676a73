use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::domain::classification::classify;
use crate::domain::entities::crash_report::{CrashRecord, CrashStatistics};
use crate::domain::entities::health::HealthSnapshot;
use crate::domain::ports::inspector::ProcessInspector;
use crate::domain::ports::store::ForensicStore;
use crate::domain::value_objects::crash_type::CrashType;
use crate::domain::value_objects::retention::RetentionPolicy;

/// Diagnostic window (in lines) fetched for a crash capture.
const CRASH_WINDOW_LINES: u32 = 600;
/// Diagnostic window (in lines) fetched for a stop-event capture.
const STOP_WINDOW_LINES: u32 = 120;
/// Cap on the diagnostic tail stored in a crash report.
const CRASH_TAIL_LIMIT: usize = 100;
/// Cap on the diagnostic tail stored in a stop-event report.
const STOP_TAIL_LIMIT: usize = 50;
/// System components whose lines are kept for a stop-event capture.
const STOP_EVENT_FILTER: &str = "ActivityManager|System";
/// How many recent reports feed the crash-type histogram.
const RECENT_HISTOGRAM_REPORTS: usize = 10;

/// Produces and retains forensic artifacts: status lines, crash reports,
/// and the retention sweep over stored reports.
///
/// Every operation degrades instead of failing: a lost diagnostic query
/// becomes an empty tail, a failed write becomes `None`, a failed sweep
/// is retried implicitly on the next capture.
pub struct ForensicsManager<'a> {
    inspector: &'a dyn ProcessInspector,
    store: &'a dyn ForensicStore,
    package: &'a str,
    retention: RetentionPolicy,
}

impl<'a> ForensicsManager<'a> {
    #[must_use]
    pub const fn new(
        inspector: &'a dyn ProcessInspector,
        store: &'a dyn ForensicStore,
        package: &'a str,
        retention: RetentionPolicy,
    ) -> Self {
        Self {
            inspector,
            store,
            package,
            retention,
        }
    }

    /// Append one status line for this snapshot. Best-effort telemetry:
    /// write failures are logged and swallowed.
    pub fn record_status(&self, snapshot: &HealthSnapshot) {
        let line = format_status_line(snapshot);
        if let Err(e) = self.store.append_status(&line) {
            tracing::warn!("Failed to append status line: {e}");
        }
    }

    /// Capture a crash report for the given snapshot.
    ///
    /// Fetches package-scoped diagnostics, classifies them, persists the
    /// record, then sweeps retention. Returns the artifact path, or
    /// `None` if persistence failed. Always writes a fresh artifact —
    /// edge-triggering is the caller's job.
    pub async fn capture_crash(&self, snapshot: &HealthSnapshot) -> Option<PathBuf> {
        let lines = match self
            .inspector
            .recent_diagnostics(Some(self.package), CRASH_WINDOW_LINES)
            .await
        {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!("Crash diagnostics query failed: {e}");
                Vec::new()
            }
        };

        let crash_type = classify(&lines);
        self.persist_report(crash_type, lines, CRASH_TAIL_LIMIT, snapshot)
    }

    /// Capture a stop event: the process went away without crash evidence
    /// or is about to be stopped deliberately.
    ///
    /// Diagnostics come from a system-level query and are optional — an
    /// empty tail still produces a valid record.
    pub async fn capture_stop_event(&self, snapshot: &HealthSnapshot) -> Option<PathBuf> {
        let lines = match self
            .inspector
            .recent_diagnostics(Some(STOP_EVENT_FILTER), STOP_WINDOW_LINES)
            .await
        {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!("Stop-event diagnostics query failed: {e}");
                Vec::new()
            }
        };

        self.persist_report(CrashType::ForceStop, lines, STOP_TAIL_LIMIT, snapshot)
    }

    fn persist_report(
        &self,
        crash_type: CrashType,
        lines: Vec<String>,
        tail_limit: usize,
        snapshot: &HealthSnapshot,
    ) -> Option<PathBuf> {
        let now = Utc::now();
        let diagnostic_line_count = lines.len();
        let record = CrashRecord {
            timestamp: now,
            package_identifier: self.package.to_string(),
            crash_type,
            uptime_before_event: snapshot.uptime_seconds,
            memory_at_event: snapshot.memory_mb,
            pid_at_event: snapshot.pid,
            diagnostic_line_count,
            diagnostic_tail: tail(lines, tail_limit),
        };

        match self.store.write_report(now, &record) {
            Ok(path) => {
                tracing::info!("Captured {crash_type} report: {}", path.display());
                // Sweep only after a successful write so a failed capture
                // cannot still shrink the archive.
                self.apply_retention();
                Some(path)
            }
            Err(e) => {
                tracing::warn!("Failed to write {crash_type} report: {e}");
                None
            }
        }
    }

    /// Enforce the retention policy over stored reports.
    ///
    /// Two passes, newest first: delete everything past `max_files`, then
    /// delete retained reports older than the retention window. Never
    /// raises; a partial sweep is corrected by the next one.
    pub fn apply_retention(&self) {
        let mut entries = match self.store.list_reports() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Retention listing failed: {e}");
                return;
            }
        };
        entries.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));

        let days = i64::try_from(self.retention.retention_days).unwrap_or(i64::MAX);
        let cutoff = chrono::Duration::try_days(days)
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let mut deleted = 0usize;

        for entry in entries.iter().skip(self.retention.max_files) {
            match self.store.delete_report(&entry.path) {
                Ok(()) => deleted += 1,
                Err(e) => {
                    tracing::warn!("Failed to delete report {}: {e}", entry.path.display());
                }
            }
        }

        for entry in entries.iter().take(self.retention.max_files) {
            if entry.modified_at < cutoff {
                match self.store.delete_report(&entry.path) {
                    Ok(()) => deleted += 1,
                    Err(e) => {
                        tracing::warn!("Failed to delete report {}: {e}", entry.path.display());
                    }
                }
            }
        }

        if deleted > 0 {
            tracing::info!("Retention: removed {deleted} old report(s)");
        }
    }

    /// Aggregate the stored reports into crash statistics.
    #[must_use]
    pub fn get_statistics(&self) -> CrashStatistics {
        gather_statistics(self.store)
    }
}

/// Aggregate the stored reports into crash statistics.
///
/// Malformed or vanished artifacts are skipped silently; a failed
/// listing yields empty statistics rather than an error.
#[must_use]
pub fn gather_statistics(store: &dyn ForensicStore) -> CrashStatistics {
    let mut entries = match store.list_reports() {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Statistics listing failed: {e}");
            return CrashStatistics::default();
        }
    };
    entries.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));

    let today = Utc::now().format("%Y%m%d").to_string();
    let today_count = entries
        .iter()
        .filter(|entry| {
            entry
                .path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().contains(&today))
        })
        .count();

    let mut crash_type_histogram = BTreeMap::new();
    for entry in entries.iter().take(RECENT_HISTOGRAM_REPORTS) {
        if let Ok(record) = store.read_report(&entry.path) {
            *crash_type_histogram.entry(record.crash_type).or_insert(0) += 1;
        }
    }

    CrashStatistics {
        total: entries.len(),
        today_count,
        crash_type_histogram,
        oldest: entries.last().map(|entry| entry.modified_at),
        newest: entries.first().map(|entry| entry.modified_at),
    }
}

/// Render one status line:
/// `TIMESTAMP | STATE | PID:<p> | up:<s>s | mem:<m>MB`.
#[must_use]
pub fn format_status_line(snapshot: &HealthSnapshot) -> String {
    let pid = snapshot
        .pid
        .map_or_else(|| "N/A".to_string(), |p| p.to_string());
    format!(
        "{} | {} | PID:{} | up:{}s | mem:{:.1}MB",
        snapshot.observed_at.format("%Y-%m-%d %H:%M:%S"),
        snapshot.state_label(),
        pid,
        snapshot.uptime_seconds,
        snapshot.memory_mb,
    )
}

/// Keep the last `limit` lines, order preserved.
fn tail(mut lines: Vec<String>, limit: usize) -> Vec<String> {
    let excess = lines.len().saturating_sub(limit);
    lines.drain(..excess);
    lines
}
