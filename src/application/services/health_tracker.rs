use chrono::{DateTime, Utc};

use crate::domain::classification::has_crash_signal;
use crate::domain::entities::health::HealthSnapshot;
use crate::domain::ports::inspector::{Census, ProcessInspector};

/// Diagnostic window (in lines) scanned for crash evidence when the
/// process turns up missing.
const CRASH_SIGNAL_WINDOW_LINES: u32 = 120;

/// One tracked process identity: the PID and when it was first seen.
#[derive(Debug, Clone, Copy)]
struct Session {
    pid: u32,
    started_at: DateTime<Utc>,
}

/// Turns raw census results into health snapshots, maintaining session
/// continuity across polls.
///
/// The session is the only mutable state here. It is deliberately *not*
/// cleared when the process disappears: if the census later reports the
/// same PID again, the session resumes rather than restarting, so a
/// single missed poll is not counted as a new launch.
pub struct HealthTracker<'a> {
    inspector: &'a dyn ProcessInspector,
    package: &'a str,
    session: Option<Session>,
}

impl<'a> HealthTracker<'a> {
    #[must_use]
    pub const fn new(inspector: &'a dyn ProcessInspector, package: &'a str) -> Self {
        Self {
            inspector,
            package,
            session: None,
        }
    }

    /// Evaluate one census result into a snapshot.
    ///
    /// Never fails: a missing process degrades to a stopped snapshot, an
    /// unreadable memory value degrades to `0.0`, and a failed
    /// crash-signal query degrades to "no crash evidence".
    pub async fn evaluate(&mut self, census: Census) -> HealthSnapshot {
        let now = Utc::now();
        match census {
            Census::Present { pid } => self.evaluate_running(pid, now).await,
            Census::Missing => {
                let crashed = self.check_crash_signal().await;
                HealthSnapshot::stopped(crashed, now)
            }
        }
    }

    async fn evaluate_running(&mut self, pid: u32, now: DateTime<Utc>) -> HealthSnapshot {
        let started_at = match self.session {
            Some(session) if session.pid == pid => session.started_at,
            _ => {
                tracing::info!("New process detected: PID {pid}");
                self.session = Some(Session {
                    pid,
                    started_at: now,
                });
                now
            }
        };

        let uptime_seconds = u64::try_from((now - started_at).num_seconds()).unwrap_or(0);

        let memory_mb = match self.inspector.read_memory_mb(pid).await {
            Ok(mb) => mb,
            Err(e) => {
                tracing::warn!("Memory read failed for PID {pid}: {e}");
                0.0
            }
        };

        HealthSnapshot::running(pid, uptime_seconds, memory_mb, now)
    }

    /// Scan a short recent diagnostic window for crash markers scoped to
    /// the watched package.
    async fn check_crash_signal(&self) -> bool {
        match self
            .inspector
            .recent_diagnostics(Some(self.package), CRASH_SIGNAL_WINDOW_LINES)
            .await
        {
            Ok(lines) => has_crash_signal(&lines),
            Err(e) => {
                tracing::warn!("Crash-signal check failed: {e}");
                false
            }
        }
    }
}
