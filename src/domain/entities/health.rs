use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time health observation of the watched application.
///
/// `running` and `crashed` are never both true; both false means a clean
/// or indeterminate stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub running: bool,
    pub crashed: bool,
    pub pid: Option<u32>,
    pub uptime_seconds: u64,
    pub memory_mb: f64,
    pub observed_at: DateTime<Utc>,
}

impl HealthSnapshot {
    /// Snapshot for a live process.
    #[must_use]
    pub fn running(
        pid: u32,
        uptime_seconds: u64,
        memory_mb: f64,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            running: true,
            crashed: false,
            pid: Some(pid),
            uptime_seconds,
            memory_mb,
            observed_at,
        }
    }

    /// Snapshot for an absent process; `crashed` carries the result of the
    /// recent-crash-signal check.
    #[must_use]
    pub fn stopped(crashed: bool, observed_at: DateTime<Utc>) -> Self {
        Self {
            running: false,
            crashed,
            pid: None,
            uptime_seconds: 0,
            memory_mb: 0.0,
            observed_at,
        }
    }

    /// Snapshot emitted when the census itself failed. Nothing is known
    /// about the process, so neither a crash nor a clean stop is claimed.
    #[must_use]
    pub fn indeterminate(observed_at: DateTime<Utc>) -> Self {
        Self::stopped(false, observed_at)
    }

    /// State label used in status lines and CLI output.
    #[must_use]
    pub const fn state_label(&self) -> &'static str {
        if self.running {
            "RUNNING"
        } else if self.crashed {
            "CRASHED"
        } else {
            "STOPPED"
        }
    }
}
