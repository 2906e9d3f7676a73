use std::path::PathBuf;

use chrono::Utc;

use crate::application::services::forensics::ForensicsManager;
use crate::application::services::health_tracker::HealthTracker;
use crate::domain::entities::health::HealthSnapshot;
use crate::domain::ports::controller::AppController;
use crate::domain::ports::inspector::ProcessInspector;
use crate::domain::ports::store::ForensicStore;
use crate::domain::value_objects::retention::RetentionPolicy;

/// Commands the daemon task consumes between polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogCommand {
    Restart,
}

/// Result of one poll cycle.
pub struct PollOutcome {
    pub snapshot: HealthSnapshot,
    /// Artifact captured this cycle, if any.
    pub captured: Option<PathBuf>,
}

/// Drives one watch cycle: census → evaluate → status line →
/// edge-triggered capture.
///
/// Owns all mutable pipeline state (the tracker session, the previous
/// running flag, and the per-stop capture latch), so captures are
/// serialized by construction — the daemon task is the only caller.
pub struct WatchdogService<'a> {
    inspector: &'a dyn ProcessInspector,
    controller: &'a dyn AppController,
    tracker: HealthTracker<'a>,
    forensics: ForensicsManager<'a>,
    package: &'a str,
    was_running: bool,
    stop_captured: bool,
}

impl<'a> WatchdogService<'a> {
    #[must_use]
    pub const fn new(
        inspector: &'a dyn ProcessInspector,
        controller: &'a dyn AppController,
        store: &'a dyn ForensicStore,
        package: &'a str,
        retention: RetentionPolicy,
    ) -> Self {
        Self {
            inspector,
            controller,
            tracker: HealthTracker::new(inspector, package),
            forensics: ForensicsManager::new(inspector, store, package, retention),
            package,
            was_running: false,
            // Disarmed at start: an app already crashed before the first
            // poll still gets one capture.
            stop_captured: false,
        }
    }

    /// Run one poll cycle.
    ///
    /// A census error produces an indeterminate snapshot and records a
    /// status line, but skips transition handling entirely — an
    /// unreachable device says nothing about the process, so the
    /// previous state stands until the census recovers.
    pub async fn poll_once(&mut self) -> PollOutcome {
        match self.inspector.census(self.package).await {
            Ok(census) => {
                let snapshot = self.tracker.evaluate(census).await;
                self.forensics.record_status(&snapshot);
                let captured = self.handle_transition(&snapshot).await;
                self.was_running = snapshot.running;
                PollOutcome { snapshot, captured }
            }
            Err(e) => {
                tracing::warn!("Census failed: {e}");
                let snapshot = HealthSnapshot::indeterminate(Utc::now());
                self.forensics.record_status(&snapshot);
                PollOutcome {
                    snapshot,
                    captured: None,
                }
            }
        }
    }

    /// Capture at most one artifact per stop episode.
    async fn handle_transition(&mut self, snapshot: &HealthSnapshot) -> Option<PathBuf> {
        if snapshot.running {
            // Recovery re-arms capture for the next stop episode.
            self.stop_captured = false;
            return None;
        }
        if self.stop_captured {
            return None;
        }
        if snapshot.crashed {
            self.stop_captured = true;
            self.forensics.capture_crash(snapshot).await
        } else if self.was_running {
            self.stop_captured = true;
            self.forensics.capture_stop_event(snapshot).await
        } else {
            None
        }
    }

    /// Restart the watched application, returning whether the restart
    /// command succeeded.
    ///
    /// Takes a fresh census first: if the app is still running, the
    /// imminent forced stop is captured as a stop event so the artifact
    /// trail shows why the process went away.
    pub async fn restart(&mut self) -> bool {
        match self.inspector.census(self.package).await {
            Ok(census) => {
                let snapshot = self.tracker.evaluate(census).await;
                if snapshot.running {
                    self.forensics.capture_stop_event(&snapshot).await;
                    self.stop_captured = true;
                }
            }
            Err(e) => {
                tracing::warn!("Census failed before restart: {e}");
            }
        }

        match self.controller.restart(self.package).await {
            Ok(()) => {
                tracing::info!("Restart issued for {}", self.package);
                true
            }
            Err(e) => {
                tracing::warn!("Restart failed for {}: {e}", self.package);
                false
            }
        }
    }
}
