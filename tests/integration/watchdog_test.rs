#![allow(clippy::expect_used)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use warden::application::services::watchdog::WatchdogService;
use warden::domain::ports::controller::{AppController, ControlError};
use warden::domain::ports::inspector::{Census, InspectionError, ProcessInspector};
use warden::domain::ports::store::ForensicStore;
use warden::domain::value_objects::crash_type::CrashType;
use warden::domain::value_objects::retention::RetentionPolicy;
use warden::infrastructure::persistence::fs_store::FsForensicStore;

// ---------------------------------------------------------------------------
// ScriptedInspector
// ---------------------------------------------------------------------------

/// Census results are consumed in order; once the script runs out the
/// process stays missing.
struct ScriptedInspector {
    census: Mutex<VecDeque<Census>>,
    package_lines: Vec<String>,
    system_lines: Vec<String>,
}

impl ScriptedInspector {
    fn new(script: Vec<Census>) -> Self {
        Self {
            census: Mutex::new(script.into()),
            package_lines: vec![],
            system_lines: vec![],
        }
    }

    fn with_crash_markers(script: Vec<Census>) -> Self {
        Self {
            package_lines: vec!["E AndroidRuntime: FATAL EXCEPTION: main".to_string()],
            ..Self::new(script)
        }
    }
}

#[async_trait]
impl ProcessInspector for ScriptedInspector {
    async fn census(&self, _package: &str) -> Result<Census, InspectionError> {
        Ok(self
            .census
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(Census::Missing))
    }

    async fn read_memory_mb(&self, _pid: u32) -> Result<f64, InspectionError> {
        Ok(42.0)
    }

    async fn recent_diagnostics(
        &self,
        filter: Option<&str>,
        _window_lines: u32,
    ) -> Result<Vec<String>, InspectionError> {
        match filter {
            Some(f) if f.contains('|') => Ok(self.system_lines.clone()),
            _ => Ok(self.package_lines.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// CountingController
// ---------------------------------------------------------------------------

struct CountingController {
    restarts: AtomicUsize,
}

impl CountingController {
    const fn new() -> Self {
        Self {
            restarts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AppController for CountingController {
    async fn restart(&self, _package: &str) -> Result<(), ControlError> {
        self.restarts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn store_in(dir: &Path) -> FsForensicStore {
    FsForensicStore::new(
        &dir.join("crashes").to_string_lossy(),
        &dir.join("status.log").to_string_lossy(),
    )
}

fn status_lines(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("status.log"))
        .expect("read status log")
        .lines()
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn crash_cycle_leaves_one_artifact_and_full_status_trail() {
    let dir = tempfile::tempdir().expect("tempdir");
    let inspector = ScriptedInspector::with_crash_markers(vec![
        Census::Present { pid: 100 },
        Census::Missing,
        Census::Present { pid: 101 },
    ]);
    let controller = CountingController::new();
    let store = store_in(dir.path());
    store.prepare().expect("prepare");
    let mut service = WatchdogService::new(
        &inspector,
        &controller,
        &store,
        "com.example.app",
        RetentionPolicy::default(),
    );

    let first = service.poll_once().await;
    let second = service.poll_once().await;
    let third = service.poll_once().await;

    assert!(first.captured.is_none());
    assert!(second.captured.is_some());
    assert!(third.captured.is_none());

    let reports = store.list_reports().expect("list");
    assert_eq!(reports.len(), 1);
    let record = store.read_report(&reports[0].path).expect("read");
    assert_eq!(record.crash_type, CrashType::FatalException);

    let trail = status_lines(dir.path());
    assert_eq!(trail.len(), 3);
    assert!(trail[0].contains("RUNNING"));
    assert!(trail[1].contains("CRASHED"));
    assert!(trail[2].contains("RUNNING"));
}

#[tokio::test]
async fn clean_stop_capture_rearms_after_recovery() {
    let dir = tempfile::tempdir().expect("tempdir");
    let inspector = ScriptedInspector::new(vec![
        Census::Present { pid: 100 },
        Census::Missing,
        Census::Present { pid: 200 },
        Census::Missing,
    ]);
    let controller = CountingController::new();
    let store = store_in(dir.path());
    store.prepare().expect("prepare");
    let mut service = WatchdogService::new(
        &inspector,
        &controller,
        &store,
        "com.example.app",
        RetentionPolicy::default(),
    );

    for _ in 0..4 {
        service.poll_once().await;
    }

    let reports = store.list_reports().expect("list");
    assert_eq!(reports.len(), 2);
    for entry in &reports {
        let record = store.read_report(&entry.path).expect("read");
        assert_eq!(record.crash_type, CrashType::ForceStop);
    }
}

#[tokio::test]
async fn deliberate_restart_leaves_force_stop_artifact() {
    let dir = tempfile::tempdir().expect("tempdir");
    let inspector = ScriptedInspector::new(vec![Census::Present { pid: 100 }]);
    let controller = CountingController::new();
    let store = store_in(dir.path());
    store.prepare().expect("prepare");
    let mut service = WatchdogService::new(
        &inspector,
        &controller,
        &store,
        "com.example.app",
        RetentionPolicy::default(),
    );

    let restarted = service.restart().await;

    assert!(restarted);
    assert_eq!(controller.restarts.load(Ordering::SeqCst), 1);

    let reports = store.list_reports().expect("list");
    assert_eq!(reports.len(), 1);
    let record = store.read_report(&reports[0].path).expect("read");
    assert_eq!(record.crash_type, CrashType::ForceStop);
    assert_eq!(record.pid_at_event, Some(100));
    assert!((record.memory_at_event - 42.0).abs() < f64::EPSILON);
}
