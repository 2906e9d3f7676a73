#![allow(clippy::expect_used)]

use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use warden::application::services::forensics::ForensicsManager;
use warden::domain::entities::crash_report::CrashRecord;
use warden::domain::entities::health::HealthSnapshot;
use warden::domain::ports::inspector::{Census, InspectionError, ProcessInspector};
use warden::domain::ports::store::ForensicStore;
use warden::domain::value_objects::crash_type::CrashType;
use warden::domain::value_objects::retention::RetentionPolicy;
use warden::infrastructure::persistence::fs_store::FsForensicStore;

// ---------------------------------------------------------------------------
// Fixture loader
// ---------------------------------------------------------------------------

fn load_fixture_lines(name: &str) -> Vec<String> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let text = std::fs::read_to_string(&path).expect("Failed to read fixture");
    text.lines().map(String::from).collect()
}

// ---------------------------------------------------------------------------
// FixtureInspector
// ---------------------------------------------------------------------------

struct FixtureInspector {
    package_lines: Vec<String>,
    system_lines: Vec<String>,
}

impl FixtureInspector {
    const fn empty() -> Self {
        Self {
            package_lines: vec![],
            system_lines: vec![],
        }
    }
}

#[async_trait]
impl ProcessInspector for FixtureInspector {
    async fn census(&self, _package: &str) -> Result<Census, InspectionError> {
        Ok(Census::Missing)
    }

    async fn read_memory_mb(&self, _pid: u32) -> Result<f64, InspectionError> {
        Ok(0.0)
    }

    async fn recent_diagnostics(
        &self,
        filter: Option<&str>,
        _window_lines: u32,
    ) -> Result<Vec<String>, InspectionError> {
        // A multi-needle filter marks the system-scoped query.
        match filter {
            Some(f) if f.contains('|') => Ok(self.system_lines.clone()),
            _ => Ok(self.package_lines.clone()),
        }
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

fn make_record() -> CrashRecord {
    CrashRecord {
        timestamp: Utc::now(),
        package_identifier: "com.example.app".to_string(),
        crash_type: CrashType::Unknown,
        uptime_before_event: 0,
        memory_at_event: 0.0,
        pid_at_event: None,
        diagnostic_line_count: 0,
        diagnostic_tail: vec![],
    }
}

fn backdate_file(path: &Path, age: Duration) {
    let file = File::options().write(true).open(path).expect("open report");
    file.set_modified(SystemTime::now() - age)
        .expect("set mtime");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn crash_capture_writes_readable_artifact() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fixture = load_fixture_lines("logcat_fatal_exception.txt");
    let inspector = FixtureInspector {
        package_lines: fixture.clone(),
        system_lines: vec![],
    };
    let store = store_in(dir.path());
    let manager = ForensicsManager::new(
        &inspector,
        &store,
        "com.example.app",
        RetentionPolicy::default(),
    );

    let snapshot = HealthSnapshot::stopped(true, Utc::now());
    let path = manager
        .capture_crash(&snapshot)
        .await
        .expect("capture should persist");

    assert!(path.exists());
    let record = store.read_report(&path).expect("read back");
    assert_eq!(record.crash_type, CrashType::FatalException);
    assert_eq!(record.package_identifier, "com.example.app");
    assert_eq!(record.diagnostic_line_count, fixture.len());
    assert!(record
        .diagnostic_tail
        .iter()
        .any(|line| line.contains("FATAL EXCEPTION")));
}

#[tokio::test]
async fn stop_event_capture_uses_system_window() {
    let dir = tempfile::tempdir().expect("tempdir");
    let inspector = FixtureInspector {
        package_lines: vec![],
        system_lines: load_fixture_lines("logcat_force_stop.txt"),
    };
    let store = store_in(dir.path());
    let manager = ForensicsManager::new(
        &inspector,
        &store,
        "com.example.app",
        RetentionPolicy::default(),
    );

    let snapshot = HealthSnapshot::running(12345, 3600, 187.0, Utc::now());
    let path = manager
        .capture_stop_event(&snapshot)
        .await
        .expect("capture should persist");

    let record = store.read_report(&path).expect("read back");
    assert_eq!(record.crash_type, CrashType::ForceStop);
    assert_eq!(record.pid_at_event, Some(12345));
    assert_eq!(record.uptime_before_event, 3600);
    assert!(record
        .diagnostic_tail
        .iter()
        .any(|line| line.contains("Force stopping")));
}

#[tokio::test]
async fn status_lines_accumulate_on_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let inspector = FixtureInspector::empty();
    let store = store_in(dir.path());
    store.prepare().expect("prepare");
    let manager = ForensicsManager::new(
        &inspector,
        &store,
        "com.example.app",
        RetentionPolicy::default(),
    );

    manager.record_status(&HealthSnapshot::running(100, 5, 32.0, Utc::now()));
    manager.record_status(&HealthSnapshot::stopped(false, Utc::now()));

    let contents = std::fs::read_to_string(dir.path().join("status.log")).expect("read log");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("RUNNING"));
    assert!(lines[1].contains("STOPPED"));
}

#[test]
fn retention_prunes_archive_to_max_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let inspector = FixtureInspector::empty();
    let store = store_in(dir.path());
    let manager = ForensicsManager::new(
        &inspector,
        &store,
        "com.example.app",
        RetentionPolicy::new(5, 30),
    );

    // Eight artifacts, one to eight minutes old. Seeded through the store
    // directly so the sweep under test sees the full archive at once.
    for age_minutes in 1..=8u64 {
        let path = store
            .write_report(Utc::now(), &make_record())
            .expect("seed report");
        backdate_file(&path, Duration::from_secs(60 * age_minutes));
    }

    manager.apply_retention();

    let remaining = store.list_reports().expect("list");
    assert_eq!(remaining.len(), 5);
    // Only the five newest survive: everything older than ~5 minutes is gone.
    let cutoff = DateTime::<Utc>::from(SystemTime::now() - Duration::from_secs(330));
    assert!(remaining.iter().all(|entry| entry.modified_at > cutoff));
}

#[tokio::test]
async fn retention_deletes_stale_reports() {
    let dir = tempfile::tempdir().expect("tempdir");
    let inspector = FixtureInspector::empty();
    let store = store_in(dir.path());
    let manager = ForensicsManager::new(
        &inspector,
        &store,
        "com.example.app",
        RetentionPolicy::new(10, 30),
    );

    let snapshot = HealthSnapshot::stopped(true, Utc::now());
    let stale = manager.capture_crash(&snapshot).await.expect("seed");
    manager.capture_crash(&snapshot).await.expect("seed");
    manager.capture_crash(&snapshot).await.expect("seed");
    backdate_file(&stale, Duration::from_secs(60 * 60 * 24 * 40));

    manager.apply_retention();

    assert!(!stale.exists());
    assert_eq!(store.list_reports().expect("list").len(), 2);
}

#[tokio::test]
async fn statistics_reflect_disk_contents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let inspector = FixtureInspector {
        package_lines: load_fixture_lines("logcat_fatal_exception.txt"),
        system_lines: load_fixture_lines("logcat_force_stop.txt"),
    };
    let store = store_in(dir.path());
    let manager = ForensicsManager::new(
        &inspector,
        &store,
        "com.example.app",
        RetentionPolicy::default(),
    );

    let snapshot = HealthSnapshot::stopped(true, Utc::now());
    manager.capture_crash(&snapshot).await.expect("capture");
    manager.capture_crash(&snapshot).await.expect("capture");
    manager
        .capture_stop_event(&snapshot)
        .await
        .expect("capture");

    let stats = manager.get_statistics();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.today_count, 3);
    assert_eq!(
        stats.crash_type_histogram.get(&CrashType::FatalException),
        Some(&2)
    );
    assert_eq!(
        stats.crash_type_histogram.get(&CrashType::ForceStop),
        Some(&1)
    );
    assert!(stats.oldest.is_some());
    assert!(stats.oldest <= stats.newest);
}
