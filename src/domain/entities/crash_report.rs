use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::crash_type::CrashType;

/// Forensic record written once per abnormal-termination event.
///
/// Never mutated after persistence; eventually removed by the retention
/// sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrashRecord {
    pub timestamp: DateTime<Utc>,
    pub package_identifier: String,
    pub crash_type: CrashType,
    pub uptime_before_event: u64,
    pub memory_at_event: f64,
    pub pid_at_event: Option<u32>,
    /// Number of diagnostic lines available before truncation.
    pub diagnostic_line_count: usize,
    /// Most-recent-last tail of the diagnostic text, already capped.
    pub diagnostic_tail: Vec<String>,
}

/// Aggregate view over the stored crash reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrashStatistics {
    pub total: usize,
    pub today_count: usize,
    /// Crash-type counts over the 10 most recent reports.
    pub crash_type_histogram: std::collections::BTreeMap<CrashType, usize>,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}
