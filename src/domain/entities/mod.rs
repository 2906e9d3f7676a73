pub mod crash_report;
pub mod health;

pub use crash_report::{CrashRecord, CrashStatistics};
pub use health::HealthSnapshot;
