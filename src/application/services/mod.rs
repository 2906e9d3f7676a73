pub mod forensics;
pub mod health_tracker;
pub mod watchdog;

pub use forensics::ForensicsManager;
pub use health_tracker::HealthTracker;
pub use watchdog::{PollOutcome, WatchdogCommand, WatchdogService};
