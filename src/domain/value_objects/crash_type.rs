use serde::{Deserialize, Serialize};

/// Classified cause of an abnormal termination.
///
/// `ForceStop` is assigned directly by stop-event capture, never produced
/// by classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CrashType {
    FatalException,
    Anr,
    Oom,
    NativeCrash,
    Abort,
    Killed,
    Unknown,
    ProcessMissing,
    ForceStop,
}

impl std::fmt::Display for CrashType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FatalException => write!(f, "fatal_exception"),
            Self::Anr => write!(f, "anr"),
            Self::Oom => write!(f, "oom"),
            Self::NativeCrash => write!(f, "native_crash"),
            Self::Abort => write!(f, "abort"),
            Self::Killed => write!(f, "killed"),
            Self::Unknown => write!(f, "unknown"),
            Self::ProcessMissing => write!(f, "process_missing"),
            Self::ForceStop => write!(f, "force_stop"),
        }
    }
}
