use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectionError {
    #[error("process census failed: {0}")]
    CensusFailed(String),
    #[error("memory read failed: {0}")]
    MemoryUnavailable(String),
    #[error("diagnostic query failed: {0}")]
    DiagnosticsFailed(String),
    #[error("inspector command timed out")]
    Timeout,
}

/// Outcome of a process census: the watched package either has a live
/// process or it does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Census {
    Present { pid: u32 },
    Missing,
}

/// Read-only view of the watched process and its diagnostic logs.
#[async_trait]
pub trait ProcessInspector: Send + Sync {
    /// Look up the current PID of `package`, if any.
    ///
    /// A clean "no such process" result is `Ok(Census::Missing)`.
    ///
    /// # Errors
    ///
    /// Returns `InspectionError` when the census mechanism itself fails
    /// (unreachable device, garbled output, timeout).
    async fn census(&self, package: &str) -> Result<Census, InspectionError>;

    /// Resident memory of `pid` in MB.
    ///
    /// # Errors
    ///
    /// Returns `InspectionError` if the memory read fails or times out.
    async fn read_memory_mb(&self, pid: u32) -> Result<f64, InspectionError>;

    /// The most recent diagnostic lines, bounded by `window_lines`.
    ///
    /// `filter` keeps only lines matching any `|`-separated needle; `None`
    /// returns the window unfiltered.
    ///
    /// # Errors
    ///
    /// Returns `InspectionError` if the query fails or times out.
    async fn recent_diagnostics(
        &self,
        filter: Option<&str>,
        window_lines: u32,
    ) -> Result<Vec<String>, InspectionError>;
}
