use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("restart failed: {0}")]
    RestartFailed(String),
    #[error("controller command timed out")]
    Timeout,
}

/// Lifecycle control over the watched application.
///
/// Callers must serialize invocations; the port gives no concurrency
/// guarantees of its own.
#[async_trait]
pub trait AppController: Send + Sync {
    /// Force-stop `package` and launch it again.
    ///
    /// # Errors
    ///
    /// Returns `ControlError` if either the stop or the relaunch fails.
    async fn restart(&self, package: &str) -> Result<(), ControlError>;
}
