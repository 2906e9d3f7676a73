use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ports::controller::{AppController, ControlError};

use super::shell::{stderr_snippet, AdbShell, ShellError};

/// Delay between the forced stop and the relaunch, giving the system
/// time to tear the process down.
const STOP_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Controller backed by `adb shell`: `am force-stop` followed by a
/// launcher-intent `monkey` start.
pub struct AdbAppController {
    shell: AdbShell,
    settle_delay: Duration,
}

impl AdbAppController {
    #[must_use]
    pub const fn new(shell: AdbShell) -> Self {
        Self {
            shell,
            settle_delay: STOP_SETTLE_DELAY,
        }
    }

    async fn run_step(&self, args: &[&str]) -> Result<(), ControlError> {
        let output = self.shell.run(args).await.map_err(|e| match e {
            ShellError::TimedOut => ControlError::Timeout,
            ShellError::Launch(msg) => ControlError::RestartFailed(msg),
        })?;
        if !output.status.success() {
            return Err(ControlError::RestartFailed(stderr_snippet(&output)));
        }
        Ok(())
    }
}

#[async_trait]
impl AppController for AdbAppController {
    async fn restart(&self, package: &str) -> Result<(), ControlError> {
        self.run_step(&["shell", "am", "force-stop", package])
            .await?;
        tokio::time::sleep(self.settle_delay).await;
        self.run_step(&[
            "shell",
            "monkey",
            "-p",
            package,
            "-c",
            "android.intent.category.LAUNCHER",
            "1",
        ])
        .await
    }
}
