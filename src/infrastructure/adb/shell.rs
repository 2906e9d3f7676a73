use std::process::Output;
use std::time::Duration;

use thiserror::Error;

/// Maximum stderr bytes included in error messages.
const MAX_STDERR_BYTES: usize = 512;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("{0}")]
    Launch(String),
    #[error("adb command timed out")]
    TimedOut,
}

/// Shared runner for `adb` invocations.
///
/// One instance carries the binary path, the optional device serial, and
/// the per-call timeout. A command still running when the timeout fires
/// is killed when its handle drops.
pub struct AdbShell {
    binary: String,
    serial: Option<String>,
    timeout: Duration,
}

impl AdbShell {
    #[must_use]
    pub const fn new(binary: String, serial: Option<String>, timeout: Duration) -> Self {
        Self {
            binary,
            serial,
            timeout,
        }
    }

    /// Run one adb command to completion and return its raw output.
    ///
    /// The exit status is not interpreted here: callers decide what a
    /// non-zero exit means (for `pgrep` it is an ordinary "no match").
    ///
    /// # Errors
    ///
    /// Returns `ShellError::TimedOut` when the timeout elapses, or
    /// `ShellError::Launch` when the binary cannot be spawned.
    pub async fn run(&self, args: &[&str]) -> Result<Output, ShellError> {
        let mut command = tokio::process::Command::new(&self.binary);
        if let Some(serial) = &self.serial {
            command.args(["-s", serial]);
        }
        command.args(args).kill_on_drop(true);

        tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| ShellError::TimedOut)?
            .map_err(|e| ShellError::Launch(format!("failed to run {}: {e}", self.binary)))
    }
}

/// Stderr excerpt for error messages, truncated to a sane size.
pub fn stderr_snippet(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr[..output.stderr.len().min(MAX_STDERR_BYTES)])
        .trim()
        .to_string()
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_captures_stdout() {
        let shell = AdbShell::new("echo".into(), None, Duration::from_secs(5));
        let output = shell.run(&["hello"]).await.expect("run echo");
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "hello\n");
    }

    #[tokio::test]
    async fn serial_flag_precedes_arguments() {
        let shell = AdbShell::new(
            "echo".into(),
            Some("emulator-5554".into()),
            Duration::from_secs(5),
        );
        let output = shell.run(&["shell", "pgrep"]).await.expect("run echo");
        assert_eq!(
            String::from_utf8_lossy(&output.stdout),
            "-s emulator-5554 shell pgrep\n"
        );
    }

    #[tokio::test]
    async fn missing_binary_is_launch_error() {
        let shell = AdbShell::new(
            "/nonexistent/adb-binary".into(),
            None,
            Duration::from_secs(5),
        );
        let result = shell.run(&["devices"]).await;
        assert!(matches!(result, Err(ShellError::Launch(_))));
    }

    #[tokio::test]
    async fn hung_command_times_out() {
        let shell = AdbShell::new("sleep".into(), None, Duration::from_millis(100));
        let result = shell.run(&["5"]).await;
        assert!(matches!(result, Err(ShellError::TimedOut)));
    }

    #[test]
    fn error_messages() {
        assert_eq!(ShellError::TimedOut.to_string(), "adb command timed out");
        assert_eq!(
            ShellError::Launch("failed to run adb: not found".into()).to_string(),
            "failed to run adb: not found"
        );
    }

    #[test]
    fn stderr_snippet_trims_and_truncates() {
        let mut output = std::process::Command::new("true")
            .output()
            .expect("run true");
        output.stderr = vec![b'x'; 2048];
        assert_eq!(stderr_snippet(&output).len(), MAX_STDERR_BYTES);

        output.stderr = b"  error: device offline\n".to_vec();
        assert_eq!(stderr_snippet(&output), "error: device offline");
    }
}
