use async_trait::async_trait;

use crate::domain::ports::inspector::{Census, InspectionError, ProcessInspector};

use super::shell::{stderr_snippet, AdbShell, ShellError};

/// Inspector backed by `adb shell`: `pgrep -f` for the census,
/// `/proc/<pid>/status` for resident memory, and `logcat -d -t <n>` for
/// diagnostics.
///
/// Diagnostic filtering happens host-side rather than through an
/// on-device `grep` pipeline, so filter patterns never touch a remote
/// shell.
pub struct AdbInspector {
    shell: AdbShell,
}

impl AdbInspector {
    #[must_use]
    pub const fn new(shell: AdbShell) -> Self {
        Self { shell }
    }
}

#[async_trait]
impl ProcessInspector for AdbInspector {
    async fn census(&self, package: &str) -> Result<Census, InspectionError> {
        let output = self
            .shell
            .run(&["shell", "pgrep", "-f", package])
            .await
            .map_err(|e| match e {
                ShellError::TimedOut => InspectionError::Timeout,
                ShellError::Launch(msg) => InspectionError::CensusFailed(msg),
            })?;
        // pgrep exits non-zero on no match; the empty stdout already
        // carries that answer.
        parse_census(&String::from_utf8_lossy(&output.stdout))
    }

    async fn read_memory_mb(&self, pid: u32) -> Result<f64, InspectionError> {
        let path = format!("/proc/{pid}/status");
        let output = self
            .shell
            .run(&["shell", "cat", &path])
            .await
            .map_err(|e| match e {
                ShellError::TimedOut => InspectionError::Timeout,
                ShellError::Launch(msg) => InspectionError::MemoryUnavailable(msg),
            })?;
        if !output.status.success() {
            return Err(InspectionError::MemoryUnavailable(stderr_snippet(&output)));
        }
        parse_vm_rss_mb(&String::from_utf8_lossy(&output.stdout))
            .ok_or_else(|| InspectionError::MemoryUnavailable(format!("no VmRSS line for PID {pid}")))
    }

    async fn recent_diagnostics(
        &self,
        filter: Option<&str>,
        window_lines: u32,
    ) -> Result<Vec<String>, InspectionError> {
        let window = window_lines.to_string();
        let output = self
            .shell
            .run(&["shell", "logcat", "-d", "-t", &window])
            .await
            .map_err(|e| match e {
                ShellError::TimedOut => InspectionError::Timeout,
                ShellError::Launch(msg) => InspectionError::DiagnosticsFailed(msg),
            })?;
        if !output.status.success() {
            return Err(InspectionError::DiagnosticsFailed(stderr_snippet(&output)));
        }
        Ok(filter_diagnostics(
            &String::from_utf8_lossy(&output.stdout),
            filter,
        ))
    }
}

/// First non-empty line of `pgrep` output decides the census: a PID
/// means present, nothing means missing, anything else is a failure.
fn parse_census(stdout: &str) -> Result<Census, InspectionError> {
    match stdout.lines().map(str::trim).find(|line| !line.is_empty()) {
        None => Ok(Census::Missing),
        Some(line) => line
            .parse::<u32>()
            .map(|pid| Census::Present { pid })
            .map_err(|_| InspectionError::CensusFailed(format!("unexpected pgrep output: {line}"))),
    }
}

/// Extract resident memory in MB from `/proc/<pid>/status` text.
fn parse_vm_rss_mb(stdout: &str) -> Option<f64> {
    stdout.lines().find_map(|line| {
        let rest = line.strip_prefix("VmRSS:")?;
        let kb: u32 = rest.split_whitespace().next()?.parse().ok()?;
        Some(f64::from(kb) / 1024.0)
    })
}

/// Keep lines matching any of the `|`-separated needles; no filter keeps
/// everything.
fn filter_diagnostics(text: &str, filter: Option<&str>) -> Vec<String> {
    match filter {
        None => text.lines().map(String::from).collect(),
        Some(pattern) => {
            let needles: Vec<&str> = pattern.split('|').filter(|n| !n.is_empty()).collect();
            text.lines()
                .filter(|line| needles.iter().any(|needle| line.contains(needle)))
                .map(String::from)
                .collect()
        }
    }
}
