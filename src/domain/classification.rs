use crate::domain::value_objects::crash_type::CrashType;

/// Classify diagnostic lines into a crash category.
///
/// First-match-wins over a severity-ordered needle list, case-insensitive
/// substring search over the concatenated text. Empty input means the
/// process vanished without leaving diagnostics.
#[must_use]
pub fn classify(lines: &[String]) -> CrashType {
    if lines.is_empty() {
        return CrashType::ProcessMissing;
    }

    let content = lines.join("\n").to_uppercase();

    if content.contains("FATAL EXCEPTION") {
        CrashType::FatalException
    } else if content.contains("ANR") || content.contains("APPLICATION NOT RESPONDING") {
        CrashType::Anr
    } else if content.contains("OUTOFMEMORYERROR") {
        CrashType::Oom
    } else if content.contains("SIGNAL") && content.contains("SIGSEGV") {
        CrashType::NativeCrash
    } else if content.contains("SIGABRT") {
        CrashType::Abort
    } else if content.contains("SIGKILL") {
        CrashType::Killed
    } else {
        CrashType::Unknown
    }
}

/// Check package-scoped diagnostic lines for evidence of a recent crash.
///
/// Needles are case-sensitive, mirroring the log markers Android emits
/// verbatim (`FATAL EXCEPTION`, `CRASH`, `ANR in ...`).
#[must_use]
pub fn has_crash_signal(lines: &[String]) -> bool {
    lines
        .iter()
        .any(|line| line.contains("FATAL") || line.contains("CRASH") || line.contains("ANR"))
}
