use colored::{ColoredString, Colorize};

use crate::domain::value_objects::crash_type::CrashType;

/// Colored label for a crash type, graded by how alarming the cause is.
#[must_use]
pub fn crash_type_label(crash_type: CrashType) -> ColoredString {
    let text = crash_type.to_string();
    match crash_type {
        CrashType::FatalException | CrashType::Oom | CrashType::NativeCrash => text.red().bold(),
        CrashType::Anr | CrashType::Abort => text.yellow(),
        CrashType::Killed | CrashType::ForceStop => text.blue(),
        CrashType::Unknown | CrashType::ProcessMissing => text.dimmed(),
    }
}

/// Proportional histogram bar, at least one cell for a non-zero count.
#[must_use]
pub fn histogram_bar(count: usize, max_count: usize, width: usize) -> String {
    if count == 0 || max_count == 0 || width == 0 {
        return String::new();
    }
    let filled = (count * width).div_ceil(max_count).min(width);
    "█".repeat(filled)
}
