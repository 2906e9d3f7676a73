use colored::{ColoredString, Colorize};

use crate::domain::entities::health::HealthSnapshot;

/// Colored state badge for a health snapshot.
#[must_use]
pub fn state_badge(snapshot: &HealthSnapshot) -> ColoredString {
    if snapshot.running {
        "● RUNNING".green().bold()
    } else if snapshot.crashed {
        "● CRASHED".red().bold()
    } else {
        "● STOPPED".yellow()
    }
}

pub fn print_section_header(title: &str) {
    println!("{}", title.bold().cyan());
    let display_width = title.chars().count();
    println!("{}", "─".repeat(display_width).cyan());
}
