use colored::Colorize;

use crate::application::services::forensics::gather_statistics;
use crate::domain::entities::crash_report::CrashStatistics;
use crate::domain::ports::store::ForensicStore;
use crate::presentation::cli::formatters::health_fmt::print_section_header;
use crate::presentation::cli::formatters::stats_fmt::{crash_type_label, histogram_bar};

/// Histogram bars scale to this width.
const HISTOGRAM_WIDTH: usize = 20;
/// Padding for crash-type labels; fits the longest type name.
const LABEL_WIDTH: usize = 16;

/// Summarize the stored crash reports.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run_stats(store: &dyn ForensicStore, json: bool) -> anyhow::Result<()> {
    let stats = gather_statistics(store);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print_stats_human(&stats);
    Ok(())
}

fn print_stats_human(stats: &CrashStatistics) {
    print_section_header("📊 Statistiques des rapports de crash");

    if stats.total == 0 {
        println!("{}", "✅ Aucun rapport de crash enregistré".green().bold());
        println!();
        return;
    }

    println!("  Total : {}", stats.total.to_string().bold());
    println!("  Aujourd'hui : {}", stats.today_count);
    if let Some(oldest) = stats.oldest {
        println!("  Plus ancien : {}", oldest.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(newest) = stats.newest {
        println!("  Plus récent : {}", newest.format("%Y-%m-%d %H:%M:%S"));
    }

    if !stats.crash_type_histogram.is_empty() {
        println!();
        println!("  {}", "Répartition récente :".dimmed());
        let max_count = stats
            .crash_type_histogram
            .values()
            .copied()
            .max()
            .unwrap_or(1);
        for (crash_type, count) in &stats.crash_type_histogram {
            // Pad the plain text before coloring so ANSI codes do not
            // break the alignment.
            let name = crash_type.to_string();
            let pad = " ".repeat(LABEL_WIDTH.saturating_sub(name.chars().count()));
            println!(
                "    {}{pad} {} {count}",
                crash_type_label(*crash_type),
                histogram_bar(*count, max_count, HISTOGRAM_WIDTH)
            );
        }
    }
    println!();
}
