use std::time::Duration;

use anyhow::Context;
use colored::Colorize;

use crate::application::config::AppConfig;
use crate::application::services::health_tracker::HealthTracker;
use crate::domain::ports::inspector::ProcessInspector;
use crate::infrastructure::adb::inspector::AdbInspector;
use crate::infrastructure::adb::shell::AdbShell;
use crate::presentation::cli::formatters::health_fmt::{print_section_header, state_badge};

/// # Errors
///
/// Returns an error if the process census or JSON serialization fails.
pub async fn run_status(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let shell = AdbShell::new(
        config.adb.binary.clone(),
        config.adb.serial.clone(),
        Duration::from_secs(config.adb.timeout_secs),
    );
    let inspector = AdbInspector::new(shell);
    let package = &config.general.package_name;

    let census = inspector
        .census(package)
        .await
        .context("Échec du recensement du processus")?;
    let mut tracker = HealthTracker::new(&inspector, package);
    let snapshot = tracker.evaluate(census).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("{}", "warden — État de l'application".bold().cyan());
    println!("{}", "━".repeat(50));

    print_section_header(&format!("\n📦 {package}"));
    println!("  État : {}", state_badge(&snapshot));
    if let Some(pid) = snapshot.pid {
        println!("  PID : {pid}");
        println!("  Mémoire : {:.1} MB", snapshot.memory_mb);
    }
    println!(
        "  Observé : {}",
        snapshot.observed_at.format("%Y-%m-%d %H:%M:%S")
    );

    Ok(())
}
