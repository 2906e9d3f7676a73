use colored::Colorize;

use crate::application::services::watchdog::WatchdogService;

/// Restart the watched application on demand.
///
/// When the process is still running, a stop-event report is captured
/// first so the deliberate restart stays attributable in the archive.
///
/// # Errors
///
/// Returns an error if the restart sequence fails on the device.
pub async fn run_restart(service: &mut WatchdogService<'_>) -> anyhow::Result<()> {
    println!("{}", "🔄 Redémarrage de l'application...".bold());

    if service.restart().await {
        println!("{}", "✅ Application relancée".green().bold());
        Ok(())
    } else {
        anyhow::bail!("Application restart failed")
    }
}
