use std::time::Duration;

use anyhow::Context;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;

use crate::application::services::watchdog::{WatchdogCommand, WatchdogService};

/// Run the watch loop at the configured interval.
///
/// The daemon polls until it receives a SIGINT signal (Ctrl+C) via
/// [`tokio::signal::ctrl_c()`], at which point it shuts down gracefully and
/// returns `Ok(())`. Restart commands arrive on the queue and are handled
/// between polls, so captures and restarts stay serialized on this single
/// task. Note: SIGTERM is **not** handled — if systemd or container
/// orchestration requires SIGTERM support, add a handler via
/// `tokio::signal::unix::signal(SignalKind::terminate())`.
///
/// Failed polls and failed restarts are logged but do not stop the daemon.
///
/// # Errors
///
/// Returns an error if the loop encounters a fatal error.
pub async fn run_daemon(
    service: &mut WatchdogService<'_>,
    interval_secs: u64,
    mut commands: mpsc::Receiver<WatchdogCommand>,
) -> anyhow::Result<()> {
    tracing::info!("Daemon démarré (intervalle : {interval_secs}s)");
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut commands_open = true;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let outcome = service.poll_once().await;
                if let Some(path) = outcome.captured {
                    tracing::info!("Artefact capturé : {}", path.display());
                }
            }
            command = commands.recv(), if commands_open => {
                match command {
                    Some(WatchdogCommand::Restart) => {
                        tracing::info!("Commande de redémarrage reçue");
                        if service.restart().await {
                            tracing::info!("Redémarrage demandé");
                        } else {
                            tracing::error!("Échec du redémarrage");
                        }
                    }
                    None => commands_open = false,
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Signal d'arrêt reçu, fermeture propre...");
                println!("\nArrêt de Warden...");
                break;
            }
        }
    }
    Ok(())
}

/// Forward SIGUSR1 to the daemon as restart commands.
///
/// Holds one end of the command queue for the whole process lifetime; a
/// full queue drops the signal rather than blocking the handler.
///
/// # Errors
///
/// Returns an error if the SIGUSR1 handler cannot be installed.
pub async fn forward_restart_signals(tx: mpsc::Sender<WatchdogCommand>) -> anyhow::Result<()> {
    let mut stream =
        signal(SignalKind::user_defined1()).context("Installation du handler SIGUSR1")?;
    while stream.recv().await.is_some() {
        tracing::info!("SIGUSR1 reçu, redémarrage demandé");
        if tx.try_send(WatchdogCommand::Restart).is_err() {
            tracing::warn!("File de commandes saturée, signal ignoré");
        }
    }
    Ok(())
}
