use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use warden::application::config::AppConfig;
use warden::application::services::watchdog::WatchdogService;
use warden::domain::value_objects::retention::RetentionPolicy;
use warden::infrastructure::adb::controller::AdbAppController;
use warden::infrastructure::adb::inspector::AdbInspector;
use warden::infrastructure::adb::shell::AdbShell;
use warden::infrastructure::persistence::fs_store::FsForensicStore;
use warden::presentation::cli::app::{Cli, Commands};
use warden::presentation::cli::commands::daemon::{forward_restart_signals, run_daemon};
use warden::presentation::cli::commands::restart::run_restart;
use warden::presentation::cli::commands::stats::run_stats;
use warden::presentation::cli::commands::status::run_status;

fn print_banner() {
    println!("{}", "━".repeat(40).cyan());
    println!("{}", "  WARDEN — Android App Watchdog".bold().cyan());
    println!("{}", "━".repeat(40).cyan());
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_shell(config: &AppConfig) -> AdbShell {
    AdbShell::new(
        config.adb.binary.clone(),
        config.adb.serial.clone(),
        Duration::from_secs(config.adb.timeout_secs),
    )
}

fn open_store(config: &AppConfig) -> FsForensicStore {
    let store = FsForensicStore::new(&config.forensics.crash_dir, &config.forensics.status_log);
    if let Err(e) = store.prepare() {
        tracing::warn!("Échec préparation des répertoires d'artefacts : {e}");
    }
    store
}

fn resolve_interval(command: Option<&Commands>, config_secs: u64) -> u64 {
    let secs = if let Some(Commands::Daemon {
        interval: Some(secs),
    }) = command
    {
        *secs
    } else {
        config_secs
    };
    // A zero interval would busy-spin the poll loop.
    secs.max(1)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    // Load configuration
    let config = if let Some(ref path) = cli.config {
        AppConfig::load_from(path)?
    } else {
        AppConfig::load()?
    };

    // Manual DI — main.rs is the only place that knows concrete types
    let interval_secs = resolve_interval(cli.command.as_ref(), config.general.interval_secs);

    match cli.command {
        Some(Commands::Status { json }) => {
            run_status(&config, json).await?;
        }
        Some(Commands::Stats { json }) => {
            let store = open_store(&config);
            run_stats(&store, json)?;
        }
        Some(Commands::Restart) => {
            let inspector = AdbInspector::new(build_shell(&config));
            let controller = AdbAppController::new(build_shell(&config));
            let store = open_store(&config);
            let mut service = WatchdogService::new(
                &inspector,
                &controller,
                &store,
                &config.general.package_name,
                RetentionPolicy::from(&config.forensics),
            );
            run_restart(&mut service).await?;
        }
        Some(Commands::Daemon { .. }) | None => {
            let inspector = AdbInspector::new(build_shell(&config));
            let controller = AdbAppController::new(build_shell(&config));
            let store = open_store(&config);
            print_banner();
            tracing::info!("Application surveillée : {}", config.general.package_name);
            let mut service = WatchdogService::new(
                &inspector,
                &controller,
                &store,
                &config.general.package_name,
                RetentionPolicy::from(&config.forensics),
            );
            let (tx, rx) = mpsc::channel(8);
            tokio::spawn(async move {
                if let Err(e) = forward_restart_signals(tx).await {
                    tracing::warn!("Transfert des signaux indisponible : {e}");
                }
            });
            run_daemon(&mut service, interval_secs, rx).await?;
        }
    }

    Ok(())
}
