use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// warden — Android application watchdog
///
/// Watches a single application's process over ADB, captures crash
/// forensics, and can restart the application on demand.
#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to custom config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the watchdog daemon
    #[command(alias = "d")]
    Daemon {
        /// Poll interval override in seconds (default: config)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Show current application status
    #[command(alias = "s")]
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Afficher les statistiques des rapports de crash
    #[command(alias = "st")]
    Stats {
        /// Sortie au format JSON
        #[arg(long)]
        json: bool,
    },

    /// Relancer l'application surveillée
    #[command(alias = "r")]
    Restart,
}
