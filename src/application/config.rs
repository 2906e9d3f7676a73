use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::value_objects::retention::RetentionPolicy;

/// Top-level application configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub adb: AdbConfig,
    #[serde(default)]
    pub forensics: ForensicsConfig,
}

/// General settings: watched package and polling interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_package_name")]
    pub package_name: String,
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

/// How to reach the device: adb binary, optional device serial, and a
/// per-command timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdbConfig {
    #[serde(default = "default_adb_binary")]
    pub binary: String,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default = "default_adb_timeout")]
    pub timeout_secs: u64,
}

/// Where forensic artifacts live and how long they are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForensicsConfig {
    #[serde(default = "default_crash_dir")]
    pub crash_dir: String,
    #[serde(default = "default_status_log")]
    pub status_log: String,
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    #[serde(default = "default_retention_days")]
    pub retention_days: u64,
}

// --- Defaults ---

fn default_package_name() -> String {
    "com.example.app".into()
}

const fn default_interval() -> u64 {
    5
}

fn default_adb_binary() -> String {
    "adb".into()
}

const fn default_adb_timeout() -> u64 {
    10
}

// NOTE: Stored as raw strings with tilde — expand with shellexpand at point of use.
fn default_crash_dir() -> String {
    "~/.local/share/warden/crashes".into()
}

fn default_status_log() -> String {
    "~/.local/share/warden/status.log".into()
}

const fn default_max_files() -> usize {
    10
}

const fn default_retention_days() -> u64 {
    30
}

// --- Default impls ---

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            package_name: default_package_name(),
            interval_secs: default_interval(),
        }
    }
}

impl Default for AdbConfig {
    fn default() -> Self {
        Self {
            binary: default_adb_binary(),
            serial: None,
            timeout_secs: default_adb_timeout(),
        }
    }
}

impl Default for ForensicsConfig {
    fn default() -> Self {
        Self {
            crash_dir: default_crash_dir(),
            status_log: default_status_log(),
            max_files: default_max_files(),
            retention_days: default_retention_days(),
        }
    }
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load config from default path or create default config file
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined,
    /// the file cannot be read, or the TOML content is invalid.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_or_create(&path)
    }

    /// Load from a specific path, or create a default config file if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is invalid,
    /// or the default config file cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Load from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to default path
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created,
    /// serialization fails, or the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path, creating parent directories if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created,
    /// serialization fails, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("warden").join("config.toml"))
    }
}

impl From<&ForensicsConfig> for RetentionPolicy {
    fn from(config: &ForensicsConfig) -> Self {
        // Zero values are clamped to 1 by the policy constructor.
        Self::new(config.max_files, config.retention_days)
    }
}
