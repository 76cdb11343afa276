//! Monitor configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/tf2rp/monitor.toml`
//! - Windows: `%APPDATA%/tf2rp/monitor.toml`

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tf2rp_console_log::{DEFAULT_SCAN_KB, DEFAULT_TRACKED_DEVELOPER, InterpretOptions};

/// Monitor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Seconds between console.log polls.
    #[serde(default = "default_wait_time")]
    pub wait_time: u64,

    /// Kilobytes read from the end of console.log per poll.
    #[serde(default = "default_console_scan_kb")]
    pub console_scan_kb: f64,

    /// Show "Queued" instead of the queued gamemode.
    #[serde(default)]
    pub hide_queued_gamemode: bool,

    /// Keep console.log from growing without bound.
    #[serde(default = "default_true")]
    pub trim_console_log: bool,

    /// Debug mode; never trims console.log.
    #[serde(default)]
    pub debug: bool,

    /// Steam install directory (auto-detected if unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steam_dir: Option<PathBuf>,

    /// TF2 install directory (`<steam>/steamapps/common/Team Fortress 2` if unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_dir: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` isn't set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_wait_time() -> u64 {
    2
}

fn default_console_scan_kb() -> f64 {
    DEFAULT_SCAN_KB
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wait_time: default_wait_time(),
            console_scan_kb: default_console_scan_kb(),
            hide_queued_gamemode: false,
            trim_console_log: default_true(),
            debug: false,
            steam_dir: None,
            game_dir: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Poll interval, never shorter than one second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.wait_time.max(1))
    }

    /// Options handed to the console.log interpreter.
    pub fn interpret_options(&self) -> InterpretOptions {
        InterpretOptions {
            scan_kb: self.console_scan_kb,
            hide_queued_gamemode: self.hide_queued_gamemode,
            trim_console_log: self.trim_console_log,
            debug: self.debug,
            tracked_developer: DEFAULT_TRACKED_DEVELOPER.into(),
        }
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tf2rp")
            .join("monitor.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("tf2rp").join("monitor.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/tf2rp/monitor.toml"))
    }
}
