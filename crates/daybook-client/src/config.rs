//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/daybook/config.toml` by default. Command-line flags override
//! the file.
//!
//! ```toml
//! [store]
//! kind = "http"
//! url = "http://localhost:3000"
//!
//! [scheduler]
//! horizon = "2025-12-31"
//!
//! [watcher]
//! rewind = "reset"
//! desktop = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use daybook_core::DEFAULT_HORIZON;
use daybook_server::{RewindPolicy, SchedulerConfig, WatcherConfig};

use crate::cli::Cli;
use crate::error::{ClientError, ClientResult};

/// Which event store backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Local JSON file.
    #[default]
    File,
    /// Remote REST API.
    Http,
}

/// Configuration for the daybook client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Store settings.
    pub store: StoreSettings,

    /// Scheduler settings.
    pub scheduler: SchedulerSettings,

    /// Watcher settings.
    pub watcher: WatcherSettings,

    /// Display settings.
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub kind: StoreKind,

    /// Data file for the file store. Defaults to `events.json` in the data
    /// directory.
    pub path: Option<PathBuf>,

    /// Base URL for the HTTP store.
    pub url: Option<String>,

    /// HTTP request timeout in seconds.
    pub timeout: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            kind: StoreKind::File,
            path: None,
            url: None,
            timeout: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// Last date generated for open-ended repeats.
    pub horizon: Option<NaiveDate>,

    /// Seconds between periodic reloads while watching.
    pub reload_interval: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            horizon: None,
            reload_interval: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherSettings {
    pub enabled: bool,

    /// Seconds between alert checks.
    pub tick: u64,

    /// What to do with alerted events when the clock goes backwards.
    pub rewind: RewindPolicy,

    /// Use desktop notifications by default.
    pub desktop: bool,

    /// Application name shown on desktop notifications.
    pub app_name: String,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            tick: 1,
            rewind: RewindPolicy::default(),
            desktop: false,
            app_name: "daybook".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Maximum title length (truncated with ellipsis).
    pub max_title_length: Option<usize>,

    /// Show event ids in listings.
    pub show_ids: bool,
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if absent.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            ClientError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("daybook")
    }

    /// Returns the default data directory path.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("daybook")
    }

    /// Applies command-line overrides on top of the file.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        self.debug |= cli.debug;
        if let Some(kind) = cli.store {
            self.store.kind = kind;
        }
        if let Some(path) = &cli.data_file {
            self.store.path = Some(path.clone());
        }
        if let Some(url) = &cli.server_url {
            self.store.url = Some(url.clone());
        }
        if let Some(horizon) = cli.horizon {
            self.scheduler.horizon = Some(horizon);
        }
        self
    }

    /// Data file for the file store.
    pub fn data_file(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("events.json"))
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig::default()
            .with_horizon(self.scheduler.horizon.unwrap_or(DEFAULT_HORIZON))
            .with_reload_interval(Duration::from_secs(self.scheduler.reload_interval.max(1)))
    }

    pub fn watcher_config(&self) -> WatcherConfig {
        WatcherConfig::default()
            .with_enabled(self.watcher.enabled)
            .with_tick(Duration::from_secs(self.watcher.tick.max(1)))
            .with_rewind(self.watcher.rewind)
            .with_app_name(self.watcher.app_name.clone())
    }
}
