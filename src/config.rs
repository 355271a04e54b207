use serde::Deserialize;

use crate::models::{Granularity, Lookback, Selection};
use crate::resampler::SamplingMode;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Path of the tracker's `database.json` snapshot.
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSettings {
    /// Granularity label, same text the UI selector sends (e.g. "hour", "In minutes").
    #[serde(default = "default_granularity")]
    pub default_granularity: String,
    /// Lookback label or hour count (e.g. "1", "Last day").
    #[serde(default = "default_lookback")]
    pub default_lookback: String,
    #[serde(default)]
    pub sampling: SamplingMode,
    /// Max queued dashboard commands before HTTP handlers wait.
    #[serde(default = "default_command_capacity")]
    pub command_capacity: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            default_granularity: default_granularity(),
            default_lookback: default_lookback(),
            sampling: SamplingMode::default(),
            command_capacity: default_command_capacity(),
        }
    }
}

impl DashboardSettings {
    pub fn initial_selection(&self) -> Selection {
        Selection::new(
            Granularity::from_label(&self.default_granularity),
            Lookback::from_label(&self.default_lookback),
        )
    }
}

fn default_granularity() -> String {
    "hour".into()
}

fn default_lookback() -> String {
    "1".into()
}

fn default_command_capacity() -> usize {
    32
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.server.host.is_empty(),
            "server.host must be non-empty"
        );
        anyhow::ensure!(!self.source.path.is_empty(), "source.path must be non-empty");
        anyhow::ensure!(
            self.dashboard.command_capacity > 0,
            "dashboard.command_capacity must be > 0, got {}",
            self.dashboard.command_capacity
        );
        Ok(())
    }
}
