use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::GoalKind;
use crate::store::tracker::{HistoryPolicy, TrackerOptions};
use crate::store::DEFAULT_HISTORY_LIMIT;

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}
fn default_currency() -> String {
    "₹".to_string()
}
fn default_zakat_rate() -> f64 {
    0.025
}
fn default_hajj_target() -> f64 {
    10_000.0
}
fn default_umrah_target() -> f64 {
    5_000.0
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// How many history lines the dashboard and `history` show
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default)]
    pub history_policy: HistoryPolicy,
    /// Drop a counter's history lines when it is cleared
    #[serde(default = "default_true")]
    pub prune_history_on_clear: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            history_policy: HistoryPolicy::default(),
            prune_history_on_clear: true,
        }
    }
}

impl TrackerConfig {
    pub fn options(&self) -> TrackerOptions {
        TrackerOptions {
            history_policy: self.history_policy,
            prune_history_on_clear: self.prune_history_on_clear,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    /// 2.5% unless a different nisab practice is followed
    #[serde(default = "default_zakat_rate")]
    pub zakat_rate: f64,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            zakat_rate: default_zakat_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsConfig {
    #[serde(default = "default_hajj_target")]
    pub hajj_target: f64,
    #[serde(default = "default_umrah_target")]
    pub umrah_target: f64,
}

impl Default for SavingsConfig {
    fn default() -> Self {
        Self {
            hajj_target: default_hajj_target(),
            umrah_target: default_umrah_target(),
        }
    }
}

impl SavingsConfig {
    pub fn default_target(&self, kind: GoalKind) -> f64 {
        match kind {
            GoalKind::Hajj => self.hajj_target,
            GoalKind::Umrah => self.umrah_target,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    /// Days to add/subtract from the Hijri date for local moon sighting.
    #[serde(default)]
    pub hijri_offset: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub finance: FinanceConfig,
    #[serde(default)]
    pub savings: SavingsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "muhasaba")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("muhasaba.db"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    /// Write a default config file if none exists yet. Returns the path.
    pub fn init() -> Result<PathBuf> {
        let path = Self::config_path()?;
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
