use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the data file inside the data directory.
pub const DATA_FILE_NAME: &str = "waymark.txt";

/// Upper bound for `storage.backup_interval_hours`, roughly a century.
pub const MAX_BACKUP_INTERVAL_HOURS: i64 = 24 * 365 * 100;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WaymarkConfig {
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub weights: WeightConfig,
    pub matching: MatchingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Empty means the platform data directory.
    pub data_dir: String,
    pub backup_interval_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WeightConfig {
    pub visit_increment: f64,
    pub adjust_step: f64,
    pub decay_factor: f64,
    pub max_total_weight: f64,
    pub max_entries: usize,
    pub trim_percent: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MatchingConfig {
    pub fuzzy_threshold: f64,
    pub completion_entries: usize,
    pub max_results: usize,
}

impl Default for WaymarkConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            storage: StorageConfig::default(),
            weights: WeightConfig::default(),
            matching: MatchingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        // Anything chattier than warn would end up in every `cd`.
        Self {
            level: "warn".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            backup_interval_hours: 24,
        }
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            visit_increment: 1.0,
            adjust_step: 10.0,
            decay_factor: 0.9,
            max_total_weight: 1000.0,
            max_entries: 600,
            trim_percent: 10,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.6,
            completion_entries: 9,
            max_results: 1,
        }
    }
}

/// Returns the platform data directory for waymark, e.g. `~/.local/share/waymark`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("waymark")
}

/// Returns the default config file path, e.g. `~/.config/waymark/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("waymark")
        .join("config.toml")
}

impl WaymarkConfig {
    /// Load config from `WAYMARK_CONFIG` or the default path, then apply env overrides.
    pub fn load() -> Result<Self> {
        match std::env::var_os("WAYMARK_CONFIG") {
            Some(path) => Self::load_from(PathBuf::from(path)),
            None => Self::load_from(default_config_path()),
        }
    }

    /// Load from a specific path, then apply env var overrides and validate.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse config TOML {}", path.display()))?
        } else {
            debug!("no config file at {}, using defaults", path.display());
            WaymarkConfig::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides (WAYMARK_DATA_DIR, WAYMARK_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("WAYMARK_DATA_DIR") {
            self.storage.data_dir = val;
        }
        if let Ok(val) = std::env::var("WAYMARK_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Reject values that would make maintenance or completion misbehave.
    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        ensure!(
            w.decay_factor > 0.0 && w.decay_factor < 1.0,
            "weights.decay_factor must be in (0, 1), got {}",
            w.decay_factor
        );
        ensure!(
            w.max_total_weight.is_finite() && w.max_total_weight > 0.0,
            "weights.max_total_weight must be positive, got {}",
            w.max_total_weight
        );
        ensure!(
            w.visit_increment.is_finite() && w.visit_increment >= 0.0,
            "weights.visit_increment must be non-negative, got {}",
            w.visit_increment
        );
        ensure!(
            w.adjust_step.is_finite() && w.adjust_step >= 0.0,
            "weights.adjust_step must be non-negative, got {}",
            w.adjust_step
        );
        ensure!(
            (1..=100).contains(&w.trim_percent),
            "weights.trim_percent must be between 1 and 100, got {}",
            w.trim_percent
        );

        let m = &self.matching;
        ensure!(
            (0.0..=1.0).contains(&m.fuzzy_threshold),
            "matching.fuzzy_threshold must be in [0, 1], got {}",
            m.fuzzy_threshold
        );
        // Menu indices are a single digit on the wire.
        ensure!(
            (1..=9).contains(&m.completion_entries),
            "matching.completion_entries must be between 1 and 9, got {}",
            m.completion_entries
        );
        ensure!(m.max_results >= 1, "matching.max_results must be at least 1");
        ensure!(
            (0..=MAX_BACKUP_INTERVAL_HOURS).contains(&self.storage.backup_interval_hours),
            "storage.backup_interval_hours must be between 0 and {MAX_BACKUP_INTERVAL_HOURS}, got {}",
            self.storage.backup_interval_hours
        );
        Ok(())
    }

    /// Resolve the data directory, expanding `~` if needed.
    pub fn resolved_data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            default_data_dir()
        } else {
            expand_tilde(&self.storage.data_dir)
        }
    }

    /// Path of the data file, `<data_dir>/waymark.txt`.
    pub fn resolved_data_path(&self) -> PathBuf {
        self.resolved_data_dir().join(DATA_FILE_NAME)
    }

    /// Out-of-range values clamp to `[0, MAX_BACKUP_INTERVAL_HOURS]` hours.
    pub fn backup_interval(&self) -> chrono::Duration {
        let hours = self
            .storage
            .backup_interval_hours
            .clamp(0, MAX_BACKUP_INTERVAL_HOURS);
        chrono::Duration::try_hours(hours).unwrap_or_else(|| chrono::Duration::hours(24))
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
