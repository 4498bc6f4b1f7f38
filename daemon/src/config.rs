//! Daemon configuration with TOML file support.

use crate::error::DaemonError;
use assize_types::AdjudicationParams;
use assize_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Where jury-selection seeds come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntropyChoice {
    /// Operating-system randomness; juries are drawn automatically on each tick.
    #[default]
    Os,
    /// Seeds arrive with `select_jury` commands from an outside beacon.
    External,
}

impl std::str::FromStr for EntropyChoice {
    type Err = DaemonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "os" => Ok(Self::Os),
            "external" => Ok(Self::External),
            other => Err(DaemonError::Config(format!(
                "unknown entropy provider {other:?} (expected os or external)"
            ))),
        }
    }
}

/// Initial reputation weights. The daemon keeps them in memory and lets commands
/// adjust them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationConfig {
    #[serde(default = "default_weight")]
    pub default_weight: u64,

    #[serde(default)]
    pub weights: BTreeMap<String, u64>,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            default_weight: default_weight(),
            weights: BTreeMap::new(),
        }
    }
}

/// Configuration for the daemon.
///
/// Loaded from a TOML file via [`DaemonConfig::from_toml_file`]; CLI flags and
/// environment variables override individual fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Seconds between deadline sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Snapshot file read on start and written on shutdown.
    #[serde(default)]
    pub state_file: Option<PathBuf>,

    #[serde(default)]
    pub entropy: EntropyChoice,

    /// Capacity of the command queue in front of the sequencer.
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,

    #[serde(default)]
    pub params: AdjudicationParams,

    #[serde(default)]
    pub reputation: ReputationConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_queue_depth() -> usize {
    1024
}

fn default_weight() -> u64 {
    1
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaemonConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, DaemonError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DaemonError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, DaemonError> {
        let config: Self = toml::from_str(s).map_err(|e| DaemonError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, DaemonError> {
        toml::to_string_pretty(self).map_err(|e| DaemonError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), DaemonError> {
        self.params
            .validate()
            .map_err(|e| DaemonError::Config(e.to_string()))?;
        if self.sweep_interval_secs == 0 {
            return Err(DaemonError::Config("sweep_interval_secs must be positive".into()));
        }
        if self.queue_depth == 0 {
            return Err(DaemonError::Config("queue_depth must be positive".into()));
        }
        Ok(())
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            sweep_interval_secs: default_sweep_interval(),
            state_file: None,
            entropy: EntropyChoice::default(),
            queue_depth: default_queue_depth(),
            params: AdjudicationParams::default(),
            reputation: ReputationConfig::default(),
        }
    }
}
