//! Tracker configuration stored as TOML (default `soullink.toml`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::team::TEAM_CAPACITY;
use crate::io::roster_store::SaveRetry;

/// Tracker configuration (TOML).
///
/// Missing fields default to the values used by a fresh install.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Roster state file.
    pub state_path: PathBuf,

    /// Species table (JSON array of records).
    pub species_path: PathBuf,

    /// Maximum entries per player team.
    pub team_capacity: usize,

    pub save: SaveConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SaveConfig {
    /// Rename attempts before writing the state file in place.
    pub attempts: u32,

    /// Pause between rename attempts, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            retry_delay_ms: 50,
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("data/state.json"),
            species_path: PathBuf::from("data/species.json"),
            team_capacity: TEAM_CAPACITY,
            save: SaveConfig::default(),
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.state_path.as_os_str().is_empty() {
            return Err(anyhow!("state_path must not be empty"));
        }
        if self.team_capacity == 0 {
            return Err(anyhow!("team_capacity must be > 0"));
        }
        if self.save.attempts == 0 {
            return Err(anyhow!("save.attempts must be > 0"));
        }
        Ok(())
    }

    pub fn save_retry(&self) -> SaveRetry {
        SaveRetry {
            attempts: self.save.attempts,
            delay: Duration::from_millis(self.save.retry_delay_ms),
        }
    }

    /// Resolve relative paths against `base` (the config file's directory).
    pub fn relative_to(mut self, base: &Path) -> Self {
        if self.state_path.is_relative() {
            self.state_path = base.join(&self.state_path);
        }
        if self.species_path.is_relative() {
            self.species_path = base.join(&self.species_path);
        }
        self
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `TrackerConfig::default()`.
pub fn load_config(path: &Path) -> Result<TrackerConfig> {
    if !path.exists() {
        let cfg = TrackerConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: TrackerConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
