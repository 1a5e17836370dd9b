//! TOML-based application configuration.
//!
//! Stores both players' time controls and clock behaviour:
//! - Time control phases, additive or destructive
//! - Optional per-move time limit and short-on-time warning
//! - "Same time control" shortcuts copying the left player's settings
//! - Ticker interval
//!
//! Configuration is stored at `~/.config/phaseclock/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::clock::{MoveCount, Player, PlayerConfig, TimeControlPhase};
use crate::error::{ClockError, ConfigError, ConfigViolation, Result};

/// One time control phase as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSettings {
    /// Moves in this phase. Omit for a phase lasting the rest of the game.
    #[serde(default)]
    pub moves: Option<u32>,
    pub time_secs: u64,
    #[serde(default)]
    pub increment_secs: u64,
}

/// Per-player time budget as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSettings {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_phases")]
    pub phases: Vec<PhaseSettings>,
    /// Carry leftover time into the next phase.
    #[serde(default = "default_true")]
    pub additive: bool,
    /// 0 disables the limit.
    #[serde(default)]
    pub move_time_limit_secs: u64,
    /// 0 disables the warning.
    #[serde(default = "default_warning_threshold_secs")]
    pub warning_threshold_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/phaseclock/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub left: PlayerSettings,
    #[serde(default)]
    pub right: PlayerSettings,
    /// Right player plays with the left player's phases.
    #[serde(default)]
    pub same_time_control: bool,
    /// Right player uses the left player's move time limit.
    #[serde(default)]
    pub same_move_time_limit: bool,
    #[serde(default = "default_first_to_move")]
    pub first_to_move: Player,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

// Default functions
fn default_phases() -> Vec<PhaseSettings> {
    vec![
        PhaseSettings {
            moves: Some(40),
            time_secs: 120 * 60,
            increment_secs: 10,
        },
        PhaseSettings {
            moves: None,
            time_secs: 30 * 60,
            increment_secs: 10,
        },
    ]
}
fn default_true() -> bool {
    true
}
fn default_warning_threshold_secs() -> u64 {
    60
}
fn default_first_to_move() -> Player {
    Player::Left
}
fn default_tick_interval_ms() -> u64 {
    50
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            phases: default_phases(),
            additive: true,
            move_time_limit_secs: 0,
            warning_threshold_secs: default_warning_threshold_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            left: PlayerSettings::default(),
            right: PlayerSettings::default(),
            same_time_control: false,
            same_move_time_limit: false,
            first_to_move: default_first_to_move(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl PhaseSettings {
    fn to_phase(&self, index: usize) -> std::result::Result<TimeControlPhase, ClockError> {
        let moves = match self.moves {
            None => MoveCount::RemainingGame,
            Some(n) => MoveCount::moves(n).ok_or(ConfigViolation::ZeroMoveCount { index })?,
        };
        Ok(TimeControlPhase::new(
            moves,
            Duration::from_secs(self.time_secs),
            Duration::from_secs(self.increment_secs),
        ))
    }
}

impl PlayerSettings {
    /// Convert into a validated engine config.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] for a zero move count or any
    /// violation reported by [`PlayerConfig::new`].
    pub fn to_player_config(&self) -> std::result::Result<PlayerConfig, ClockError> {
        let phases = self
            .phases
            .iter()
            .enumerate()
            .map(|(i, p)| p.to_phase(i))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        PlayerConfig::new(
            phases,
            self.additive,
            Some(Duration::from_secs(self.move_time_limit_secs)),
            Duration::from_secs(self.warning_threshold_secs),
        )
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = match current {
                serde_json::Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                other => other.get(part)?,
            };
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<()> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown().into());
        }

        let mut parent = &mut *root;
        if let Some(path) = parent_path {
            for part in path.split('.') {
                parent = match parent {
                    serde_json::Value::Array(items) => part
                        .parse::<usize>()
                        .ok()
                        .and_then(|i| items.get_mut(i))
                        .ok_or_else(unknown)?,
                    other => other.get_mut(part).ok_or_else(unknown)?,
                };
            }
        }

        let slot = match parent {
            serde_json::Value::Array(items) => leaf
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get_mut(i))
                .ok_or_else(unknown)?,
            serde_json::Value::Object(obj) => obj.get_mut(leaf).ok_or_else(unknown)?,
            _ => return Err(unknown().into()),
        };

        let new_value = match slot {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            // Move counts are absent (null) for a phase lasting the rest of the game.
            serde_json::Value::Number(_) | serde_json::Value::Null => match value {
                "" | "none" | "rest" => serde_json::Value::Null,
                other => serde_json::Value::Number(
                    other
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{other}' as a whole number")))?
                        .into(),
                ),
            },
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
            serde_json::Value::String(_) => serde_json::Value::String(value.into()),
        };
        *slot = new_value;
        Ok(())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LoadFailed`] if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let fail = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
        let cfg: Config = toml::from_str(&content).map_err(|e| fail(e.to_string()))?;
        Ok(cfg)
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SaveFailed`] if serializing or writing fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let fail = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| fail(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| fail(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key
    /// (`left.phases.0.time_secs`).
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. The result must still describe two valid
    /// time controls; otherwise nothing is changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed, or
    /// the updated time controls are invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.player_configs()?;
        *self = updated;
        Ok(())
    }

    /// The settings the right player actually plays with, after applying the
    /// "same time control" and "same move time limit" options.
    pub fn effective_right(&self) -> PlayerSettings {
        let mut right = self.right.clone();
        if self.same_time_control {
            right.phases = self.left.phases.clone();
        }
        if self.same_move_time_limit {
            right.move_time_limit_secs = self.left.move_time_limit_secs;
        }
        right
    }

    /// Validated engine configs for `[left, right]`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if either side is invalid.
    pub fn player_configs(&self) -> std::result::Result<[PlayerConfig; 2], ClockError> {
        Ok([
            self.left.to_player_config()?,
            self.effective_right().to_player_config()?,
        ])
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}
