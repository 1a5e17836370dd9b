use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::phase::{MoveCount, TimeControlPhase};
use crate::error::{ClockError, ConfigViolation};

/// Which side of the clock. Colours are assigned outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Left,
    Right,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::Left, Player::Right];

    pub fn opponent(self) -> Self {
        match self {
            Player::Left => Player::Right,
            Player::Right => Player::Left,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Player::Left => 0,
            Player::Right => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Player::Left => "left",
            Player::Right => "right",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Player {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Player::Left),
            "right" | "r" => Ok(Player::Right),
            other => Err(format!("unknown player '{other}', expected 'left' or 'right'")),
        }
    }
}

/// Validated time budget of one player.
///
/// Immutable once built; the engine reads it for the whole game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    phases: Vec<TimeControlPhase>,
    additive: bool,
    move_time_limit: Option<Duration>,
    warning_threshold: Duration,
}

impl PlayerConfig {
    /// Build a config, rejecting anything that breaks the phase invariants.
    ///
    /// A zero `move_time_limit` is the same as none. A zero
    /// `warning_threshold` disables the short-on-time warning.
    pub fn new(
        phases: Vec<TimeControlPhase>,
        additive: bool,
        move_time_limit: Option<Duration>,
        warning_threshold: Duration,
    ) -> Result<Self, ClockError> {
        let config = Self {
            phases,
            additive,
            move_time_limit: move_time_limit.filter(|limit| !limit.is_zero()),
            warning_threshold,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the phase invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] when the phase list is empty, a
    /// sudden-death phase is followed by another phase, or the phases grant no
    /// time at all.
    pub fn validate(&self) -> Result<(), ClockError> {
        if self.phases.is_empty() {
            return Err(ConfigViolation::NoPhases.into());
        }
        let last = self.phases.len() - 1;
        if let Some(index) = self
            .phases
            .iter()
            .position(|p| p.moves == MoveCount::RemainingGame)
            .filter(|&i| i != last)
        {
            return Err(ConfigViolation::UnlimitedPhaseNotLast { index }.into());
        }
        let total = self
            .phases
            .iter()
            .fold(Duration::ZERO, |acc, p| acc.saturating_add(p.allotment));
        if total.is_zero() {
            return Err(ConfigViolation::ZeroTotalAllotment.into());
        }
        Ok(())
    }

    pub fn phases(&self) -> &[TimeControlPhase] {
        &self.phases
    }

    pub fn phase(&self, index: usize) -> Option<&TimeControlPhase> {
        self.phases.get(index)
    }

    pub fn additive(&self) -> bool {
        self.additive
    }

    pub fn move_time_limit(&self) -> Option<Duration> {
        self.move_time_limit
    }

    pub fn warning_threshold(&self) -> Duration {
        self.warning_threshold
    }

    /// Time on the clock when the game starts.
    pub fn initial_time(&self) -> Duration {
        self.phases.first().map(|p| p.allotment).unwrap_or_default()
    }
}
