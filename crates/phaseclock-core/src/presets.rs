//! Built-in time controls.
//!
//! Each preset is a [`PlayerSettings`] so it can be written straight into the
//! config file or tweaked before a game.

use serde::Serialize;

use crate::error::{ConfigError, Result};
use crate::storage::{PhaseSettings, PlayerSettings};

/// A named time control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub settings: PlayerSettings,
}

fn phase(moves: Option<u32>, minutes: u64, increment_secs: u64) -> PhaseSettings {
    PhaseSettings {
        moves,
        time_secs: minutes * 60,
        increment_secs,
    }
}

fn settings(phases: Vec<PhaseSettings>, warning_threshold_secs: u64) -> PlayerSettings {
    PlayerSettings {
        phases,
        additive: true,
        warning_threshold_secs,
        ..PlayerSettings::default()
    }
}

/// All built-in presets, slowest first.
pub fn all() -> Vec<Preset> {
    vec![
        Preset {
            name: "fide-classical",
            description: "90 min for 40 moves, then 30 min, 30 s increment from move 1",
            settings: settings(vec![phase(Some(40), 90, 30), phase(None, 30, 30)], 300),
        },
        Preset {
            name: "classical-40-120",
            description: "120 min for 40 moves, then 30 min, 10 s increment",
            settings: settings(vec![phase(Some(40), 120, 10), phase(None, 30, 10)], 60),
        },
        Preset {
            name: "rapid-15-10",
            description: "15 min, 10 s increment",
            settings: settings(vec![phase(None, 15, 10)], 60),
        },
        Preset {
            name: "blitz-5-0",
            description: "5 min sudden death",
            settings: settings(vec![phase(None, 5, 0)], 30),
        },
        Preset {
            name: "blitz-3-2",
            description: "3 min, 2 s increment",
            settings: settings(vec![phase(None, 3, 2)], 20),
        },
        Preset {
            name: "bullet-1-0",
            description: "1 min sudden death",
            settings: settings(vec![phase(None, 1, 0)], 10),
        },
    ]
}

/// Look up a preset by name (case-insensitive).
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPreset`] if no preset has that name.
pub fn preset(name: &str) -> Result<Preset> {
    all()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()).into())
}
