//! Core error types for phaseclock-core.
//!
//! Engine errors are small `Copy`-able values so a rejected call can be
//! reported without touching engine state. Everything that involves I/O or
//! parsing is folded into [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

use crate::clock::Player;

/// Core error type for phaseclock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Clock engine errors
    #[error("Clock error: {0}")]
    Clock(#[from] ClockError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the clock engine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// A player configuration breaks one of the time control invariants.
    #[error("invalid time control: {0}")]
    InvalidConfig(#[from] ConfigViolation),

    /// The call is not allowed in the current engine state. Nothing was changed.
    #[error("invalid operation: {0}")]
    InvalidOperation(#[from] Rejection),
}

/// Reasons a time control is rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("at least one time control phase is required")]
    NoPhases,

    #[error("phase {index} lasts for the remaining game but is not the last phase")]
    UnlimitedPhaseNotLast { index: usize },

    #[error("phase {index} has a move count of zero")]
    ZeroMoveCount { index: usize },

    #[error("the phases grant no time at all")]
    ZeroTotalAllotment,
}

/// Reasons a move or pause request is refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("no game has been started")]
    NoGame,

    #[error("no player is on move")]
    NoActivePlayer,

    #[error("{0} player has already run out of time")]
    PlayerExpired(Player),

    #[error("the clock is paused")]
    Paused,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Unknown preset name
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
