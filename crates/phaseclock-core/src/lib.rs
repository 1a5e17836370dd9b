//! # Phaseclock Core Library
//!
//! This library provides the core logic for Phaseclock, a two-player chess
//! clock with phased time controls. The CLI binary and any graphical front end
//! are thin layers over the same engine.
//!
//! ## Architecture
//!
//! - **Clock Engine**: A monotonic-clock-based state machine that requires the
//!   caller to periodically invoke `tick()`; moves and pauses are explicit calls
//! - **Ticker**: A tokio task that drives `tick()` through a single lock and
//!   forwards the resulting events
//! - **Storage**: TOML-based configuration of both players' time controls
//! - **Presets**: Common tournament and online time controls
//!
//! ## Key Components
//!
//! - [`ClockEngine`]: Core clock state machine
//! - [`PlayerConfig`]: Validated per-player time budget
//! - [`SharedClock`] / [`Ticker`]: Synchronised access and periodic ticking
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod format;
pub mod presets;
pub mod storage;
pub mod ticker;

pub use clock::{
    ClockEngine, ClockSnapshot, ClockState, GameStatus, MoveCount, Player, PlayerConfig,
    PlayerSnapshot, TimeControlPhase,
};
pub use error::{ClockError, ConfigError, ConfigViolation, CoreError, Rejection};
pub use events::{Event, FlagCause};
pub use presets::Preset;
pub use storage::{Config, PhaseSettings, PlayerSettings};
pub use ticker::{SharedClock, Ticker};
