mod engine;
mod phase;
mod player;
mod snapshot;
mod state;

pub use engine::ClockEngine;
pub(crate) use engine::as_millis;
pub use phase::{MoveCount, TimeControlPhase};
pub use player::{Player, PlayerConfig};
pub use snapshot::{ClockSnapshot, GameStatus, PlayerSnapshot};
pub use state::ClockState;
