use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::events::FlagCause;

/// Coarse state of the game as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Configured, waiting for the first press.
    Ready,
    Running,
    Paused,
    /// A flag has fallen.
    Finished,
}

/// Read-only view of one player's clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub remaining_ms: u64,
    /// Only present when the player has a move time limit.
    pub move_budget_ms: Option<u64>,
    pub phase_index: usize,
    pub moves_in_phase: u32,
    pub moves_played: u32,
    pub running: bool,
    pub expired: bool,
    pub paused: bool,
    pub short_on_time: bool,
    pub flag_cause: Option<FlagCause>,
}

/// Read-only view of the whole engine, cheap to clone and hand to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    pub status: GameStatus,
    pub active: Option<Player>,
    pub paused: bool,
    /// Full-move number, starting at 1.
    pub move_number: u32,
    pub left: PlayerSnapshot,
    pub right: PlayerSnapshot,
}

impl ClockSnapshot {
    pub fn player(&self, player: Player) -> &PlayerSnapshot {
        match player {
            Player::Left => &self.left,
            Player::Right => &self.right,
        }
    }
}
