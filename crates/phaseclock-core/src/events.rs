use serde::{Deserialize, Serialize};

use crate::clock::Player;

/// Why a player's flag fell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlagCause {
    /// Main time reached zero.
    MainTime,
    /// A single move took longer than the move time limit.
    MoveTimeLimit,
}

/// Every observable state change of the engine produces an Event.
/// Front ends render from snapshots and react to events (sounds, dialogs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The first press of the game: `first_to_move` is now thinking.
    GameStarted {
        first_to_move: Player,
    },
    /// `player` finished a move and the clock switched to the opponent.
    MoveCompleted {
        player: Player,
        /// Full-move number the move belongs to.
        move_number: u32,
        thinking_ms: u64,
        /// Main time after increment and any phase change.
        remaining_ms: u64,
    },
    /// Main time dropped below the warning threshold.
    Warning {
        player: Player,
    },
    /// Time ran out. Terminal for `player`; the outcome is up to the caller.
    Flag {
        player: Player,
        cause: FlagCause,
    },
    PhaseAdvanced {
        player: Player,
        phase_index: usize,
    },
    Paused {
        player: Player,
        remaining_ms: u64,
    },
    Resumed {
        player: Player,
        remaining_ms: u64,
    },
}

impl Event {
    /// The player the event is about.
    pub fn player(&self) -> Player {
        match self {
            Event::GameStarted { first_to_move } => *first_to_move,
            Event::MoveCompleted { player, .. }
            | Event::Warning { player }
            | Event::Flag { player, .. }
            | Event::PhaseAdvanced { player, .. }
            | Event::Paused { player, .. }
            | Event::Resumed { player, .. } => *player,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, Event::Flag { .. })
    }
}
