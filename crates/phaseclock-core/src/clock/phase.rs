use std::num::NonZeroU32;
use std::time::Duration;

/// How many moves a phase covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveCount {
    /// The phase ends after this many moves by the player.
    Moves(NonZeroU32),
    /// Sudden death: the phase lasts for the rest of the game.
    RemainingGame,
}

impl MoveCount {
    /// A finite count, or `None` for zero.
    pub fn moves(moves: u32) -> Option<Self> {
        NonZeroU32::new(moves).map(MoveCount::Moves)
    }

    pub fn limit(self) -> Option<u32> {
        match self {
            MoveCount::Moves(n) => Some(n.get()),
            MoveCount::RemainingGame => None,
        }
    }

    pub fn is_unlimited(self) -> bool {
        matches!(self, MoveCount::RemainingGame)
    }
}

/// One segment of a player's time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeControlPhase {
    pub moves: MoveCount,
    /// Time granted when the phase is entered.
    pub allotment: Duration,
    /// Time added after every completed move while the phase is active.
    pub increment: Duration,
}

impl TimeControlPhase {
    pub fn new(moves: MoveCount, allotment: Duration, increment: Duration) -> Self {
        Self {
            moves,
            allotment,
            increment,
        }
    }

    /// A phase of `moves` moves, or `None` if `moves` is zero.
    pub fn moves(moves: u32, allotment: Duration, increment: Duration) -> Option<Self> {
        MoveCount::moves(moves).map(|moves| Self::new(moves, allotment, increment))
    }

    /// A final phase lasting for the rest of the game.
    pub fn sudden_death(allotment: Duration, increment: Duration) -> Self {
        Self::new(MoveCount::RemainingGame, allotment, increment)
    }

    pub fn is_sudden_death(&self) -> bool {
        self.moves.is_unlimited()
    }
}
