use std::time::Duration;

use super::player::PlayerConfig;
use crate::events::FlagCause;

/// What happened while time was charged to a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Elapsed {
    Flagged(FlagCause),
    WarningCrossed,
}

/// Runtime state of one player's clock.
///
/// Owned by [`ClockEngine`](super::ClockEngine); everything outside the engine
/// only sees it through accessors and snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockState {
    remaining_main: Duration,
    /// Thinking time charged to the move in progress.
    move_elapsed: Duration,
    phase_index: usize,
    moves_in_phase: u32,
    moves_played: u32,
    running: bool,
    expired: bool,
    flag_cause: Option<FlagCause>,
    /// Set while main time is at or above the warning threshold.
    warning_armed: bool,
}

impl ClockState {
    pub fn new(config: &PlayerConfig) -> Self {
        let remaining_main = config.initial_time();
        Self {
            remaining_main,
            move_elapsed: Duration::ZERO,
            phase_index: 0,
            moves_in_phase: 0,
            moves_played: 0,
            running: false,
            expired: false,
            flag_cause: None,
            warning_armed: warning_applies(config) && remaining_main >= config.warning_threshold(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn remaining_main(&self) -> Duration {
        self.remaining_main
    }

    pub fn move_elapsed(&self) -> Duration {
        self.move_elapsed
    }

    /// Time left for the current move, if the player has a move time limit.
    pub fn remaining_move_budget(&self, config: &PlayerConfig) -> Option<Duration> {
        config
            .move_time_limit()
            .map(|limit| limit.saturating_sub(self.move_elapsed))
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn moves_in_phase(&self) -> u32 {
        self.moves_in_phase
    }

    pub fn moves_played(&self) -> u32 {
        self.moves_played
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn flag_cause(&self) -> Option<FlagCause> {
        self.flag_cause
    }

    pub fn is_short_on_time(&self, config: &PlayerConfig) -> bool {
        warning_applies(config) && self.remaining_main < config.warning_threshold()
    }

    // ── Transitions ──────────────────────────────────────────────────

    pub(crate) fn set_running(&mut self, running: bool) {
        self.running = running && !self.expired;
    }

    /// Start a fresh move: the per-move budget is full again.
    pub(crate) fn begin_move(&mut self) {
        self.move_elapsed = Duration::ZERO;
    }

    /// Charge `elapsed` thinking time.
    ///
    /// Main time is floored at zero. Running out of main time takes precedence
    /// over exceeding the move time limit; a warning is only reported when
    /// neither flag fell.
    pub(crate) fn elapse(&mut self, elapsed: Duration, config: &PlayerConfig) -> Option<Elapsed> {
        if self.expired {
            return None;
        }
        self.remaining_main = self.remaining_main.saturating_sub(elapsed);
        self.move_elapsed = self.move_elapsed.saturating_add(elapsed);

        if self.remaining_main.is_zero() {
            return Some(self.flag(FlagCause::MainTime));
        }
        if config
            .move_time_limit()
            .is_some_and(|limit| self.move_elapsed > limit)
        {
            return Some(self.flag(FlagCause::MoveTimeLimit));
        }
        if self.warning_armed && self.remaining_main < config.warning_threshold() {
            self.warning_armed = false;
            return Some(Elapsed::WarningCrossed);
        }
        None
    }

    /// Book a completed move: add the increment, count it and enter the next
    /// phase once the move count of the current one is reached.
    ///
    /// Returns the new phase index when a phase boundary was crossed.
    pub(crate) fn complete_move(&mut self, config: &PlayerConfig) -> Option<usize> {
        let phase = config.phase(self.phase_index)?;
        self.remaining_main = self.remaining_main.saturating_add(phase.increment);
        self.moves_in_phase = self.moves_in_phase.saturating_add(1);
        self.moves_played = self.moves_played.saturating_add(1);

        let limit = phase.moves.limit()?;
        if self.moves_in_phase < limit {
            return None;
        }
        // Without a following phase the finishing phase simply continues.
        let next = config.phase(self.phase_index + 1)?;
        self.phase_index += 1;
        self.moves_in_phase = 0;
        self.remaining_main = if config.additive() {
            self.remaining_main.saturating_add(next.allotment)
        } else {
            next.allotment
        };
        Some(self.phase_index)
    }

    /// Arm the warning again once main time is back at or above the threshold.
    pub(crate) fn rearm_warning(&mut self, config: &PlayerConfig) {
        if warning_applies(config) && self.remaining_main >= config.warning_threshold() {
            self.warning_armed = true;
        }
    }

    fn flag(&mut self, cause: FlagCause) -> Elapsed {
        self.expired = true;
        self.running = false;
        self.flag_cause = Some(cause);
        Elapsed::Flagged(cause)
    }
}

fn warning_applies(config: &PlayerConfig) -> bool {
    !config.warning_threshold().is_zero()
}
