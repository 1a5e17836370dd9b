//! Clock engine implementation.
//!
//! The clock engine is a monotonic-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()`
//! periodically and for serialising all calls (see [`crate::ticker`]).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Ready -> Running <-> Paused
//!                     |
//!                  Finished (a flag fell)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = ClockEngine::new();
//! engine.start(left, right, Player::Left)?;
//! engine.play_move(Instant::now())?; // first press starts the left clock
//! // In a loop:
//! for event in engine.tick(Instant::now()) { /* Warning, Flag, ... */ }
//! ```

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::player::{Player, PlayerConfig};
use super::snapshot::{ClockSnapshot, GameStatus, PlayerSnapshot};
use super::state::{ClockState, Elapsed};
use crate::error::{ClockError, Rejection};
use crate::events::Event;

/// Core two-player clock engine.
///
/// Integrates exact elapsed time between timestamps, so the result does not
/// depend on how often `tick()` is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockEngine {
    game: Option<Game>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Game {
    configs: [PlayerConfig; 2],
    states: [ClockState; 2],
    first_to_move: Player,
    active: Option<Player>,
    paused: bool,
    last_tick: Option<Instant>,
    /// Completed moves of both players together.
    half_moves: u32,
}

impl ClockEngine {
    /// An idle engine. Nothing can be played until [`ClockEngine::start`].
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn has_game(&self) -> bool {
        self.game.is_some()
    }

    pub fn active(&self) -> Option<Player> {
        self.game.as_ref().and_then(|g| g.active)
    }

    pub fn is_paused(&self) -> bool {
        self.game.as_ref().is_some_and(|g| g.paused)
    }

    pub fn state(&self, player: Player) -> Option<&ClockState> {
        self.game.as_ref().map(|g| &g.states[player.index()])
    }

    pub fn config(&self, player: Player) -> Option<&PlayerConfig> {
        self.game.as_ref().map(|g| &g.configs[player.index()])
    }

    pub fn remaining(&self, player: Player) -> Option<Duration> {
        self.state(player).map(ClockState::remaining_main)
    }

    pub fn status(&self) -> Option<GameStatus> {
        self.game.as_ref().map(Game::status)
    }

    /// Build a read-only snapshot. `None` before the first `start`.
    pub fn snapshot(&self) -> Option<ClockSnapshot> {
        self.game.as_ref().map(Game::snapshot)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Set up a new game, discarding any previous one.
    ///
    /// No clock runs until the first [`ClockEngine::play_move`], which starts
    /// `first_to_move`'s clock.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if either config breaks the phase
    /// invariants. The previous game is kept in that case.
    pub fn start(
        &mut self,
        left: PlayerConfig,
        right: PlayerConfig,
        first_to_move: Player,
    ) -> Result<(), ClockError> {
        left.validate()?;
        right.validate()?;
        let states = [ClockState::new(&left), ClockState::new(&right)];
        debug!(%first_to_move, "new game set up");
        self.game = Some(Game {
            configs: [left, right],
            states,
            first_to_move,
            active: None,
            paused: false,
            last_tick: None,
            half_moves: 0,
        });
        Ok(())
    }

    /// Charge the time elapsed since the previous tick to the player on move.
    ///
    /// Timestamps older than the previous one are treated as a repeat of it.
    pub fn tick(&mut self, now: Instant) -> Vec<Event> {
        match self.game.as_mut() {
            Some(game) => game.advance_to(now),
            None => Vec::new(),
        }
    }

    /// The digital equivalent of pressing the lever: end the current move and
    /// start the opponent's clock. The first call of a game starts the clock
    /// of the player chosen to move first.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidOperation`] without changing anything when
    /// no game was started, the clock is paused, or the player on move has
    /// already run out of time.
    pub fn play_move(&mut self, now: Instant) -> Result<Vec<Event>, ClockError> {
        let game = self.game.as_mut().ok_or(Rejection::NoGame)?;
        if game.paused {
            return Err(Rejection::Paused.into());
        }
        if let Some(player) = game.active {
            if game.states[player.index()].is_expired() {
                return Err(Rejection::PlayerExpired(player).into());
            }
        }
        Ok(game.play_move(now))
    }

    /// Pause or resume the clock. Setting the current value again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidOperation`] without changing anything when
    /// no game was started, nobody is on move yet, or the player on move has
    /// already run out of time.
    pub fn set_paused(&mut self, paused: bool, now: Instant) -> Result<Vec<Event>, ClockError> {
        let game = self.game.as_mut().ok_or(Rejection::NoGame)?;
        let player = game.active.ok_or(Rejection::NoActivePlayer)?;
        if game.states[player.index()].is_expired() {
            return Err(Rejection::PlayerExpired(player).into());
        }
        Ok(game.set_paused(player, paused, now))
    }
}

impl Game {
    fn status(&self) -> GameStatus {
        if self.states.iter().any(ClockState::is_expired) {
            GameStatus::Finished
        } else if self.active.is_none() {
            GameStatus::Ready
        } else if self.paused {
            GameStatus::Paused
        } else {
            GameStatus::Running
        }
    }

    fn move_number(&self) -> u32 {
        self.half_moves / 2 + 1
    }

    fn clamp(&self, now: Instant) -> Instant {
        match self.last_tick {
            Some(last) if now < last => {
                warn!(
                    behind_us = as_micros(last.duration_since(now)),
                    "non-monotonic timestamp, clamping to previous tick"
                );
                last
            }
            _ => now,
        }
    }

    fn advance_to(&mut self, now: Instant) -> Vec<Event> {
        let now = self.clamp(now);
        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);

        let Some(player) = self.active else {
            return Vec::new();
        };
        if self.paused || elapsed.is_zero() {
            return Vec::new();
        }

        let i = player.index();
        match self.states[i].elapse(elapsed, &self.configs[i]) {
            Some(Elapsed::Flagged(cause)) => {
                info!(%player, ?cause, "flag fell");
                vec![Event::Flag { player, cause }]
            }
            Some(Elapsed::WarningCrossed) => {
                debug!(%player, "short on time");
                vec![Event::Warning { player }]
            }
            None => Vec::new(),
        }
    }

    fn begin_game(&mut self, now: Instant) -> Vec<Event> {
        let now = self.clamp(now);
        self.last_tick = Some(now);
        let first = self.first_to_move;
        let state = &mut self.states[first.index()];
        state.begin_move();
        state.set_running(!self.paused);
        self.active = Some(first);
        debug!(%first, "game started");
        vec![Event::GameStarted {
            first_to_move: first,
        }]
    }

    fn play_move(&mut self, now: Instant) -> Vec<Event> {
        let Some(player) = self.active else {
            return self.begin_game(now);
        };

        // Charge the thinking time up to the press first.
        let mut events = self.advance_to(now);
        let i = player.index();
        if self.states[i].is_expired() {
            return events;
        }

        let move_number = self.move_number();
        let state = &mut self.states[i];
        let config = &self.configs[i];
        let thinking = state.move_elapsed();
        let advanced = state.complete_move(config);
        state.set_running(false);
        state.rearm_warning(config);

        events.push(Event::MoveCompleted {
            player,
            move_number,
            thinking_ms: as_millis(thinking),
            remaining_ms: as_millis(state.remaining_main()),
        });
        if let Some(phase_index) = advanced {
            debug!(%player, phase_index, "entered next time control phase");
            events.push(Event::PhaseAdvanced {
                player,
                phase_index,
            });
        }

        let next = player.opponent();
        let state = &mut self.states[next.index()];
        state.begin_move();
        state.set_running(true);
        self.active = Some(next);
        self.half_moves = self.half_moves.saturating_add(1);
        debug!(%player, move_number, thinking_ms = as_millis(thinking), "move played");
        events
    }

    fn set_paused(&mut self, player: Player, paused: bool, now: Instant) -> Vec<Event> {
        if paused == self.paused {
            return Vec::new();
        }
        let i = player.index();
        if paused {
            let mut events = self.advance_to(now);
            if self.states[i].is_expired() {
                return events;
            }
            self.paused = true;
            self.states[i].set_running(false);
            debug!(%player, "clock paused");
            events.push(Event::Paused {
                player,
                remaining_ms: as_millis(self.states[i].remaining_main()),
            });
            events
        } else {
            // The paused interval is never charged.
            self.last_tick = Some(self.clamp(now));
            self.paused = false;
            self.states[i].set_running(true);
            debug!(%player, "clock resumed");
            vec![Event::Resumed {
                player,
                remaining_ms: as_millis(self.states[i].remaining_main()),
            }]
        }
    }

    fn snapshot(&self) -> ClockSnapshot {
        let player_snapshot = |player: Player| {
            let state = &self.states[player.index()];
            let config = &self.configs[player.index()];
            PlayerSnapshot {
                remaining_ms: as_millis(state.remaining_main()),
                move_budget_ms: state.remaining_move_budget(config).map(as_millis),
                phase_index: state.phase_index(),
                moves_in_phase: state.moves_in_phase(),
                moves_played: state.moves_played(),
                running: state.is_running(),
                expired: state.is_expired(),
                paused: self.paused && self.active == Some(player),
                short_on_time: state.is_short_on_time(config),
                flag_cause: state.flag_cause(),
            }
        };
        ClockSnapshot {
            status: self.status(),
            active: self.active,
            paused: self.paused,
            move_number: self.move_number(),
            left: player_snapshot(Player::Left),
            right: player_snapshot(Player::Right),
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
pub(crate) fn as_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

pub(crate) fn as_micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}
