//! Scripted games on a synthetic clock.
//!
//! Time never comes from the wall clock here: every step advances a
//! simulated `Instant`, ticking the engine at a fixed period in between, so a
//! script always produces the same events.

use std::str::FromStr;
use std::time::{Duration, Instant};

use clap::Args;
use phaseclock_core::{ClockEngine, ClockSnapshot, Event, GameStatus, Player};
use serde::Serialize;
use tracing::{debug, warn};

/// Longest single step a script may contain.
const MAX_STEP: Duration = Duration::from_secs(24 * 60 * 60);
/// Long steps tick more coarsely so a script always finishes quickly.
const MAX_TICKS_PER_STEP: u32 = 100_000;

/// One scripted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The player on move thinks, then presses.
    Think(Duration),
    /// Pause, wait, resume.
    Pause(Duration),
    /// Let time run without pressing.
    Wait(Duration),
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (step, digits): (fn(Duration) -> Step, &str) = match s.as_bytes().first() {
            Some(b'p') => (Step::Pause, &s[1..]),
            Some(b'w') => (Step::Wait, &s[1..]),
            _ => (Step::Think, s),
        };
        let ms: u64 = digits
            .parse()
            .map_err(|_| format!("invalid step '{s}': expected <ms>, p<ms> or w<ms>"))?;
        let span = Duration::from_millis(ms);
        if span > MAX_STEP {
            return Err(format!("step '{s}' is longer than {} ms", MAX_STEP.as_millis()));
        }
        Ok(step(span))
    }
}

#[derive(Args)]
pub struct SimulateArgs {
    /// Comma-separated steps: `<ms>` thinks then presses, `p<ms>` pauses, `w<ms>` waits
    #[arg(long, value_delimiter = ',', required = true)]
    moves: Vec<Step>,
    /// Use a built-in time control for both players instead of the config file
    #[arg(long)]
    preset: Option<String>,
    /// Player whose clock starts first
    #[arg(long)]
    first: Option<Player>,
    /// Simulated tick period in milliseconds
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,
}

#[derive(Serialize)]
struct EventLine<'a> {
    at_ms: u64,
    #[serde(flatten)]
    event: &'a Event,
}

#[derive(Serialize)]
struct SnapshotLine {
    at_ms: u64,
    snapshot: ClockSnapshot,
}

struct Simulation {
    engine: ClockEngine,
    t0: Instant,
    now: Instant,
    period: Duration,
}

impl Simulation {
    fn at_ms(&self) -> u64 {
        u64::try_from((self.now - self.t0).as_millis()).unwrap_or(u64::MAX)
    }

    fn finished(&self) -> bool {
        self.engine.status() == Some(GameStatus::Finished)
    }

    fn emit(&self, events: Vec<Event>) -> Result<(), serde_json::Error> {
        let at_ms = self.at_ms();
        for event in &events {
            println!("{}", serde_json::to_string(&EventLine { at_ms, event })?);
        }
        Ok(())
    }

    fn advance(&mut self, span: Duration) -> Result<(), Box<dyn std::error::Error>> {
        let end = self
            .now
            .checked_add(span)
            .ok_or("simulated time out of range")?;
        let period = self.period.max(span / MAX_TICKS_PER_STEP);
        while self.now < end {
            self.now = self.now.checked_add(period).map_or(end, |t| t.min(end));
            let events = self.engine.tick(self.now);
            self.emit(events)?;
        }
        Ok(())
    }

    fn step(&mut self, step: Step) -> Result<(), Box<dyn std::error::Error>> {
        match step {
            Step::Think(span) => {
                self.advance(span)?;
                if !self.finished() {
                    let events = self.engine.play_move(self.now)?;
                    self.emit(events)?;
                }
            }
            Step::Pause(span) => {
                let events = self.engine.set_paused(true, self.now)?;
                self.emit(events)?;
                if self.finished() {
                    return Ok(());
                }
                self.advance(span)?;
                let events = self.engine.set_paused(false, self.now)?;
                self.emit(events)?;
            }
            Step::Wait(span) => self.advance(span)?,
        }
        Ok(())
    }
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let setup = super::game_setup(args.preset.as_deref(), args.first)?;
    let mut engine = ClockEngine::new();
    engine.start(setup.left, setup.right, setup.first)?;

    let t0 = Instant::now();
    let mut sim = Simulation {
        engine,
        t0,
        now: t0,
        period: Duration::from_millis(args.tick_ms.max(1)),
    };
    let events = sim.engine.play_move(t0)?;
    sim.emit(events)?;

    for (i, step) in args.moves.iter().enumerate() {
        if sim.finished() {
            warn!(skipped = args.moves.len() - i, "game over, ignoring remaining steps");
            break;
        }
        debug!(?step, at_ms = sim.at_ms(), "step");
        sim.step(*step)?;
    }

    let snapshot = sim
        .engine
        .snapshot()
        .ok_or("engine has no game")?;
    let line = SnapshotLine {
        at_ms: sim.at_ms(),
        snapshot,
    };
    println!("{}", serde_json::to_string(&line)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_steps() {
        assert_eq!("1500".parse(), Ok(Step::Think(Duration::from_millis(1500))));
        assert_eq!("p200".parse(), Ok(Step::Pause(Duration::from_millis(200))));
        assert_eq!(" w10 ".parse(), Ok(Step::Wait(Duration::from_millis(10))));
        assert!("x10".parse::<Step>().is_err());
        assert!("p".parse::<Step>().is_err());
    }

    #[test]
    fn rejects_steps_longer_than_a_day() {
        assert_eq!("w86400000".parse(), Ok(Step::Wait(MAX_STEP)));
        assert!("w86400001".parse::<Step>().is_err());
        assert!("w18446744073709551615".parse::<Step>().is_err());
    }

    #[test]
    fn long_wait_ticks_coarsely_and_flags() {
        let config = phaseclock_core::presets::preset("bullet-1-0")
            .unwrap()
            .settings
            .to_player_config()
            .unwrap();
        let mut engine = ClockEngine::new();
        engine.start(config.clone(), config, Player::Left).unwrap();
        let t0 = Instant::now();
        engine.play_move(t0).unwrap();
        let mut sim = Simulation {
            engine,
            t0,
            now: t0,
            period: Duration::from_millis(1),
        };
        sim.step(Step::Wait(MAX_STEP)).unwrap();
        assert_eq!(sim.at_ms(), 86_400_000);
        assert!(sim.finished());
    }
}
