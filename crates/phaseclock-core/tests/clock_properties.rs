//! Integration tests for the clock engine's timing guarantees.
//!
//! These drive the public engine API with synthetic monotonic timestamps and
//! check the properties a tournament clock must hold regardless of how often
//! the front end ticks.

use std::time::{Duration, Instant};

use phaseclock_core::{
    ClockEngine, ClockError, Event, FlagCause, Player, PlayerConfig, Rejection, TimeControlPhase,
};
use proptest::prelude::*;

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

fn ms(m: u64) -> Duration {
    Duration::from_millis(m)
}

fn forty_then_rest(additive: bool) -> PlayerConfig {
    PlayerConfig::new(
        vec![
            TimeControlPhase::moves(40, secs(5 * 60), Duration::ZERO).unwrap(),
            TimeControlPhase::sudden_death(secs(3 * 60), secs(2)),
        ],
        additive,
        None,
        Duration::ZERO,
    )
    .unwrap()
}

fn blitz() -> PlayerConfig {
    PlayerConfig::new(
        vec![TimeControlPhase::sudden_death(secs(180), secs(2))],
        false,
        None,
        secs(20),
    )
    .unwrap()
}

fn started(left: PlayerConfig, right: PlayerConfig, t0: Instant) -> ClockEngine {
    let mut engine = ClockEngine::new();
    engine.start(left, right, Player::Left).unwrap();
    engine.play_move(t0).unwrap();
    engine
}

/// Play 40 moves for each side; left thinks `left_total` on its first move only.
fn play_forty(engine: &mut ClockEngine, t0: Instant, left_total: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    let now = t0 + left_total;
    for _ in 0..40 {
        events.extend(engine.play_move(now).unwrap());
        events.extend(engine.play_move(now).unwrap());
    }
    events
}

#[test]
fn destructive_transition_discards_seventeen_seconds() {
    let t0 = Instant::now();
    let mut engine = started(forty_then_rest(false), forty_then_rest(false), t0);
    let events = play_forty(&mut engine, t0, secs(300 - 17));

    assert!(events.contains(&Event::PhaseAdvanced {
        player: Player::Left,
        phase_index: 1
    }));
    assert_eq!(engine.remaining(Player::Left), Some(secs(180)));
    assert_eq!(engine.state(Player::Left).unwrap().phase_index(), 1);
}

#[test]
fn additive_transition_keeps_seventeen_seconds() {
    let t0 = Instant::now();
    let mut engine = started(forty_then_rest(true), forty_then_rest(true), t0);
    play_forty(&mut engine, t0, secs(300 - 17));
    assert_eq!(engine.remaining(Player::Left), Some(secs(180 + 17)));
}

#[test]
fn increment_of_new_phase_applies_after_transition() {
    let t0 = Instant::now();
    let mut engine = started(forty_then_rest(false), forty_then_rest(false), t0);
    let now = t0 + secs(100);
    play_forty(&mut engine, t0, secs(100));
    // Move 41 is played under the sudden-death terms: +2 s.
    engine.play_move(now + secs(10)).unwrap();
    assert_eq!(engine.remaining(Player::Left), Some(secs(180 - 10 + 2)));
}

#[test]
fn move_time_limit_overrides_plenty_of_main_time() {
    let t0 = Instant::now();
    let limited = PlayerConfig::new(
        vec![TimeControlPhase::sudden_death(secs(600), Duration::ZERO)],
        false,
        Some(secs(30)),
        Duration::ZERO,
    )
    .unwrap();
    let mut engine = started(limited.clone(), limited, t0);
    let events = engine.play_move(t0 + secs(30) + ms(1)).unwrap();
    assert_eq!(
        events,
        vec![Event::Flag {
            player: Player::Left,
            cause: FlagCause::MoveTimeLimit
        }]
    );
    assert!(engine.remaining(Player::Left).unwrap() > secs(500));
}

#[test]
fn move_exactly_at_limit_is_allowed() {
    let t0 = Instant::now();
    let limited = PlayerConfig::new(
        vec![TimeControlPhase::sudden_death(secs(600), Duration::ZERO)],
        false,
        Some(secs(30)),
        Duration::ZERO,
    )
    .unwrap();
    let mut engine = started(limited.clone(), limited, t0);
    let events = engine.play_move(t0 + secs(30)).unwrap();
    assert!(!events.iter().any(Event::is_flag));
    assert_eq!(engine.active(), Some(Player::Right));
}

#[test]
fn warning_fires_once_per_crossing() {
    let t0 = Instant::now();
    let config = PlayerConfig::new(
        vec![TimeControlPhase::sudden_death(secs(61), secs(10))],
        false,
        None,
        secs(60),
    )
    .unwrap();
    let mut engine = started(config.clone(), config, t0);

    let mut warnings = 0;
    let mut now = t0;
    for _ in 0..20 {
        now += ms(500);
        warnings += engine
            .tick(now)
            .iter()
            .filter(|e| matches!(e, Event::Warning { .. }))
            .count();
    }
    assert_eq!(warnings, 1);

    // 51 s left; the increment brings it to 61 s and re-arms.
    engine.play_move(now).unwrap();
    engine.play_move(now).unwrap();
    let events = engine.tick(now + secs(2));
    assert_eq!(events, vec![Event::Warning { player: Player::Left }]);
}

#[test]
fn rejected_calls_leave_engine_untouched() {
    let now = Instant::now();

    let mut idle = ClockEngine::new();
    let before = idle.clone();
    assert_eq!(
        idle.play_move(now),
        Err(ClockError::InvalidOperation(Rejection::NoGame))
    );
    assert_eq!(
        idle.set_paused(true, now),
        Err(ClockError::InvalidOperation(Rejection::NoGame))
    );
    assert_eq!(idle, before);

    let mut flagged = started(blitz(), blitz(), now);
    flagged.tick(now + secs(181));
    let before = flagged.clone();
    assert!(flagged.play_move(now + secs(182)).is_err());
    assert!(flagged.set_paused(true, now + secs(182)).is_err());
    assert!(flagged.set_paused(false, now + secs(182)).is_err());
    assert_eq!(flagged, before);
    assert_eq!(before.snapshot(), flagged.snapshot());
}

#[test]
fn at_most_one_clock_runs() {
    let t0 = Instant::now();
    let mut engine = started(blitz(), blitz(), t0);
    let mut now = t0;
    for i in 0..10u64 {
        now += ms(700 + i * 13);
        engine.play_move(now).unwrap();
        let snap = engine.snapshot().unwrap();
        assert!(!(snap.left.running && snap.right.running));
        assert!(snap.left.running || snap.right.running);
    }
    engine.set_paused(true, now).unwrap();
    let snap = engine.snapshot().unwrap();
    assert!(!snap.left.running && !snap.right.running);
}

proptest! {
    #[test]
    fn remaining_time_is_independent_of_tick_cadence(
        splits in prop::collection::vec(0u64..5_000_000, 1..60),
        resample in prop::collection::vec(1u64..250, 1..40),
    ) {
        let total: u64 = splits.iter().sum();
        let t0 = Instant::now();

        let mut a = started(blitz(), blitz(), t0);
        let mut offset = 0u64;
        for step in &splits {
            offset += step;
            a.tick(t0 + Duration::from_micros(offset));
        }

        let mut b = started(blitz(), blitz(), t0);
        let mut offset = 0u64;
        let mut i = 0;
        while offset < total {
            offset = (offset + resample[i % resample.len()] * 1_000).min(total);
            b.tick(t0 + Duration::from_micros(offset));
            i += 1;
        }
        b.tick(t0 + Duration::from_micros(total));

        prop_assert_eq!(a.remaining(Player::Left), b.remaining(Player::Left));
        prop_assert_eq!(
            a.state(Player::Left).unwrap().is_expired(),
            b.state(Player::Left).unwrap().is_expired()
        );
    }

    #[test]
    fn pause_charges_nothing_for_any_pause_length(
        before_ms in 0u64..170_000,
        paused_ms in 0u64..10_000_000,
        after_ms in 0u64..5_000,
    ) {
        let t0 = Instant::now();
        let mut engine = started(blitz(), blitz(), t0);
        let pause_at = t0 + ms(before_ms);
        engine.set_paused(true, pause_at).unwrap();
        let at_pause = engine.remaining(Player::Left).unwrap();
        engine.tick(pause_at + ms(paused_ms / 2));
        engine.set_paused(false, pause_at + ms(paused_ms)).unwrap();
        prop_assert_eq!(engine.remaining(Player::Left).unwrap(), at_pause);

        engine.tick(pause_at + ms(paused_ms) + ms(after_ms));
        prop_assert_eq!(
            engine.remaining(Player::Left).unwrap(),
            secs(180) - ms(before_ms) - ms(after_ms)
        );
    }

    #[test]
    fn remaining_never_grows_without_a_move(
        steps in prop::collection::vec(0u64..20_000, 1..50),
    ) {
        let t0 = Instant::now();
        let mut engine = started(blitz(), blitz(), t0);
        let mut now = t0;
        let mut last = engine.remaining(Player::Left).unwrap();
        for step in steps {
            now += ms(step);
            engine.tick(now);
            let remaining = engine.remaining(Player::Left).unwrap();
            prop_assert!(remaining <= last);
            last = remaining;
        }
    }
}
