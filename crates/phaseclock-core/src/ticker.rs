//! Synchronised access to the engine and the periodic ticker.
//!
//! The engine itself is plain data. Front ends share it through
//! [`SharedClock`], whose lock is the only way in: the ticker and the input
//! handling both go through it, one bounded engine call per lock. Renderers
//! read cloned [`ClockSnapshot`]s and never see a half-applied update.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::clock::{as_millis, ClockEngine, ClockSnapshot, Player, PlayerConfig};
use crate::error::ClockError;
use crate::events::Event;

/// A [`ClockEngine`] behind a single lock.
#[derive(Debug, Clone, Default)]
pub struct SharedClock {
    inner: Arc<Mutex<ClockEngine>>,
}

impl SharedClock {
    pub fn new(engine: ClockEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn start(
        &self,
        left: PlayerConfig,
        right: PlayerConfig,
        first_to_move: Player,
    ) -> Result<(), ClockError> {
        self.inner.lock().start(left, right, first_to_move)
    }

    pub fn tick(&self, now: Instant) -> Vec<Event> {
        self.inner.lock().tick(now)
    }

    pub fn play_move(&self, now: Instant) -> Result<Vec<Event>, ClockError> {
        self.inner.lock().play_move(now)
    }

    pub fn set_paused(&self, paused: bool, now: Instant) -> Result<Vec<Event>, ClockError> {
        self.inner.lock().set_paused(paused, now)
    }

    /// Flip the pause state under one lock.
    pub fn toggle_pause(&self, now: Instant) -> Result<Vec<Event>, ClockError> {
        let mut engine = self.inner.lock();
        let paused = !engine.is_paused();
        engine.set_paused(paused, now)
    }

    pub fn snapshot(&self) -> Option<ClockSnapshot> {
        self.inner.lock().snapshot()
    }
}

/// Background task ticking a [`SharedClock`] at a fixed interval.
///
/// Events produced by ticks (warnings, flags) are sent on the channel given to
/// [`Ticker::spawn`]. The task ends when the receiver is dropped, on
/// [`Ticker::stop`], or when the `Ticker` is dropped.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn the ticker on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn(clock: SharedClock, interval: Duration, events: mpsc::UnboundedSender<Event>) -> Self {
        let period = interval.max(Duration::from_millis(1));
        let handle = tokio::spawn(async move {
            let mut ticks = tokio::time::interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                for event in clock.tick(Instant::now()) {
                    if events.send(event).is_err() {
                        debug!("event receiver dropped, ticker stopping");
                        return;
                    }
                }
            }
        });
        debug!(period_ms = as_millis(period), "ticker started");
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TimeControlPhase;
    use crate::events::FlagCause;

    fn quick(total: Duration) -> PlayerConfig {
        PlayerConfig::new(
            vec![TimeControlPhase::sudden_death(total, Duration::ZERO)],
            false,
            None,
            Duration::ZERO,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn ticker_reports_flag_fall() {
        let clock = SharedClock::default();
        clock
            .start(quick(Duration::from_millis(30)), quick(Duration::from_secs(60)), Player::Left)
            .unwrap();
        clock.play_move(Instant::now()).unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticker = Ticker::spawn(clock.clone(), Duration::from_millis(5), tx);

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no flag within timeout")
            .expect("channel closed");
        assert_eq!(
            event,
            Event::Flag {
                player: Player::Left,
                cause: FlagCause::MainTime
            }
        );
        let snap = clock.snapshot().unwrap();
        assert!(snap.left.expired);
        assert_eq!(snap.right.remaining_ms, 60_000);
        ticker.stop();
    }

    #[tokio::test]
    async fn paused_clock_does_not_lose_time_while_ticking() {
        let clock = SharedClock::default();
        clock
            .start(quick(Duration::from_secs(60)), quick(Duration::from_secs(60)), Player::Left)
            .unwrap();
        clock.play_move(Instant::now()).unwrap();
        clock.toggle_pause(Instant::now()).unwrap();
        let before = clock.snapshot().unwrap().left.remaining_ms;

        let (tx, _rx) = mpsc::unbounded_channel();
        let ticker = Ticker::spawn(clock.clone(), Duration::from_millis(2), tx);
        tokio::time::sleep(Duration::from_millis(30)).await;
        ticker.stop();

        let snap = clock.snapshot().unwrap();
        assert!(snap.paused);
        assert_eq!(snap.left.remaining_ms, before);
    }

    #[test]
    fn toggle_pause_flips_state() {
        let clock = SharedClock::default();
        clock
            .start(quick(Duration::from_secs(60)), quick(Duration::from_secs(60)), Player::Right)
            .unwrap();
        let t0 = Instant::now();
        clock.play_move(t0).unwrap();
        let events = clock.toggle_pause(t0 + Duration::from_secs(1)).unwrap();
        assert!(matches!(events[0], Event::Paused { player: Player::Right, .. }));
        let events = clock.toggle_pause(t0 + Duration::from_secs(2)).unwrap();
        assert!(matches!(events[0], Event::Resumed { player: Player::Right, .. }));
    }
}
