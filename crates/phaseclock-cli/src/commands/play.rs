//! Interactive game in the terminal.
//!
//! Enter presses the clock, `p` toggles pause, `q` quits. A [`Ticker`] keeps
//! the engine current and a status line is redrawn in place.

use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use chrono::Local;
use clap::Args;
use phaseclock_core::format::{clock_face, short};
use phaseclock_core::{
    ClockSnapshot, Event, FlagCause, GameStatus, Player, PlayerSnapshot, SharedClock, Ticker,
};
use tokio::sync::mpsc;
use tracing::debug;

const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Args)]
pub struct PlayArgs {
    /// Use a built-in time control for both players instead of the config file
    #[arg(long)]
    preset: Option<String>,
    /// Player whose clock starts first
    #[arg(long)]
    first: Option<Player>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Press,
    TogglePause,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    match line.trim() {
        "" => Some(Input::Press),
        "p" | "P" => Some(Input::TogglePause),
        "q" | "Q" => Some(Input::Quit),
        _ => None,
    }
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let setup = super::game_setup(args.preset.as_deref(), args.first)?;

    let clock = SharedClock::default();
    clock.start(setup.left, setup.right, setup.first)?;

    println!("{} moves first. [Enter] press clock  [p] pause  [q] quit", setup.first);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(game_loop(clock, setup.tick_interval))
}

async fn game_loop(clock: SharedClock, interval: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let ticker = Ticker::spawn(clock.clone(), interval, event_tx);

    // Blocking stdin reads stay off the runtime.
    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_input(&line) {
                Some(input) => {
                    if input_tx.send(input).is_err() || input == Input::Quit {
                        break;
                    }
                }
                None => debug!(%line, "ignored input"),
            }
        }
    });

    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);
    loop {
        tokio::select! {
            _ = redraw.tick() => {
                if let Some(snap) = clock.snapshot() {
                    draw(&snap)?;
                }
            }
            Some(event) = event_rx.recv() => report(&event),
            input = input_rx.recv() => {
                let result = match input {
                    Some(Input::Press) => clock.play_move(Instant::now()),
                    Some(Input::TogglePause) => clock.toggle_pause(Instant::now()),
                    Some(Input::Quit) | None => break,
                };
                match result {
                    Ok(events) => events.iter().for_each(report),
                    Err(e) => println!("\n{e}"),
                }
            }
        }

        if let Some(snap) = clock.snapshot() {
            if snap.status == GameStatus::Finished {
                draw(&snap)?;
                break;
            }
        }
    }

    ticker.stop();
    // Flag events may still be queued.
    while let Ok(event) = event_rx.try_recv() {
        report(&event);
    }
    println!();
    Ok(())
}

fn side(player: Player, snap: &PlayerSnapshot) -> String {
    let marker = if snap.running { '*' } else { ' ' };
    let mut text = format!(
        "{marker}{player} {} [phase {}]",
        clock_face(Duration::from_millis(snap.remaining_ms)),
        snap.phase_index + 1
    );
    if let Some(budget) = snap.move_budget_ms {
        text.push_str(&format!(" move {}", short(Duration::from_millis(budget))));
    }
    if snap.expired {
        text.push_str(" FLAG");
    } else if snap.short_on_time {
        text.push('!');
    }
    text
}

fn draw(snap: &ClockSnapshot) -> std::io::Result<()> {
    let status = match snap.status {
        GameStatus::Ready => "ready",
        GameStatus::Running => "",
        GameStatus::Paused => "paused",
        GameStatus::Finished => "game over",
    };
    let mut out = std::io::stdout().lock();
    write!(
        out,
        "\r\x1b[2K#{:<3} {}  |  {}  {status}",
        snap.move_number,
        side(Player::Left, &snap.left),
        side(Player::Right, &snap.right),
    )?;
    out.flush()
}

fn report(event: &Event) {
    let at = Local::now().format("%H:%M:%S");
    let message = match event {
        Event::GameStarted { first_to_move } => format!("{first_to_move} to move"),
        Event::MoveCompleted {
            player,
            move_number,
            thinking_ms,
            ..
        } => format!(
            "{player} played move {move_number} in {}",
            clock_face(Duration::from_millis(*thinking_ms))
        ),
        Event::Warning { player } => format!("{player} is short on time"),
        Event::Flag { player, cause } => {
            let why = match cause {
                FlagCause::MainTime => "out of time",
                FlagCause::MoveTimeLimit => "move took too long",
            };
            format!("{player} flagged: {why}")
        }
        Event::PhaseAdvanced {
            player,
            phase_index,
        } => format!("{player} entered phase {}", phase_index + 1),
        Event::Paused { .. } => "paused".to_string(),
        Event::Resumed { .. } => "resumed".to_string(),
    };
    println!("\r\x1b[2K[{at}] {message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys() {
        assert_eq!(parse_input(""), Some(Input::Press));
        assert_eq!(parse_input("  \n"), Some(Input::Press));
        assert_eq!(parse_input("p"), Some(Input::TogglePause));
        assert_eq!(parse_input("Q"), Some(Input::Quit));
        assert_eq!(parse_input("x"), None);
    }
}
