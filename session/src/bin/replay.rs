//! Replay CLI
//!
//! Feeds a recorded detection stream through a fresh session and prints how
//! the game played out.

use anyhow::{Context, Result};
use clap::Parser;
use proto::{Notification, S2U};
use session::{load_recording, replay_frame, replay_session, SessionError, UiSink};
use soccer_core::Config;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Parser)]
#[command(name = "replay")]
#[command(about = "Replay a recorded soccer session", long_about = None)]
struct Cli {
    /// Recording JSON file
    recording: PathBuf,

    /// Game config JSON file; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// End the game once a player reaches this score
    #[arg(long)]
    winning_score: Option<u32>,

    /// Print every notification as it happens
    #[arg(long, default_value = "false")]
    verbose: bool,
}

/// Collects notifications for printing.
struct NotificationLog {
    seen: Rc<RefCell<Vec<Notification>>>,
}

impl UiSink for NotificationLog {
    fn send_bytes(&self, bytes: &[u8]) -> Result<(), SessionError> {
        if let S2U::Notify(n) = S2U::from_bytes(bytes)? {
            self.seen.borrow_mut().push(n);
        }
        Ok(())
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => Config::new(),
    };
    if cli.winning_score.is_some() {
        config.winning_score = cli.winning_score;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let recording = load_recording(&cli.recording)
        .with_context(|| format!("loading recording {}", cli.recording.display()))?;

    let mut session = replay_session(&recording, config)?;
    let seen = Rc::new(RefCell::new(Vec::new()));
    session.add_sink(Box::new(NotificationLog { seen: seen.clone() }));

    for (i, frame) in recording.frames.iter().enumerate() {
        replay_frame(&mut session, frame).with_context(|| format!("frame {i}"))?;

        if cli.verbose {
            for n in seen.borrow_mut().drain(..) {
                println!("[frame {i}] {n:?}");
            }
        }
    }

    let engine = session.engine();
    let score = engine.score();
    println!(
        "Replayed {} frames ({} ms)",
        recording.frames.len(),
        recording.duration_ms()
    );
    println!("Score: red {} - blue {}", score.red, score.blue);
    println!("Turns played: {}", engine.turn_count());
    if engine.is_game_over() {
        match score.leader() {
            Some(winner) => println!("Game over, {winner:?} wins"),
            None => println!("Game over, draw"),
        }
    } else {
        println!("Game still running, {:?} to play", engine.current_turn());
    }

    Ok(())
}
