//! Headless runner (default binary).
//!
//! Reads one command per line from stdin and prints every session event as a
//! JSON line on stdout.
//!
//! ```text
//! left | right | down | rotate      player commands
//! start | pause | reset             lifecycle
//! faster | slower | delay <ms>      gravity interval
//! scores                            leaderboard
//! quit
//! ```
//!
//! After a game over, or on `quit` while a game is in progress, the next line
//! is taken as the player name, unless `TETRIS_PLAYER` is set. End of input
//! during a game saves under `TETRIS_PLAYER` or the anonymous name.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Runtime;

use tetris_sim::adapter::protocol::{create_error, create_high_scores, OutboundMessage};
use tetris_sim::adapter::scores::ANONYMOUS;
use tetris_sim::adapter::{
    spawn_session, AppConfig, SessionEvent, SessionHandle, DEFAULT_HIGH_SCORE_LIMIT,
};
use tetris_sim::types::{Command, Phase};

/// One parsed stdin line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Input(Command),
    Start,
    Pause,
    Reset,
    Faster,
    Slower,
    Delay(u32),
    Scores,
    Quit,
}

fn parse_line(line: &str) -> Option<Line> {
    let mut parts = line.split_whitespace();
    let word = parts.next()?.to_lowercase();
    let parsed = match word.as_str() {
        "start" => Line::Start,
        "pause" => Line::Pause,
        "reset" => Line::Reset,
        "faster" => Line::Faster,
        "slower" => Line::Slower,
        "delay" => Line::Delay(parts.next()?.parse().ok()?),
        "scores" => Line::Scores,
        "quit" | "exit" => Line::Quit,
        other => Line::Input(Command::from_str(other)?),
    };
    Some(parsed)
}

/// Why the next stdin line is a player name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NamePrompt {
    GameOver,
    Quit,
}

/// A quit only carries a score when the game was started and is not over yet;
/// a finished game was already offered a save.
fn quit_saves(phase: Phase) -> bool {
    phase.is_in_progress()
}

struct Output {
    seq: u64,
}

impl Output {
    fn print(&mut self, build: impl FnOnce(u64) -> OutboundMessage) {
        self.seq += 1;
        match build(self.seq).to_line() {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("[Session] Failed to encode event: {}", e),
        }
    }
}

fn main() -> Result<()> {
    let rt = Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(run())
}

async fn run() -> Result<()> {
    let config = AppConfig::from_env();
    let store = config.score_store();
    let (handle, mut events) = spawn_session(&config, store)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = Output { seq: 0 };
    let mut prompt: Option<NamePrompt> = None;

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                out.print(|seq| event.to_message(seq));
                if let SessionEvent::GameOver(record) = event {
                    match &config.player {
                        Some(name) => save(&handle, name, record.score).await,
                        None => {
                            eprintln!("Game over! Enter your name to save score {}:", record.score);
                            prompt = Some(NamePrompt::GameOver);
                        }
                    }
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    let snap = handle.snapshot().await?;
                    if quit_saves(snap.phase) || prompt.is_some() {
                        let name = config.player.as_deref().unwrap_or(ANONYMOUS);
                        save(&handle, name, snap.score).await;
                    }
                    let _ = handle.quit();
                    break;
                };
                if let Some(reason) = prompt.take() {
                    let score = handle.snapshot().await?.score;
                    save(&handle, &line, score).await;
                    if reason == NamePrompt::Quit {
                        let _ = handle.quit();
                        break;
                    }
                    continue;
                }
                if line.trim().is_empty() {
                    continue;
                }
                match parse_line(&line) {
                    Some(Line::Quit) => {
                        let snap = handle.snapshot().await?;
                        if quit_saves(snap.phase) {
                            match &config.player {
                                Some(name) => save(&handle, name, snap.score).await,
                                None => {
                                    // Hold the game still while the name is typed
                                    handle.pause()?;
                                    eprintln!(
                                        "Quitting. Enter your name to save score {}:",
                                        snap.score
                                    );
                                    prompt = Some(NamePrompt::Quit);
                                    continue;
                                }
                            }
                        }
                        let _ = handle.quit();
                        break;
                    }
                    Some(Line::Scores) => {
                        match handle.high_scores(DEFAULT_HIGH_SCORE_LIMIT).await {
                            Ok(scores) => out.print(|seq| {
                                OutboundMessage::HighScores(create_high_scores(seq, scores))
                            }),
                            Err(e) => out.print(|seq| {
                                OutboundMessage::Error(create_error(seq, &format!("{:#}", e)))
                            }),
                        }
                    }
                    Some(cmd) => dispatch(&handle, cmd)?,
                    None => out.print(|seq| {
                        OutboundMessage::Error(create_error(
                            seq,
                            &format!("unknown command: {}", line.trim()),
                        ))
                    }),
                }
            }
        }
    }

    Ok(())
}

fn dispatch(handle: &SessionHandle, line: Line) -> Result<()> {
    match line {
        Line::Input(command) => handle.input(command),
        Line::Start => handle.start(),
        Line::Pause => handle.pause(),
        Line::Reset => handle.reset(),
        Line::Faster => handle.speed_up(),
        Line::Slower => handle.slow_down(),
        Line::Delay(ms) => handle.set_fall_delay(ms),
        Line::Scores | Line::Quit => Ok(()),
    }
}

/// Persist the final score. Failure is reported, never fatal.
async fn save(handle: &SessionHandle, name: &str, score: u32) {
    if let Err(e) = handle.save_score(name).await {
        eprintln!(
            "[Scores] Warning: score not saved ({:#}). Final score: {}",
            e, score
        );
    }
}
