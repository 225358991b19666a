//! Session runtime - tokio actor around the game clock.
//!
//! One task owns the [`GameClock`]. Timer callbacks and [`SessionRequest`]s are
//! multiplexed by that task, so every handler runs to completion before the
//! next one starts. Callers talk to it through a cloneable [`SessionHandle`]
//! and receive [`SessionEvent`]s on an unbounded channel.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::core::{GameOverRecord, RenderSnapshot, Session, StepOutcome};
use crate::engine::{Driver, GameClock, Scheduler, TickOutcome, TickToken};
use crate::protocol::{
    create_error, create_game_over, create_high_scores, create_score_saved, create_snapshot,
    OutboundMessage,
};
use crate::scores::{format_elapsed, ScoreRecord, ScoreStore};
use crate::types::{Command, Phase};

/// Timer service backed by tokio tasks.
///
/// Each request spawns one sleeping task that sends its token back to the actor.
/// A new request for the same driver aborts the previous task.
#[derive(Debug)]
pub struct TokioScheduler {
    tick_tx: mpsc::UnboundedSender<TickToken>,
    timers: HashMap<Driver, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(tick_tx: mpsc::UnboundedSender<TickToken>) -> Self {
        Self {
            tick_tx,
            timers: HashMap::new(),
        }
    }

    /// Number of drivers with a live timer task
    pub fn armed(&self) -> usize {
        self.timers.values().filter(|h| !h.is_finished()).count()
    }
}

impl Scheduler for TokioScheduler {
    fn request_tick(&mut self, delay_ms: u32, token: TickToken) {
        let tx = self.tick_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms as u64)).await;
            let _ = tx.send(token);
        });
        if let Some(previous) = self.timers.insert(token.driver, handle) {
            previous.abort();
        }
    }

    fn cancel(&mut self, driver: Driver) {
        if let Some(handle) = self.timers.remove(&driver) {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}

/// Request delivered to the session actor
#[derive(Debug)]
pub enum SessionRequest {
    Input(Command),
    Start,
    Pause,
    Reset,
    SetFallDelay(u32),
    SpeedUp,
    SlowDown,
    Snapshot(oneshot::Sender<RenderSnapshot>),
    SaveScore {
        name: String,
        reply: oneshot::Sender<anyhow::Result<ScoreRecord>>,
    },
    HighScores {
        limit: usize,
        reply: oneshot::Sender<anyhow::Result<Vec<ScoreRecord>>>,
    },
    Quit,
}

/// Notification emitted by the session actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// State after a mutation
    Snapshot(RenderSnapshot),
    GameOver(GameOverRecord),
    ScoreSaved { ok: bool, message: String },
}

impl SessionEvent {
    /// Wire form of this event
    pub fn to_message(&self, seq: u64) -> OutboundMessage {
        match self {
            SessionEvent::Snapshot(s) => OutboundMessage::Snapshot(create_snapshot(seq, s)),
            SessionEvent::GameOver(r) => OutboundMessage::GameOver(create_game_over(seq, *r)),
            SessionEvent::ScoreSaved { ok, message } => {
                OutboundMessage::ScoreSaved(create_score_saved(seq, *ok, message))
            }
        }
    }
}

/// Cloneable front door to a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionRequest>,
}

impl SessionHandle {
    fn send(&self, request: SessionRequest) -> anyhow::Result<()> {
        self.tx
            .send(request)
            .map_err(|_| anyhow!("session actor stopped"))
    }

    pub fn input(&self, command: Command) -> anyhow::Result<()> {
        self.send(SessionRequest::Input(command))
    }

    pub fn start(&self) -> anyhow::Result<()> {
        self.send(SessionRequest::Start)
    }

    pub fn pause(&self) -> anyhow::Result<()> {
        self.send(SessionRequest::Pause)
    }

    pub fn reset(&self) -> anyhow::Result<()> {
        self.send(SessionRequest::Reset)
    }

    pub fn set_fall_delay(&self, delay_ms: u32) -> anyhow::Result<()> {
        self.send(SessionRequest::SetFallDelay(delay_ms))
    }

    pub fn speed_up(&self) -> anyhow::Result<()> {
        self.send(SessionRequest::SpeedUp)
    }

    pub fn slow_down(&self) -> anyhow::Result<()> {
        self.send(SessionRequest::SlowDown)
    }

    pub async fn snapshot(&self) -> anyhow::Result<RenderSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionRequest::Snapshot(reply))?;
        rx.await.context("session actor dropped snapshot reply")
    }

    /// Save the current game's score under `name`.
    ///
    /// Accepted once per game, either after game over or while the game is
    /// still in progress (the player is quitting). An idle session has nothing
    /// to save.
    pub async fn save_score(&self, name: &str) -> anyhow::Result<ScoreRecord> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionRequest::SaveScore {
            name: name.to_string(),
            reply,
        })?;
        rx.await.context("session actor dropped save reply")?
    }

    pub async fn high_scores(&self, limit: usize) -> anyhow::Result<Vec<ScoreRecord>> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionRequest::HighScores { limit, reply })?;
        rx.await.context("session actor dropped high score reply")?
    }

    pub fn quit(&self) -> anyhow::Result<()> {
        self.send(SessionRequest::Quit)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Append-only JSONL writer for outbound messages
fn spawn_event_log(path: String) -> mpsc::UnboundedSender<OutboundMessage> {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutboundMessage>();
    tokio::spawn(async move {
        use tokio::fs::OpenOptions;
        use tokio::io::AsyncWriteExt;

        let mut file = match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
        {
            Ok(f) => f,
            Err(e) => {
                eprintln!("[Session] event log {} unavailable: {}", path, e);
                return;
            }
        };

        let mut buf: Vec<u8> = Vec::with_capacity(4096);
        while let Some(msg) = rx.recv().await {
            buf.clear();
            if serde_json::to_writer(&mut buf, &msg).is_err() {
                continue;
            }
            buf.push(b'\n');
            if file.write_all(&buf).await.is_err() {
                break;
            }
        }

        let _ = file.flush().await;
    });
    tx
}

struct SessionActor {
    clock: GameClock<TokioScheduler>,
    store: Arc<dyn ScoreStore>,
    events: mpsc::UnboundedSender<SessionEvent>,
    log_tx: Option<mpsc::UnboundedSender<OutboundMessage>>,
    seq: u64,
    /// Set once this game's score has been stored
    saved: bool,
}

impl SessionActor {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn emit(&mut self, event: SessionEvent) {
        let seq = self.next_seq();
        if let Some(log) = &self.log_tx {
            let _ = log.send(event.to_message(seq));
        }
        let _ = self.events.send(event);
    }

    /// Log-only record, not forwarded to event subscribers
    fn log_message(&mut self, build: impl FnOnce(u64) -> OutboundMessage) {
        if self.log_tx.is_none() {
            return;
        }
        let seq = self.next_seq();
        if let Some(log) = &self.log_tx {
            let _ = log.send(build(seq));
        }
    }

    fn emit_snapshot(&mut self) {
        let snapshot = self.clock.snapshot();
        self.emit(SessionEvent::Snapshot(snapshot));
    }

    fn emit_game_over(&mut self) {
        if let Some(record) = self.clock.game_over() {
            println!(
                "[Session] Game over: score {} in {}",
                record.score,
                format_elapsed(record.elapsed_ticks)
            );
            self.emit(SessionEvent::GameOver(record));
        }
    }

    fn handle_tick(&mut self, token: TickToken) {
        match self.clock.on_tick(token) {
            TickOutcome::Stale => {}
            TickOutcome::Gravity(StepOutcome::GameOver { .. }) => {
                self.emit_snapshot();
                self.emit_game_over();
            }
            TickOutcome::Gravity(_) | TickOutcome::Elapsed => self.emit_snapshot(),
        }
    }

    /// Returns `false` when the actor should stop
    async fn handle_request(&mut self, request: SessionRequest) -> bool {
        match request {
            SessionRequest::Input(command) => {
                if self.clock.on_input(command) {
                    self.emit_snapshot();
                    self.emit_game_over();
                }
            }
            SessionRequest::Start => {
                if self.clock.start() {
                    println!("[Session] Running");
                    self.emit_snapshot();
                }
            }
            SessionRequest::Pause => {
                if self.clock.pause() {
                    println!("[Session] Paused");
                    self.emit_snapshot();
                }
            }
            SessionRequest::Reset => {
                self.clock.reset();
                self.saved = false;
                println!("[Session] Reset");
                self.emit_snapshot();
            }
            SessionRequest::SetFallDelay(ms) => {
                self.clock.on_interval_change(ms);
                self.emit_snapshot();
            }
            SessionRequest::SpeedUp => {
                self.clock.speed_up();
                self.emit_snapshot();
            }
            SessionRequest::SlowDown => {
                self.clock.slow_down();
                self.emit_snapshot();
            }
            SessionRequest::Snapshot(reply) => {
                let _ = reply.send(self.clock.snapshot());
            }
            SessionRequest::SaveScore { name, reply } => {
                let result = self.save_score(&name).await;
                let _ = reply.send(result);
            }
            SessionRequest::HighScores { limit, reply } => self.high_scores(limit, reply),
            SessionRequest::Quit => return false,
        }
        true
    }

    async fn save_score(&mut self, name: &str) -> anyhow::Result<ScoreRecord> {
        if self.clock.session().phase() == Phase::Idle {
            self.log_message(|seq| OutboundMessage::Error(create_error(seq, "no game to save")));
            return Err(anyhow!("no game to save"));
        }
        let final_record = self.clock.session().record();
        if self.saved {
            return Err(anyhow!("score already saved for this game"));
        }

        let record = ScoreRecord::new(name, final_record.score, final_record.elapsed_ticks);
        let store = Arc::clone(&self.store);
        let to_save = record.clone();
        let result = tokio::task::spawn_blocking(move || store.save(&to_save))
            .await
            .context("score store task failed")
            .and_then(|r| r);

        match result {
            Ok(()) => {
                self.saved = true;
                println!("[Scores] Saved {} with {} points", record.name, record.score);
                self.emit(SessionEvent::ScoreSaved {
                    ok: true,
                    message: format!("saved {}", record.name),
                });
                Ok(record)
            }
            Err(e) => {
                eprintln!("[Scores] Failed to save score {}: {:#}", record.score, e);
                self.emit(SessionEvent::ScoreSaved {
                    ok: false,
                    message: format!("{:#}", e),
                });
                Err(e)
            }
        }
    }

    /// Leaderboard lookup runs off the actor task so ticks keep flowing
    fn high_scores(
        &mut self,
        limit: usize,
        reply: oneshot::Sender<anyhow::Result<Vec<ScoreRecord>>>,
    ) {
        let store = Arc::clone(&self.store);
        let log = self.log_tx.clone().map(|tx| (tx, self.next_seq()));
        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || store.high_scores(limit))
                .await
                .context("score store task failed")
                .and_then(|r| r);
            if let (Ok(scores), Some((tx, seq))) = (&result, log) {
                let _ = tx.send(OutboundMessage::HighScores(create_high_scores(
                    seq,
                    scores.clone(),
                )));
            }
            let _ = reply.send(result);
        });
    }
}

/// Spawn the session actor on the current tokio runtime.
///
/// The session starts `Idle`; send [`SessionHandle::start`] to begin.
pub fn spawn_session(
    config: &AppConfig,
    store: Arc<dyn ScoreStore>,
) -> anyhow::Result<(SessionHandle, mpsc::UnboundedReceiver<SessionEvent>)> {
    config.validate()?;
    let session = Session::with_config(config.session, config.seed)
        .context("invalid session configuration")?;

    let (req_tx, mut req_rx) = mpsc::unbounded_channel::<SessionRequest>();
    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel::<TickToken>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<SessionEvent>();

    let mut actor = SessionActor {
        clock: GameClock::new(session, TokioScheduler::new(tick_tx)),
        store,
        events: event_tx,
        log_tx: config.log_path.clone().map(spawn_event_log),
        seq: 0,
        saved: false,
    };

    println!(
        "[Session] Ready: {}x{} board, seed {}, fall delay {}ms",
        config.session.board_width,
        config.session.board_height,
        config.seed,
        config.session.fall_delay_ms
    );

    tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(token) = tick_rx.recv() => actor.handle_tick(token),
                request = req_rx.recv() => {
                    let Some(request) = request else { break };
                    if !actor.handle_request(request).await {
                        break;
                    }
                }
            }
        }
        println!("[Session] Stopped");
    });

    Ok((SessionHandle { tx: req_tx }, event_rx))
}
