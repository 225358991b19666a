//! Session module - the game state machine
//!
//! Ties the core components together: board, piece generator, collision,
//! rotation and line clears. Handles the phase lifecycle, one gravity step at a
//! time, player commands and scoring.
//!
//! The session has no notion of wall-clock time. The game clock (engine crate)
//! calls [`Session::gravity_step`] every `fall_delay_ms` and
//! [`Session::elapsed_tick`] every second while the phase is `Running`.

use crate::board::Board;
use crate::collision::{can_shift, is_landing};
use crate::line_clear::{calculate_score, sweep};
use crate::pieces::ActivePiece;
use crate::rng::PieceGenerator;
use crate::rotation::try_rotate;
use crate::snapshot::{ActiveSnapshot, RenderSnapshot};
use crate::types::*;

/// Result of one gravity step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Not running, nothing changed
    Ignored,
    /// Active piece moved down one row
    Moved,
    /// Active piece merged, next piece spawned
    Merged { lines_cleared: u32, points: u32 },
    /// Active piece merged and left cells above the board
    GameOver { lines_cleared: u32, points: u32 },
}

/// Emitted after every merge (consumed by observers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeEvent {
    pub kind: PieceKind,
    pub lines_cleared: u32,
    pub points: u32,
}

/// Final result handed to the persistence collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverRecord {
    pub score: u32,
    pub elapsed_ticks: u32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    board: Board,
    active: Option<ActivePiece>,
    generator: PieceGenerator,
    phase: Phase,
    score: u32,
    elapsed_ticks: u32,
    fall_delay_ms: u32,
    lines_cleared: u32,
    pieces_merged: u32,
    /// Last merge event (consumed by observers).
    last_event: Option<MergeEvent>,
}

impl Session {
    /// Create a session with default configuration and the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self::build(SessionConfig::default(), seed)
    }

    /// Create a session with a custom configuration
    pub fn with_config(config: SessionConfig, seed: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    fn build(config: SessionConfig, seed: u32) -> Self {
        Self {
            config,
            board: Board::new(config.board_width, config.board_height),
            active: None,
            generator: PieceGenerator::new(seed),
            phase: Phase::Idle,
            score: 0,
            elapsed_ticks: 0,
            fall_delay_ms: config.fall_delay_ms,
            lines_cleared: 0,
            pieces_merged: 0,
            last_event: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn elapsed_ticks(&self) -> u32 {
        self.elapsed_ticks
    }

    pub fn fall_delay_ms(&self) -> u32 {
        self.fall_delay_ms
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn pieces_merged(&self) -> u32 {
        self.pieces_merged
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    /// Kind the next spawn will use
    pub fn next_kind(&self) -> PieceKind {
        self.generator.peek()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn set_active(&mut self, piece: Option<ActivePiece>) {
        self.active = piece;
    }

    /// Take and clear the last merge event.
    pub fn take_last_event(&mut self) -> Option<MergeEvent> {
        self.last_event.take()
    }

    /// Final score and time once the session is over
    pub fn game_over_record(&self) -> Option<GameOverRecord> {
        (self.phase == Phase::GameOver).then(|| self.record())
    }

    /// Current score and time, whatever the phase
    pub fn record(&self) -> GameOverRecord {
        GameOverRecord {
            score: self.score,
            elapsed_ticks: self.elapsed_ticks,
        }
    }

    /// Idle or Paused -> Running. Spawns the first piece when none is falling.
    pub fn start(&mut self) -> bool {
        match self.phase {
            Phase::Idle | Phase::Paused => {
                self.phase = Phase::Running;
                if self.active.is_none() {
                    self.spawn_piece();
                }
                true
            }
            Phase::Running | Phase::GameOver => false,
        }
    }

    /// Running -> Paused
    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.phase = Phase::Paused;
        true
    }

    /// Back to Idle with an empty board. The fall delay is kept.
    pub fn reset(&mut self) {
        self.board.clear();
        self.active = None;
        self.phase = Phase::Idle;
        self.score = 0;
        self.elapsed_ticks = 0;
        self.lines_cleared = 0;
        self.pieces_merged = 0;
        self.last_event = None;
    }

    /// Replace the active piece with a fresh random one
    fn spawn_piece(&mut self) {
        self.active = Some(self.generator.get_random_piece());
    }

    /// One atomic gravity step.
    ///
    /// move down -> collision test -> [merge -> spawn -> sweep -> score] -> game-over check
    pub fn gravity_step(&mut self) -> StepOutcome {
        if !self.is_running() {
            return StepOutcome::Ignored;
        }

        let Some(active) = self.active else {
            self.spawn_piece();
            return StepOutcome::Moved;
        };

        if !is_landing(&active, &self.board) {
            self.active = Some(active.shifted(0, 1));
            return StepOutcome::Moved;
        }

        self.board.merge_piece(&active);
        self.pieces_merged = self.pieces_merged.wrapping_add(1);
        self.spawn_piece();

        let lines = sweep(&mut self.board).lines_cleared();
        let points = calculate_score(lines).total;
        self.score = self.score.saturating_add(points);
        self.lines_cleared += lines;
        self.last_event = Some(MergeEvent {
            kind: active.kind(),
            lines_cleared: lines,
            points,
        });

        if self.board.has_cells_above_top() {
            self.phase = Phase::GameOver;
            self.active = None;
            return StepOutcome::GameOver {
                lines_cleared: lines,
                points,
            };
        }

        StepOutcome::Merged {
            lines_cleared: lines,
            points,
        }
    }

    /// Count one second of play
    pub fn elapsed_tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.elapsed_ticks = self.elapsed_ticks.saturating_add(1);
        true
    }

    /// Apply a player command. Illegal moves are silent no-ops returning `false`.
    pub fn apply_command(&mut self, command: Command) -> bool {
        self.apply_command_outcome(command) != StepOutcome::Ignored
    }

    /// Apply a player command, reporting what happened.
    ///
    /// Horizontal moves and rotations report `Moved` when accepted.
    pub fn apply_command_outcome(&mut self, command: Command) -> StepOutcome {
        if !self.is_running() {
            return StepOutcome::Ignored;
        }
        let Some(active) = self.active else {
            return StepOutcome::Ignored;
        };

        match command {
            Command::MoveLeft => self.try_shift(&active, -1),
            Command::MoveRight => self.try_shift(&active, 1),
            Command::MoveDown => self.gravity_step(),
            Command::Rotate => match try_rotate(&active, &self.board) {
                Some(rotated) => {
                    self.active = Some(rotated);
                    StepOutcome::Moved
                }
                None => StepOutcome::Ignored,
            },
        }
    }

    fn try_shift(&mut self, active: &ActivePiece, dx: i8) -> StepOutcome {
        if can_shift(active, dx, &self.board) {
            self.active = Some(active.shifted(dx, 0));
            StepOutcome::Moved
        } else {
            StepOutcome::Ignored
        }
    }

    /// Set the gravity interval, clamped to the configured range. Returns the applied value.
    pub fn set_fall_delay(&mut self, delay_ms: u32) -> u32 {
        self.fall_delay_ms = self.config.clamp_fall_delay(delay_ms);
        self.fall_delay_ms
    }

    /// Shorten the gravity interval by one speed step
    pub fn speed_up(&mut self) -> u32 {
        self.set_fall_delay(self.fall_delay_ms.saturating_sub(self.config.speed_step_ms))
    }

    /// Lengthen the gravity interval by one speed step
    pub fn slow_down(&mut self) -> u32 {
        self.set_fall_delay(self.fall_delay_ms.saturating_add(self.config.speed_step_ms))
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            board_width: self.board.width(),
            board_height: self.board.height(),
            active: self.active.map(ActiveSnapshot::from),
            settled: self.board.cells(),
            next: self.generator.peek(),
            phase: self.phase,
            score: self.score,
            elapsed_ticks: self.elapsed_ticks,
            fall_delay_ms: self.fall_delay_ms,
            lines_cleared: self.lines_cleared,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(1)
    }
}
