//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the simulation rules and the session state machine.
//! It has **zero dependencies** on rendering, audio, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Unit tests for every rule
//! - **Portable**: Can run under any scheduler (virtual time, tokio, a UI frame loop)
//!
//! # Module Structure
//!
//! - [`pieces`]: piece catalog (spawn shapes, pivots) and the active piece
//! - [`rng`]: uniform random piece generation with a one-piece preview
//! - [`board`]: board dimensions and settled cells
//! - [`collision`]: landing, horizontal and rotation collision policies
//! - [`rotation`]: pivot rotation without wall kicks
//! - [`line_clear`]: full-row removal, compaction and scoring
//! - [`session`]: phase lifecycle, gravity steps, commands
//! - [`snapshot`]: read-only render view
//!
//! # Game Rules
//!
//! - **Uniform draws**: every kind is equally likely on every spawn, repeats included
//! - **Pivot rotation**: 90° clockwise about the pivot cell, O never rotates, no kicks
//! - **Early landing**: a piece rests with its lowest cell on row `height - 2`
//! - **Scoring**: 100 points per cleared row plus 10 points per merged piece
//! - **Game over**: a merge that leaves any settled cell above the board
//!
//! # Example
//!
//! ```
//! use tetris_sim_core::Session;
//! use tetris_sim_types::{Command, Phase};
//!
//! let mut session = Session::new(12345);
//! session.start();
//!
//! session.apply_command(Command::MoveRight);
//! session.apply_command(Command::Rotate);
//! session.gravity_step();
//!
//! assert_eq!(session.phase(), Phase::Running);
//! ```

pub mod board;
pub mod collision;
pub mod line_clear;
pub mod pieces;
pub mod rng;
pub mod rotation;
pub mod session;
pub mod snapshot;

pub use tetris_sim_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, SettledPiece};
pub use collision::{collides, CollisionMode};
pub use line_clear::{calculate_score, sweep, ScoreResult, SweepResult};
pub use pieces::{spawn_shape, ActivePiece};
pub use rng::{PieceGenerator, SimpleRng};
pub use rotation::{rotate, try_rotate};
pub use session::{GameOverRecord, MergeEvent, Session, StepOutcome};
pub use snapshot::{ActiveSnapshot, RenderSnapshot};
