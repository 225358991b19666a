//! Adapter module - async session runtime, leaderboard and wire format
//!
//! Hosts a pure session on tokio and connects it to its collaborators:
//!
//! - [`runtime`]: the session actor, [`TokioScheduler`] and the cloneable
//!   [`SessionHandle`]
//! - [`scores`]: the [`ScoreStore`] persistence collaborator (JSON file or memory)
//! - [`protocol`]: line-delimited JSON records for snapshots, game over and scores
//! - [`config`]: [`AppConfig::from_env`]
//!
//! # Event Flow
//!
//! ```text
//! SessionHandle --request--> actor --on_input/on_tick--> GameClock --> Session
//!                              |
//!                              +--SessionEvent--> subscriber (binary, tests)
//!                              +--OutboundMessage--> TETRIS_LOG_PATH (optional JSONL)
//! ```
//!
//! # Logging
//!
//! Lifecycle messages go to stdout with a `[Session]` or `[Scores]` prefix;
//! failures go to stderr.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tetris_sim_adapter::{spawn_session, AppConfig, MemoryStore};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let (handle, mut events) = spawn_session(&AppConfig::default(), Arc::new(MemoryStore::new()))?;
//! handle.start()?;
//! while let Some(event) = events.recv().await {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod protocol;
pub mod runtime;
pub mod scores;

pub use tetris_sim_core as core;
pub use tetris_sim_engine as engine;
pub use tetris_sim_types as types;

pub use config::AppConfig;
pub use protocol::OutboundMessage;
pub use runtime::{spawn_session, SessionEvent, SessionHandle, SessionRequest, TokioScheduler};
pub use scores::{
    format_elapsed, mask_blocked_words, sanitize_name, JsonFileStore, MemoryStore, ScoreRecord,
    ScoreStore, DEFAULT_HIGH_SCORE_LIMIT,
};
