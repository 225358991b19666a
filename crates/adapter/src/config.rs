//! Application configuration from environment variables
//!
//! | Variable               | Default            |
//! |------------------------|--------------------|
//! | `TETRIS_BOARD_WIDTH`   | 10                 |
//! | `TETRIS_BOARD_HEIGHT`  | 20                 |
//! | `TETRIS_FALL_DELAY_MS` | 1000               |
//! | `TETRIS_SPEED_STEP_MS` | 50                 |
//! | `TETRIS_SEED`          | current time       |
//! | `TETRIS_SCORES_PATH`   | `scores.json`      |
//! | `TETRIS_LOG_PATH`      | unset (no log)     |
//! | `TETRIS_PLAYER`        | unset (prompt)     |
//!
//! Missing or unparsable values fall back to the default. Range checks happen in
//! [`AppConfig::validate`].

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crate::protocol::current_timestamp_ms;
use crate::scores::{JsonFileStore, MemoryStore, ScoreStore};
use crate::types::SessionConfig;

/// Default leaderboard file
pub const DEFAULT_SCORES_PATH: &str = "scores.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub seed: u32,
    /// `None` keeps scores in memory only
    pub scores_path: Option<PathBuf>,
    /// JSONL event log
    pub log_path: Option<String>,
    /// Saves automatically under this name instead of prompting
    pub player: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            seed: 1,
            scores_path: None,
            log_path: None,
            player: None,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .and_then(|s| if s.is_empty() { None } else { Some(s) })
}

impl AppConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = SessionConfig::default();
        let session = SessionConfig {
            board_width: parse_env("TETRIS_BOARD_WIDTH").unwrap_or(defaults.board_width),
            board_height: parse_env("TETRIS_BOARD_HEIGHT").unwrap_or(defaults.board_height),
            fall_delay_ms: parse_env("TETRIS_FALL_DELAY_MS").unwrap_or(defaults.fall_delay_ms),
            speed_step_ms: parse_env("TETRIS_SPEED_STEP_MS").unwrap_or(defaults.speed_step_ms),
            ..defaults
        };

        let seed = parse_env("TETRIS_SEED").unwrap_or_else(|| current_timestamp_ms() as u32);

        let scores_path = Some(
            non_empty_env("TETRIS_SCORES_PATH")
                .unwrap_or_else(|| DEFAULT_SCORES_PATH.to_string())
                .into(),
        );

        Self {
            session,
            seed,
            scores_path,
            log_path: non_empty_env("TETRIS_LOG_PATH"),
            player: non_empty_env("TETRIS_PLAYER"),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.session
            .validate()
            .context("invalid session configuration")
    }

    /// Leaderboard store for this configuration
    pub fn score_store(&self) -> Arc<dyn ScoreStore> {
        match &self.scores_path {
            Some(path) => Arc::new(JsonFileStore::new(path.clone())),
            None => Arc::new(MemoryStore::new()),
        }
    }
}
