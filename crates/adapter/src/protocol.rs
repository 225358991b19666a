//! Protocol module - line-delimited JSON messages emitted by the session actor
//!
//! Every message carries `type`, `seq` (per-session sequence number) and `ts`
//! (wall-clock milliseconds). The same records are printed by the binary and
//! appended to the optional event log.

use serde::{Deserialize, Serialize};

use crate::core::{ActiveSnapshot, GameOverRecord, RenderSnapshot};
use crate::scores::{format_elapsed, ScoreRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapshotType {
    #[serde(rename = "snapshot")]
    Snapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOverType {
    #[serde(rename = "gameOver")]
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreSavedType {
    #[serde(rename = "scoreSaved")]
    ScoreSaved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighScoresType {
    #[serde(rename = "highScores")]
    HighScores,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

/// Full render view after a mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMessage {
    #[serde(rename = "type")]
    pub msg_type: SnapshotType,
    pub seq: u64,
    pub ts: u64,
    pub phase: String,
    pub playable: bool,
    pub score: u32,
    pub elapsed_ticks: u32,
    /// `mm:ss`
    pub elapsed: String,
    pub fall_delay_ms: u32,
    pub lines_cleared: u32,
    pub next: String,
    pub board: BoardView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<ActiveView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardView {
    pub width: u8,
    pub height: u8,
    /// Settled cells only, row-major
    pub cells: Vec<CellView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPos {
    pub x: i8,
    pub y: i8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub x: i8,
    pub y: i8,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveView {
    pub kind: String,
    pub color: String,
    pub orientation: String,
    pub cells: Vec<CellPos>,
}

impl From<&ActiveSnapshot> for ActiveView {
    fn from(value: &ActiveSnapshot) -> Self {
        Self {
            kind: value.kind.as_str().to_string(),
            color: value.color.as_str().to_string(),
            orientation: value.orientation.as_str().to_string(),
            cells: value
                .cells
                .iter()
                .map(|p| CellPos { x: p.x, y: p.y })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameOverMessage {
    #[serde(rename = "type")]
    pub msg_type: GameOverType,
    pub seq: u64,
    pub ts: u64,
    pub score: u32,
    pub time_elapsed: u32,
    pub elapsed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSavedMessage {
    #[serde(rename = "type")]
    pub msg_type: ScoreSavedType,
    pub seq: u64,
    pub ts: u64,
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoresMessage {
    #[serde(rename = "type")]
    pub msg_type: HighScoresType,
    pub seq: u64,
    pub ts: u64,
    pub scores: Vec<ScoreRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub message: String,
}

/// Any outbound record. Each variant carries its own `type` tag.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Snapshot(SnapshotMessage),
    GameOver(GameOverMessage),
    ScoreSaved(ScoreSavedMessage),
    HighScores(HighScoresMessage),
    Error(ErrorMessage),
}

impl OutboundMessage {
    /// Serialize as one JSON line (without the trailing newline)
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Create a snapshot message
pub fn create_snapshot(seq: u64, snapshot: &RenderSnapshot) -> SnapshotMessage {
    let mut cells: Vec<CellView> = snapshot
        .settled
        .iter()
        .map(|c| CellView {
            x: c.pos.x,
            y: c.pos.y,
            color: c.color.as_str().to_string(),
        })
        .collect();
    cells.sort_by_key(|c| (c.y, c.x));

    SnapshotMessage {
        msg_type: SnapshotType::Snapshot,
        seq,
        ts: current_timestamp_ms(),
        phase: snapshot.phase.as_str().to_string(),
        playable: snapshot.playable(),
        score: snapshot.score,
        elapsed_ticks: snapshot.elapsed_ticks,
        elapsed: format_elapsed(snapshot.elapsed_ticks),
        fall_delay_ms: snapshot.fall_delay_ms,
        lines_cleared: snapshot.lines_cleared,
        next: snapshot.next.as_str().to_string(),
        board: BoardView {
            width: snapshot.board_width,
            height: snapshot.board_height,
            cells,
        },
        active: snapshot.active.as_ref().map(ActiveView::from),
    }
}

/// Create a game-over message
pub fn create_game_over(seq: u64, record: GameOverRecord) -> GameOverMessage {
    GameOverMessage {
        msg_type: GameOverType::GameOver,
        seq,
        ts: current_timestamp_ms(),
        score: record.score,
        time_elapsed: record.elapsed_ticks,
        elapsed: format_elapsed(record.elapsed_ticks),
    }
}

/// Create a score-saved message
pub fn create_score_saved(seq: u64, ok: bool, message: &str) -> ScoreSavedMessage {
    ScoreSavedMessage {
        msg_type: ScoreSavedType::ScoreSaved,
        seq,
        ts: current_timestamp_ms(),
        ok,
        message: message.to_string(),
    }
}

/// Create a leaderboard message
pub fn create_high_scores(seq: u64, scores: Vec<ScoreRecord>) -> HighScoresMessage {
    HighScoresMessage {
        msg_type: HighScoresType::HighScores,
        seq,
        ts: current_timestamp_ms(),
        scores,
    }
}

/// Create an error message
pub fn create_error(seq: u64, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Session;

    #[test]
    fn test_snapshot_message_shape() {
        let mut session = Session::new(12345);
        session.start();
        let msg = create_snapshot(7, &session.snapshot());
        let v: serde_json::Value =
            serde_json::to_value(OutboundMessage::Snapshot(msg)).unwrap();

        assert_eq!(v["type"], "snapshot");
        assert_eq!(v["seq"], 7);
        assert_eq!(v["phase"], "running");
        assert_eq!(v["playable"], true);
        assert_eq!(v["elapsed"], "00:00");
        assert_eq!(v["fall_delay_ms"], 1000);
        assert_eq!(v["elapsed_ticks"], 0);
        assert_eq!(v["lines_cleared"], 0);
        assert_eq!(v["board"]["width"], 10);
        assert_eq!(v["board"]["height"], 20);
        assert_eq!(v["board"]["cells"].as_array().unwrap().len(), 0);
        assert_eq!(v["active"]["cells"].as_array().unwrap().len(), 4);
        assert_eq!(v["active"]["orientation"], "N");
    }

    #[test]
    fn test_idle_snapshot_omits_active() {
        let session = Session::new(1);
        let line = OutboundMessage::Snapshot(create_snapshot(1, &session.snapshot()))
            .to_line()
            .unwrap();
        let v: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["phase"], "idle");
        assert!(v.get("active").is_none());
    }

    #[test]
    fn test_game_over_message() {
        let msg = create_game_over(
            3,
            GameOverRecord {
                score: 420,
                elapsed_ticks: 125,
            },
        );
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["type"], "gameOver");
        assert_eq!(v["score"], 420);
        assert_eq!(v["time_elapsed"], 125);
        assert_eq!(v["elapsed"], "02:05");
    }

    #[test]
    fn test_error_and_score_saved_tags() {
        let err = serde_json::to_value(create_error(1, "bad command")).unwrap();
        assert_eq!(err["type"], "error");
        assert_eq!(err["message"], "bad command");

        let saved = serde_json::to_value(create_score_saved(2, false, "disk full")).unwrap();
        assert_eq!(saved["type"], "scoreSaved");
        assert_eq!(saved["ok"], false);
    }
}
