//! Leaderboard persistence
//!
//! A finished session hands its final score and time to a [`ScoreStore`].
//! Two stores ship with the adapter:
//!
//! - [`JsonFileStore`]: a JSON array in a single file (`TETRIS_SCORES_PATH`)
//! - [`MemoryStore`]: process-local, used when no path is configured and in tests
//!
//! Store failures are returned to the caller; the session never waits on them.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use crate::protocol::current_timestamp_ms;

/// Default number of entries returned by [`ScoreStore::high_scores`]
pub const DEFAULT_HIGH_SCORE_LIMIT: usize = 10;

/// Longest player name kept, in characters
pub const MAX_NAME_CHARS: usize = 20;

/// Name used when the player leaves it blank
pub const ANONYMOUS: &str = "anonymous";

/// Words masked out of player names, compared case-insensitively
const BLOCKED_WORDS: &[&str] = &[
    "arse", "ass", "asshole", "bastard", "bitch", "bollocks", "crap", "cunt", "damn",
    "dick", "fuck", "fucker", "piss", "prick", "shit", "slut", "twat", "wanker", "whore",
];

/// Mask's fill character, one per masked character
const MASK: char = '*';

/// One leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u32,
    /// Seconds of play
    pub time_elapsed: u32,
    pub created_at_ms: u64,
}

impl ScoreRecord {
    /// Build a record stamped with the current time. The name is sanitized.
    pub fn new(name: &str, score: u32, time_elapsed: u32) -> Self {
        Self {
            name: sanitize_name(name),
            score,
            time_elapsed,
            created_at_ms: current_timestamp_ms(),
        }
    }

    /// `mm:ss` rendering of [`ScoreRecord::time_elapsed`]
    pub fn elapsed_display(&self) -> String {
        format_elapsed(self.time_elapsed)
    }
}

/// Trim, default blank names, mask blocked words, cap the length.
///
/// ```
/// use tetris_sim_adapter::scores::sanitize_name;
///
/// assert_eq!(sanitize_name("  ada  "), "ada");
/// assert_eq!(sanitize_name("   "), "anonymous");
/// assert_eq!(sanitize_name("Damn good"), "**** good");
/// ```
pub fn sanitize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return ANONYMOUS.to_string();
    }
    let capped: String = trimmed.chars().take(MAX_NAME_CHARS).collect();
    mask_blocked_words(&capped)
}

/// Replace every blocked word with `*`, keeping separators as they are.
///
/// Words are split on whitespace; surrounding punctuation is ignored when
/// matching, so `"shit!"` is masked too.
pub fn mask_blocked_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();
    for ch in text.chars() {
        if ch.is_whitespace() {
            push_word(&mut out, &word);
            word.clear();
            out.push(ch);
        } else {
            word.push(ch);
        }
    }
    push_word(&mut out, &word);
    out
}

fn push_word(out: &mut String, word: &str) {
    let bare: String = word
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    if BLOCKED_WORDS.contains(&bare.as_str()) {
        out.extend(word.chars().map(|_| MASK));
    } else {
        out.push_str(word);
    }
}

/// Format whole seconds as `mm:ss`. Minutes keep growing past 99.
///
/// ```
/// use tetris_sim_adapter::scores::format_elapsed;
///
/// assert_eq!(format_elapsed(0), "00:00");
/// assert_eq!(format_elapsed(75), "01:15");
/// ```
pub fn format_elapsed(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Order by score descending; earlier entries win ties
fn rank(records: &mut Vec<ScoreRecord>, limit: usize) {
    records.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.created_at_ms.cmp(&b.created_at_ms))
    });
    records.truncate(limit);
}

/// Persistence collaborator for finished sessions
pub trait ScoreStore: Send + Sync {
    fn save(&self, record: &ScoreRecord) -> anyhow::Result<()>;

    /// Best `limit` records, highest score first
    fn high_scores(&self, limit: usize) -> anyhow::Result<Vec<ScoreRecord>>;
}

/// Scores kept as a JSON array on disk
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> anyhow::Result<Vec<ScoreRecord>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).with_context(|| format!("parsing {}", self.path.display()))
    }
}

impl ScoreStore for JsonFileStore {
    fn save(&self, record: &ScoreRecord) -> anyhow::Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow!("score file lock poisoned"))?;
        let mut records = self.load()?;
        records.push(record.clone());
        let json = serde_json::to_string_pretty(&records)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))
    }

    fn high_scores(&self, limit: usize) -> anyhow::Result<Vec<ScoreRecord>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow!("score file lock poisoned"))?;
        let mut records = self.load()?;
        rank(&mut records, limit);
        Ok(records)
    }
}

/// Process-local scores
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ScoreRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScoreStore for MemoryStore {
    fn save(&self, record: &ScoreRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .map_err(|_| anyhow!("score list lock poisoned"))?
            .push(record.clone());
        Ok(())
    }

    fn high_scores(&self, limit: usize) -> anyhow::Result<Vec<ScoreRecord>> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| anyhow!("score list lock poisoned"))?
            .clone();
        rank(&mut records, limit);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, score: u32, created_at_ms: u64) -> ScoreRecord {
        ScoreRecord {
            name: name.to_string(),
            score,
            time_elapsed: 30,
            created_at_ms,
        }
    }

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "tetris-sim-scores-{}-{}-{}.json",
            tag,
            std::process::id(),
            current_timestamp_ms()
        ))
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("bob"), "bob");
        assert_eq!(sanitize_name("\t bob \n"), "bob");
        assert_eq!(sanitize_name(""), ANONYMOUS);
        assert_eq!(sanitize_name("abcdefghijklmnopqrstuvwxyz"), "abcdefghijklmnopqrst");
        // Counted in characters, not bytes
        assert_eq!(sanitize_name(&"é".repeat(25)).chars().count(), MAX_NAME_CHARS);
    }

    #[test]
    fn test_sanitize_name_masks_blocked_words() {
        assert_eq!(sanitize_name("SHIT happens"), "**** happens");
        assert_eq!(sanitize_name("  crap!  "), "*****");
        assert_eq!(mask_blocked_words("oh  damn\tit"), "oh  ****\tit");
        // Only whole words are masked
        assert_eq!(sanitize_name("classic assassin"), "classic assassin");
        assert_eq!(sanitize_name("Scunthorpe"), "Scunthorpe");
    }

    #[test]
    fn test_record_field_names_on_disk() {
        let v = serde_json::to_value(record("ada", 70, 5)).unwrap();
        assert_eq!(v["name"], "ada");
        assert_eq!(v["score"], 70);
        assert_eq!(v["time_elapsed"], 30);
        assert_eq!(v["created_at_ms"], 5);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(59), "00:59");
        assert_eq!(format_elapsed(60), "01:00");
        assert_eq!(format_elapsed(6000), "100:00");
    }

    #[test]
    fn test_record_new_sanitizes() {
        let r = ScoreRecord::new("  ", 120, 65);
        assert_eq!(r.name, ANONYMOUS);
        assert_eq!(r.elapsed_display(), "01:05");
        assert!(r.created_at_ms > 0);
    }

    #[test]
    fn test_memory_store_ranks_and_limits() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        store.save(&record("a", 100, 1)).unwrap();
        store.save(&record("b", 300, 2)).unwrap();
        store.save(&record("c", 300, 3)).unwrap();
        store.save(&record("d", 10, 4)).unwrap();

        let top = store.high_scores(3).unwrap();
        let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_json_file_store_round_trip() {
        let path = temp_path("roundtrip");
        let store = JsonFileStore::new(&path);
        assert!(store.high_scores(10).unwrap().is_empty());

        store.save(&record("low", 50, 1)).unwrap();
        store.save(&record("high", 500, 2)).unwrap();

        let reopened = JsonFileStore::new(&path);
        let top = reopened.high_scores(DEFAULT_HIGH_SCORE_LIMIT).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "high");
        assert_eq!(top[1].score, 50);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_json_file_store_reports_corrupt_file() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(store.high_scores(10).is_err());
        assert!(store.save(&record("x", 1, 1)).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
