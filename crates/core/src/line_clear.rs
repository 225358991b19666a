//! Line clear engine - full-row detection, removal, compaction and scoring
//!
//! A row is full when the number of distinct occupied columns on it equals the
//! board width. All full rows are collected first, then removed in one pass.
//! Every surviving cell moves down by the number of cleared rows below it
//! (larger `y`), so the order rows are scanned in does not affect the result.
//!
//! Scoring is flat: 100 points per cleared row plus a 10 point bonus for every
//! merged piece, with or without a clear.

use crate::board::Board;
use crate::types::{LINE_CLEAR_POINTS, MERGE_BONUS};

/// Outcome of a sweep
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SweepResult {
    /// Cleared row indices, top to bottom
    pub rows: Vec<i8>,
}

impl SweepResult {
    pub fn lines_cleared(&self) -> u32 {
        self.rows.len() as u32
    }
}

/// Remove every full row and compact the survivors downward
pub fn sweep(board: &mut Board) -> SweepResult {
    let rows = board.full_rows();
    if rows.is_empty() {
        return SweepResult::default();
    }

    for piece in board.pieces_mut().iter_mut() {
        let cells = piece.cells_mut();
        cells.retain(|c| !rows.contains(&c.y));
        for c in cells.iter_mut() {
            let below = rows.iter().filter(|&&r| r > c.y).count() as i8;
            c.y += below;
        }
    }
    board.pieces_mut().retain(|p| !p.cells().is_empty());
    board.reindex();

    SweepResult { rows }
}

/// Points awarded for one merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Flat bonus for the merge itself
    pub merge_bonus: u32,
    /// Points for cleared rows
    pub line_clear_score: u32,
    pub total: u32,
}

/// Calculate points for a merge that cleared `lines` rows
pub fn calculate_score(lines: u32) -> ScoreResult {
    let line_clear_score = lines.saturating_mul(LINE_CLEAR_POINTS);
    ScoreResult {
        merge_bonus: MERGE_BONUS,
        line_clear_score,
        total: MERGE_BONUS + line_clear_score,
    }
}
