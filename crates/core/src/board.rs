//! Board module - board dimensions and the settled cells
//!
//! Landed pieces are kept as separate entries that remember their kind (and so
//! their color). Cells leave the board only through line-clear compaction.
//!
//! A per-row bitmask of occupied columns is maintained next to the pieces so row
//! fullness and occupancy checks do not scan every settled cell.
//! Coordinates: (x, y) where x ranges 0..width (left to right), y grows downward.
//! Negative `y` is legal and means the cell sits above the visible board.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::pieces::ActivePiece;
use crate::types::{Color, PieceKind, Position, SettledCell, BOARD_HEIGHT, BOARD_WIDTH};

/// A merged piece, possibly trimmed by line clears
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledPiece {
    kind: PieceKind,
    cells: ArrayVec<Position, 4>,
}

impl SettledPiece {
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.kind.color()
    }

    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut ArrayVec<Position, 4> {
        &mut self.cells
    }
}

/// Column bit for `x`, `None` outside the trackable range
#[inline(always)]
fn column_bit(x: i8) -> Option<u64> {
    if (0..64).contains(&x) {
        Some(1u64 << x)
    } else {
        None
    }
}

/// The game board - fixed dimensions plus the settled cells
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: u8,
    height: u8,
    pieces: Vec<SettledPiece>,
    /// Occupied columns per row
    rows: BTreeMap<i8, u64>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            pieces: Vec::new(),
            rows: BTreeMap::new(),
        }
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Check if position is within the visible board
    pub fn is_out_of_bounds(&self, pos: Position) -> bool {
        pos.x < 0 || pos.x >= self.width as i8 || pos.y < 0 || pos.y >= self.height as i8
    }

    /// True iff a settled cell sits at `pos`
    pub fn occupied(&self, pos: Position) -> bool {
        match column_bit(pos.x) {
            Some(bit) => self.rows.get(&pos.y).is_some_and(|mask| mask & bit != 0),
            None => self.iter_cells().any(|(c, _)| c == pos),
        }
    }

    /// Merge the active piece into the settled cells.
    ///
    /// No bounds validation: cells above the board are kept as-is, that is the
    /// game-over signal.
    ///
    /// # Panics
    ///
    /// Panics if any cell is already settled.
    pub fn merge_piece(&mut self, piece: &ActivePiece) {
        self.settle(piece.kind(), piece.cells());
    }

    /// Add up to four cells of `kind` as one settled entry.
    ///
    /// # Panics
    ///
    /// Panics on an empty or oversized cell list, or if any cell is already settled.
    pub fn settle(&mut self, kind: PieceKind, cells: &[Position]) {
        assert!(
            (1..=4).contains(&cells.len()),
            "settled entry must hold 1..=4 cells, got {}",
            cells.len()
        );
        for (i, &pos) in cells.iter().enumerate() {
            assert!(
                !self.occupied(pos) && !cells[..i].contains(&pos),
                "settled cell collision at ({}, {})",
                pos.x,
                pos.y
            );
        }

        let mut stored = ArrayVec::new();
        for &pos in cells {
            stored.push(pos);
            self.mark(pos);
        }
        self.pieces.push(SettledPiece {
            kind,
            cells: stored,
        });
    }

    fn mark(&mut self, pos: Position) {
        if let Some(bit) = column_bit(pos.x) {
            *self.rows.entry(pos.y).or_insert(0) |= bit;
        }
    }

    /// Read-only snapshot of every settled cell with its color
    pub fn cells(&self) -> Vec<SettledCell> {
        self.iter_cells()
            .map(|(pos, color)| SettledCell { pos, color })
            .collect()
    }

    /// Iterate settled cells with their color
    pub fn iter_cells(&self) -> impl Iterator<Item = (Position, Color)> + '_ {
        self.pieces
            .iter()
            .flat_map(|p| p.cells.iter().map(move |&c| (c, p.color())))
    }

    /// Settled entries in merge order
    pub fn pieces(&self) -> &[SettledPiece] {
        &self.pieces
    }

    pub(crate) fn pieces_mut(&mut self) -> &mut Vec<SettledPiece> {
        &mut self.pieces
    }

    /// Rebuild the row index after the pieces were edited in place
    pub(crate) fn reindex(&mut self) {
        self.rows.clear();
        let positions: Vec<Position> = self.iter_cells().map(|(c, _)| c).collect();
        for pos in positions {
            self.mark(pos);
        }
    }

    /// Number of settled cells
    pub fn len(&self) -> usize {
        self.pieces.iter().map(|p| p.cells.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Number of distinct occupied columns inside `[0, width)` on row `y`
    pub fn row_count(&self, y: i8) -> u32 {
        let in_board = if self.width >= 64 {
            u64::MAX
        } else {
            (1u64 << self.width) - 1
        };
        self.rows
            .get(&y)
            .map_or(0, |mask| (mask & in_board).count_ones())
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: i8) -> bool {
        self.row_count(y) == self.width as u32
    }

    /// Indices of every full row, top to bottom
    pub fn full_rows(&self) -> Vec<i8> {
        self.rows
            .keys()
            .copied()
            .filter(|&y| self.is_row_full(y))
            .collect()
    }

    /// True iff any settled cell lies above the visible board
    pub fn has_cells_above_top(&self) -> bool {
        self.iter_cells().any(|(c, _)| c.y < 0)
    }

    /// Remove all settled cells
    pub fn clear(&mut self) {
        self.pieces.clear();
        self.rows.clear();
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}
