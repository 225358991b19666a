//! Pieces module - the piece catalog and the active piece
//!
//! Every kind has one canonical spawn shape expressed in absolute board
//! coordinates. Pieces enter centered on columns 4-5 with all cells above the
//! visible board (negative `y`), so they become visible after the first few
//! gravity ticks.
//!
//! All kinds except O carry exactly one pivot cell. Rotation turns the other
//! three cells 90° clockwise about it; see [`crate::rotation`].

use crate::types::{Color, Orientation, PieceKind, Position};

/// Four absolute cell positions
pub type PieceShape = [Position; 4];

const fn p(x: i8, y: i8) -> Position {
    Position::new(x, y)
}

/// Canonical spawn cells for a piece kind
pub fn spawn_shape(kind: PieceKind) -> PieceShape {
    match kind {
        // Vertical bar, lowest cell one row above the board
        PieceKind::I => [p(4, -1), p(4, -2), p(4, -3), p(4, -4)],
        PieceKind::O => [p(4, -1), p(4, -2), p(5, -1), p(5, -2)],
        PieceKind::T => [p(4, -2), p(5, -3), p(5, -2), p(5, -1)],
        PieceKind::S => [p(4, -3), p(4, -2), p(5, -2), p(5, -1)],
        PieceKind::Z => [p(5, -3), p(5, -2), p(4, -2), p(4, -1)],
        PieceKind::J => [p(4, -1), p(4, -2), p(4, -3), p(5, -3)],
        PieceKind::L => [p(5, -1), p(5, -2), p(5, -3), p(4, -3)],
    }
}

/// Index of the pivot cell within the shape, `None` for O
pub fn pivot_index(kind: PieceKind) -> Option<usize> {
    match kind {
        PieceKind::O => None,
        PieceKind::T => Some(2),
        PieceKind::I | PieceKind::S | PieceKind::Z | PieceKind::J | PieceKind::L => Some(1),
    }
}

/// Four distinct cells, and a pivot inside the shape for every kind but O
pub fn catalog_entry_is_valid(kind: PieceKind) -> bool {
    let shape = spawn_shape(kind);
    let distinct = (0..4).all(|i| ((i + 1)..4).all(|j| shape[i] != shape[j]));
    let pivot_ok = match pivot_index(kind) {
        None => kind == PieceKind::O,
        Some(idx) => kind != PieceKind::O && idx < shape.len(),
    };
    distinct && pivot_ok
}

/// The single falling piece
///
/// Always exactly four cells; the pivot (if any) sits at a fixed index per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    kind: PieceKind,
    orientation: Orientation,
    cells: PieceShape,
}

impl ActivePiece {
    /// Fresh copy of the catalog definition for `kind`
    pub fn spawn(kind: PieceKind) -> Self {
        debug_assert!(
            catalog_entry_is_valid(kind),
            "malformed catalog entry for {:?}",
            kind
        );
        Self {
            kind,
            orientation: Orientation::North,
            cells: spawn_shape(kind),
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.kind.color()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn cells(&self) -> &PieceShape {
        &self.cells
    }

    pub fn pivot(&self) -> Option<Position> {
        pivot_index(self.kind).map(|idx| self.cells[idx])
    }

    /// Whether the cell at `idx` is the pivot
    pub fn is_pivot(&self, idx: usize) -> bool {
        pivot_index(self.kind) == Some(idx)
    }

    /// Copy translated by (dx, dy)
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            cells: self.cells.map(|c| c.offset(dx, dy)),
            ..*self
        }
    }

    /// Candidate turned 90° clockwise about the pivot, unvalidated.
    ///
    /// Returns `None` for kinds without a pivot (O).
    pub fn rotated_cw(&self) -> Option<Self> {
        let pivot = self.pivot()?;
        let cells = self.cells.map(|c| {
            let dx = c.x - pivot.x;
            let dy = c.y - pivot.y;
            Position::new(pivot.x - dy, pivot.y + dx)
        });
        Some(Self {
            kind: self.kind,
            orientation: self.orientation.rotate_cw(),
            cells,
        })
    }

    /// Largest `y` among the cells (the bottom edge)
    pub fn lowest_y(&self) -> i8 {
        self.cells.iter().map(|c| c.y).max().unwrap_or(0)
    }
}
