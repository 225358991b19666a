//! Collision detection - walls, floor, settled cells
//!
//! One pure predicate, three policies. Every check takes the *candidate* shape
//! (already moved or rotated) and reports whether it is blocked.
//!
//! The landing policy treats `board_height - 1` as the floor, so a piece comes to
//! rest with its lowest cell on row `board_height - 2`. The bottom row is never
//! reached by gravity.

use crate::board::Board;
use crate::pieces::{ActivePiece, PieceShape};

/// Which movement the candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionMode {
    /// Shape moved down one row by gravity or `MoveDown`
    Gravity,
    /// Shape shifted one column left or right
    Horizontal,
    /// Shape rotated about its pivot
    Rotation,
}

/// Test a candidate shape against the board bounds and settled cells
pub fn collides(candidate: &PieceShape, board: &Board, mode: CollisionMode) -> bool {
    let width = board.width() as i8;
    let height = board.height() as i8;

    candidate.iter().any(|&c| {
        let out_of_bounds = match mode {
            CollisionMode::Gravity => c.y >= height - 1,
            CollisionMode::Horizontal => c.x < 0 || c.x >= width,
            CollisionMode::Rotation => c.x < 0 || c.x >= width || c.y >= height,
        };
        out_of_bounds || board.occupied(c)
    })
}

/// Would one more gravity step land the piece?
#[inline]
pub fn is_landing(piece: &ActivePiece, board: &Board) -> bool {
    collides(piece.shifted(0, 1).cells(), board, CollisionMode::Gravity)
}

/// Can the piece shift `dx` columns?
#[inline]
pub fn can_shift(piece: &ActivePiece, dx: i8, board: &Board) -> bool {
    !collides(piece.shifted(dx, 0).cells(), board, CollisionMode::Horizontal)
}
