//! Rotation resolver - pivot rotation with validation
//!
//! A rotation is attempted exactly once at the rotated position. There are no
//! wall kicks and no alternate offsets: a blocked rotation leaves the piece
//! unchanged.

use crate::board::Board;
use crate::collision::{collides, CollisionMode};
use crate::pieces::ActivePiece;

/// Rotate 90° clockwise about the pivot, or return the piece unchanged.
///
/// O pieces never rotate. For every other kind each non-pivot cell maps
/// `(x, y)` to `(pivot.x - dy, pivot.y + dx)` with `dx = x - pivot.x` and
/// `dy = y - pivot.y`, and the orientation advances N → E → S → W → N.
pub fn rotate(piece: &ActivePiece, board: &Board) -> ActivePiece {
    match piece.rotated_cw() {
        Some(candidate) if !collides(candidate.cells(), board, CollisionMode::Rotation) => {
            candidate
        }
        _ => *piece,
    }
}

/// Like [`rotate`], reporting whether the rotation was accepted
pub fn try_rotate(piece: &ActivePiece, board: &Board) -> Option<ActivePiece> {
    let rotated = rotate(piece, board);
    (rotated != *piece).then_some(rotated)
}
