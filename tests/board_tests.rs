//! Board tests - settled cells, row index, bounds

use tetris_sim::core::{ActivePiece, Board};
use tetris_sim::types::{Color, PieceKind, Position, BOARD_HEIGHT, BOARD_WIDTH};

fn p(x: i8, y: i8) -> Position {
    Position::new(x, y)
}

#[test]
fn test_board_new_empty() {
    let board = Board::default();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);
    assert!(board.is_empty());
    assert_eq!(board.len(), 0);

    for y in 0..BOARD_HEIGHT as i8 {
        assert_eq!(board.row_count(y), 0);
        for x in 0..BOARD_WIDTH as i8 {
            assert!(!board.occupied(p(x, y)), "Cell ({}, {}) should be free", x, y);
        }
    }
}

#[test]
fn test_board_bounds() {
    let board = Board::new(10, 20);
    assert!(board.is_out_of_bounds(p(-1, 0)));
    assert!(board.is_out_of_bounds(p(10, 0)));
    assert!(board.is_out_of_bounds(p(0, 20)));
    assert!(!board.is_out_of_bounds(p(9, 19)));
}

#[test]
fn test_merge_piece_keeps_kind_and_color() {
    let mut board = Board::default();
    let piece = ActivePiece::spawn(PieceKind::L).shifted(0, 10);
    board.merge_piece(&piece);

    assert_eq!(board.len(), 4);
    assert_eq!(board.pieces().len(), 1);
    assert_eq!(board.pieces()[0].kind(), PieceKind::L);
    for c in piece.cells() {
        assert!(board.occupied(*c));
    }
    assert!(board.cells().iter().all(|c| c.color == Color::Orange));
}

#[test]
fn test_cells_above_top_are_tracked() {
    let mut board = Board::default();
    board.merge_piece(&ActivePiece::spawn(PieceKind::I).shifted(0, 2));
    // Cells at y = 1, 0, -1, -2
    assert!(board.has_cells_above_top());
    assert!(board.occupied(p(4, -2)));
    assert_eq!(board.row_count(-1), 1);
}

#[test]
fn test_full_rows_top_to_bottom() {
    let mut board = Board::new(8, 12);
    for y in [9i8, 4, 11] {
        board.settle(PieceKind::I, &[p(0, y), p(1, y), p(2, y), p(3, y)]);
        board.settle(PieceKind::I, &[p(4, y), p(5, y), p(6, y), p(7, y)]);
    }
    board.settle(PieceKind::O, &[p(0, 10)]);

    assert_eq!(board.full_rows(), vec![4, 9, 11]);
    assert!(!board.is_row_full(10));
    assert_eq!(board.row_count(10), 1);
}

#[test]
fn test_clear_empties_board() {
    let mut board = Board::default();
    board.merge_piece(&ActivePiece::spawn(PieceKind::T).shifted(0, 5));
    board.clear();
    assert!(board.is_empty());
    assert!(board.full_rows().is_empty());
    assert!(!board.occupied(p(5, 3)));
}

#[test]
#[should_panic(expected = "settled cell collision at (4, 5)")]
fn test_duplicate_settled_cell_fails_fast() {
    let mut board = Board::default();
    board.settle(PieceKind::O, &[p(4, 5)]);
    board.settle(PieceKind::T, &[p(3, 5), p(4, 5)]);
}
