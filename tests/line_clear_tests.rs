//! Line clear and scoring tests

use tetris_sim::core::{calculate_score, sweep, Board};
use tetris_sim::types::{PieceKind, Position};

fn p(x: i8, y: i8) -> Position {
    Position::new(x, y)
}

/// Fill row `y` of a 10-wide board with three settled entries
fn fill_row(board: &mut Board, y: i8) {
    board.settle(PieceKind::I, &[p(0, y), p(1, y), p(2, y), p(3, y)]);
    board.settle(PieceKind::I, &[p(4, y), p(5, y), p(6, y), p(7, y)]);
    board.settle(PieceKind::O, &[p(8, y), p(9, y)]);
}

fn positions(board: &Board) -> Vec<Position> {
    let mut v: Vec<Position> = board.iter_cells().map(|(c, _)| c).collect();
    v.sort();
    v
}

#[test]
fn test_single_full_row_removes_width_cells() {
    let mut board = Board::default();
    fill_row(&mut board, 18);
    board.settle(PieceKind::T, &[p(3, 17), p(4, 16)]);
    let before = board.len();

    let result = sweep(&mut board);
    assert_eq!(result.lines_cleared(), 1);
    assert_eq!(result.rows, vec![18]);
    assert_eq!(board.len(), before - 10);
    // Survivors above the cleared row drop by one
    assert_eq!(positions(&board), vec![p(3, 18), p(4, 17)]);
}

#[test]
fn test_rows_below_a_cell_do_not_move_it() {
    let mut board = Board::default();
    board.settle(PieceKind::J, &[p(0, 19)]);
    fill_row(&mut board, 15);
    board.settle(PieceKind::S, &[p(2, 14)]);

    sweep(&mut board);
    // (0, 19) is below the cleared row and stays put
    assert_eq!(positions(&board), vec![p(0, 19), p(2, 15)]);
}

#[test]
fn test_non_adjacent_rows_shift_by_count_above() {
    let mut board = Board::default();
    fill_row(&mut board, 10);
    fill_row(&mut board, 14);
    board.settle(PieceKind::Z, &[p(1, 9)]);
    board.settle(PieceKind::Z, &[p(1, 12)]);
    board.settle(PieceKind::Z, &[p(1, 16)]);

    let result = sweep(&mut board);
    assert_eq!(result.lines_cleared(), 2);
    assert_eq!(positions(&board), vec![p(1, 11), p(1, 13), p(1, 16)]);
}

#[test]
fn test_cleared_pieces_are_pruned() {
    let mut board = Board::default();
    fill_row(&mut board, 19);
    assert_eq!(board.pieces().len(), 3);
    sweep(&mut board);
    assert!(board.is_empty());
    assert_eq!(board.pieces().len(), 0);
}

#[test]
fn test_partial_row_is_untouched() {
    let mut board = Board::default();
    board.settle(PieceKind::I, &[p(0, 19), p(1, 19), p(2, 19), p(3, 19)]);
    board.settle(PieceKind::I, &[p(4, 19), p(5, 19), p(6, 19), p(7, 19)]);
    board.settle(PieceKind::O, &[p(8, 19)]);

    let result = sweep(&mut board);
    assert_eq!(result.lines_cleared(), 0);
    assert_eq!(board.len(), 9);
}

#[test]
fn test_narrow_board_fullness() {
    let mut board = Board::new(6, 10);
    board.settle(PieceKind::I, &[p(0, 5), p(1, 5), p(2, 5), p(3, 5)]);
    board.settle(PieceKind::O, &[p(4, 5)]);
    assert!(!board.is_row_full(5));
    board.settle(PieceKind::O, &[p(5, 5)]);
    assert!(board.is_row_full(5));
}

#[test]
fn test_score_table() {
    assert_eq!(calculate_score(0).total, 10);
    assert_eq!(calculate_score(1).total, 110);
    assert_eq!(calculate_score(2).total, 210);
    assert_eq!(calculate_score(4).line_clear_score, 400);
    assert_eq!(calculate_score(4).merge_bonus, 10);
}
