//! Session integration tests - gravity, landing, scoring, game over

use std::collections::HashSet;

use tetris_sim::core::{Session, SimpleRng, StepOutcome};
use tetris_sim::types::{Command, PieceKind, Phase, Position, SessionConfig};

/// A seed whose first spawn is `kind`
fn seed_for(kind: PieceKind) -> u32 {
    (1..10_000)
        .find(|&seed| Session::new(seed).next_kind() == kind)
        .expect("some seed spawns every kind")
}

fn assert_cells_distinct(session: &Session) {
    let cells: Vec<Position> = session.board().iter_cells().map(|(c, _)| c).collect();
    let unique: HashSet<Position> = cells.iter().copied().collect();
    assert_eq!(cells.len(), unique.len(), "duplicate settled cell");
}

#[test]
fn test_i_piece_lands_after_24_ticks() {
    let mut session = Session::new(seed_for(PieceKind::I));
    assert!(session.start());
    let spawned = session.active().unwrap();
    assert_eq!(spawned.kind(), PieceKind::I);
    assert!(spawned.cells().iter().all(|c| c.x == 4));

    let mut merged_at = None;
    for tick in 1..=24 {
        if let StepOutcome::Merged { .. } = session.gravity_step() {
            merged_at = Some(tick);
        }
    }

    // 19 moves bring the lowest cell to row 18, the 20th tick merges
    assert_eq!(merged_at, Some(20));
    let mut settled: Vec<Position> = session.board().iter_cells().map(|(c, _)| c).collect();
    settled.sort();
    assert_eq!(
        settled,
        vec![
            Position::new(4, 15),
            Position::new(4, 16),
            Position::new(4, 17),
            Position::new(4, 18)
        ]
    );
    assert_eq!(session.score(), 10);

    // The next piece has fallen four rows since it spawned
    let next = session.active().unwrap();
    let fresh = tetris_sim::core::ActivePiece::spawn(next.kind());
    assert_eq!(next, fresh.shifted(0, 4));
    assert_eq!(session.phase(), Phase::Running);
}

#[test]
fn test_piece_on_row_height_minus_two_lands() {
    let mut session = Session::new(seed_for(PieceKind::O));
    session.start();
    for _ in 0..18 {
        assert_eq!(session.gravity_step(), StepOutcome::Moved);
    }
    assert_eq!(session.active().unwrap().lowest_y(), 17);
    assert_eq!(session.gravity_step(), StepOutcome::Moved);
    assert_eq!(session.active().unwrap().lowest_y(), 18);
    assert!(matches!(session.gravity_step(), StepOutcome::Merged { .. }));
}

#[test]
fn test_horizontal_moves_stop_at_walls() {
    let mut session = Session::new(seed_for(PieceKind::I));
    session.start();
    let mut moves = 0;
    while session.apply_command(Command::MoveLeft) {
        moves += 1;
    }
    assert_eq!(moves, 4);
    assert_eq!(session.active().unwrap().cells()[0].x, 0);

    let mut moves = 0;
    while session.apply_command(Command::MoveRight) {
        moves += 1;
    }
    assert_eq!(moves, 9);
}

#[test]
fn test_stacking_in_one_column_ends_the_game() {
    let mut session = Session::new(99);
    session.start();

    let mut steps = 0;
    while session.phase() == Phase::Running {
        session.apply_command(Command::MoveDown);
        steps += 1;
        assert!(steps < 10_000, "game never ended");
    }

    assert_eq!(session.phase(), Phase::GameOver);
    assert!(session.active().is_none());
    assert!(session.board().has_cells_above_top());
    let record = session.game_over_record().unwrap();
    assert_eq!(record.score, session.pieces_merged() * 10);

    // Frozen until reset
    let board_len = session.board().len();
    assert_eq!(session.gravity_step(), StepOutcome::Ignored);
    assert!(!session.apply_command(Command::MoveLeft));
    assert!(!session.start());
    assert_eq!(session.board().len(), board_len);

    session.reset();
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.start());
}

#[test]
fn test_random_play_keeps_settled_cells_distinct() {
    for seed in [1u32, 7, 42, 2024] {
        let mut session = Session::new(seed);
        session.start();
        let mut rng = SimpleRng::new(seed ^ 0x5eed);

        for _ in 0..5_000 {
            if session.phase() != Phase::Running {
                break;
            }
            match rng.next_range(5) {
                0 => session.apply_command(Command::MoveLeft),
                1 => session.apply_command(Command::MoveRight),
                2 => session.apply_command(Command::Rotate),
                3 => session.apply_command(Command::MoveDown),
                _ => session.gravity_step() != StepOutcome::Ignored,
            };
            assert_cells_distinct(&session);
            if let Some(active) = session.active() {
                for c in active.cells() {
                    assert!(!session.board().occupied(*c), "active overlaps settled");
                    assert!(c.x >= 0 && c.x < 10);
                }
            }
        }
    }
}

#[test]
fn test_same_seed_same_game() {
    let run = |seed: u32| {
        let mut session = Session::new(seed);
        session.start();
        for i in 0..400u32 {
            if i % 3 == 0 {
                session.apply_command(Command::Rotate);
            }
            if i % 5 == 0 {
                session.apply_command(Command::MoveLeft);
            }
            session.gravity_step();
        }
        session.snapshot()
    };
    assert_eq!(run(31337), run(31337));
}

#[test]
fn test_custom_board_dimensions() {
    let config = SessionConfig {
        board_width: 6,
        board_height: 8,
        ..SessionConfig::default()
    };
    let mut session = Session::with_config(config, seed_for(PieceKind::O)).unwrap();
    session.start();

    let mut ticks = 0;
    while !matches!(session.gravity_step(), StepOutcome::Merged { .. }) {
        ticks += 1;
        assert!(ticks < 50);
    }
    // Lowest cell rests on row height - 2
    assert!(session.board().occupied(Position::new(4, 6)));
    assert!(session.board().occupied(Position::new(5, 6)));
}
