use std::sync::Arc;

use super::*;
use crate::error::{EngineError, IllegalReason};
use crate::search::zobrist::ZobristTable;

fn empty_board(size: usize) -> Board {
    Board::new(size, Arc::new(ZobristTable::new()))
}

fn empty_position(size: usize) -> Position {
    Position::new(size, Arc::new(ZobristTable::new()))
}

#[test]
fn test_stone_opponent() {
    assert_eq!(Stone::Black.opponent(), Stone::White);
    assert_eq!(Stone::White.opponent(), Stone::Black);
}

#[test]
fn test_point_conversion() {
    let p = Point::new(9, 9); // Center of 19x19
    assert_eq!(p.to_index(19), 180);
    assert_eq!(Point::from_index(180, 19), p);

    let q = Point::new(48, 0);
    assert_eq!(Point::from_index(q.to_index(49), 49), q);
}

#[test]
fn test_point_position_space() {
    let p = Point::new(0, 4);
    assert_eq!(p.to_position(), (1, 5));
    assert_eq!(Point::from_position(1, 5), Some(p));
    assert_eq!(Point::from_position(0, 5), None);
}

#[test]
fn test_point_offset_clips_at_edge() {
    let p = Point::new(1, 17);
    assert_eq!(p.offset((1, 0), 3, 19), Some(Point::new(4, 17)));
    assert_eq!(p.offset((0, 1), 2, 19), None);
    assert_eq!(p.offset((-1, 0), 2, 19), None);
}

#[test]
fn test_in_range() {
    assert!(in_range(0, 0, 19));
    assert!(in_range(18, 18, 19));
    assert!(!in_range(19, 0, 19));
    assert!(!in_range(0, -1, 19));
    assert!(in_range(48, 48, 49));
}

#[test]
fn test_center_distance() {
    assert_eq!(Point::new(9, 9).center_distance(19), 0);
    assert_eq!(Point::new(11, 8).center_distance(19), 2);
    assert_eq!(Point::new(0, 0).center_distance(19), 9);
}

#[test]
fn test_point_display() {
    assert_eq!(Point::new(3, 12).to_string(), "(3, 12)");
}

#[test]
fn test_cell_off_board() {
    let board = empty_board(19);
    assert_eq!(board.cell(-1, 3), Cell::OffBoard);
    assert_eq!(board.cell(19, 3), Cell::OffBoard);
    assert_eq!(board.cell(3, 3), Cell::Empty);
    // A point valid for a larger board is off this one
    assert_eq!(board.get(Point::new(30, 30)), Cell::OffBoard);
}

#[test]
fn test_place_and_remove() {
    let mut board = empty_board(19);
    let p = Point::new(4, 7);
    board.place(p, Stone::White).unwrap();

    assert_eq!(board.color_at(p), Cell::Stone(Stone::White));
    assert_eq!(board.stone_count(), 1);
    assert!(board.stones(Stone::White).get(p.to_index(19)));

    assert_eq!(board.remove(p).unwrap(), Stone::White);
    assert!(board.is_board_empty());
    assert_eq!(board.fingerprint(), 0);
}

#[test]
fn test_place_rejects_occupied_and_out_of_range() {
    let mut board = empty_board(19);
    let p = Point::new(9, 9);
    board.place(p, Stone::Black).unwrap();
    let before = board.fingerprint();

    assert_eq!(
        board.place(p, Stone::White),
        Err(EngineError::IllegalMove {
            point: p,
            reason: IllegalReason::Occupied
        })
    );
    assert!(matches!(
        board.place(Point::new(20, 0), Stone::White),
        Err(EngineError::IllegalMove {
            reason: IllegalReason::OutOfRange,
            ..
        })
    ));
    // Failed placements leave the hash alone
    assert_eq!(board.fingerprint(), before);
}

#[test]
fn test_remove_vacant() {
    let mut board = empty_board(19);
    assert!(matches!(
        board.remove(Point::new(2, 2)),
        Err(EngineError::IllegalMove {
            reason: IllegalReason::Vacant,
            ..
        })
    ));
}

#[test]
fn test_points_of_ascending() {
    let mut board = empty_board(35);
    for (x, y) in [(20, 3), (1, 30), (17, 17)] {
        board.place(Point::new(x, y), Stone::Black).unwrap();
    }
    board.place(Point::new(0, 0), Stone::White).unwrap();

    let blacks: Vec<Point> = board.points_of(Stone::Black).collect();
    assert_eq!(
        blacks,
        vec![Point::new(1, 30), Point::new(17, 17), Point::new(20, 3)]
    );
    assert_eq!(board.occupied().count(), 4);
}

#[test]
fn test_board_center() {
    assert_eq!(empty_board(19).center(), Point::new(9, 9));
    assert_eq!(empty_board(35).center(), Point::new(17, 17));
    assert_eq!(empty_board(49).center(), Point::new(24, 24));
}

#[test]
fn test_commit_requires_knight_neighbour() {
    let mut pos = empty_position(19);
    // Anything goes on an empty board
    pos.commit(Move::new(Point::new(9, 9), Stone::Black)).unwrap();

    let err = pos
        .commit(Move::new(Point::new(10, 9), Stone::White))
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::IllegalMove {
            point: Point::new(10, 9),
            reason: IllegalReason::Unreachable
        }
    );

    pos.commit(Move::new(Point::new(11, 10), Stone::White)).unwrap();
    assert_eq!(pos.step(), 2);
}

#[test]
fn test_commit_rejects_unreachable_third_stone() {
    let mut pos = empty_position(19);
    pos.commit(Move::new(Point::new(9, 9), Stone::Black)).unwrap();
    pos.commit(Move::new(Point::new(11, 10), Stone::White)).unwrap();
    let hash = pos.board().fingerprint();

    let err = pos
        .commit(Move::new(Point::new(15, 15), Stone::Black))
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::IllegalMove {
            point: Point::new(15, 15),
            reason: IllegalReason::Unreachable
        }
    );
    assert_eq!(pos.step(), 2);
    assert_eq!(pos.board().fingerprint(), hash);
    assert!(pos.board().is_empty(Point::new(15, 15)));

    pos.commit(Move::new(Point::new(13, 11), Stone::Black)).unwrap();
    assert_eq!(pos.step(), 3);
}

#[test]
fn test_undo_redo() {
    let mut pos = empty_position(19);
    let moves = [
        Move::new(Point::new(9, 9), Stone::Black),
        Move::new(Point::new(11, 10), Stone::White),
        Move::new(Point::new(7, 8), Stone::Black),
    ];
    for mv in moves {
        pos.commit(mv).unwrap();
    }
    let full_hash = pos.board().fingerprint();

    let undone = pos.undo(2).unwrap();
    assert_eq!(undone, vec![moves[2], moves[1]]);
    assert_eq!(pos.step(), 1);
    assert_eq!(pos.redo_len(), 2);

    let redone = pos.redo(2).unwrap();
    assert_eq!(redone, vec![moves[1], moves[2]]);
    assert_eq!(pos.board().fingerprint(), full_hash);
}

#[test]
fn test_undo_underflow() {
    let mut pos = empty_position(19);
    pos.commit(Move::new(Point::new(9, 9), Stone::Black)).unwrap();
    assert_eq!(
        pos.undo(2),
        Err(EngineError::HistoryUnderflow {
            requested: 2,
            available: 1
        })
    );
    // Nothing was removed
    assert_eq!(pos.step(), 1);
}

#[test]
fn test_commit_clears_redo() {
    let mut pos = empty_position(19);
    pos.commit(Move::new(Point::new(9, 9), Stone::Black)).unwrap();
    pos.commit(Move::new(Point::new(11, 10), Stone::White)).unwrap();
    pos.undo(1).unwrap();
    pos.commit(Move::new(Point::new(7, 8), Stone::White)).unwrap();

    assert!(matches!(
        pos.redo(1),
        Err(EngineError::NothingToRedo { available: 0, .. })
    ));
}

#[test]
fn test_trial_stack_unwinds_lifo() {
    let mut pos = empty_position(19);
    pos.commit(Move::new(Point::new(9, 9), Stone::Black)).unwrap();
    let base = pos.board().fingerprint();

    pos.push_trial(Point::new(11, 10), Stone::White).unwrap();
    pos.push_trial(Point::new(13, 11), Stone::Black).unwrap();
    assert_eq!(pos.trial_depth(), 2);

    // Trials obey the same legality as commits
    assert!(pos.push_trial(Point::new(0, 0), Stone::White).is_err());
    assert_eq!(pos.trial_depth(), 2);

    assert_eq!(
        pos.pop_trial(),
        Some(Move::new(Point::new(13, 11), Stone::Black))
    );
    assert_eq!(pos.unwind_trials(), 1);
    assert_eq!(pos.unwind_trials(), 0);
    assert_eq!(pos.board().fingerprint(), base);
    assert_eq!(pos.step(), 1);
}

#[test]
fn test_replay_history() {
    let a = Move::new(Point::new(9, 9), Stone::Black);
    let b = Move::new(Point::new(11, 10), Stone::White);
    let c = Move::new(Point::new(7, 8), Stone::Black);
    let d = Move::new(Point::new(10, 7), Stone::White);
    let history = [
        HistoryEntry::Stone(a),
        HistoryEntry::Stone(b),
        HistoryEntry::Stone(c),
        HistoryEntry::Retraction,
        HistoryEntry::Retraction,
        HistoryEntry::Reretraction,
        HistoryEntry::Outcome(GameOutcome::Abend),
        HistoryEntry::Stone(d),
    ];

    let mut pos = empty_position(19);
    pos.replay(&history).unwrap();
    assert_eq!(pos.committed(), &[a, b]);
    assert_eq!(pos.redo_len(), 1);

    let mut direct = empty_position(19);
    direct.commit(a).unwrap();
    direct.commit(b).unwrap();
    assert_eq!(pos.board(), direct.board());
    assert_eq!(pos.board().fingerprint(), direct.board().fingerprint());
}

#[test]
fn test_replay_resets_previous_state() {
    let mut pos = empty_position(19);
    pos.commit(Move::new(Point::new(3, 3), Stone::Black)).unwrap();
    pos.replay(&[HistoryEntry::Stone(Move::new(Point::new(9, 9), Stone::Black))])
        .unwrap();
    assert_eq!(pos.step(), 1);
    assert_eq!(pos.board().get(Point::new(3, 3)), Cell::Empty);
}
