//! Integration tests for randgo
//!
//! These drive the public API end to end: board setup from layouts, move
//! execution with captures, scoring, playouts, the parallel search, and a
//! GTP session over in-memory buffers.

use std::io::Cursor;
use std::time::Duration;

use pretty_assertions::assert_eq;

use randgo::board::{Board, BoardKind, Color, Goban};
use randgo::group::{count_liberties, is_suicide, move_list};
use randgo::gtp::Session;
use randgo::mcts::{SearchConfig, get_best_move};
use randgo::playout::play_random_game;
use randgo::position::GameState;
use randgo::score::{estimate_points, winner};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

const KINDS: [BoardKind; 2] = [BoardKind::Rows, BoardKind::Flat];

/// Build a position from a layout for each board representation.
fn states(rows: usize, cols: usize, layout: &str) -> Vec<GameState> {
    KINDS
        .iter()
        .map(|&kind| GameState::from_layout(kind, rows, cols, 0.0, layout).unwrap())
        .collect()
}

fn quick_search() -> SearchConfig {
    SearchConfig::default()
        .with_time_budget(Duration::from_millis(300))
        .with_workers(2)
}

/// Run a GTP script and return everything the session wrote.
fn gtp(script: &str) -> String {
    let config = SearchConfig::default()
        .with_time_budget(Duration::from_millis(100))
        .with_workers(2);
    let mut session = Session::new(GameState::default(), config);
    let mut out = Vec::new();
    session.run(Cursor::new(script), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

/// Count empty points adjacent to any stone of the group, by brute force.
fn brute_force_liberties(board: &Board, start: (usize, usize)) -> usize {
    let color = board.color(start);
    let mut group = vec![start];
    let mut i = 0;
    while i < group.len() {
        let (r, c) = group[i];
        i += 1;
        for (dr, dc) in [(0isize, 1isize), (0, -1), (1, 0), (-1, 0)] {
            let (Some(nr), Some(nc)) = (r.checked_add_signed(dr), c.checked_add_signed(dc)) else {
                continue;
            };
            if board.contains((nr, nc))
                && board.color((nr, nc)) == color
                && !group.contains(&(nr, nc))
            {
                group.push((nr, nc));
            }
        }
    }
    let mut liberties = Vec::new();
    for &(r, c) in &group {
        for (dr, dc) in [(0isize, 1isize), (0, -1), (1, 0), (-1, 0)] {
            let (Some(nr), Some(nc)) = (r.checked_add_signed(dr), c.checked_add_signed(dc)) else {
                continue;
            };
            if board.contains((nr, nc))
                && board.color((nr, nc)) == Color::Empty
                && !liberties.contains(&(nr, nc))
            {
                liberties.push((nr, nc));
            }
        }
    }
    liberties.len()
}

// =============================================================================
// Rules engine
// =============================================================================

#[test]
fn test_capture_scenario() {
    for mut state in states(3, 4, "xxox / xo.x / .xx.") {
        state.play((1, 2), Color::Black);
        assert_eq!(state.board().layout(), "xx.xx.xx.xx.");
        assert_eq!(state.captured_white(), 2);
        assert_eq!(state.captured_black(), 0);
    }
}

#[test]
fn test_liberties_match_brute_force_after_random_games() {
    let mut rng = fastrand::Rng::with_seed(2024);
    for kind in KINDS {
        for _ in 0..5 {
            let mut state = GameState::new(kind, 6, 6).unwrap();
            let mut color = Color::Black;
            for _ in 0..20 {
                let moves = move_list(state.board_mut(), color);
                if let Some(&p) = moves.get(rng.usize(..moves.len().max(1))) {
                    state.play(p, color);
                }
                color = color.opposite();
            }
            let snapshot = state.board().clone();
            for row in 0..6 {
                for col in 0..6 {
                    if snapshot.color((row, col)) == Color::Empty {
                        continue;
                    }
                    assert_eq!(
                        count_liberties(state.board_mut(), (row, col)),
                        brute_force_liberties(&snapshot, (row, col)),
                        "group at ({row}, {col}) in\n{snapshot}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_suicide_leaves_board_unchanged() {
    for mut state in states(3, 9, ".x..x.xxx / x.xxx.xoo / .xo.x.xo.") {
        let before = state.board().layout();
        for row in 0..3 {
            for col in 0..9 {
                if state.board().color((row, col)) != Color::Empty {
                    continue;
                }
                for color in [Color::Black, Color::White] {
                    is_suicide(state.board_mut(), (row, col), color);
                    assert_eq!(state.board().layout(), before);
                }
            }
        }
    }
}

#[test]
fn test_clone_round_trip() {
    let original =
        GameState::from_layout(BoardKind::Flat, 3, 4, 6.5, "xxox / xo.x / .xx.").unwrap();
    let mut copy = original.clone();
    copy.play((1, 2), Color::Black);
    copy.clear_board();
    assert_eq!(original.board().layout(), "xxoxxo.x.xx.");
    assert_eq!(original.captured_white(), 0);
    assert_eq!(original.captured_black(), 0);
}

// =============================================================================
// Scoring and playouts
// =============================================================================

#[test]
fn test_estimate_points_example() {
    for state in states(3, 4, ".o.x / ooxx / xxx.") {
        assert_eq!(estimate_points(state.board()), (7, 4));
    }
}

#[test]
fn test_playout_scores_cover_the_board() {
    let mut rng = fastrand::Rng::with_seed(8);
    for kind in KINDS {
        let mut state = GameState::new(kind, 9, 9).unwrap();
        play_random_game(&mut state, Color::Black, &mut rng);
        let (black, white) = estimate_points(state.board());
        let unresolved = (0..9)
            .flat_map(|r| (0..9).map(move |c| (r, c)))
            .filter(|&p| state.board().color(p) == Color::Empty)
            .filter(|&p| randgo::eye::single_point_eye(state.board(), p).is_none())
            .count();
        assert_eq!(black + white + unresolved, 81);
        let w = winner(&state);
        assert!(w == Color::Black || w == Color::White);
    }
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_search_single_legal_move() {
    for state in states(1, 4, "xo.o") {
        let outcome = get_best_move(&state, Color::Black, &quick_search());
        assert_eq!(outcome.best, Some((0, 2)));
        assert!(outcome.stats[0].trials > 0);
    }
}

#[test]
fn test_search_respects_time_budget() {
    let state = GameState::new(BoardKind::Flat, 9, 9).unwrap();
    let started = std::time::Instant::now();
    let outcome = get_best_move(&state, Color::White, &quick_search());
    let elapsed = started.elapsed();
    assert!(outcome.playouts > 0);
    assert!(outcome.best.is_some());
    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed < Duration::from_secs(5), "search took {elapsed:?}");
}

#[test]
fn test_gen_move_applies_the_move() {
    let mut state = GameState::from_layout(BoardKind::Rows, 1, 4, 0.0, "xo.o").unwrap();
    assert_eq!(state.gen_move(Color::Black, &quick_search()), Some((0, 2)));
    assert_eq!(state.board().layout(), "x.x.");
    assert_eq!(state.captured_white(), 2);
    // (0,3) would be suicide; filling (0,1) captures the corner stone.
    assert_eq!(state.gen_move(Color::White, &quick_search()), Some((0, 1)));
    assert_eq!(state.board().layout(), ".ox.");
    assert_eq!(state.captured_black(), 1);
}

// =============================================================================
// GTP session
// =============================================================================

#[test]
fn test_gtp_framing() {
    let out = gtp("name\nprotocol_version\nfoo\nquit\nname\n");
    assert_eq!(out, "= randgo\n\n= 2\n\n?\n\n= \n\n");
}

#[test]
fn test_gtp_list_commands() {
    let out = gtp("list_commands\n");
    for cmd in ["boardsize", "clear_board", "genmove", "komi", "play", "quit"] {
        assert!(out.contains(cmd), "{cmd} missing from {out:?}");
    }
    assert!(out.starts_with("= "));
    assert!(out.ends_with("\n\n"));
}

#[test]
fn test_gtp_game() {
    let out = gtp(
        "# small game\n\
         boardsize 5\n\
         komi 0.5\n\
         play black C3\n\
         play white C3\n\
         play white Z9\n\
         genmove white\n\
         clear_board\n",
    );
    let replies: Vec<&str> = out.split("\n\n").filter(|r| !r.is_empty()).collect();
    assert_eq!(replies.len(), 7);
    assert_eq!(&replies[..3], &["= ", "= ", "= "]);
    assert!(replies[3].starts_with("? "), "occupied point accepted: {}", replies[3]);
    assert!(replies[4].starts_with("? "), "off-board point accepted: {}", replies[4]);
    assert!(replies[5].starts_with("= "));
    assert_ne!(replies[5], "= pass");
    assert_eq!(replies[6], "= ");
}
