//! Monte Carlo playouts (random game simulation).
//!
//! A playout plays uniformly random candidate moves for both sides until
//! neither side has a candidate left or the move cap is reached. The final
//! position is only meant to be scored with [`crate::score::winner`]; it is
//! not a rule-exact finished game.

use crate::board::{Color, Goban, Point};
use crate::constants::MAX_GAME_LEN_FACTOR;
use crate::group::{move_list, valid_moves};
use crate::position::GameState;

/// Pick a candidate move for `color` uniformly at random.
///
/// Returns `None` when `color` has no candidate, i.e. it should pass.
pub fn random_move<G: Goban + ?Sized>(
    g: &mut G,
    color: Color,
    rng: &mut fastrand::Rng,
) -> Option<Point> {
    let moves = move_list(g, color);
    if moves.is_empty() {
        return None;
    }
    Some(moves[rng.usize(..moves.len())])
}

fn has_move<G: Goban + ?Sized>(g: &mut G, color: Color) -> bool {
    let mut found = false;
    valid_moves(g, color, |_| found = true);
    found
}

/// Play random moves from `state`, starting with `color`, until both sides
/// run out of candidates or `3 * area` iterations have elapsed.
///
/// Returns the number of stones placed.
pub fn play_random_game(state: &mut GameState, mut color: Color, rng: &mut fastrand::Rng) -> usize {
    let limit = state.board().area() * MAX_GAME_LEN_FACTOR;
    let mut moves = Vec::with_capacity(state.board().area());
    let mut played = 0;

    for _ in 0..limit {
        moves.clear();
        valid_moves(state.board_mut(), color, |p| moves.push(p));
        if moves.is_empty() {
            if !has_move(state.board_mut(), color.opposite()) {
                break;
            }
            // Pass.
            color = color.opposite();
            continue;
        }
        let p = moves[rng.usize(..moves.len())];
        state.play(p, color);
        played += 1;
        color = color.opposite();
    }
    played
}
