//! Area scoring estimate.
//!
//! Stones count for their owner and single-point eyes count for the
//! surrounding color. Any other empty point is left unscored, which is
//! accurate enough once a playout has filled the board.

use crate::board::{Color, Goban};
use crate::eye::single_point_eye;
use crate::position::GameState;

/// Return `(black, white)` point estimates for `g`.
pub fn estimate_points<G: Goban + ?Sized>(g: &G) -> (usize, usize) {
    let mut points = [0usize; 3];
    for row in 0..g.rows() {
        for col in 0..g.cols() {
            let p = (row, col);
            match g.color(p) {
                Color::Empty => {
                    if let Some(owner) = single_point_eye(g, p) {
                        points[owner as usize] += 1;
                    }
                }
                stone => points[stone as usize] += 1,
            }
        }
    }
    (points[Color::Black as usize], points[Color::White as usize])
}

/// Black wins only with strictly more points than White plus komi.
pub fn winner(state: &GameState) -> Color {
    let (black, white) = estimate_points(state.board());
    if black as f32 > white as f32 + state.komi() {
        Color::Black
    } else {
        Color::White
    }
}
