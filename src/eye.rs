//! Single-point eye detection.
//!
//! An empty point is an eye when every orthogonal neighbor is a stone of one
//! color and that color also dominates the diagonals. Points on the edge have
//! fewer diagonals to outnumber, so they are recognised more readily.

use crate::board::{Color, Goban, Point};
use crate::group::{diagonals, neighbors};

/// Return the owner of the single-point eye at the empty point `p`, or
/// `None` if `p` is not an eye.
pub fn single_point_eye<G: Goban + ?Sized>(g: &G, p: Point) -> Option<Color> {
    let mut around = [0u8; 3];
    for n in neighbors(g, p) {
        around[g.color(n) as usize] += 1;
    }
    if around[Color::Empty as usize] > 0
        || (around[Color::Black as usize] > 0 && around[Color::White as usize] > 0)
    {
        return None;
    }
    let owner = if around[Color::Black as usize] > 0 {
        Color::Black
    } else {
        Color::White
    };

    let mut corners = [0u8; 3];
    for d in diagonals(g, p) {
        corners[g.color(d) as usize] += 1;
    }
    (corners[owner as usize] > corners[owner.opposite() as usize]).then_some(owner)
}
