//! Group connectivity: flood fill, liberties, captures and suicide.
//!
//! Everything here is built on [`iterate_group`], a worklist flood fill that
//! uses the board's mark bit instead of a separate visited array. The
//! worklist is borrowed from the board, so a traversal allocates nothing once
//! the board's scratch buffer has grown to fit.

use crate::board::{Color, Goban, Point};
use crate::eye::single_point_eye;

const ORTHOGONAL: [(isize, isize); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[inline]
fn offsets<G: Goban + ?Sized>(
    g: &G,
    (row, col): Point,
    deltas: &'static [(isize, isize); 4],
) -> impl Iterator<Item = Point> + use<G> {
    let (rows, cols) = (g.rows(), g.cols());
    deltas.iter().filter_map(move |&(dr, dc)| {
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        (r < rows && c < cols).then_some((r, c))
    })
}

/// Orthogonal neighbors of `p` that lie on the board, in no particular order.
#[inline]
pub fn neighbors<G: Goban + ?Sized>(g: &G, p: Point) -> impl Iterator<Item = Point> + use<G> {
    offsets(g, p, &ORTHOGONAL)
}

/// Diagonal neighbors of `p` that lie on the board. Only eye detection uses these.
#[inline]
pub fn diagonals<G: Goban + ?Sized>(g: &G, p: Point) -> impl Iterator<Item = Point> + use<G> {
    offsets(g, p, &DIAGONAL)
}

/// Flood fill the group containing `start`.
///
/// `member` is called once for every cell connected to `start` through cells
/// of the same color (including `start`). `border` is called once for every
/// distinct cell of a different color adjacent to the group. Both callbacks
/// receive the board and may modify colors; cells are marked before their
/// callback runs, so a cleared member is never visited twice.
pub fn iterate_group<G, M, B>(g: &mut G, start: Point, mut member: M, mut border: B)
where
    G: Goban + ?Sized,
    M: FnMut(&mut G, Point),
    B: FnMut(&mut G, Point),
{
    let color = g.color(start);
    let mut next = g.take_scratch();
    next.clear();
    g.clear_marks();

    g.set_mark(start);
    member(g, start);
    next.push(start);
    while let Some(p) = next.pop() {
        for n in neighbors(g, p) {
            if g.is_marked(n) {
                continue;
            }
            g.set_mark(n);
            if g.color(n) == color {
                member(g, n);
                next.push(n);
            } else {
                border(g, n);
            }
        }
    }

    g.put_scratch(next);
}

/// Number of distinct empty points adjacent to the group at `p`.
pub fn count_liberties<G: Goban + ?Sized>(g: &mut G, p: Point) -> usize {
    let mut liberties = 0;
    iterate_group(
        g,
        p,
        |_, _| {},
        |g, n| {
            if g.color(n) == Color::Empty {
                liberties += 1;
            }
        },
    );
    liberties
}

/// Clear the group at `p` from the board and return how many stones it had.
pub fn remove_group<G: Goban + ?Sized>(g: &mut G, p: Point) -> usize {
    let mut removed = 0;
    iterate_group(
        g,
        p,
        |g, n| {
            g.set_color(n, Color::Empty);
            removed += 1;
        },
        |_, _| {},
    );
    removed
}

/// Whether `color` playing at the empty point `p` would leave its own group
/// without liberties and capture nothing.
///
/// The stone is placed temporarily and always removed again before
/// returning, so colors on the board are unchanged by this call. Captures
/// are checked before the new group's own liberties.
pub fn is_suicide<G: Goban + ?Sized>(g: &mut G, p: Point, color: Color) -> bool {
    if neighbors(g, p).any(|n| g.color(n) == Color::Empty) {
        return false;
    }

    g.set_color(p, color);
    let opponent = color.opposite();
    let captures = neighbors(g, p).any(|n| g.color(n) == opponent && count_liberties(g, n) == 0);
    let suicide = !captures && count_liberties(g, p) == 0;
    g.set_color(p, Color::Empty);
    suicide
}

/// Call `f` for every candidate move of `color`: empty points that are not
/// suicide and not a single-point eye already owned by `color`.
///
/// Skipping one's own eyes keeps random playouts from filling them; it is a
/// move-generation policy, not a rule, and externally supplied moves never
/// pass through here.
pub fn valid_moves<G, F>(g: &mut G, color: Color, mut f: F)
where
    G: Goban + ?Sized,
    F: FnMut(Point),
{
    for row in 0..g.rows() {
        for col in 0..g.cols() {
            let p = (row, col);
            if g.color(p) != Color::Empty || is_suicide(g, p, color) {
                continue;
            }
            if single_point_eye(g, p) != Some(color) {
                f(p);
            }
        }
    }
}

/// Collect [`valid_moves`] in row-major order.
pub fn move_list<G: Goban + ?Sized>(g: &mut G, color: Color) -> Vec<Point> {
    let mut moves = Vec::with_capacity(g.area());
    valid_moves(g, color, |p| moves.push(p));
    moves
}
