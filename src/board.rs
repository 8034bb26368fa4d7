//! Go board (goban) representations.
//!
//! Two layouts implement the same [`Goban`] contract:
//! - [`RowBoard`] keeps one `Vec` per row
//! - [`FlatBoard`] keeps a single `Vec` indexed by `row * cols + col`
//!
//! Each cell is one byte: the low two bits hold the [`Color`] and
//! [`MARK_BIT`] holds the transient visited flag used by flood fills.
//! [`Board`] selects one layout when it is created and never switches.

use std::fmt;

use thiserror::Error;

use crate::constants::{COLOR_MASK, MARK_BIT, MAX_DIMENSION};
use crate::scratch::Worklist;

/// Contents of a board point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Empty = 0,
    Black = 1,
    White = 2,
}

impl Color {
    /// The opposing stone color. `Empty` has no opponent and maps to itself.
    #[inline]
    pub fn opposite(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
            Color::Empty => Color::Empty,
        }
    }

    #[inline]
    fn from_bits(bits: u8) -> Color {
        match bits & COLOR_MASK {
            1 => Color::Black,
            2 => Color::White,
            _ => Color::Empty,
        }
    }

    /// Layout character: `.` empty, `x` black, `o` white.
    pub fn to_char(self) -> char {
        match self {
            Color::Empty => '.',
            Color::Black => 'x',
            Color::White => 'o',
        }
    }

    pub fn from_char(c: char) -> Option<Color> {
        match c {
            '.' => Some(Color::Empty),
            'x' => Some(Color::Black),
            'o' => Some(Color::White),
            _ => None,
        }
    }
}

/// A board point as `(row, col)`.
pub type Point = (usize, usize);

/// Errors raised by board construction and checked access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("point ({row}, {col}) is outside the {rows}x{cols} board")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("unsupported board dimensions {rows}x{cols} (each side must be 1..={max})")]
    Dimensions { rows: usize, cols: usize, max: usize },
    #[error("bad board layout: {0}")]
    Layout(String),
}

/// The board capability shared by both layouts.
///
/// `color`, `set_color` and the mark operations panic with
/// [`BoardError::OutOfBounds`] when given a point off the board.
pub trait Goban {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
    fn color(&self, p: Point) -> Color;
    /// Overwrite the color at `p`, leaving its mark untouched.
    fn set_color(&mut self, p: Point, color: Color);
    fn clear_marks(&mut self);
    fn set_mark(&mut self, p: Point);
    fn is_marked(&self, p: Point) -> bool;
    /// Borrow the pooled traversal worklist. Hand it back with `put_scratch`.
    fn take_scratch(&mut self) -> Worklist;
    fn put_scratch(&mut self, scratch: Worklist);

    #[inline]
    fn contains(&self, (row, col): Point) -> bool {
        row < self.rows() && col < self.cols()
    }

    fn area(&self) -> usize {
        self.rows() * self.cols()
    }
}

#[cold]
#[track_caller]
fn out_of_bounds((row, col): Point, rows: usize, cols: usize) -> ! {
    panic!("{}", BoardError::OutOfBounds { row, col, rows, cols })
}

fn check_dimensions(rows: usize, cols: usize) -> Result<(), BoardError> {
    if rows == 0 || cols == 0 || rows > MAX_DIMENSION || cols > MAX_DIMENSION {
        return Err(BoardError::Dimensions {
            rows,
            cols,
            max: MAX_DIMENSION,
        });
    }
    Ok(())
}

// =============================================================================
// Row-of-rows layout
// =============================================================================

#[derive(Clone, Debug)]
pub struct RowBoard {
    cols: usize,
    cells: Vec<Vec<u8>>,
    scratch: Worklist,
}

impl RowBoard {
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        check_dimensions(rows, cols)?;
        Ok(Self {
            cols,
            cells: vec![vec![Color::Empty as u8; cols]; rows],
            scratch: Worklist::with_capacity(rows * cols),
        })
    }

    #[inline]
    #[track_caller]
    fn cell(&self, (row, col): Point) -> u8 {
        if row >= self.cells.len() || col >= self.cols {
            out_of_bounds((row, col), self.cells.len(), self.cols);
        }
        self.cells[row][col]
    }

    #[inline]
    #[track_caller]
    fn cell_mut(&mut self, (row, col): Point) -> &mut u8 {
        if row >= self.cells.len() || col >= self.cols {
            out_of_bounds((row, col), self.cells.len(), self.cols);
        }
        &mut self.cells[row][col]
    }
}

impl Goban for RowBoard {
    fn rows(&self) -> usize {
        self.cells.len()
    }

    fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn color(&self, p: Point) -> Color {
        Color::from_bits(self.cell(p))
    }

    #[inline]
    fn set_color(&mut self, p: Point, color: Color) {
        let cell = self.cell_mut(p);
        *cell = (*cell & !COLOR_MASK) | color as u8;
    }

    fn clear_marks(&mut self) {
        for row in &mut self.cells {
            for cell in row {
                *cell &= COLOR_MASK;
            }
        }
    }

    #[inline]
    fn set_mark(&mut self, p: Point) {
        *self.cell_mut(p) |= MARK_BIT;
    }

    #[inline]
    fn is_marked(&self, p: Point) -> bool {
        self.cell(p) & MARK_BIT != 0
    }

    fn take_scratch(&mut self) -> Worklist {
        std::mem::take(&mut self.scratch)
    }

    fn put_scratch(&mut self, scratch: Worklist) {
        self.scratch = scratch;
    }
}

// =============================================================================
// Flat layout
// =============================================================================

#[derive(Clone, Debug)]
pub struct FlatBoard {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
    scratch: Worklist,
}

impl FlatBoard {
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        check_dimensions(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![Color::Empty as u8; rows * cols],
            scratch: Worklist::with_capacity(rows * cols),
        })
    }

    /// Index into `cells`. A column past the edge must not wrap onto the
    /// next row, so both axes are checked.
    #[inline]
    #[track_caller]
    fn idx(&self, (row, col): Point) -> usize {
        if row >= self.rows || col >= self.cols {
            out_of_bounds((row, col), self.rows, self.cols);
        }
        row * self.cols + col
    }
}

impl Goban for FlatBoard {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn color(&self, p: Point) -> Color {
        Color::from_bits(self.cells[self.idx(p)])
    }

    #[inline]
    fn set_color(&mut self, p: Point, color: Color) {
        let i = self.idx(p);
        self.cells[i] = (self.cells[i] & !COLOR_MASK) | color as u8;
    }

    fn clear_marks(&mut self) {
        for cell in &mut self.cells {
            *cell &= COLOR_MASK;
        }
    }

    #[inline]
    fn set_mark(&mut self, p: Point) {
        let i = self.idx(p);
        self.cells[i] |= MARK_BIT;
    }

    #[inline]
    fn is_marked(&self, p: Point) -> bool {
        self.cells[self.idx(p)] & MARK_BIT != 0
    }

    fn take_scratch(&mut self) -> Worklist {
        std::mem::take(&mut self.scratch)
    }

    fn put_scratch(&mut self, scratch: Worklist) {
        self.scratch = scratch;
    }
}

// =============================================================================
// Layout strings
// =============================================================================

/// Fill `g` from a layout of `.`, `x` and `o` in row-major order.
///
/// Whitespace and `/` are ignored, so `"xxox / xo.x / .xx."` is accepted.
pub fn set_layout<G: Goban + ?Sized>(g: &mut G, layout: &str) -> Result<(), BoardError> {
    let colors = layout
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '/')
        .map(|c| {
            Color::from_char(c)
                .ok_or_else(|| BoardError::Layout(format!("unexpected character {c:?}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if colors.len() != g.area() {
        return Err(BoardError::Layout(format!(
            "expected {} cells for a {}x{} board, got {}",
            g.area(),
            g.rows(),
            g.cols(),
            colors.len()
        )));
    }
    let cols = g.cols();
    for (i, color) in colors.into_iter().enumerate() {
        g.set_color((i / cols, i % cols), color);
    }
    Ok(())
}

/// Render `g` as a compact layout string (no separators).
pub fn layout<G: Goban + ?Sized>(g: &G) -> String {
    let mut s = String::with_capacity(g.area());
    for row in 0..g.rows() {
        for col in 0..g.cols() {
            s.push(g.color((row, col)).to_char());
        }
    }
    s
}

// =============================================================================
// Board selection
// =============================================================================

/// Which layout a [`Board`] uses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum BoardKind {
    Rows,
    #[default]
    Flat,
}

/// A board whose layout is fixed when it is constructed.
#[derive(Clone, Debug)]
pub enum Board {
    Rows(RowBoard),
    Flat(FlatBoard),
}

macro_rules! delegate {
    ($self:expr, $b:ident => $body:expr) => {
        match $self {
            Board::Rows($b) => $body,
            Board::Flat($b) => $body,
        }
    };
}

impl Board {
    pub fn new(kind: BoardKind, rows: usize, cols: usize) -> Result<Self, BoardError> {
        Ok(match kind {
            BoardKind::Rows => Board::Rows(RowBoard::new(rows, cols)?),
            BoardKind::Flat => Board::Flat(FlatBoard::new(rows, cols)?),
        })
    }

    pub fn from_layout(
        kind: BoardKind,
        rows: usize,
        cols: usize,
        layout: &str,
    ) -> Result<Self, BoardError> {
        let mut board = Self::new(kind, rows, cols)?;
        set_layout(&mut board, layout)?;
        Ok(board)
    }

    pub fn kind(&self) -> BoardKind {
        match self {
            Board::Rows(_) => BoardKind::Rows,
            Board::Flat(_) => BoardKind::Flat,
        }
    }

    /// Checked color lookup.
    pub fn get(&self, p: Point) -> Result<Color, BoardError> {
        if !self.contains(p) {
            return Err(BoardError::OutOfBounds {
                row: p.0,
                col: p.1,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(self.color(p))
    }

    pub fn layout(&self) -> String {
        layout(self)
    }
}

impl Goban for Board {
    fn rows(&self) -> usize {
        delegate!(self, b => b.rows())
    }

    fn cols(&self) -> usize {
        delegate!(self, b => b.cols())
    }

    #[inline]
    fn color(&self, p: Point) -> Color {
        delegate!(self, b => b.color(p))
    }

    #[inline]
    fn set_color(&mut self, p: Point, color: Color) {
        delegate!(self, b => b.set_color(p, color))
    }

    fn clear_marks(&mut self) {
        delegate!(self, b => b.clear_marks())
    }

    #[inline]
    fn set_mark(&mut self, p: Point) {
        delegate!(self, b => b.set_mark(p))
    }

    #[inline]
    fn is_marked(&self, p: Point) -> bool {
        delegate!(self, b => b.is_marked(p))
    }

    fn take_scratch(&mut self) -> Worklist {
        delegate!(self, b => b.take_scratch())
    }

    fn put_scratch(&mut self, scratch: Worklist) {
        delegate!(self, b => b.put_scratch(scratch))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                write!(f, "{} ", self.color((row, col)).to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
