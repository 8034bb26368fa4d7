//! Game state and move execution.
//!
//! [`GameState`] owns the board, the komi and the capture counters. It is
//! the object the GTP driver talks to, and the root that search workers
//! clone for every playout.

use crate::board::{Board, BoardError, BoardKind, Color, Goban, Point};
use crate::constants::{DEFAULT_BOARD_SIZE, DEFAULT_KOMI};
use crate::group::{count_liberties, neighbors, remove_group};
use crate::mcts::{SearchConfig, get_best_move};

/// A Go position: board, komi and prisoners.
///
/// Cloning produces a fully independent copy.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    /// Points added to White's score.
    komi: f32,
    /// White stones removed by Black.
    captured_white: usize,
    /// Black stones removed by White.
    captured_black: usize,
}

impl Default for GameState {
    fn default() -> Self {
        let board = Board::new(BoardKind::default(), DEFAULT_BOARD_SIZE, DEFAULT_BOARD_SIZE)
            .expect("default board size is valid");
        Self::with_board(board, DEFAULT_KOMI)
    }
}

impl GameState {
    /// An empty `rows x cols` board with the default komi.
    pub fn new(kind: BoardKind, rows: usize, cols: usize) -> Result<Self, BoardError> {
        Ok(Self::with_board(Board::new(kind, rows, cols)?, DEFAULT_KOMI))
    }

    /// A position set up from a layout string (see [`crate::board::set_layout`]).
    pub fn from_layout(
        kind: BoardKind,
        rows: usize,
        cols: usize,
        komi: f32,
        layout: &str,
    ) -> Result<Self, BoardError> {
        Ok(Self::with_board(Board::from_layout(kind, rows, cols, layout)?, komi))
    }

    pub fn with_board(board: Board, komi: f32) -> Self {
        Self {
            board,
            komi,
            captured_white: 0,
            captured_black: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn komi(&self) -> f32 {
        self.komi
    }

    pub fn set_komi(&mut self, komi: f32) {
        self.komi = komi;
    }

    pub fn captured_white(&self) -> usize {
        self.captured_white
    }

    pub fn captured_black(&self) -> usize {
        self.captured_black
    }

    /// Replace the board with an empty `size x size` board of the same kind.
    pub fn board_size(&mut self, size: usize) -> Result<(), BoardError> {
        self.board = Board::new(self.board.kind(), size, size)?;
        self.captured_white = 0;
        self.captured_black = 0;
        Ok(())
    }

    /// Empty every point, keeping the dimensions.
    pub fn clear_board(&mut self) {
        for row in 0..self.board.rows() {
            for col in 0..self.board.cols() {
                self.board.set_color((row, col), Color::Empty);
            }
        }
        self.board.clear_marks();
        self.captured_white = 0;
        self.captured_black = 0;
    }

    /// Place `color` at `p` and remove every adjacent opposing group left
    /// without liberties. Returns the number of stones captured.
    ///
    /// No legality check is made. The caller must ensure `p` is empty and
    /// the move is not suicide; otherwise the resulting board is unspecified.
    /// Playing [`Color::Empty`] just clears `p` and captures nothing.
    pub fn play(&mut self, p: Point, color: Color) -> usize {
        self.board.set_color(p, color);
        if color == Color::Empty {
            return 0;
        }
        let opponent = color.opposite();
        let mut captured = 0;
        for n in neighbors(&self.board, p) {
            if self.board.color(n) == opponent && count_liberties(&mut self.board, n) == 0 {
                captured += remove_group(&mut self.board, n);
            }
        }
        match color {
            Color::Black => self.captured_white += captured,
            Color::White => self.captured_black += captured,
            Color::Empty => {}
        }
        captured
    }

    /// Search for a move for `color`, play it, and return it.
    /// `None` means the engine passes.
    pub fn gen_move(&mut self, color: Color, config: &SearchConfig) -> Option<Point> {
        let outcome = get_best_move(self, color, config);
        if let Some(p) = outcome.best {
            self.play(p, color);
        }
        outcome.best
    }
}
