//! randgo: a flat Monte Carlo Go engine.
//!
//! The engine keeps a rules-level board model and picks moves by running
//! random playouts in parallel. There is no tree and no learned evaluation;
//! strength comes from playout volume and single-point-eye pruning.
//!
//! ## Modules
//!
//! - [`constants`] - Limits and engine defaults
//! - [`board`] - Board representations behind the [`board::Goban`] trait
//! - [`scratch`] - Pooled worklist used by flood fills
//! - [`group`] - Flood fill, liberties, captures, suicide and move generation
//! - [`eye`] - Single-point eye detection
//! - [`position`] - Game state and move execution
//! - [`score`] - Area score estimate and winner
//! - [`playout`] - Random game simulation
//! - [`mcts`] - Parallel flat Monte Carlo search
//! - [`gtp`] - Go Text Protocol driver
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use randgo::board::{BoardKind, Color};
//! use randgo::mcts::{SearchConfig, get_best_move};
//! use randgo::position::GameState;
//!
//! let mut state = GameState::new(BoardKind::Flat, 5, 5).unwrap();
//! state.play((2, 2), Color::Black);
//!
//! let config = SearchConfig::default().with_time_budget(Duration::from_millis(100));
//! let outcome = get_best_move(&state, Color::White, &config);
//! println!("White plays {:?}", outcome.best);
//! ```

pub mod board;
pub mod constants;
pub mod eye;
pub mod group;
pub mod gtp;
pub mod mcts;
pub mod playout;
pub mod position;
pub mod scratch;
pub mod score;
