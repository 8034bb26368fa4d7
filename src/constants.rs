//! Engine defaults and search parameters.
//!
//! Board dimensions are chosen at runtime (`boardsize` over GTP), so unlike
//! a compile-time board this module only holds limits and defaults.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size used when the engine starts.
pub const DEFAULT_BOARD_SIZE: usize = 9;

/// Largest supported extent of either board axis.
///
/// Traversal worklists encode a point as `row * 256 + col`, so neither axis
/// may exceed 256 cells.
pub const MAX_DIMENSION: usize = 256;

/// Largest board the GTP driver accepts (25 column letters, skipping 'I').
pub const GTP_MAX_SIZE: usize = 25;

/// Playouts stop after `MAX_GAME_LEN_FACTOR * rows * cols` iterations.
pub const MAX_GAME_LEN_FACTOR: usize = 3;

// =============================================================================
// Cell Encoding
// =============================================================================

/// Bits of a cell byte holding the stone color.
pub const COLOR_MASK: u8 = 0x3;

/// Bit of a cell byte holding the transient traversal mark.
pub const MARK_BIT: u8 = 0x4;

// =============================================================================
// Scoring
// =============================================================================

/// Komi (compensation points for White) for a fresh game.
pub const DEFAULT_KOMI: f32 = 6.5;

// =============================================================================
// Search Parameters
// =============================================================================

/// Seconds spent on `genmove` unless configured otherwise.
pub const DEFAULT_GENMOVE_SECS: f64 = 30.0;

/// Virtual wins every candidate starts with in a worker's sampling table.
pub const PRIOR_WINS: u32 = 1;

/// Virtual trials every candidate starts with in a worker's sampling table.
pub const PRIOR_TRIALS: u32 = 2;
