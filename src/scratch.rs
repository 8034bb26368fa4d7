//! Reusable worklist for flood fills.
//!
//! Every board owns one [`Worklist`] and lends it to each traversal through
//! [`Goban::take_scratch`](crate::board::Goban::take_scratch). Search workers
//! move a single worklist from clone to clone, so the buffer grows once per
//! worker and is then reused for every playout.

use crate::board::Point;

/// A stack of points encoded as `row * 256 + col`.
#[derive(Clone, Debug, Default)]
pub struct Worklist {
    stack: Vec<u32>,
}

impl Worklist {
    /// Create an empty worklist able to hold `capacity` points without growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stack: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, (row, col): Point) {
        self.stack.push(encode(row, col));
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Point> {
        self.stack.pop().map(decode)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn capacity(&self) -> usize {
        self.stack.capacity()
    }

    /// Drop any leftover points, keeping the allocation.
    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

#[inline]
fn encode(row: usize, col: usize) -> u32 {
    ((row as u32) << 8) | col as u32
}

#[inline]
fn decode(code: u32) -> Point {
    ((code >> 8) as usize, (code & 0xff) as usize)
}
