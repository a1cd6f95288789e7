//! Bounded trade-history tail
//!
//! Keeps the last N trades for the visualization consumer. Written only by
//! the trade sink, read concurrently by the dashboard; its own mutex makes
//! every snapshot a consistent value copy.

use parking_lot::Mutex;
use std::collections::VecDeque;

use types::trade::Trade;

pub const DEFAULT_CAPACITY: usize = 50;

/// Ring of the most recent trades.
pub struct TradeTail {
    history: Mutex<VecDeque<Trade>>,
    capacity: usize,
}

impl TradeTail {
    /// Create a tail holding at most `capacity` trades.
    pub fn new(capacity: usize) -> Self {
        Self {
            history: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append a trade, dropping the oldest once at capacity.
    pub fn append(&self, trade: Trade) {
        let mut history = self.history.lock();
        if history.len() >= self.capacity {
            history.pop_front();
        }
        history.push_back(trade);
    }

    /// Value snapshot, newest first.
    pub fn snapshot(&self) -> Vec<Trade> {
        self.history.lock().iter().rev().cloned().collect()
    }

    /// The most recent trade, if any.
    pub fn latest(&self) -> Option<Trade> {
        self.history.lock().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.history.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.lock().is_empty()
    }
}

impl Default for TradeTail {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
