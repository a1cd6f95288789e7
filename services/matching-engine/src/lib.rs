//! Matching engine
//!
//! Price-time-priority order matching over per-symbol two-sided books.
//!
//! **Key invariants:**
//! - The book is uncrossed whenever the engine mutex is released
//! - Within a price level, time priority is strictly FIFO
//! - Cancellation is lazy and amortized O(1): entries are zeroed in place
//!   and swept when they surface at a level head
//! - Trades are emitted, and the sink invoked, in a single total order

pub mod book;
pub mod engine;

pub use engine::{MatchingEngine, SinkError, TradeSink};
