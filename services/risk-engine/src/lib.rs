//! Risk engine
//!
//! Pre-trade admission checks against a per-symbol net-position limit, and
//! long/short-aware position accounting driven by the trade stream.

pub mod engine;

pub use engine::{RiskDecision, RiskEngine};
