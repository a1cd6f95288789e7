//! Market data surfaces
//!
//! The bounded trade-history tail consumed by the visualization layer.

pub mod trades;

pub use trades::TradeTail;
