//! Simulation tooling
//!
//! A deterministic synthetic exchange feed for demos and integration tests.

pub mod feed;

pub use feed::{FeedConfig, FeedSimulator};
