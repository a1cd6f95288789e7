//! Venue process internals
//!
//! Wiring for the demo binary: configuration, the admission pipeline, the
//! ingress loop, and the console dashboard.

pub mod admission;
pub mod config;
pub mod dashboard;
pub mod ingress;
