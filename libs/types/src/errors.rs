//! Error taxonomy for admission and matching
//!
//! Every condition here is recovered locally: malformed and risk-rejected
//! orders are dropped and counted, duplicate ids are refused at the engine
//! boundary, and nothing unwinds through the matcher.

use crate::ids::OrderId;
use thiserror::Error;

/// Validation failures detected while decoding an inbound message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("quantity must be positive")]
    ZeroQuantity,

    #[error("invalid limit price: {0}")]
    InvalidPrice(f64),

    #[error("empty symbol")]
    EmptySymbol,
}

/// Why an inbound order never reached the matching engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderRejection {
    #[error("malformed order: {0}")]
    Malformed(#[from] ValidationError),

    #[error("position limit breach: current {current}, potential {potential}, limit {limit}")]
    PositionLimit {
        current: i64,
        potential: i64,
        limit: i64,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Rejections raised by the matching engine itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("order id {0} collides with a live order")]
    DuplicateOrder(OrderId),
}
