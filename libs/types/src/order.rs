//! Order records and the decoded inbound message form

use crate::ids::{OrderId, Symbol};
use crate::numeric::Price;
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// Rests on the book at its limit price until filled or cancelled
    Limit,
    /// Matches against the opposite top of book; any residual is discarded
    Market,
}

/// A live order.
///
/// `id` and `side` are immutable for the order's lifetime;
/// `remaining_quantity` is the only field that mutates. Cancellation is
/// expressed by driving `remaining_quantity` to zero in place, so an entry
/// with zero remaining may still sit in its price level until swept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub symbol: Symbol,
    pub kind: OrderKind,
    pub side: Side,
    /// Limit price; ignored for market orders.
    pub price: Price,
    /// Original quantity, always positive.
    pub quantity: u64,
    pub remaining_quantity: u64,
    /// Ingress timestamp, Unix nanos.
    pub timestamp: i64,
}

impl Order {
    pub fn new(
        id: OrderId,
        symbol: Symbol,
        kind: OrderKind,
        side: Side,
        price: Price,
        quantity: u64,
        timestamp: i64,
    ) -> Self {
        Self {
            id,
            symbol,
            kind,
            side,
            price,
            quantity,
            remaining_quantity: quantity,
            timestamp,
        }
    }

    /// Quantity filled so far.
    pub fn filled_quantity(&self) -> u64 {
        self.quantity - self.remaining_quantity
    }

    pub fn is_filled(&self) -> bool {
        self.remaining_quantity == 0
    }

    /// Apply a fill.
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining quantity.
    pub fn fill(&mut self, fill_quantity: u64) {
        assert!(
            fill_quantity <= self.remaining_quantity,
            "Fill would exceed remaining quantity"
        );
        self.remaining_quantity -= fill_quantity;
    }

    /// Keys arrival order: earlier `(timestamp, id)` entered the venue
    /// first. Ids are admission-monotonic, so timestamp ties still resolve
    /// deterministically.
    pub fn arrival_key(&self) -> (i64, OrderId) {
        (self.timestamp, self.id)
    }
}

/// A decoded inbound order message, as delivered by the market-data
/// transport. Field forms follow the wire contract: lowercase side/kind
/// tags, floating price, integral quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderMessage {
    pub symbol: String,
    pub side: Side,
    pub kind: OrderKind,
    pub price: f64,
    pub quantity: u64,
}
