//! Trade records emitted by the matching engine

use crate::ids::{OrderId, Symbol, TradeId};
use crate::numeric::Price;
use crate::order::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single execution between a resting and an aggressive order.
///
/// Immutable once emitted; subscribers keep value copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub symbol: Symbol,
    /// The order that was already on the book at match time.
    pub resting_order_id: OrderId,
    /// The order whose arrival crossed the book.
    pub aggressive_order_id: OrderId,
    /// Side of the aggressive order.
    pub taker_side: Side,
    /// Execution price (the resting order's price).
    pub price: Price,
    /// Executed quantity, always positive.
    pub quantity: u64,
    /// Execution timestamp, Unix nanos.
    pub executed_at: i64,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trade_id: TradeId,
        symbol: Symbol,
        resting_order_id: OrderId,
        aggressive_order_id: OrderId,
        taker_side: Side,
        price: Price,
        quantity: u64,
        executed_at: i64,
    ) -> Self {
        Self {
            trade_id,
            symbol,
            resting_order_id,
            aggressive_order_id,
            taker_side,
            price,
            quantity,
            executed_at,
        }
    }

    /// Trade value (price × quantity).
    pub fn value(&self) -> Decimal {
        self.price.as_decimal() * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_trade() -> Trade {
        Trade::new(
            TradeId::new(1),
            Symbol::new("BTC-USD"),
            OrderId::new(10),
            OrderId::new(11),
            Side::Sell,
            Price::from_u64(50000),
            2,
            1_708_123_456_789_000_000,
        )
    }

    #[test]
    fn test_trade_value() {
        let trade = make_trade();
        assert_eq!(trade.value(), Decimal::from(100_000));
    }

    #[test]
    fn test_trade_serialization() {
        let trade = make_trade();
        let json = serde_json::to_string(&trade).unwrap();
        let deserialized: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, deserialized);
    }
}
