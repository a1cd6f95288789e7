//! Admission pipeline
//!
//! Sequences decode → pre-trade risk check → matcher insertion, and only
//! on approval. The check and the insertion are separate critical sections
//! (risk then matcher), so limit enforcement is optimistic under
//! concurrent ingress.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use matching_engine::MatchingEngine;
use risk_engine::{RiskDecision, RiskEngine};
use types::clock;
use types::errors::{OrderRejection, ValidationError};
use types::ids::{OrderId, Symbol};
use types::numeric::Price;
use types::order::{Order, OrderKind, OrderMessage};

/// Terminal admission counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionStats {
    pub processed: u64,
    pub admitted: u64,
    pub rejected: u64,
}

/// Decodes inbound messages into orders and admits them.
pub struct AdmissionPipeline {
    engine: Arc<MatchingEngine>,
    risk: Arc<RiskEngine>,
    next_order_id: AtomicU64,
    processed: AtomicU64,
    admitted: AtomicU64,
    rejected: AtomicU64,
}

impl AdmissionPipeline {
    pub fn new(engine: Arc<MatchingEngine>, risk: Arc<RiskEngine>) -> Self {
        Self {
            engine,
            risk,
            next_order_id: AtomicU64::new(1),
            processed: AtomicU64::new(0),
            admitted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    /// Submit one decoded message. Returns the allocated order id on
    /// admission, or why the order never reached the matcher.
    pub fn submit(&self, message: OrderMessage) -> Result<OrderId, OrderRejection> {
        self.processed.fetch_add(1, Ordering::Relaxed);
        let result = self.admit(message);
        match &result {
            Ok(_) => self.admitted.fetch_add(1, Ordering::Relaxed),
            Err(_) => self.rejected.fetch_add(1, Ordering::Relaxed),
        };
        result
    }

    fn admit(&self, message: OrderMessage) -> Result<OrderId, OrderRejection> {
        let order = self.decode(message)?;

        match self.risk.check_pre_trade(&order) {
            RiskDecision::Approved => {}
            RiskDecision::PositionLimitBreach {
                current,
                potential,
                limit,
            } => {
                return Err(OrderRejection::PositionLimit {
                    current,
                    potential,
                    limit,
                });
            }
        }

        let order_id = order.id;
        self.engine.add_order(order)?;
        Ok(order_id)
    }

    /// Validate the wire form and stamp identity and ingress time.
    fn decode(&self, message: OrderMessage) -> Result<Order, OrderRejection> {
        let symbol = Symbol::try_new(message.symbol).ok_or(ValidationError::EmptySymbol)?;
        if message.quantity == 0 {
            return Err(ValidationError::ZeroQuantity.into());
        }
        let price = match message.kind {
            OrderKind::Limit => Price::try_from_f64(message.price)
                .ok_or(ValidationError::InvalidPrice(message.price))?,
            // A market order's price is never consulted
            OrderKind::Market => Price::zero(),
        };

        let id = OrderId::new(self.next_order_id.fetch_add(1, Ordering::Relaxed));
        Ok(Order::new(
            id,
            symbol,
            message.kind,
            message.side,
            price,
            message.quantity,
            clock::unix_nanos(),
        ))
    }

    pub fn stats(&self) -> AdmissionStats {
        AdmissionStats {
            processed: self.processed.load(Ordering::Relaxed),
            admitted: self.admitted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}
