//! Risk engine
//!
//! Owns the portfolio (one position per symbol) behind its own mutex and
//! provides the two halves of risk control: the pre-trade admission check
//! and the post-trade position update. The admission check is deliberately
//! conservative: it models a full fill of the order's original quantity,
//! so a partial fill can never retroactively breach the limit.

use parking_lot::Mutex;
use std::collections::HashMap;

use types::ids::Symbol;
use types::order::{Order, Side};
use types::position::Position;
use types::trade::Trade;

/// Outcome of the pre-trade check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskDecision {
    Approved,
    /// Admitting the order could drive |net position| past the limit.
    PositionLimitBreach {
        current: i64,
        potential: i64,
        limit: i64,
    },
}

impl RiskDecision {
    pub fn is_approved(&self) -> bool {
        matches!(self, RiskDecision::Approved)
    }
}

/// Pre-trade admission and per-symbol position accounting.
pub struct RiskEngine {
    portfolio: Mutex<HashMap<Symbol, Position>>,
    max_position_limit: i64,
}

impl RiskEngine {
    /// Create a risk engine with a per-symbol absolute net-position cap.
    pub fn new(max_position_limit: i64) -> Self {
        Self {
            portfolio: Mutex::new(HashMap::new()),
            max_position_limit,
        }
    }

    /// Evaluate whether admitting `order` could breach the position limit
    /// for its symbol, modeling the worst case of a full fill.
    ///
    /// This check and the subsequent engine insertion are separate critical
    /// sections: enforcement is optimistic under concurrent ingress.
    pub fn check_pre_trade(&self, order: &Order) -> RiskDecision {
        let portfolio = self.portfolio.lock();
        let current = portfolio
            .get(&order.symbol)
            .map_or(0, |position| position.net_position);
        let delta = match order.side {
            Side::Buy => order.quantity as i64,
            Side::Sell => -(order.quantity as i64),
        };
        let potential = current + delta;

        if potential.abs() > self.max_position_limit {
            tracing::warn!(
                symbol = %order.symbol,
                current,
                potential,
                limit = self.max_position_limit,
                "pre-trade check failed: order would exceed position limit"
            );
            return RiskDecision::PositionLimitBreach {
                current,
                potential,
                limit: self.max_position_limit,
            };
        }

        tracing::debug!(
            symbol = %order.symbol,
            current,
            potential,
            "pre-trade check passed"
        );
        RiskDecision::Approved
    }

    /// Post a fill of `trade.quantity` at `trade.price` on `our_side` to
    /// the position for `symbol`, creating it on first observation.
    ///
    /// Called from the trade sink while the matcher's mutex is held; only
    /// the portfolio mutex is taken here, so the lock order is always
    /// matcher → risk and never the reverse.
    pub fn on_trade(&self, trade: &Trade, our_side: Side, symbol: &Symbol) {
        let mut portfolio = self.portfolio.lock();
        let position = portfolio
            .entry(symbol.clone())
            .or_insert_with(|| Position::new(symbol.clone()));
        position.apply_fill(our_side, trade.quantity, trade.price);

        tracing::debug!(
            symbol = %symbol,
            net_position = position.net_position,
            realized_pnl = %position.realized_pnl,
            "position updated"
        );
    }

    /// Value snapshot of one symbol's position.
    pub fn position(&self, symbol: &Symbol) -> Option<Position> {
        self.portfolio.lock().get(symbol).cloned()
    }

    /// Value snapshots of every position, sorted by symbol for stable
    /// display.
    pub fn positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self.portfolio.lock().values().cloned().collect();
        positions.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        positions
    }
}
