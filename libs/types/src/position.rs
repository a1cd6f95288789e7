//! Per-symbol position accounting
//!
//! Tracks signed net position, the cost basis of the open side, and
//! realized P&L. Fills are applied long/short aware: adding to the open
//! side re-weights the basis, reducing it realizes P&L against the basis,
//! and crossing through flat realizes the closed portion and re-opens at
//! the fill price.

use crate::ids::Symbol;
use crate::numeric::Price;
use crate::order::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Net position in one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: Symbol,
    /// Signed quantity: positive long, negative short.
    pub net_position: i64,
    /// Cost basis of the currently open side; zero when flat.
    pub avg_entry_price: Decimal,
    /// Running sum of P&L locked in by reducing or flipping fills.
    pub realized_pnl: Decimal,
}

impl Position {
    /// Create a new flat position.
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            net_position: 0,
            avg_entry_price: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.net_position == 0
    }

    /// Apply a fill of `quantity` at `price` on `side`.
    ///
    /// `quantity` must be positive; zero-quantity trades are never emitted.
    pub fn apply_fill(&mut self, side: Side, quantity: u64, price: Price) {
        let q = quantity as i64;
        let p = price.as_decimal();
        let old = self.net_position;

        match side {
            Side::Buy => {
                if old >= 0 {
                    // Opening or adding to a long: re-weight the basis
                    let new = old + q;
                    self.avg_entry_price = weighted_basis(old, self.avg_entry_price, q, p);
                    self.net_position = new;
                } else if old + q <= 0 {
                    // Covering a short, still short (or exactly flat)
                    self.realized_pnl += (self.avg_entry_price - p) * Decimal::from(q);
                    self.net_position = old + q;
                    if self.net_position == 0 {
                        self.avg_entry_price = Decimal::ZERO;
                    }
                } else {
                    // Flip short → long: realize the full short, re-open at p
                    self.realized_pnl += (self.avg_entry_price - p) * Decimal::from(-old);
                    self.net_position = old + q;
                    self.avg_entry_price = p;
                }
            }
            Side::Sell => {
                if old <= 0 {
                    // Opening or adding to a short: re-weight the basis
                    let new = old - q;
                    self.avg_entry_price = weighted_basis(-old, self.avg_entry_price, q, p);
                    self.net_position = new;
                } else if old - q >= 0 {
                    // Reducing a long, still long (or exactly flat)
                    self.realized_pnl += (p - self.avg_entry_price) * Decimal::from(q);
                    self.net_position = old - q;
                    if self.net_position == 0 {
                        self.avg_entry_price = Decimal::ZERO;
                    }
                } else {
                    // Flip long → short: realize the full long, re-open at p
                    self.realized_pnl += (p - self.avg_entry_price) * Decimal::from(old);
                    self.net_position = old - q;
                    self.avg_entry_price = p;
                }
            }
        }
    }
}

/// Quantity-weighted basis after adding `add_qty` at `add_price` to an
/// open size of `open_qty` (absolute) at `open_basis`.
fn weighted_basis(open_qty: i64, open_basis: Decimal, add_qty: i64, add_price: Decimal) -> Decimal {
    let total = open_qty + add_qty;
    debug_assert!(total > 0);
    (Decimal::from(open_qty) * open_basis + Decimal::from(add_qty) * add_price)
        / Decimal::from(total)
}
