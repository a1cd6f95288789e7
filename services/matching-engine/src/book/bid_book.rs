//! Bid (buy-side) book
//!
//! Price levels sorted by price descending: the best bid is the highest
//! price, reached through `next_back()` on the underlying BTreeMap.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::Price;
use types::order::Order;

use super::price_level::PriceLevel;

/// Buy side of the book.
#[derive(Debug, Clone, Default)]
pub struct BidBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl BidBook {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Enqueue an order at the tail of its price level, creating the level
    /// if absent. The level takes ownership of the order.
    pub fn insert(&mut self, order: Order) {
        self.levels.entry(order.price).or_default().push(order);
    }

    /// Best (highest) bid price.
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
    }

    /// Head order of the best level.
    pub fn front_of_best(&self) -> Option<&Order> {
        self.levels
            .iter()
            .next_back()
            .and_then(|(_, level)| level.front())
    }

    /// Level at an exact price, for lazy cancellation.
    pub fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Sweep spent heads off the best level; prune the level if that
    /// empties it. Returns true if a level was pruned (the best price
    /// changed, so the caller must re-read the top of book).
    pub fn sweep_best(&mut self) -> bool {
        let Some((price, level)) = self.levels.iter_mut().next_back().map(|(p, l)| (*p, l)) else {
            return false;
        };
        level.sweep_spent();
        if level.is_empty() {
            self.levels.remove(&price);
            return true;
        }
        false
    }

    /// Decrement the head of the best level by `quantity`, popping it if it
    /// fills completely and pruning the level if that empties it.
    ///
    /// Returns the id of a fully filled head, if any.
    pub fn fill_best(&mut self, quantity: u64) -> Option<OrderId> {
        let (price, level) = self.levels.iter_mut().next_back().map(|(p, l)| (*p, l))?;
        let head = level.front_mut()?;
        head.fill(quantity);
        let filled = if head.is_filled() {
            let id = head.id;
            level.pop_front();
            Some(id)
        } else {
            None
        };
        if level.is_empty() {
            self.levels.remove(&price);
        }
        filled
    }

    /// Depth snapshot, best price first. Only levels with live quantity
    /// appear; lazily cancelled entries contribute nothing.
    pub fn depth(&self) -> Vec<(Price, u64)> {
        self.levels
            .iter()
            .rev()
            .filter_map(|(price, level)| {
                let total = level.aggregate_remaining();
                (total > 0).then_some((*price, total))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
