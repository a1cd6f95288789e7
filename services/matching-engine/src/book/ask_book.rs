//! Ask (sell-side) book
//!
//! Price levels sorted by price ascending: the best ask is the lowest
//! price, reached through `next()` on the underlying BTreeMap.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::Price;
use types::order::Order;

use super::price_level::PriceLevel;

/// Sell side of the book.
#[derive(Debug, Clone, Default)]
pub struct AskBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl AskBook {
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

    /// Best (lowest) ask price.
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// Head order of the best level.
    pub fn front_of_best(&self) -> Option<&Order> {
        self.levels.iter().next().and_then(|(_, level)| level.front())
    }

    /// Level at an exact price, for lazy cancellation.
    pub fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Sweep spent heads off the best level; prune the level if that
    /// empties it. Returns true if a level was pruned (the best price
    /// changed, so the caller must re-read the top of book).
    pub fn sweep_best(&mut self) -> bool {
        let Some((price, level)) = self.levels.iter_mut().next().map(|(p, l)| (*p, l)) else {
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
        let (price, level) = self.levels.iter_mut().next().map(|(p, l)| (*p, l))?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::Symbol;
    use types::order::{OrderKind, Side};

    fn make_order(id: u64, price: u64, quantity: u64) -> Order {
        Order::new(
            OrderId::new(id),
            Symbol::new("BTC-USD"),
            OrderKind::Limit,
            Side::Sell,
            Price::from_u64(price),
            quantity,
            id as i64,
        )
    }

    #[test]
    fn test_best_ask_is_lowest() {
        let mut book = AskBook::new();
        book.insert(make_order(1, 101, 10));
        book.insert(make_order(2, 99, 5));
        book.insert(make_order(3, 100, 7));

        assert_eq!(book.best_price(), Some(Price::from_u64(99)));
        assert_eq!(book.front_of_best().unwrap().id, OrderId::new(2));
    }

    #[test]
    fn test_depth_ascending_and_filtered() {
        let mut book = AskBook::new();
        book.insert(make_order(1, 101, 10));
        book.insert(make_order(2, 99, 5));
        book.insert(make_order(3, 101, 3));

        let depth = book.depth();
        assert_eq!(
            depth,
            vec![(Price::from_u64(99), 5), (Price::from_u64(101), 13)]
        );
    }

    #[test]
    fn test_time_priority_within_level() {
        let mut book = AskBook::new();
        book.insert(make_order(1, 100, 10));
        book.insert(make_order(2, 100, 20));

        assert_eq!(book.level_count(), 1);
        assert_eq!(book.front_of_best().unwrap().id, OrderId::new(1));
    }

    #[test]
    fn test_fill_best_prunes_emptied_level() {
        let mut book = AskBook::new();
        book.insert(make_order(1, 99, 5));
        book.insert(make_order(2, 100, 5));

        assert_eq!(book.fill_best(5), Some(OrderId::new(1)));
        assert_eq!(book.best_price(), Some(Price::from_u64(100)));
    }
}
