//! Price level with FIFO queue
//!
//! A price level owns all resting orders at one price, in arrival order
//! (earliest at the head). Cancellation is lazy: a cancelled entry stays in
//! the queue with zero remaining quantity until a sweep reaches it at the
//! head, so aggregates are computed by reading each entry's remaining
//! quantity rather than maintained as a running total.

use std::collections::VecDeque;
use types::ids::OrderId;
use types::order::Order;

/// All resting orders at a single price, in time priority.
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    orders: VecDeque<Order>,
}

impl PriceLevel {
    pub fn new() -> Self {
        Self {
            orders: VecDeque::new(),
        }
    }

    /// Enqueue an order at the back of the queue (time priority).
    pub fn push(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    /// Peek at the head order without removing it.
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    pub fn front_mut(&mut self) -> Option<&mut Order> {
        self.orders.front_mut()
    }

    /// Pop the head order from the queue.
    pub fn pop_front(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    /// Drop spent head entries (fully filled stragglers and lazily
    /// cancelled orders) until the head is live or the level is empty.
    pub fn sweep_spent(&mut self) {
        while self
            .front()
            .map_or(false, |order| order.remaining_quantity == 0)
        {
            self.orders.pop_front();
        }
    }

    /// Lazily cancel the order with `id`: its remaining quantity drops to
    /// zero in place and the entry waits for the next head sweep.
    ///
    /// Returns false if no entry with that id is present.
    pub fn cancel(&mut self, id: OrderId) -> bool {
        match self.orders.iter_mut().find(|order| order.id == id) {
            Some(order) => {
                order.remaining_quantity = 0;
                true
            }
            None => false,
        }
    }

    /// Total live quantity at this level. Lazily cancelled entries
    /// contribute zero.
    pub fn aggregate_remaining(&self) -> u64 {
        self.orders.iter().map(|order| order.remaining_quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of entries, including not-yet-swept cancelled ones.
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}
