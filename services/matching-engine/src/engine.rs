//! Matching engine core
//!
//! One two-sided book per symbol, an order index for O(1)-average
//! cancellation, and the crossing loop. A single mutex serializes order
//! ingress, cancellation, matching, and depth snapshots; the registered
//! trade sink runs synchronously inside that critical section, so trades
//! are observed in emission order. Sinks must therefore never block on a
//! lock held by a thread waiting to enter the engine.

use parking_lot::Mutex;
use std::collections::HashMap;

use types::clock;
use types::errors::EngineError;
use types::ids::{OrderId, Symbol, TradeId};
use types::numeric::Price;
use types::order::{Order, OrderKind, Side};
use types::trade::Trade;

use crate::book::{AskBook, BidBook};

/// Error type a trade sink may surface. Sink failures are logged and
/// swallowed; the match loop always proceeds.
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Trade emission target, invoked once per trade while the engine's mutex
/// is held.
pub type TradeSink = Box<dyn FnMut(&Trade) -> Result<(), SinkError> + Send>;

/// Both sides of one symbol's book.
#[derive(Debug, Default)]
struct SymbolBook {
    bids: BidBook,
    asks: AskBook,
}

/// Parameters of one fill, computed from the two head orders.
struct FillPlan {
    quantity: u64,
    price: Price,
    resting_id: OrderId,
    aggressive_id: OrderId,
    taker_side: Side,
}

/// Everything the engine mutex guards.
struct EngineState {
    books: HashMap<Symbol, SymbolBook>,
    /// Locates the level holding each live resting order. An entry exists
    /// iff the order rests with positive remaining quantity; lazily
    /// cancelled orders leave the index immediately and their queue entry
    /// is swept later.
    index: HashMap<OrderId, (Symbol, Side, Price)>,
    next_trade_id: u64,
    sink: Option<TradeSink>,
}

/// The matching engine.
///
/// `add_order`, `cancel_order`, and `depth` all serialize on one mutex, so
/// a depth snapshot always observes the book between two complete
/// operations, never a half-applied match.
pub struct MatchingEngine {
    state: Mutex<EngineState>,
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(EngineState {
                books: HashMap::new(),
                index: HashMap::new(),
                next_trade_id: 1,
                sink: None,
            }),
        }
    }

    /// Install the trade emission target. At most one sink is active;
    /// registering again replaces the previous one.
    pub fn register_trade_sink(&self, sink: TradeSink) {
        self.state.lock().sink = Some(sink);
    }

    /// Admit an already risk-approved order and match to quiescence.
    ///
    /// Limit orders rest at their price level and then drive the crossing
    /// loop; market orders consume the opposite top of book and never rest
    /// (any residual is discarded). Zero or more trades are emitted through
    /// the sink before this returns.
    pub fn add_order(&self, order: Order) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        if state.index.contains_key(&order.id) {
            return Err(EngineError::DuplicateOrder(order.id));
        }
        match order.kind {
            OrderKind::Limit => {
                let symbol = order.symbol.clone();
                state.enqueue_limit(order);
                state.match_symbol(&symbol);
            }
            OrderKind::Market => state.match_market(order),
        }
        Ok(())
    }

    /// Lazily cancel the order with `id`.
    ///
    /// The order's remaining quantity drops to zero and its index entry is
    /// removed; the queue entry stays in its price level until the next
    /// traversal sweeps it. Idempotent: unknown or already-cancelled ids
    /// are a no-op.
    pub fn cancel_order(&self, id: OrderId) {
        let mut state = self.state.lock();
        let Some((symbol, side, price)) = state.index.remove(&id) else {
            return;
        };
        let Some(book) = state.books.get_mut(&symbol) else {
            return;
        };
        let level = match side {
            Side::Buy => book.bids.level_mut(price),
            Side::Sell => book.asks.level_mut(price),
        };
        if let Some(level) = level {
            level.cancel(id);
        }
    }

    /// Consistent depth snapshot for one side of a symbol's book,
    /// best price first. Only levels with live quantity appear.
    pub fn depth(&self, symbol: &Symbol, side: Side) -> Vec<(Price, u64)> {
        let state = self.state.lock();
        state
            .books
            .get(symbol)
            .map(|book| match side {
                Side::Buy => book.bids.depth(),
                Side::Sell => book.asks.depth(),
            })
            .unwrap_or_default()
    }

    /// Symbols with a book, sorted for stable display.
    pub fn symbols(&self) -> Vec<Symbol> {
        let state = self.state.lock();
        let mut symbols: Vec<Symbol> = state.books.keys().cloned().collect();
        symbols.sort();
        symbols
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineState {
    fn enqueue_limit(&mut self, order: Order) {
        self.index
            .insert(order.id, (order.symbol.clone(), order.side, order.price));
        let book = self.books.entry(order.symbol.clone()).or_default();
        match order.side {
            Side::Buy => book.bids.insert(order),
            Side::Sell => book.asks.insert(order),
        }
    }

    /// Run the crossing loop for one symbol until the book is uncrossed.
    fn match_symbol(&mut self, symbol: &Symbol) {
        while let Some(plan) = self.next_cross(symbol) {
            let trade = self.build_trade(symbol, &plan);
            self.emit(&trade);

            let Some(book) = self.books.get_mut(symbol) else {
                return;
            };
            let filled_bid = book.bids.fill_best(plan.quantity);
            let filled_ask = book.asks.fill_best(plan.quantity);
            if let Some(id) = filled_bid {
                self.index.remove(&id);
            }
            if let Some(id) = filled_ask {
                self.index.remove(&id);
            }
        }
    }

    /// Find the next fill while the book is crossed.
    ///
    /// Sweep-then-peek: spent heads are dropped and emptied levels pruned
    /// before the two live heads are compared, so a cancellation that
    /// reached the top of the resting side takes effect before any
    /// subsequent match.
    fn next_cross(&mut self, symbol: &Symbol) -> Option<FillPlan> {
        loop {
            let book = self.books.get_mut(symbol)?;
            let best_bid = book.bids.best_price()?;
            let best_ask = book.asks.best_price()?;
            if best_bid < best_ask {
                return None;
            }

            // A pruned level changes the top of book; rescan prices.
            if book.bids.sweep_best() | book.asks.sweep_best() {
                continue;
            }

            let bid = book.bids.front_of_best()?;
            let ask = book.asks.front_of_best()?;

            let quantity = bid.remaining_quantity.min(ask.remaining_quantity);
            // Price-time priority: the earlier-entered (resting) order sets
            // the fill price; the later one is the aggressor.
            let plan = if bid.arrival_key() <= ask.arrival_key() {
                FillPlan {
                    quantity,
                    price: bid.price,
                    resting_id: bid.id,
                    aggressive_id: ask.id,
                    taker_side: Side::Sell,
                }
            } else {
                FillPlan {
                    quantity,
                    price: ask.price,
                    resting_id: ask.id,
                    aggressive_id: bid.id,
                    taker_side: Side::Buy,
                }
            };
            return Some(plan);
        }
    }

    /// Match a market order against successive opposite tops of book.
    /// The order never rests; whatever cannot fill is discarded.
    fn match_market(&mut self, mut taker: Order) {
        while taker.remaining_quantity > 0 {
            let Some(plan) = self.next_market_cross(&taker) else {
                break;
            };
            let trade = self.build_trade(&taker.symbol, &plan);
            self.emit(&trade);

            taker.fill(plan.quantity);
            let Some(book) = self.books.get_mut(&taker.symbol) else {
                return;
            };
            let filled = match taker.side {
                Side::Buy => book.asks.fill_best(plan.quantity),
                Side::Sell => book.bids.fill_best(plan.quantity),
            };
            if let Some(id) = filled {
                self.index.remove(&id);
            }
        }
        if taker.remaining_quantity > 0 {
            tracing::debug!(
                order_id = %taker.id,
                residual = taker.remaining_quantity,
                "market order residual discarded"
            );
        }
    }

    /// Next fill for a market taker: the live head of the opposite best
    /// level, at that head's price. Returns None once the opposite side is
    /// exhausted.
    fn next_market_cross(&mut self, taker: &Order) -> Option<FillPlan> {
        loop {
            let book = self.books.get_mut(&taker.symbol)?;
            let swept = match taker.side {
                Side::Buy => book.asks.sweep_best(),
                Side::Sell => book.bids.sweep_best(),
            };
            if swept {
                continue;
            }
            let head = match taker.side {
                Side::Buy => book.asks.front_of_best()?,
                Side::Sell => book.bids.front_of_best()?,
            };
            return Some(FillPlan {
                quantity: taker.remaining_quantity.min(head.remaining_quantity),
                price: head.price,
                resting_id: head.id,
                aggressive_id: taker.id,
                taker_side: taker.side,
            });
        }
    }

    fn build_trade(&mut self, symbol: &Symbol, plan: &FillPlan) -> Trade {
        let trade_id = TradeId::new(self.next_trade_id);
        self.next_trade_id += 1;
        Trade::new(
            trade_id,
            symbol.clone(),
            plan.resting_id,
            plan.aggressive_id,
            plan.taker_side,
            plan.price,
            plan.quantity,
            clock::unix_nanos(),
        )
    }

    /// Deliver a trade to the sink. Failures are logged and swallowed so
    /// the match loop never unwinds mid-cross.
    fn emit(&mut self, trade: &Trade) {
        tracing::debug!(
            trade_id = %trade.trade_id,
            symbol = %trade.symbol,
            price = %trade.price,
            quantity = trade.quantity,
            "trade executed"
        );
        if let Some(sink) = self.sink.as_mut() {
            if let Err(error) = sink(trade) {
                tracing::warn!(trade_id = %trade.trade_id, %error, "trade sink failed; continuing");
            }
        }
    }
}
