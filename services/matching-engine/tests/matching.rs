//! Matching engine scenario tests
//!
//! End-to-end coverage of the crossing loop: full and partial matches,
//! price-time priority, lazy cancellation, market-order sweeps, sink
//! failure isolation, and book invariants under concurrent access.

use std::sync::Arc;

use matching_engine::MatchingEngine;
use parking_lot::Mutex;
use types::ids::{OrderId, Symbol, TradeId};
use types::numeric::Price;
use types::order::{Order, OrderKind, Side};
use types::trade::Trade;

fn symbol() -> Symbol {
    Symbol::new("TEST-SYM")
}

fn limit(id: u64, side: Side, price: &str, quantity: u64) -> Order {
    Order::new(
        OrderId::new(id),
        symbol(),
        OrderKind::Limit,
        side,
        Price::from_str(price).unwrap(),
        quantity,
        id as i64,
    )
}

fn market(id: u64, side: Side, quantity: u64) -> Order {
    Order::new(
        OrderId::new(id),
        symbol(),
        OrderKind::Market,
        side,
        Price::zero(),
        quantity,
        id as i64,
    )
}

fn engine_with_capture() -> (Arc<MatchingEngine>, Arc<Mutex<Vec<Trade>>>) {
    let engine = Arc::new(MatchingEngine::new());
    let trades = Arc::new(Mutex::new(Vec::new()));
    let sink_trades = Arc::clone(&trades);
    engine.register_trade_sink(Box::new(move |trade| {
        sink_trades.lock().push(trade.clone());
        Ok(())
    }));
    (engine, trades)
}

/// Best bid strictly below best ask, or at least one side empty.
fn assert_uncrossed(engine: &MatchingEngine) {
    let bids = engine.depth(&symbol(), Side::Buy);
    let asks = engine.depth(&symbol(), Side::Sell);
    if let (Some((best_bid, _)), Some((best_ask, _))) = (bids.first(), asks.first()) {
        assert!(best_bid < best_ask, "book is crossed: {best_bid} >= {best_ask}");
    }
}

#[test]
fn simple_full_match() {
    let (engine, trades) = engine_with_capture();

    engine.add_order(limit(1, Side::Buy, "101", 50)).unwrap();
    engine.add_order(limit(2, Side::Sell, "101", 50)).unwrap();

    let trades = trades.lock();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].quantity, 50);
    assert_eq!(trades[0].price, Price::from_u64(101));
    assert_eq!(trades[0].resting_order_id, OrderId::new(1));
    assert_eq!(trades[0].aggressive_order_id, OrderId::new(2));
    assert_eq!(trades[0].taker_side, Side::Sell);

    assert!(engine.depth(&symbol(), Side::Buy).is_empty());
    assert!(engine.depth(&symbol(), Side::Sell).is_empty());
}

#[test]
fn partial_match_leaves_remainder_resting() {
    let (engine, trades) = engine_with_capture();

    engine.add_order(limit(1, Side::Sell, "99.5", 100)).unwrap();
    engine.add_order(limit(2, Side::Buy, "99.5", 20)).unwrap();

    let trades = trades.lock();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].quantity, 20);
    assert_eq!(trades[0].price, Price::from_str("99.5").unwrap());
    assert_eq!(trades[0].resting_order_id, OrderId::new(1));

    assert_eq!(
        engine.depth(&symbol(), Side::Sell),
        vec![(Price::from_str("99.5").unwrap(), 80)]
    );
    assert!(engine.depth(&symbol(), Side::Buy).is_empty());
}

#[test]
fn price_time_priority_prefers_better_bid() {
    let (engine, trades) = engine_with_capture();

    engine.add_order(limit(1, Side::Buy, "100", 10)).unwrap();
    engine.add_order(limit(2, Side::Buy, "101", 20)).unwrap();
    engine.add_order(limit(3, Side::Sell, "100.5", 50)).unwrap();

    let trades = trades.lock();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].quantity, 20);
    // The resting better bid sets the fill price
    assert_eq!(trades[0].price, Price::from_u64(101));
    assert_eq!(trades[0].resting_order_id, OrderId::new(2));

    assert_eq!(
        engine.depth(&symbol(), Side::Buy),
        vec![(Price::from_u64(100), 10)]
    );
    assert_eq!(
        engine.depth(&symbol(), Side::Sell),
        vec![(Price::from_str("100.5").unwrap(), 30)]
    );
}

#[test]
fn time_priority_within_level_is_fifo() {
    let (engine, trades) = engine_with_capture();

    engine.add_order(limit(1, Side::Sell, "100", 10)).unwrap();
    engine.add_order(limit(2, Side::Sell, "100", 10)).unwrap();
    engine.add_order(limit(3, Side::Buy, "100", 10)).unwrap();

    let trades = trades.lock();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].resting_order_id, OrderId::new(1));
}

#[test]
fn cancelled_order_is_swept_not_matched() {
    let (engine, trades) = engine_with_capture();

    engine.add_order(limit(1, Side::Buy, "100", 10)).unwrap();
    engine.cancel_order(OrderId::new(1));
    engine.add_order(limit(2, Side::Sell, "100", 1)).unwrap();

    assert!(trades.lock().is_empty());
    assert!(engine.depth(&symbol(), Side::Buy).is_empty());
    assert_eq!(
        engine.depth(&symbol(), Side::Sell),
        vec![(Price::from_u64(100), 1)]
    );
}

#[test]
fn cancel_is_visible_to_depth_before_sweep() {
    let (engine, _trades) = engine_with_capture();

    engine.add_order(limit(1, Side::Buy, "100", 10)).unwrap();
    engine.add_order(limit(2, Side::Buy, "100", 5)).unwrap();
    engine.cancel_order(OrderId::new(1));

    // The cancelled entry still sits in the level but contributes nothing
    assert_eq!(
        engine.depth(&symbol(), Side::Buy),
        vec![(Price::from_u64(100), 5)]
    );
}

#[test]
fn cancel_behind_live_head_takes_effect_at_its_turn() {
    let (engine, trades) = engine_with_capture();

    engine.add_order(limit(1, Side::Sell, "100", 10)).unwrap();
    engine.add_order(limit(2, Side::Sell, "100", 10)).unwrap();
    engine.cancel_order(OrderId::new(2));

    // Takes the live head, then the cancelled entry yields nothing
    engine.add_order(limit(3, Side::Buy, "100", 20)).unwrap();

    let trades = trades.lock();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].resting_order_id, OrderId::new(1));
    assert_eq!(trades[0].quantity, 10);
    assert!(engine.depth(&symbol(), Side::Sell).is_empty());
    assert_eq!(
        engine.depth(&symbol(), Side::Buy),
        vec![(Price::from_u64(100), 10)]
    );
}

#[test]
fn cancel_is_idempotent() {
    let (engine, _trades) = engine_with_capture();

    engine.add_order(limit(1, Side::Buy, "100", 10)).unwrap();
    engine.cancel_order(OrderId::new(1));
    engine.cancel_order(OrderId::new(1));
    engine.cancel_order(OrderId::new(999));

    assert!(engine.depth(&symbol(), Side::Buy).is_empty());
}

#[test]
fn market_order_sweeps_levels_and_discards_residual() {
    let (engine, trades) = engine_with_capture();

    engine.add_order(limit(1, Side::Sell, "100", 10)).unwrap();
    engine.add_order(limit(2, Side::Sell, "101", 10)).unwrap();
    engine.add_order(market(3, Side::Buy, 25)).unwrap();

    let trades = trades.lock();
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].price, Price::from_u64(100));
    assert_eq!(trades[0].quantity, 10);
    assert_eq!(trades[0].resting_order_id, OrderId::new(1));
    assert_eq!(trades[1].price, Price::from_u64(101));
    assert_eq!(trades[1].quantity, 10);

    // Residual 5 never rests
    assert!(engine.depth(&symbol(), Side::Buy).is_empty());
    assert!(engine.depth(&symbol(), Side::Sell).is_empty());
}

#[test]
fn market_order_against_empty_book_is_discarded() {
    let (engine, trades) = engine_with_capture();

    engine.add_order(market(1, Side::Sell, 10)).unwrap();

    assert!(trades.lock().is_empty());
    assert!(engine.depth(&symbol(), Side::Buy).is_empty());
    assert!(engine.depth(&symbol(), Side::Sell).is_empty());
}

#[test]
fn market_order_skips_cancelled_heads() {
    let (engine, trades) = engine_with_capture();

    engine.add_order(limit(1, Side::Sell, "100", 10)).unwrap();
    engine.add_order(limit(2, Side::Sell, "100", 7)).unwrap();
    engine.cancel_order(OrderId::new(1));
    engine.add_order(market(3, Side::Buy, 7)).unwrap();

    let trades = trades.lock();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].resting_order_id, OrderId::new(2));
    assert_eq!(trades[0].quantity, 7);
}

#[test]
fn sink_failure_does_not_abort_matching() {
    let engine = MatchingEngine::new();
    let calls = Arc::new(Mutex::new(0usize));
    let sink_calls = Arc::clone(&calls);
    engine.register_trade_sink(Box::new(move |_trade| {
        *sink_calls.lock() += 1;
        Err("downstream unavailable".into())
    }));

    engine.add_order(limit(1, Side::Sell, "100", 5)).unwrap();
    engine.add_order(limit(2, Side::Sell, "101", 5)).unwrap();
    // Crosses both levels; the second fill must still happen
    engine.add_order(limit(3, Side::Buy, "101", 10)).unwrap();

    assert_eq!(*calls.lock(), 2);
    assert!(engine.depth(&symbol(), Side::Sell).is_empty());
    assert!(engine.depth(&symbol(), Side::Buy).is_empty());
}

#[test]
fn quantity_is_conserved_across_fills() {
    let (engine, trades) = engine_with_capture();

    let buys: &[(u64, &str, u64)] = &[(1, "100", 30), (2, "101", 20), (3, "99", 40)];
    let sells: &[(u64, &str, u64)] = &[(4, "100.5", 25), (5, "101", 10), (6, "103", 50)];

    let mut admitted_buy = 0u64;
    for &(id, price, qty) in buys {
        engine.add_order(limit(id, Side::Buy, price, qty)).unwrap();
        admitted_buy += qty;
    }
    let mut admitted_sell = 0u64;
    for &(id, price, qty) in sells {
        engine.add_order(limit(id, Side::Sell, price, qty)).unwrap();
        admitted_sell += qty;
    }

    let traded: u64 = trades.lock().iter().map(|t| t.quantity).sum();
    let resting_buy: u64 = engine
        .depth(&symbol(), Side::Buy)
        .iter()
        .map(|(_, q)| q)
        .sum();
    let resting_sell: u64 = engine
        .depth(&symbol(), Side::Sell)
        .iter()
        .map(|(_, q)| q)
        .sum();

    // Every admitted unit is either still resting or was traded exactly once
    assert_eq!(admitted_buy, resting_buy + traded);
    assert_eq!(admitted_sell, resting_sell + traded);
    assert_uncrossed(&engine);
}

#[test]
fn per_order_fill_totals_match_originals() {
    let (engine, trades) = engine_with_capture();

    engine.add_order(limit(1, Side::Sell, "100", 40)).unwrap();
    engine.add_order(limit(2, Side::Buy, "100", 15)).unwrap();
    engine.add_order(limit(3, Side::Buy, "100", 25)).unwrap();

    let trades = trades.lock();
    let filled_against_1: u64 = trades
        .iter()
        .filter(|t| t.resting_order_id == OrderId::new(1))
        .map(|t| t.quantity)
        .sum();
    assert_eq!(filled_against_1, 40);
    assert!(engine.depth(&symbol(), Side::Sell).is_empty());
}

#[test]
fn trades_are_emitted_in_sequence_order() {
    let (engine, trades) = engine_with_capture();

    for id in 1..=5u64 {
        engine.add_order(limit(id, Side::Sell, "100", 10)).unwrap();
    }
    engine.add_order(limit(6, Side::Buy, "100", 50)).unwrap();

    let trades = trades.lock();
    assert_eq!(trades.len(), 5);
    for (i, trade) in trades.iter().enumerate() {
        assert_eq!(trade.trade_id, TradeId::new((i + 1) as u64));
        assert_eq!(trade.resting_order_id, OrderId::new((i + 1) as u64));
    }
}

#[test]
fn concurrent_ingress_cancel_and_snapshot() {
    let (engine, trades) = engine_with_capture();

    let submitter = {
        let engine = Arc::clone(&engine);
        std::thread::spawn(move || {
            for i in 0..500u64 {
                let (side, price) = if i % 2 == 0 {
                    (Side::Buy, "99")
                } else {
                    (Side::Sell, "101")
                };
                engine.add_order(limit(i + 1, side, price, 10)).unwrap();
                if i % 7 == 0 {
                    // Occasionally cross the spread
                    engine
                        .add_order(limit(10_000 + i, Side::Buy, "101", 5))
                        .unwrap();
                }
            }
        })
    };

    let canceller = {
        let engine = Arc::clone(&engine);
        std::thread::spawn(move || {
            for i in (0..500u64).step_by(3) {
                // May race ahead of the submitter; cancel is a no-op then
                engine.cancel_order(OrderId::new(i + 1));
            }
        })
    };

    let snapshotter = {
        let engine = Arc::clone(&engine);
        std::thread::spawn(move || {
            for _ in 0..200 {
                let bids = engine.depth(&symbol(), Side::Buy);
                let asks = engine.depth(&symbol(), Side::Sell);
                // A snapshot is internally consistent: never crossed
                if let (Some((bb, _)), Some((ba, _))) = (bids.first(), asks.first()) {
                    assert!(bb < ba);
                }
            }
        })
    };

    submitter.join().unwrap();
    canceller.join().unwrap();
    snapshotter.join().unwrap();

    assert_uncrossed(&engine);
    // Every trade paired one buy and one sell at a positive quantity
    for trade in trades.lock().iter() {
        assert!(trade.quantity > 0);
        assert_ne!(trade.resting_order_id, trade.aggressive_order_id);
    }
}
