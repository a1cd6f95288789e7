//! Console dashboard
//!
//! The visualization consumer: periodically reads depth, position, and
//! trade-history snapshots and renders them as log lines. Everything read
//! here is a value copy; no engine state is retained between frames.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use market_data::TradeTail;
use matching_engine::MatchingEngine;
use risk_engine::RiskEngine;
use types::numeric::Price;
use types::order::Side;

pub fn run(
    engine: Arc<MatchingEngine>,
    risk: Arc<RiskEngine>,
    tail: Arc<TradeTail>,
    refresh: Duration,
    running: Arc<AtomicBool>,
) {
    tracing::info!(refresh_ms = refresh.as_millis() as u64, "dashboard started");

    while running.load(Ordering::Relaxed) {
        std::thread::sleep(refresh);
        render(&engine, &risk, &tail);
    }

    // One closing frame so the final book state is visible
    render(&engine, &risk, &tail);
    tracing::info!("dashboard stopped");
}

fn render(engine: &MatchingEngine, risk: &RiskEngine, tail: &TradeTail) {
    for symbol in engine.symbols() {
        let bids = engine.depth(&symbol, Side::Buy);
        let asks = engine.depth(&symbol, Side::Sell);
        if bids.is_empty() && asks.is_empty() {
            continue;
        }
        tracing::info!(
            symbol = %symbol,
            best_bid = %format_top(bids.first()),
            best_ask = %format_top(asks.first()),
            bid_levels = bids.len(),
            ask_levels = asks.len(),
            "book"
        );
    }

    for position in risk.positions() {
        tracing::info!(
            symbol = %position.symbol,
            net_position = position.net_position,
            avg_entry_price = %position.avg_entry_price,
            realized_pnl = %position.realized_pnl,
            "position"
        );
    }

    if let Some(trade) = tail.latest() {
        tracing::info!(
            trade_id = %trade.trade_id,
            symbol = %trade.symbol,
            price = %trade.price,
            quantity = trade.quantity,
            history_len = tail.len(),
            "last trade"
        );
    }
}

fn format_top(level: Option<&(Price, u64)>) -> String {
    match level {
        Some((price, quantity)) => format!("{quantity}@{price}"),
        None => "-".to_string(),
    }
}
