//! Venue entry point
//!
//! Boots the matching engine, risk engine, and trade tail, wires the trade
//! sink, and runs the demo: a feed-simulator thread produces orders, an
//! ingress thread admits them, and a dashboard thread renders snapshots.
//! Shutdown has two triggers: the feed's own timer running out, or Ctrl-C
//! clearing the running flag. Either way the simulator stops, its dropped
//! sender disconnects the ingress, and the flag winds down the dashboard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::anyhow;
use clap::Parser;

use market_data::TradeTail;
use matching_engine::MatchingEngine;
use risk_engine::RiskEngine;
use simulation::FeedSimulator;
use venue::admission::AdmissionPipeline;
use venue::config::VenueConfig;
use venue::{dashboard, ingress};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short = 'c', long = "config", default_value_t = String::from("config/venue.toml"))]
    config: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = VenueConfig::load(&args.config);
    tracing::info!(
        max_position_limit = config.max_position_limit,
        trade_history_capacity = config.trade_history_capacity,
        "venue starting"
    );

    let engine = Arc::new(MatchingEngine::new());
    let risk = Arc::new(RiskEngine::new(config.max_position_limit));
    let tail = Arc::new(TradeTail::new(config.trade_history_capacity));

    // The sink runs inside the matcher's critical section: it takes only
    // the risk and tail locks, never the matcher's, so the lock order is
    // acyclic. Fills are credited to the house on the taker side.
    {
        let risk = Arc::clone(&risk);
        let tail = Arc::clone(&tail);
        engine.register_trade_sink(Box::new(move |trade| {
            risk.on_trade(trade, trade.taker_side, &trade.symbol);
            tail.append(trade.clone());
            Ok(())
        }));
    }

    let pipeline = Arc::new(AdmissionPipeline::new(
        Arc::clone(&engine),
        Arc::clone(&risk),
    ));
    let running = Arc::new(AtomicBool::new(true));

    // Ctrl-C clears the running flag: the simulator stops quoting, its
    // dropped sender disconnects the ingress, and the joins below drain
    let ctrlc_running = Arc::clone(&running);
    ctrlc::set_handler(move || {
        tracing::warn!("received Ctrl+C, initiating graceful shutdown");
        ctrlc_running.store(false, Ordering::Relaxed);
    })?;

    let (tx, rx) = crossbeam_channel::bounded(config.feed.queue_depth);

    let ingress_handle = {
        let pipeline = Arc::clone(&pipeline);
        let running = Arc::clone(&running);
        thread::Builder::new()
            .name("ingress".to_string())
            .spawn(move || ingress::run(rx, pipeline, running))?
    };

    let simulator_handle = {
        let running = Arc::clone(&running);
        let feed = config.feed_config();
        thread::Builder::new()
            .name("feed".to_string())
            // The sender moves into the simulator; its drop on return is
            // what disconnects the ingress loop
            .spawn(move || FeedSimulator::new(feed).run(tx, &running))?
    };

    let dashboard_handle = {
        let engine = Arc::clone(&engine);
        let risk = Arc::clone(&risk);
        let tail = Arc::clone(&tail);
        let running = Arc::clone(&running);
        let refresh = config.dashboard_refresh();
        thread::Builder::new()
            .name("dashboard".to_string())
            .spawn(move || dashboard::run(engine, risk, tail, refresh, running))?
    };

    simulator_handle
        .join()
        .map_err(|_| anyhow!("feed thread panicked"))?;
    ingress_handle
        .join()
        .map_err(|_| anyhow!("ingress thread panicked"))?;

    running.store(false, Ordering::Relaxed);
    dashboard_handle
        .join()
        .map_err(|_| anyhow!("dashboard thread panicked"))?;

    let stats = pipeline.stats();
    tracing::info!(
        processed = stats.processed,
        admitted = stats.admitted,
        rejected = stats.rejected,
        trades = tail.len(),
        "venue stopped"
    );
    Ok(())
}
