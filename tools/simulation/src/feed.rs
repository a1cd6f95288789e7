//! Synthetic exchange feed
//!
//! Generates a deterministic stream of order messages: a jittered two-sided
//! market rotating across the configured symbols, with a periodic oversized
//! order aimed at the position limit and the occasional market order. All
//! randomness comes from a seeded ChaCha8 RNG, so a given seed always
//! replays the same feed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use types::order::{OrderKind, OrderMessage, Side};

/// Configuration for the synthetic feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Symbols to rotate through, one per cycle.
    pub symbols: Vec<String>,
    /// Per-symbol base price, parallel to `symbols`.
    pub base_prices: Vec<f64>,
    /// RNG seed; a fixed seed replays the same feed.
    pub seed: u64,
    /// Total feed duration.
    pub duration: Duration,
    /// Pause between cycles.
    pub cycle_interval: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            symbols: vec![
                "BTC-USD".to_string(),
                "ETH-USD".to_string(),
                "SOL-USD".to_string(),
            ],
            base_prices: vec![50_000.0, 3_000.0, 150.0],
            seed: 7,
            duration: Duration::from_secs(30),
            cycle_interval: Duration::from_millis(50),
        }
    }
}

/// Deterministic order-message generator.
pub struct FeedSimulator {
    config: FeedConfig,
    rng: ChaCha8Rng,
    cycle: u64,
}

impl FeedSimulator {
    pub fn new(config: FeedConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            cycle: 0,
        }
    }

    /// Generate one cycle's worth of messages.
    ///
    /// Each cycle quotes a two-sided market in the next symbol: a buy a
    /// little around the base price and a sell a small spread above it.
    /// Every 5th cycle adds an oversized order meant to trip the position
    /// limit, and every 9th a market order that takes liquidity.
    pub fn next_cycle(&mut self) -> Vec<OrderMessage> {
        self.cycle += 1;
        let idx = ((self.cycle - 1) as usize) % self.config.symbols.len();
        let symbol = self.config.symbols[idx].clone();
        let base = self.config.base_prices[idx];

        let variation: f64 = self.rng.gen_range(-5.0..5.0);
        let buy_price = round_tick(base + variation);
        let sell_price = round_tick(buy_price + base * 0.001);

        let mut messages = vec![
            OrderMessage {
                symbol: symbol.clone(),
                side: Side::Buy,
                kind: OrderKind::Limit,
                price: buy_price,
                quantity: self.rng.gen_range(10..=60),
            },
            OrderMessage {
                symbol: symbol.clone(),
                side: Side::Sell,
                kind: OrderKind::Limit,
                price: sell_price,
                quantity: self.rng.gen_range(5..=30),
            },
        ];

        if self.cycle % 5 == 0 {
            // Oversized order to exercise the position limit
            let side = if self.cycle % 10 == 0 {
                Side::Buy
            } else {
                Side::Sell
            };
            let price = match side {
                Side::Buy => round_tick(buy_price - 1.0),
                Side::Sell => round_tick(sell_price + 1.0),
            };
            messages.push(OrderMessage {
                symbol: symbol.clone(),
                side,
                kind: OrderKind::Limit,
                price,
                quantity: 100,
            });
        }

        if self.cycle % 9 == 0 {
            messages.push(OrderMessage {
                symbol,
                side: if self.cycle % 2 == 0 {
                    Side::Buy
                } else {
                    Side::Sell
                },
                kind: OrderKind::Market,
                price: 0.0,
                quantity: self.rng.gen_range(1..=10),
            });
        }

        messages
    }

    /// Drive the feed into `tx` until the configured duration elapses, the
    /// running flag clears, or the consumer hangs up. Consumes the sender,
    /// so returning closes the channel and signals upstream disconnect.
    pub fn run(mut self, tx: Sender<OrderMessage>, running: &AtomicBool) {
        let started = Instant::now();
        tracing::info!(
            duration_secs = self.config.duration.as_secs(),
            symbols = self.config.symbols.len(),
            seed = self.config.seed,
            "feed simulator started"
        );

        while running.load(Ordering::Relaxed) && started.elapsed() < self.config.duration {
            for message in self.next_cycle() {
                if tx.send(message).is_err() {
                    tracing::info!("feed consumer hung up; stopping simulator");
                    return;
                }
            }
            std::thread::sleep(self.config.cycle_interval);
        }

        tracing::info!(cycles = self.cycle, "feed simulation complete");
    }
}

/// Round to two decimal places, the venue's display tick.
fn round_tick(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FeedConfig {
        FeedConfig {
            seed: 42,
            ..FeedConfig::default()
        }
    }

    #[test]
    fn test_same_seed_replays_same_feed() {
        let mut a = FeedSimulator::new(config());
        let mut b = FeedSimulator::new(config());

        for _ in 0..50 {
            assert_eq!(a.next_cycle(), b.next_cycle());
        }
    }

    #[test]
    fn test_cycles_rotate_symbols() {
        let mut sim = FeedSimulator::new(config());
        let first = sim.next_cycle();
        let second = sim.next_cycle();
        let third = sim.next_cycle();
        let fourth = sim.next_cycle();

        assert_eq!(first[0].symbol, "BTC-USD");
        assert_eq!(second[0].symbol, "ETH-USD");
        assert_eq!(third[0].symbol, "SOL-USD");
        assert_eq!(fourth[0].symbol, "BTC-USD");
    }

    #[test]
    fn test_messages_are_well_formed() {
        let mut sim = FeedSimulator::new(config());
        for _ in 0..100 {
            for message in sim.next_cycle() {
                assert!(!message.symbol.is_empty());
                assert!(message.quantity > 0);
                match message.kind {
                    OrderKind::Limit => assert!(message.price > 0.0),
                    OrderKind::Market => assert_eq!(message.price, 0.0),
                }
            }
        }
    }

    #[test]
    fn test_every_fifth_cycle_is_oversized() {
        let mut sim = FeedSimulator::new(config());
        for cycle in 1..=20u64 {
            let messages = sim.next_cycle();
            let has_oversized = messages.iter().any(|m| m.quantity == 100);
            assert_eq!(has_oversized, cycle % 5 == 0, "cycle {cycle}");
        }
    }

    #[test]
    fn test_quotes_straddle_the_base_price() {
        let mut sim = FeedSimulator::new(config());
        let messages = sim.next_cycle();
        let buy = &messages[0];
        let sell = &messages[1];
        assert_eq!(buy.side, Side::Buy);
        assert_eq!(sell.side, Side::Sell);
        assert!(sell.price > buy.price, "spread must be positive");
    }
}
