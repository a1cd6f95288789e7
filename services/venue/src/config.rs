//! Runtime configuration
//!
//! Loaded from a TOML file; a missing or invalid file falls back to the
//! built-in defaults with a warning, so the demo always starts.

use serde::Deserialize;
use std::time::Duration;

use simulation::FeedConfig;

/// Top-level venue configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VenueConfig {
    /// Per-symbol absolute net-position cap.
    pub max_position_limit: i64,
    /// Trade-history tail length.
    pub trade_history_capacity: usize,
    pub feed: FeedSection,
    pub dashboard: DashboardSection,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            max_position_limit: 80,
            trade_history_capacity: 50,
            feed: FeedSection::default(),
            dashboard: DashboardSection::default(),
        }
    }
}

/// Synthetic feed settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedSection {
    pub symbols: Vec<String>,
    pub base_prices: Vec<f64>,
    pub seed: u64,
    pub duration_secs: u64,
    pub cycle_interval_ms: u64,
    /// Bound of the ingress message queue.
    pub queue_depth: usize,
}

impl Default for FeedSection {
    fn default() -> Self {
        let feed = FeedConfig::default();
        Self {
            symbols: feed.symbols,
            base_prices: feed.base_prices,
            seed: feed.seed,
            duration_secs: feed.duration.as_secs(),
            cycle_interval_ms: feed.cycle_interval.as_millis() as u64,
            queue_depth: 256,
        }
    }
}

/// Console dashboard settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardSection {
    pub refresh_ms: u64,
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self { refresh_ms: 1000 }
    }
}

impl VenueConfig {
    /// Load configuration from a TOML file, defaulting on any failure.
    pub fn load(path: &str) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) => {
                tracing::warn!(path, %error, "config file unreadable; using defaults");
                return Self::default();
            }
        };
        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(path, %error, "config file invalid; using defaults");
                Self::default()
            }
        }
    }

    /// Feed-simulator view of the configuration.
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            symbols: self.feed.symbols.clone(),
            base_prices: self.feed.base_prices.clone(),
            seed: self.feed.seed,
            duration: Duration::from_secs(self.feed.duration_secs),
            cycle_interval: Duration::from_millis(self.feed.cycle_interval_ms),
        }
    }

    pub fn dashboard_refresh(&self) -> Duration {
        Duration::from_millis(self.dashboard.refresh_ms)
    }
}
