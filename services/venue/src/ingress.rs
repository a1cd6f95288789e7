//! Ingress loop
//!
//! Drains the market-data queue and feeds the admission pipeline. Exits
//! when the upstream hangs up (channel disconnect) or the running flag
//! clears; either way it logs its terminal counters.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::admission::AdmissionPipeline;
use types::order::OrderMessage;

/// How long to block on the queue before re-checking the running flag.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run(
    receiver: Receiver<OrderMessage>,
    pipeline: Arc<AdmissionPipeline>,
    running: Arc<AtomicBool>,
) {
    tracing::info!("ingress started");

    while running.load(Ordering::Relaxed) {
        match receiver.recv_timeout(POLL_INTERVAL) {
            Ok(message) => match pipeline.submit(message) {
                Ok(order_id) => tracing::debug!(%order_id, "order admitted"),
                Err(rejection) => tracing::warn!(%rejection, "order dropped"),
            },
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                tracing::info!("upstream disconnected; ingress exiting");
                break;
            }
        }
    }

    let stats = pipeline.stats();
    tracing::info!(
        processed = stats.processed,
        admitted = stats.admitted,
        rejected = stats.rejected,
        "ingress stopped"
    );
}
