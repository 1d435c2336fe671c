//! Background eviction of idle rate limiter entries.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::domain::rate_limiter::RateLimiter;

/// Spawns the periodic sweep task.
///
/// The task runs every `interval` until `shutdown` is cancelled, then exits.
/// Awaiting the returned handle after cancelling the token waits for an
/// in-progress sweep to finish.
pub fn spawn_sweeper(
    limiter: Arc<RateLimiter>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(run_sweeper(limiter, interval, shutdown))
}

/// Sweep loop. Exposed for callers that manage their own task.
pub async fn run_sweeper(
    limiter: Arc<RateLimiter>,
    interval: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await; // first tick completes immediately

    tracing::debug!(interval_secs = interval.as_secs(), "Rate limiter sweeper started");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                let removed = limiter.sweep();
                if removed > 0 {
                    tracing::info!(
                        removed,
                        remaining = limiter.tracked_clients(),
                        "Rate limiter cleanup: removed stale clients"
                    );
                }
            }
        }
    }

    tracing::debug!("Rate limiter sweeper stopped");
}
