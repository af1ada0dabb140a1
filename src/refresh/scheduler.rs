use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::refresh::coordinator::Refresher;
use crate::sources::HealthCheck;

/// Refreshes once immediately and then every `interval` until `shutdown`
/// fires. Each tick starts its own task, so a slow refresh is cancelled by
/// the next tick rather than delaying it.
pub fn spawn_periodic(
    refresher: Arc<Refresher>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Refreshing leaderboard every {}s", interval.as_secs());
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    refresher.cancel_in_flight();
                    info!("Refresh scheduler stopped");
                    break;
                }
                _ = ticker.tick() => {
                    refresher.spawn_refresh();
                }
            }
        }
    })
}

/// Pings `health` immediately and then every `interval` until `shutdown`.
pub fn spawn_keep_alive(
    health: HealthCheck,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Keep-alive pings to {} every {}s", health.url(), interval.as_secs());
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let healthy = health.check().await;
                    info!("Keep-alive ping {}", if healthy { "successful" } else { "failed" });
                }
            }
        }
    })
}
