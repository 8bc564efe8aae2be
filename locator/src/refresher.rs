//! Background refresher: periodically re-runs the remote lookup and swallows failures.

use std::sync::Arc;
use std::time::Duration;

use env_config::refresh_period;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::remote::RemoteLocator;
use super::tracer::{Tracer, CATEGORY_META_SERVICE};

/// Spawns a background task that refreshes the address cache every `interval`.
pub struct PeriodicRefresher {
    remote: Arc<RemoteLocator>,
    tracer: Arc<dyn Tracer>,
    interval: Duration,
}

impl PeriodicRefresher {
    /// Create a refresher that will run every `interval`, first after one full `interval`.
    ///
    /// `interval` is clamped to a non-zero period no longer than a year.
    pub fn new(remote: Arc<RemoteLocator>, tracer: Arc<dyn Tracer>, interval: Duration) -> Self {
        Self {
            remote,
            tracer,
            interval: refresh_period(interval),
        }
    }

    /// Spawn the background refresh loop. It stops once `shutdown` is cancelled; a lookup
    /// already in flight is allowed to finish first.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let now = Instant::now();
            let start = now.checked_add(self.interval).unwrap_or(now);
            let mut ticker = tokio::time::interval_at(start, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                tracing::debug!("refresh config services");
                self.tracer.log_event(CATEGORY_META_SERVICE, "periodicRefresh");
                self.remote.try_lookup().await;
            }
            tracing::debug!("config service refresher stopped");
        })
    }
}
