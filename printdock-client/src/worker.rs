//! Background refresh worker
//!
//! Reloads the printer board on a fixed interval and whenever a push source
//! calls [`Dashboard::nudge`]. Each reload runs as its own task; the board's
//! refresh tickets decide which snapshot is shown, so slow responses never
//! overwrite newer ones.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::PrinterApi;
use crate::dashboard::Dashboard;

pub struct RefreshWorker<A> {
    dashboard: Arc<Dashboard<A>>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl<A: PrinterApi + 'static> RefreshWorker<A> {
    pub fn new(
        dashboard: Arc<Dashboard<A>>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            dashboard,
            interval,
            shutdown,
        }
    }

    /// Spawn the worker onto the current runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(self) {
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            "Printer refresh worker started"
        );
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Printer refresh worker received shutdown signal");
                    return;
                }
                _ = ticker.tick() => self.spawn_refresh("interval"),
                _ = self.dashboard.nudged() => self.spawn_refresh("nudge"),
            }
        }
    }

    fn spawn_refresh(&self, trigger: &'static str) {
        let dashboard = self.dashboard.clone();
        tokio::spawn(async move {
            match dashboard.refresh().await {
                Ok(true) => tracing::debug!(trigger, "Printer list refreshed"),
                Ok(false) => tracing::debug!(trigger, "Refresh superseded by a newer snapshot"),
                Err(e) => tracing::warn!(trigger, error = %e, "Printer refresh failed"),
            }
        });
    }
}
