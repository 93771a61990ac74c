//! Agent watchdog
//!
//! Agents report on their own schedule. When a shop's agent goes quiet its
//! printers would keep showing `online` forever, so this task periodically
//! flips printers without a recent report to `offline`.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::registry::PrinterRegistry;

pub struct AgentWatchdog {
    registry: PrinterRegistry,
    offline_after: Duration,
    interval: Duration,
    shutdown: CancellationToken,
}

impl AgentWatchdog {
    pub fn new(
        registry: PrinterRegistry,
        offline_after: Duration,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            registry,
            offline_after,
            interval,
            shutdown,
        }
    }

    pub async fn run(self) {
        tracing::info!(
            offline_after_secs = self.offline_after.as_secs(),
            "Agent watchdog started"
        );
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.sweep(),
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Agent watchdog received shutdown signal");
                    return;
                }
            }
        }
    }

    fn sweep(&self) {
        let Ok(window) = chrono::Duration::from_std(self.offline_after) else {
            tracing::error!("Agent offline window out of range, skipping sweep");
            return;
        };
        let changed = self.registry.mark_stale(chrono::Utc::now() - window);
        if changed > 0 {
            tracing::info!(changed, "Printers marked offline after agent silence");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use shared::models::{AgentPrinterReport, AgentReport, AgentStatus};

    #[tokio::test]
    async fn test_watchdog_marks_silent_printers_and_stops() {
        let registry = PrinterRegistry::new();
        let report = AgentReport {
            printers: vec![AgentPrinterReport {
                printer_id: "p1".into(),
                name: None,
                capabilities: json!({}),
                status: AgentStatus::Online,
            }],
        };
        registry.ingest_report("s", &report, Utc::now() - chrono::Duration::minutes(5));

        let shutdown = CancellationToken::new();
        let watchdog = AgentWatchdog::new(
            registry.clone(),
            Duration::from_secs(60),
            Duration::from_millis(10),
            shutdown.clone(),
        );
        let handle = tokio::spawn(watchdog.run());

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();
        handle.await.unwrap();

        assert_eq!(
            registry.get("s", "p1").unwrap().agent_detected.status,
            AgentStatus::Offline
        );
    }
}
