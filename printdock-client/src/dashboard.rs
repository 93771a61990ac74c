//! Dashboard controller
//!
//! Glues a [`PrinterApi`] to a [`PrinterBoard`]. The board lock is only
//! held between awaits, never across one.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use shared::models::{
    DisplayPrinter, OverrideDraft, OverridePatch, PrinterRecord, StatusChange, SyncTicket,
};
use tokio::sync::Notify;

use crate::api::PrinterApi;
use crate::board::{PrinterBoard, StatusCommand};
use crate::{ClientError, ClientResult};

/// Transient message for the operator, e.g. after a rolled-back toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub printer_id: String,
    pub message: String,
    pub code: Option<u16>,
    pub at: DateTime<Utc>,
}

impl Notice {
    fn from_error(printer_id: &str, err: &ClientError) -> Self {
        let (message, code) = match err {
            ClientError::Api { code, message, .. } => (message.clone(), Some(*code)),
            other if other.is_network() => (
                "Could not reach the printer service; change reverted".to_string(),
                None,
            ),
            other => (other.to_string(), None),
        };
        Self {
            printer_id: printer_id.to_string(),
            message,
            code,
            at: Utc::now(),
        }
    }
}

/// Result of an optimistic toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Committed(StatusChange),
    RolledBack(Notice),
}

pub struct Dashboard<A> {
    api: A,
    board: Mutex<PrinterBoard>,
    nudge: Notify,
}

impl<A: PrinterApi> Dashboard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            board: Mutex::new(PrinterBoard::new()),
            nudge: Notify::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Current display records
    pub fn printers(&self) -> Vec<DisplayPrinter> {
        self.board.lock().printers().to_vec()
    }

    pub fn printer(&self, printer_id: &str) -> Option<DisplayPrinter> {
        self.board.lock().printer(printer_id).cloned()
    }

    /// Editable form of a printer's current manual override
    pub fn draft(&self, printer_id: &str) -> Option<OverrideDraft> {
        let board = self.board.lock();
        board
            .record(printer_id)
            .map(|r| OverrideDraft::from_override(r.manual_override.as_ref()))
    }

    /// Fetch the printer list; `Ok(false)` when a newer snapshot won
    pub async fn refresh(&self) -> ClientResult<bool> {
        let ticket = self.board.lock().begin_refresh();
        let records = self.api.list_printers().await?;
        Ok(self.board.lock().apply_snapshot(ticket, records))
    }

    /// Push hook: ask the refresh worker to reload now
    pub fn nudge(&self) {
        self.nudge.notify_one();
    }

    pub(crate) async fn nudged(&self) {
        self.nudge.notified().await;
    }

    /// Flip a printer's switch optimistically
    ///
    /// The board changes immediately. On failure it is rolled back and a
    /// [`Notice`] is returned; there is no retry. `Err` is reserved for
    /// toggles that could not start (unknown printer, toggle in flight).
    pub async fn toggle(&self, printer_id: &str) -> ClientResult<ToggleOutcome> {
        let mut command: StatusCommand = self.board.lock().begin_toggle(printer_id)?;

        match self.api.set_manual_status(printer_id, command.target).await {
            Ok(change) => {
                self.board.lock().commit(&mut command, &change);
                if change.redirected {
                    tracing::info!(
                        printer_id = %printer_id,
                        "Printer busy, turn-off deferred until its job completes"
                    );
                }
                Ok(ToggleOutcome::Committed(change))
            }
            Err(err) => {
                let restored = self.board.lock().rollback(&mut command);
                tracing::warn!(
                    printer_id = %printer_id,
                    restored = %restored,
                    error = %err,
                    "Status change failed, rolled back"
                );
                Ok(ToggleOutcome::RolledBack(Notice::from_error(printer_id, &err)))
            }
        }
    }

    /// Send only the fields that differ from the stored override
    ///
    /// Returns `Ok(None)` when nothing changed and no request was made.
    pub async fn save_override(
        &self,
        printer_id: &str,
        edited: &OverrideDraft,
    ) -> ClientResult<Option<PrinterRecord>> {
        let current = self
            .draft(printer_id)
            .ok_or_else(|| ClientError::NotFound(format!("Printer {printer_id}")))?;

        let patch = OverridePatch::diff(&current, edited);
        if patch.is_empty() {
            return Ok(None);
        }

        match self.api.patch_override(printer_id, &patch).await {
            Ok(record) => {
                self.board.lock().upsert_record(record.clone());
                Ok(Some(record))
            }
            Err(err) => {
                tracing::warn!(printer_id = %printer_id, error = %err, "Override save failed");
                Err(err)
            }
        }
    }

    /// Ask the agent to re-detect a printer
    pub async fn force_sync(&self, printer_id: &str) -> ClientResult<SyncTicket> {
        self.api.force_sync(printer_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use shared::models::{BadgeStatus, Capabilities, CapabilityType, ManualStatus};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// In-memory stand-in for the printer service
    #[derive(Default)]
    struct FakeApi {
        records: Mutex<Vec<PrinterRecord>>,
        fail_status: AtomicBool,
        patches: Mutex<Vec<OverridePatch>>,
    }

    impl FakeApi {
        fn with(records: Vec<serde_json::Value>) -> Self {
            let api = Self::default();
            *api.records.lock() = records
                .into_iter()
                .map(|v| serde_json::from_value(v).unwrap())
                .collect();
            api
        }
    }

    #[async_trait]
    impl PrinterApi for FakeApi {
        async fn list_printers(&self) -> ClientResult<Vec<PrinterRecord>> {
            Ok(self.records.lock().clone())
        }

        async fn get_printer(&self, printer_id: &str) -> ClientResult<PrinterRecord> {
            self.records
                .lock()
                .iter()
                .find(|r| r.printer_id == printer_id)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(printer_id.into()))
        }

        async fn patch_override(
            &self,
            printer_id: &str,
            patch: &OverridePatch,
        ) -> ClientResult<PrinterRecord> {
            self.patches.lock().push(patch.clone());
            let mut records = self.records.lock();
            let record = records
                .iter_mut()
                .find(|r| r.printer_id == printer_id)
                .ok_or_else(|| ClientError::NotFound(printer_id.into()))?;
            record.manual_override = Some(patch.apply(record.manual_override.as_ref()));
            Ok(record.clone())
        }

        async fn set_manual_status(
            &self,
            printer_id: &str,
            status: ManualStatus,
        ) -> ClientResult<StatusChange> {
            if self.fail_status.load(Ordering::SeqCst) {
                return Err(ClientError::Api {
                    code: 9201,
                    message: "Printer agent is unavailable".into(),
                    details: None,
                });
            }
            let mut records = self.records.lock();
            let record = records
                .iter_mut()
                .find(|r| r.printer_id == printer_id)
                .ok_or_else(|| ClientError::NotFound(printer_id.into()))?;
            let previous = record.manual_status;
            record.manual_status = status;
            Ok(StatusChange {
                printer_id: printer_id.into(),
                previous,
                manual_status: status,
                redirected: false,
            })
        }

        async fn force_sync(&self, printer_id: &str) -> ClientResult<SyncTicket> {
            Ok(SyncTicket {
                sync_id: "sync-1".into(),
                printer_id: printer_id.into(),
                requested_at: Utc::now(),
            })
        }
    }

    fn dashboard() -> Dashboard<FakeApi> {
        Dashboard::new(FakeApi::with(vec![json!({
            "printerid": "p1",
            "agentDetected": {
                "name": "HP-1",
                "capabilities": [{"type": "B/W", "duplex": true, "paperSizes": ["A4"]}],
                "status": "online"
            },
            "manualStatus": "on"
        })]))
    }

    #[tokio::test]
    async fn test_refresh_populates_board() {
        let dashboard = dashboard();
        assert!(dashboard.printers().is_empty());
        assert!(dashboard.refresh().await.unwrap());

        let printer = dashboard.printer("p1").unwrap();
        assert_eq!(printer.name, "HP-1");
        assert_eq!(printer.badge_status, BadgeStatus::Online);
    }

    #[tokio::test]
    async fn test_toggle_commits() {
        let dashboard = dashboard();
        dashboard.refresh().await.unwrap();

        let ToggleOutcome::Committed(change) = dashboard.toggle("p1").await.unwrap() else {
            panic!("expected commit");
        };
        assert_eq!(change.manual_status, ManualStatus::Off);
        assert!(!dashboard.printer("p1").unwrap().is_enabled);
    }

    #[tokio::test]
    async fn test_failed_toggle_rolls_back_with_notice() {
        let dashboard = dashboard();
        dashboard.refresh().await.unwrap();
        dashboard.api().fail_status.store(true, Ordering::SeqCst);

        let outcome = dashboard.toggle("p1").await.unwrap();
        let ToggleOutcome::RolledBack(notice) = outcome else {
            panic!("expected rollback");
        };
        assert_eq!(notice.printer_id, "p1");
        assert_eq!(notice.code, Some(9201));

        let printer = dashboard.printer("p1").unwrap();
        assert!(printer.is_enabled);
        assert_eq!(printer.badge_status, BadgeStatus::Online);

        // Not stuck: the next toggle can start
        dashboard.api().fail_status.store(false, Ordering::SeqCst);
        assert!(matches!(
            dashboard.toggle("p1").await.unwrap(),
            ToggleOutcome::Committed(_)
        ));
    }

    #[tokio::test]
    async fn test_toggle_unknown_printer_is_an_error() {
        let dashboard = dashboard();
        assert!(matches!(
            dashboard.toggle("p1").await,
            Err(ClientError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_save_override_sends_only_changes() {
        let dashboard = dashboard();
        dashboard.refresh().await.unwrap();

        let mut edited = dashboard.draft("p1").unwrap();
        assert_eq!(edited.capabilities, Capabilities::default());
        edited.capabilities.kind = Some("Color".into());

        let record = dashboard.save_override("p1", &edited).await.unwrap();
        assert!(record.is_some());

        let patches = dashboard.api().patches.lock().clone();
        assert_eq!(
            serde_json::to_value(&patches[0]).unwrap(),
            json!({"capabilities": {"type": "Color"}})
        );

        let printer = dashboard.printer("p1").unwrap();
        assert_eq!(printer.capability_type, CapabilityType::Color);
        assert!(printer.duplex);
        assert_eq!(printer.paper_sizes, vec!["A4"]);
    }

    #[tokio::test]
    async fn test_save_override_without_changes_skips_request() {
        let dashboard = dashboard();
        dashboard.refresh().await.unwrap();

        let unchanged = dashboard.draft("p1").unwrap();
        assert!(dashboard.save_override("p1", &unchanged).await.unwrap().is_none());
        assert!(dashboard.api().patches.lock().is_empty());
    }
}
