//! In-memory printer registry
//!
//! ```text
//! PrinterRegistry
//!   └── shops: shop_id → ShopPrinters
//!         ├── printers: RwLock<printer_id → PrinterEntry { record, jobs }>
//!         └── pending_syncs: Mutex<Vec<SyncTicket>>  (drained by agent reports)
//! ```
//!
//! Agent reports own `agentDetected` and `lastUpdate`; operator calls own
//! `manualOverride` and `manualStatus`. Locks are never held across `.await`.

mod shop;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::one::Ref;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AgentReport, AgentReportAck, AgentStatus, DisplayPrinter, JobCompletion, JobTicket,
    ManualStatus, OverridePatch, PrinterRecord, StatusChange, SyncTicket, build_display,
};

use shop::{PrinterEntry, ShopPrinters};

/// Shared printer registry, cheap to clone
#[derive(Clone, Default)]
pub struct PrinterRegistry {
    shops: Arc<DashMap<String, ShopPrinters>>,
}

impl PrinterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn shop(&self, shop_id: &str) -> AppResult<Ref<'_, String, ShopPrinters>> {
        self.shops
            .get(shop_id)
            .ok_or_else(|| AppError::shop_not_found(shop_id))
    }

    fn with_printer<R>(
        &self,
        shop_id: &str,
        printer_id: &str,
        f: impl FnOnce(&mut PrinterEntry) -> AppResult<R>,
    ) -> AppResult<R> {
        let shop = self.shop(shop_id)?;
        let mut printers = shop.printers.write();
        let entry = printers
            .get_mut(printer_id)
            .ok_or_else(|| AppError::printer_not_found(printer_id))?;
        f(entry)
    }

    /// All printers of a shop; an unknown shop has none
    pub fn list(&self, shop_id: &str) -> Vec<PrinterRecord> {
        self.shops
            .get(shop_id)
            .map(|shop| shop.snapshot())
            .unwrap_or_default()
    }

    pub fn display(&self, shop_id: &str) -> Vec<DisplayPrinter> {
        self.list(shop_id).iter().map(build_display).collect()
    }

    pub fn get(&self, shop_id: &str, printer_id: &str) -> AppResult<PrinterRecord> {
        let shop = self.shop(shop_id)?;
        let printers = shop.printers.read();
        printers
            .get(printer_id)
            .map(|entry| entry.record.clone())
            .ok_or_else(|| AppError::printer_not_found(printer_id))
    }

    /// Upsert agent-owned fields and hand back queued sync requests
    pub fn ingest_report(
        &self,
        shop_id: &str,
        report: &AgentReport,
        now: DateTime<Utc>,
    ) -> AgentReportAck {
        let shop = self
            .shops
            .entry(shop_id.to_string())
            .or_insert_with(ShopPrinters::new)
            .downgrade();

        let mut ack = AgentReportAck::default();
        {
            let mut printers = shop.printers.write();
            for printer in &report.printers {
                if printer.printer_id.trim().is_empty() {
                    tracing::warn!(shop_id = %shop_id, "Agent reported a printer without id, skipping");
                    continue;
                }
                match printers.get_mut(&printer.printer_id) {
                    Some(entry) => entry.record.apply_report(printer, now),
                    None => {
                        printers.insert(
                            printer.printer_id.clone(),
                            PrinterEntry::new(PrinterRecord::from_report(printer, now)),
                        );
                        ack.created.push(printer.printer_id.clone());
                    }
                }
                ack.accepted += 1;
            }
        }
        shop.record_report(now);
        ack.sync_requests = shop.drain_syncs();

        if !ack.created.is_empty() {
            tracing::info!(
                shop_id = %shop_id,
                created = ?ack.created,
                "New printers registered by agent"
            );
        }
        tracing::debug!(
            shop_id = %shop_id,
            accepted = ack.accepted,
            syncs = ack.sync_requests.len(),
            "Agent report ingested"
        );
        ack
    }

    /// Merge an operator override patch into the stored override
    pub fn apply_override(
        &self,
        shop_id: &str,
        printer_id: &str,
        patch: &OverridePatch,
    ) -> AppResult<PrinterRecord> {
        patch.validate()?;
        self.with_printer(shop_id, printer_id, |entry| {
            if patch.is_empty() {
                return Ok(entry.record.clone());
            }
            let merged = patch.apply(entry.record.manual_override.as_ref());
            entry.record.manual_override = Some(merged);
            tracing::info!(shop_id = %shop_id, printer_id = %printer_id, "Manual override updated");
            Ok(entry.record.clone())
        })
    }

    /// Operator on/off request
    ///
    /// `raw` is parsed strictly so a typo never switches a printer off.
    pub fn set_manual_status(
        &self,
        shop_id: &str,
        printer_id: &str,
        raw: &str,
    ) -> AppResult<StatusChange> {
        let target: ManualStatus = raw.parse()?;
        self.with_printer(shop_id, printer_id, |entry| {
            let transition = entry
                .record
                .manual_status
                .request(target, entry.job_active())?;
            entry.record.manual_status = transition.to;

            if !transition.is_noop() {
                tracing::info!(
                    shop_id = %shop_id,
                    printer_id = %printer_id,
                    from = %transition.from,
                    to = %transition.to,
                    redirected = transition.redirected,
                    "Manual status changed"
                );
            }

            Ok(StatusChange {
                printer_id: printer_id.to_string(),
                previous: transition.from,
                manual_status: transition.to,
                redirected: transition.redirected,
            })
        })
    }

    /// Queue a force-sync for the agent's next report
    ///
    /// Refused when the shop's agent has not reported since `agent_cutoff`,
    /// since nothing would pick the request up.
    pub fn request_sync(
        &self,
        shop_id: &str,
        printer_id: &str,
        now: DateTime<Utc>,
        agent_cutoff: DateTime<Utc>,
    ) -> AppResult<SyncTicket> {
        let shop = self.shop(shop_id)?;
        // Held until queued so a concurrent remove also drops the ticket
        let printers = shop.printers.read();
        if !printers.contains_key(printer_id) {
            return Err(AppError::printer_not_found(printer_id));
        }

        let last_report = *shop.last_report.lock();
        if last_report.is_none_or(|at| at < agent_cutoff) {
            tracing::warn!(
                shop_id = %shop_id,
                printer_id = %printer_id,
                last_report = ?last_report,
                "Force sync refused, agent silent"
            );
            return Err(AppError::new(ErrorCode::AgentUnavailable)
                .with_detail("shop_id", shop_id)
                .with_detail("last_report", last_report.map(|at| at.to_rfc3339())));
        }

        let ticket = shop.queue_sync(SyncTicket {
            sync_id: uuid::Uuid::new_v4().to_string(),
            printer_id: printer_id.to_string(),
            requested_at: now,
        });
        drop(printers);

        tracing::info!(
            shop_id = %shop_id,
            printer_id = %printer_id,
            sync_id = %ticket.sync_id,
            "Force sync queued"
        );
        Ok(ticket)
    }

    pub fn remove(&self, shop_id: &str, printer_id: &str) -> AppResult<PrinterRecord> {
        let shop = self.shop(shop_id)?;
        let removed = {
            let mut printers = shop.printers.write();
            let entry = printers
                .get(printer_id)
                .ok_or_else(|| AppError::printer_not_found(printer_id))?;
            if entry.job_active() {
                return Err(AppError::new(ErrorCode::PrinterBusy)
                    .with_detail("printer_id", printer_id)
                    .with_detail("in_flight", entry.jobs.len()));
            }
            printers
                .remove(printer_id)
                .map(|entry| entry.record)
                .ok_or_else(|| AppError::printer_not_found(printer_id))?
        };
        shop.forget_syncs(printer_id);
        tracing::info!(shop_id = %shop_id, printer_id = %printer_id, "Printer removed");
        Ok(removed)
    }

    /// Put a job in flight; only switched-on printers accept work
    pub fn start_job(
        &self,
        shop_id: &str,
        printer_id: &str,
        job_id: Option<String>,
    ) -> AppResult<JobTicket> {
        let job_id = job_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        self.with_printer(shop_id, printer_id, |entry| {
            match entry.record.manual_status {
                ManualStatus::On => {}
                ManualStatus::PendingOff => {
                    return Err(AppError::new(ErrorCode::PrinterPendingOff)
                        .with_detail("printer_id", printer_id));
                }
                ManualStatus::Off => {
                    return Err(AppError::new(ErrorCode::PrinterDisabled)
                        .with_detail("printer_id", printer_id));
                }
            }
            if !entry.jobs.insert(job_id.clone()) {
                return Err(AppError::new(ErrorCode::JobAlreadyAssigned)
                    .with_detail("printer_id", printer_id)
                    .with_detail("job_id", job_id.as_str()));
            }
            tracing::debug!(printer_id = %printer_id, job_id = %job_id, "Job started");
            Ok(JobTicket {
                printer_id: printer_id.to_string(),
                job_id: job_id.clone(),
                in_flight: entry.jobs.len(),
            })
        })
    }

    /// Job-completion webhook: settles a pending turn-off once idle
    pub fn complete_job(
        &self,
        shop_id: &str,
        printer_id: &str,
        job_id: &str,
    ) -> AppResult<JobCompletion> {
        self.with_printer(shop_id, printer_id, |entry| {
            if !entry.jobs.remove(job_id) {
                return Err(AppError::job_not_found(printer_id, job_id));
            }
            let before = entry.record.manual_status;
            entry.record.manual_status = before.drain(entry.job_active());
            let drained = before != entry.record.manual_status;

            if drained {
                tracing::info!(
                    shop_id = %shop_id,
                    printer_id = %printer_id,
                    "Last job finished, pending turn-off applied"
                );
            }

            Ok(JobCompletion {
                printer_id: printer_id.to_string(),
                job_id: job_id.to_string(),
                in_flight: entry.jobs.len(),
                manual_status: entry.record.manual_status,
                drained,
            })
        })
    }

    /// Mark printers silent since `cutoff` as offline; returns how many changed
    pub fn mark_stale(&self, cutoff: DateTime<Utc>) -> usize {
        let mut changed = 0;
        for shop in self.shops.iter() {
            let mut printers = shop.printers.write();
            for entry in printers.values_mut() {
                let record = &mut entry.record;
                let silent = record.last_update.is_none_or(|at| at < cutoff);
                if record.agent_detected.status.is_online() && silent {
                    record.agent_detected.status = AgentStatus::Offline;
                    changed += 1;
                    tracing::info!(
                        shop_id = %shop.key(),
                        printer_id = %record.printer_id,
                        "No agent report since cutoff, marking offline"
                    );
                }
            }
        }
        changed
    }
}
