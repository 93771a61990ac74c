//! Per-shop printer table

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use shared::models::{PrinterRecord, SyncTicket};

/// A printer plus the jobs currently printing on it
#[derive(Debug, Clone)]
pub(crate) struct PrinterEntry {
    pub record: PrinterRecord,
    pub jobs: BTreeSet<String>,
}

impl PrinterEntry {
    pub fn new(record: PrinterRecord) -> Self {
        Self {
            record,
            jobs: BTreeSet::new(),
        }
    }

    pub fn job_active(&self) -> bool {
        !self.jobs.is_empty()
    }
}

/// Printers of one shop, keyed by printer id
#[derive(Debug, Default)]
pub(crate) struct ShopPrinters {
    pub printers: RwLock<BTreeMap<String, PrinterEntry>>,
    /// Force-sync requests not yet picked up by the agent
    pub pending_syncs: Mutex<Vec<SyncTicket>>,
    /// Time of the agent's latest heartbeat
    pub last_report: Mutex<Option<DateTime<Utc>>>,
}

impl ShopPrinters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<PrinterRecord> {
        self.printers
            .read()
            .values()
            .map(|entry| entry.record.clone())
            .collect()
    }

    /// Queue a sync request; a printer has at most one queued request
    pub fn queue_sync(&self, ticket: SyncTicket) -> SyncTicket {
        let mut queue = self.pending_syncs.lock();
        if let Some(existing) = queue.iter().find(|t| t.printer_id == ticket.printer_id) {
            return existing.clone();
        }
        queue.push(ticket.clone());
        ticket
    }

    pub fn record_report(&self, at: DateTime<Utc>) {
        let mut last = self.last_report.lock();
        if last.is_none_or(|seen| seen < at) {
            *last = Some(at);
        }
    }

    pub fn drain_syncs(&self) -> Vec<SyncTicket> {
        std::mem::take(&mut *self.pending_syncs.lock())
    }

    pub fn forget_syncs(&self, printer_id: &str) {
        self.pending_syncs
            .lock()
            .retain(|t| t.printer_id != printer_id);
    }
}
