//! Dashboard printer board
//!
//! Plain data, no I/O. Holds the last accepted printer snapshot, the display
//! records derived from it, and the optimistic status commands still waiting
//! for the service.
//!
//! Refreshes are sequenced explicitly: a caller takes a [`RefreshTicket`]
//! *before* fetching, and [`PrinterBoard::apply_snapshot`] discards any
//! snapshot whose ticket is not newer than the one already shown. A slow
//! response can therefore never overwrite a fresher one.
//!
//! Toggles are sequenced against the same counter. A committed status is
//! marked with the last ticket issued at commit time, and snapshots taken
//! under a ticket up to that mark cannot revert it.

use std::collections::HashMap;

use shared::models::{DisplayPrinter, ManualStatus, PrinterRecord, StatusChange, build_display};

use crate::{ClientError, ClientResult};

/// Sequence number taken before a refresh request is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Pending,
    Committed,
    RolledBack,
}

/// One optimistic on/off toggle
///
/// Carries the value shown before the toggle so a failed request can put
/// it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCommand {
    pub id: u64,
    pub printer_id: String,
    pub previous: ManualStatus,
    pub target: ManualStatus,
    pub state: CommandState,
}

/// Status the service confirmed, valid for snapshots up to `as_of`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StatusMark {
    as_of: u64,
    status: ManualStatus,
}

/// Operator target for a toggle from `current`
///
/// `pending_off` toggles back to `on`, which cancels the pending turn-off.
pub fn toggle_target(current: ManualStatus) -> ManualStatus {
    match current {
        ManualStatus::On => ManualStatus::Off,
        ManualStatus::Off | ManualStatus::PendingOff => ManualStatus::On,
    }
}

#[derive(Debug, Default)]
pub struct PrinterBoard {
    records: Vec<PrinterRecord>,
    display: Vec<DisplayPrinter>,
    pending: HashMap<String, StatusCommand>,
    marks: HashMap<String, StatusMark>,
    issued: u64,
    shown: Option<RefreshTicket>,
    next_command: u64,
}

impl PrinterBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn printers(&self) -> &[DisplayPrinter] {
        &self.display
    }

    pub fn record(&self, printer_id: &str) -> Option<&PrinterRecord> {
        self.records.iter().find(|r| r.printer_id == printer_id)
    }

    pub fn printer(&self, printer_id: &str) -> Option<&DisplayPrinter> {
        self.display.iter().find(|p| p.printer_id == printer_id)
    }

    /// Ticket of the snapshot currently shown
    pub fn shown_ticket(&self) -> Option<RefreshTicket> {
        self.shown
    }

    pub fn has_pending(&self, printer_id: &str) -> bool {
        self.pending.contains_key(printer_id)
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Replace the printer list wholesale if `ticket` is the newest seen
    ///
    /// A committed status outranks snapshots requested before the commit.
    /// Toggles still in flight keep their optimistic value on top of the
    /// snapshot; their rollback value becomes the snapshot's.
    pub fn apply_snapshot(
        &mut self,
        ticket: RefreshTicket,
        mut records: Vec<PrinterRecord>,
    ) -> bool {
        if self.shown.is_some_and(|shown| ticket <= shown) {
            tracing::debug!(ticket = ticket.value(), "Discarding stale printer snapshot");
            return false;
        }

        self.marks.retain(|printer_id, mark| {
            mark.as_of >= ticket.value() && records.iter().any(|r| &r.printer_id == printer_id)
        });
        for record in &mut records {
            self.overlay(record);
        }
        self.pending
            .retain(|printer_id, _| records.iter().any(|r| &r.printer_id == printer_id));

        self.display = records.iter().map(build_display).collect();
        self.records = records;
        self.shown = Some(ticket);
        true
    }

    /// Replace one record, e.g. after a successful override save
    ///
    /// The record carries no ticket, so local status knowledge is kept.
    pub fn upsert_record(&mut self, mut record: PrinterRecord) {
        self.overlay(&mut record);
        let display = build_display(&record);
        match self
            .records
            .iter()
            .position(|r| r.printer_id == record.printer_id)
        {
            Some(index) => {
                self.records[index] = record;
                self.display[index] = display;
            }
            None => {
                self.records.push(record);
                self.display.push(display);
            }
        }
    }

    /// Put locally known status on top of an incoming record
    fn overlay(&mut self, record: &mut PrinterRecord) {
        if let Some(mark) = self.marks.get(&record.printer_id) {
            record.manual_status = mark.status;
        }
        if let Some(command) = self.pending.get_mut(&record.printer_id) {
            command.previous = record.manual_status;
            record.manual_status = command.target;
        }
    }

    fn set_status(&mut self, printer_id: &str, status: ManualStatus) {
        if let Some(index) = self.records.iter().position(|r| r.printer_id == printer_id) {
            self.records[index].manual_status = status;
            self.display[index].set_manual_status(status);
        }
    }

    /// Flip a printer locally and return the command to settle later
    ///
    /// At most one toggle per printer may be in flight.
    pub fn begin_toggle(&mut self, printer_id: &str) -> ClientResult<StatusCommand> {
        let previous = self
            .record(printer_id)
            .map(|r| r.manual_status)
            .ok_or_else(|| ClientError::NotFound(format!("Printer {printer_id}")))?;
        if self.has_pending(printer_id) {
            return Err(ClientError::Validation(format!(
                "Printer {printer_id} already has a status change in flight"
            )));
        }

        self.next_command += 1;
        let command = StatusCommand {
            id: self.next_command,
            printer_id: printer_id.to_string(),
            previous,
            target: toggle_target(previous),
            state: CommandState::Pending,
        };
        self.set_status(printer_id, command.target);
        self.pending.insert(printer_id.to_string(), command.clone());
        Ok(command)
    }

    /// Settle a toggle with the status the service actually applied
    ///
    /// Every refresh issued so far may have been answered before the
    /// service applied the change, so none of them may revert it.
    pub fn commit(&mut self, command: &mut StatusCommand, change: &StatusChange) {
        if self.take_pending(command).is_some() {
            self.set_status(&command.printer_id, change.manual_status);
            self.marks.insert(
                command.printer_id.clone(),
                StatusMark {
                    as_of: self.issued,
                    status: change.manual_status,
                },
            );
        }
        command.state = CommandState::Committed;
    }

    /// Undo a failed toggle; returns the restored status
    pub fn rollback(&mut self, command: &mut StatusCommand) -> ManualStatus {
        let previous = self
            .take_pending(command)
            .map(|pending| pending.previous)
            .unwrap_or(command.previous);
        self.set_status(&command.printer_id, previous);
        command.previous = previous;
        command.state = CommandState::RolledBack;
        previous
    }

    fn take_pending(&mut self, command: &StatusCommand) -> Option<StatusCommand> {
        let owned = self
            .pending
            .get(&command.printer_id)
            .is_some_and(|pending| pending.id == command.id);
        if owned {
            self.pending.remove(&command.printer_id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::BadgeStatus;

    fn record(id: &str, status: ManualStatus) -> PrinterRecord {
        serde_json::from_value(serde_json::json!({
            "printerid": id,
            "agentDetected": {"name": id, "status": "online"},
            "manualStatus": status.as_str(),
        }))
        .unwrap()
    }

    fn board_with(records: Vec<PrinterRecord>) -> PrinterBoard {
        let mut board = PrinterBoard::new();
        let ticket = board.begin_refresh();
        assert!(board.apply_snapshot(ticket, records));
        board
    }

    #[test]
    fn test_older_snapshot_is_discarded() {
        let mut board = PrinterBoard::new();
        let first = board.begin_refresh();
        let second = board.begin_refresh();

        assert!(board.apply_snapshot(second, vec![record("p1", ManualStatus::On)]));
        assert!(!board.apply_snapshot(first, vec![record("p1", ManualStatus::Off)]));

        assert_eq!(board.printer("p1").unwrap().badge_status, BadgeStatus::Online);
        assert_eq!(board.shown_ticket(), Some(second));
    }

    #[test]
    fn test_same_ticket_applies_once() {
        let mut board = PrinterBoard::new();
        let ticket = board.begin_refresh();
        assert!(board.apply_snapshot(ticket, vec![]));
        assert!(!board.apply_snapshot(ticket, vec![record("p1", ManualStatus::On)]));
        assert!(board.printers().is_empty());
    }

    #[test]
    fn test_snapshot_replaces_list_wholesale() {
        let mut board = board_with(vec![
            record("p1", ManualStatus::On),
            record("p2", ManualStatus::Off),
        ]);
        let ticket = board.begin_refresh();
        board.apply_snapshot(ticket, vec![record("p3", ManualStatus::Off)]);

        let ids: Vec<_> = board.printers().iter().map(|p| p.printer_id.as_str()).collect();
        assert_eq!(ids, vec!["p3"]);
    }

    #[test]
    fn test_toggle_is_optimistic_and_commits_server_value() {
        let mut board = board_with(vec![record("p1", ManualStatus::On)]);

        let mut command = board.begin_toggle("p1").unwrap();
        assert_eq!(command.target, ManualStatus::Off);
        assert_eq!(board.printer("p1").unwrap().badge_status, BadgeStatus::Offline);

        let change = StatusChange {
            printer_id: "p1".into(),
            previous: ManualStatus::On,
            manual_status: ManualStatus::PendingOff,
            redirected: true,
        };
        board.commit(&mut command, &change);

        assert_eq!(command.state, CommandState::Committed);
        assert_eq!(
            board.printer("p1").unwrap().badge_status,
            BadgeStatus::PendingOff
        );
        assert!(!board.has_pending("p1"));
    }

    #[test]
    fn test_rollback_restores_previous_value() {
        let mut board = board_with(vec![record("p1", ManualStatus::Off)]);

        let mut command = board.begin_toggle("p1").unwrap();
        assert!(board.printer("p1").unwrap().is_enabled);

        let restored = board.rollback(&mut command);
        assert_eq!(restored, ManualStatus::Off);
        assert_eq!(command.state, CommandState::RolledBack);
        assert!(!board.printer("p1").unwrap().is_enabled);
        assert_eq!(board.record("p1").unwrap().manual_status, ManualStatus::Off);
    }

    #[test]
    fn test_pending_off_toggles_back_on() {
        let mut board = board_with(vec![record("p1", ManualStatus::PendingOff)]);
        let command = board.begin_toggle("p1").unwrap();
        assert_eq!(command.target, ManualStatus::On);
    }

    #[test]
    fn test_second_toggle_rejected_while_pending() {
        let mut board = board_with(vec![record("p1", ManualStatus::On)]);
        board.begin_toggle("p1").unwrap();
        assert!(matches!(
            board.begin_toggle("p1"),
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(
            board.begin_toggle("nope"),
            Err(ClientError::NotFound(_))
        ));
    }

    #[test]
    fn test_snapshot_during_toggle_keeps_optimistic_value() {
        let mut board = board_with(vec![record("p1", ManualStatus::Off)]);
        let mut command = board.begin_toggle("p1").unwrap();

        // Snapshot fetched before the toggle reached the service
        let ticket = board.begin_refresh();
        board.apply_snapshot(ticket, vec![record("p1", ManualStatus::Off)]);
        assert!(board.printer("p1").unwrap().is_enabled);

        // Someone else switched it on meanwhile; rollback restores server truth
        let ticket = board.begin_refresh();
        board.apply_snapshot(ticket, vec![record("p1", ManualStatus::On)]);
        assert_eq!(board.rollback(&mut command), ManualStatus::On);
    }

    #[test]
    fn test_refresh_issued_before_commit_cannot_revert_it() {
        let mut board = board_with(vec![record("p1", ManualStatus::On)]);

        // Poll goes out, then the operator toggles and the service confirms
        let in_flight = board.begin_refresh();
        let mut command = board.begin_toggle("p1").unwrap();
        let change = StatusChange {
            printer_id: "p1".into(),
            previous: ManualStatus::On,
            manual_status: ManualStatus::Off,
            redirected: false,
        };
        board.commit(&mut command, &change);

        // The poll answers with what the service had before the toggle
        assert!(board.apply_snapshot(in_flight, vec![record("p1", ManualStatus::On)]));
        assert_eq!(board.record("p1").unwrap().manual_status, ManualStatus::Off);
        assert!(!board.printer("p1").unwrap().is_enabled);

        // A poll issued after the commit is authoritative again
        let next = board.begin_refresh();
        board.apply_snapshot(next, vec![record("p1", ManualStatus::On)]);
        assert_eq!(board.record("p1").unwrap().manual_status, ManualStatus::On);
    }

    #[test]
    fn test_upsert_during_toggle_keeps_optimistic_value() {
        let mut board = board_with(vec![record("p1", ManualStatus::Off)]);
        let mut command = board.begin_toggle("p1").unwrap();

        // Override save answers before the toggle settles
        board.upsert_record(record("p1", ManualStatus::Off));
        assert!(board.printer("p1").unwrap().is_enabled);
        assert_eq!(board.record("p1").unwrap().manual_status, ManualStatus::On);

        assert_eq!(board.rollback(&mut command), ManualStatus::Off);
        assert!(!board.printer("p1").unwrap().is_enabled);
    }

    #[test]
    fn test_upsert_record() {
        let mut board = board_with(vec![record("p1", ManualStatus::Off)]);
        let mut updated = record("p1", ManualStatus::Off);
        updated.manual_override = Some(shared::models::ManualOverride {
            name: Some("Front".into()),
            ..Default::default()
        });
        board.upsert_record(updated);
        board.upsert_record(record("p2", ManualStatus::On));

        assert_eq!(board.printer("p1").unwrap().name, "Front");
        assert_eq!(board.printers().len(), 2);
    }
}
