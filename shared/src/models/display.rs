//! Presentation-ready printer view

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::capability::{CapabilityType, Capabilities, normalize, resolve, resolve_name};
use super::printer::{AgentStatus, PrinterRecord};
use super::status::ManualStatus;

/// Operator-facing badge, derived from the manual status only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeStatus {
    Online,
    PendingOff,
    Offline,
}

impl From<ManualStatus> for BadgeStatus {
    fn from(status: ManualStatus) -> Self {
        match status {
            ManualStatus::On => Self::Online,
            ManualStatus::PendingOff => Self::PendingOff,
            ManualStatus::Off => Self::Offline,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPrinter {
    pub printer_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub capability_type: CapabilityType,
    pub duplex: bool,
    pub paper_sizes: Vec<String>,
    pub badge_status: BadgeStatus,
    /// Mirrors the agent, independent of the operator switch
    pub card_status: AgentStatus,
    pub is_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
}

impl DisplayPrinter {
    pub fn manual_status(&self) -> ManualStatus {
        match self.badge_status {
            BadgeStatus::Online => ManualStatus::On,
            BadgeStatus::PendingOff => ManualStatus::PendingOff,
            BadgeStatus::Offline => ManualStatus::Off,
        }
    }

    /// Overwrite the operator-derived fields with a new manual status
    pub fn set_manual_status(&mut self, status: ManualStatus) {
        self.badge_status = status.into();
        self.is_enabled = status.is_enabled();
    }
}

/// Build the display record for one printer
///
/// Never fails: partially-populated records fall back to `B/W`, no duplex,
/// no paper sizes and the raw printer id as name.
pub fn build_display(printer: &PrinterRecord) -> DisplayPrinter {
    let agent = normalize(&printer.agent_detected.capabilities);
    let manual = printer
        .manual_override
        .as_ref()
        .map(|o| normalize(&o.capabilities))
        .unwrap_or_else(Capabilities::default);
    let resolved = resolve(&agent, &manual);

    let name = resolve_name(
        printer
            .manual_override
            .as_ref()
            .and_then(|o| o.name.as_deref()),
        printer.agent_detected.name.as_deref(),
        &printer.printer_id,
    );

    DisplayPrinter {
        printer_id: printer.printer_id.clone(),
        name,
        capability_type: resolved.capability_type,
        duplex: resolved.duplex,
        paper_sizes: resolved.paper_sizes,
        badge_status: printer.manual_status.into(),
        card_status: printer.agent_detected.status,
        is_enabled: printer.manual_status.is_enabled(),
        notes: printer
            .manual_override
            .as_ref()
            .and_then(|o| o.notes.clone())
            .filter(|n| !n.is_empty()),
        last_update: printer.last_update,
    }
}
