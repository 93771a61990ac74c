//! Printer record and API payloads
//!
//! Field names follow the JSON the dashboard already speaks
//! (`printerid`, `agentDetected`, `manualOverride`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::status::ManualStatus;

/// Agent-reported connectivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Online,
    #[default]
    Offline,
}

impl AgentStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

// Anything other than "online" reads as offline.
impl<'de> Deserialize<'de> for AgentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            Some("online") => Self::Online,
            _ => Self::Offline,
        })
    }
}

/// Snapshot reported by the shop's local agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentDetected {
    #[serde(default)]
    pub name: Option<String>,
    /// Loosely typed: array-of-one, bare object or absent
    #[serde(default)]
    pub capabilities: Value,
    #[serde(default)]
    pub status: AgentStatus,
}

/// Operator-entered values; every field defers to the agent when absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub capabilities: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One physical device known to a shop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterRecord {
    #[serde(rename = "printerid", alias = "printerId")]
    pub printer_id: String,
    #[serde(default)]
    pub agent_detected: AgentDetected,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_override: Option<ManualOverride>,
    #[serde(default)]
    pub manual_status: ManualStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
}

impl PrinterRecord {
    /// New record for a device the agent reported for the first time
    ///
    /// Printers start switched off until the operator enables them.
    pub fn from_report(report: &AgentPrinterReport, now: DateTime<Utc>) -> Self {
        let mut record = Self {
            printer_id: report.printer_id.clone(),
            agent_detected: AgentDetected::default(),
            manual_override: None,
            manual_status: ManualStatus::Off,
            last_update: None,
        };
        record.apply_report(report, now);
        record
    }

    /// Overwrite the agent-owned fields; operator fields are untouched
    pub fn apply_report(&mut self, report: &AgentPrinterReport, now: DateTime<Utc>) {
        self.agent_detected = AgentDetected {
            name: report.name.clone(),
            capabilities: report.capabilities.clone(),
            status: report.status,
        };
        self.last_update = Some(now);
    }
}

/// One printer inside an agent heartbeat
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPrinterReport {
    #[serde(rename = "printerid", alias = "printerId")]
    pub printer_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub capabilities: Value,
    #[serde(default)]
    pub status: AgentStatus,
}

/// Agent heartbeat: every printer the agent currently sees
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentReport {
    #[serde(default)]
    pub printers: Vec<AgentPrinterReport>,
}

/// Reply to an agent heartbeat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReportAck {
    pub accepted: usize,
    /// Printer ids seen for the first time
    pub created: Vec<String>,
    /// Force-sync requests queued since the previous heartbeat
    pub sync_requests: Vec<SyncTicket>,
}

/// Body of `PATCH .../manualStatus`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualStatusRequest {
    pub manual_status: String,
}

impl ManualStatusRequest {
    pub fn new(status: ManualStatus) -> Self {
        Self {
            manual_status: status.as_str().to_string(),
        }
    }
}

/// Result of a manual status request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub printer_id: String,
    pub previous: ManualStatus,
    pub manual_status: ManualStatus,
    /// `off` was requested but a job is in flight
    pub redirected: bool,
}

/// A force-sync request waiting for the agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncTicket {
    pub sync_id: String,
    pub printer_id: String,
    pub requested_at: DateTime<Utc>,
}

/// Body of `POST .../jobs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAssign {
    #[serde(default)]
    pub job_id: Option<String>,
}

/// A job accepted onto a printer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTicket {
    pub printer_id: String,
    pub job_id: String,
    pub in_flight: usize,
}

/// Result of the job-completion webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCompletion {
    pub printer_id: String,
    pub job_id: String,
    pub in_flight: usize,
    pub manual_status: ManualStatus,
    /// A pending turn-off was applied by this completion
    pub drained: bool,
}
