//! Manual (operator) printer status
//!
//! ```text
//!            request(off), no job
//!     ┌──────────────────────────────┐
//!     │                              ▼
//!    on ──request(off), job──▶ pending_off ──drain(no job)──▶ off
//!     ▲                              │                         │
//!     └────────request(on)───────────┘◀──────request(on)───────┘
//! ```
//!
//! `pending_off → off` is never an operator action; only [`ManualStatus::drain`]
//! takes it, when the job tracker reports no job left in flight.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Operator intent for a printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualStatus {
    On,
    #[default]
    Off,
    PendingOff,
}

impl ManualStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::PendingOff => "pending_off",
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Apply an operator request
    ///
    /// `job_active` reports whether the printer currently has a job in
    /// flight; turning off a busy printer is redirected to `pending_off`.
    pub fn request(self, target: ManualStatus, job_active: bool) -> Result<Transition, StatusError> {
        let to = match (self, target) {
            (_, Self::PendingOff) => return Err(StatusError::NotOperatorTarget(target)),
            (Self::PendingOff, Self::Off) => return Err(StatusError::PendingOff),
            (Self::On, Self::Off) if job_active => Self::PendingOff,
            (_, to) => to,
        };
        Ok(Transition {
            from: self,
            to,
            redirected: to != target,
        })
    }

    /// Settle a pending turn-off once the printer has drained its jobs
    pub fn drain(self, job_active: bool) -> ManualStatus {
        match self {
            Self::PendingOff if !job_active => Self::Off,
            other => other,
        }
    }
}

impl fmt::Display for ManualStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManualStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            "pending_off" => Ok(Self::PendingOff),
            other => Err(StatusError::Unknown(other.to_string())),
        }
    }
}

// Stored records are read leniently: anything unrecognised is `off`.
impl<'de> Deserialize<'de> for ManualStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(raw
            .as_str()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default())
    }
}

/// Outcome of an accepted status request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ManualStatus,
    pub to: ManualStatus,
    /// `true` when an `off` request was turned into `pending_off`
    pub redirected: bool,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("Printer is pending off; switch it back on to cancel")]
    PendingOff,
    #[error("'{0}' cannot be requested by an operator")]
    NotOperatorTarget(ManualStatus),
    #[error("Unknown manual status '{0}'")]
    Unknown(String),
}
