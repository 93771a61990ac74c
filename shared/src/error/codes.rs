//! Unified error codes for PrintDock
//!
//! Error codes are shared by the printer service and the dashboard client.
//! They are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Printer errors
//! - 2xxx: Job errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values on the wire so that the
/// dashboard can match on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Printer ====================
    /// Printer not found in shop
    PrinterNotFound = 1001,
    /// Shop has no printers registered
    ShopNotFound = 1002,
    /// Operator tried to force a pending-off printer off
    PrinterPendingOff = 1003,
    /// Requested manual status is not an operator target
    InvalidStatusTarget = 1004,
    /// Printer has a job in flight
    PrinterBusy = 1005,
    /// Printer is switched off by the operator
    PrinterDisabled = 1006,

    // ==================== 2xxx: Job ====================
    /// Job not found on printer
    JobNotFound = 2001,
    /// Job already assigned
    JobAlreadyAssigned = 2002,

    // ==================== 9xxx: System ====================
    /// Shop's agent has not reported recently
    AgentUnavailable = 9201,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::InvalidRequest => "Invalid request",

            // Printer
            ErrorCode::PrinterNotFound => "Printer not found",
            ErrorCode::ShopNotFound => "Shop not found",
            ErrorCode::PrinterPendingOff => {
                "Printer is waiting for its job to finish before turning off"
            }
            ErrorCode::InvalidStatusTarget => "Requested status cannot be set by an operator",
            ErrorCode::PrinterBusy => "Printer has a job in flight",
            ErrorCode::PrinterDisabled => "Printer is switched off",

            // Job
            ErrorCode::JobNotFound => "Job not found",
            ErrorCode::JobAlreadyAssigned => "Job is already assigned",

            // System
            ErrorCode::AgentUnavailable => "Printer agent is unavailable",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            5 => Ok(ErrorCode::InvalidRequest),

            // Printer
            1001 => Ok(ErrorCode::PrinterNotFound),
            1002 => Ok(ErrorCode::ShopNotFound),
            1003 => Ok(ErrorCode::PrinterPendingOff),
            1004 => Ok(ErrorCode::InvalidStatusTarget),
            1005 => Ok(ErrorCode::PrinterBusy),
            1006 => Ok(ErrorCode::PrinterDisabled),

            // Job
            2001 => Ok(ErrorCode::JobNotFound),
            2002 => Ok(ErrorCode::JobAlreadyAssigned),

            // System
            9201 => Ok(ErrorCode::AgentUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::InvalidRequest.code(), 5);
        assert_eq!(ErrorCode::PrinterNotFound.code(), 1001);
        assert_eq!(ErrorCode::PrinterPendingOff.code(), 1003);
        assert_eq!(ErrorCode::JobNotFound.code(), 2001);
        assert_eq!(ErrorCode::AgentUnavailable.code(), 9201);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::PrinterBusy.is_success());
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(
            InvalidErrorCode(4242).to_string(),
            "invalid error code: 4242"
        );
    }

    #[test]
    fn test_roundtrip_all_codes() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::InvalidRequest,
            ErrorCode::PrinterNotFound,
            ErrorCode::ShopNotFound,
            ErrorCode::PrinterPendingOff,
            ErrorCode::InvalidStatusTarget,
            ErrorCode::PrinterBusy,
            ErrorCode::PrinterDisabled,
            ErrorCode::JobNotFound,
            ErrorCode::JobAlreadyAssigned,
            ErrorCode::AgentUnavailable,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::PrinterBusy).unwrap();
        assert_eq!(json, "1005");

        let code: ErrorCode = serde_json::from_str("2001").unwrap();
        assert_eq!(code, ErrorCode::JobNotFound);

        assert!(serde_json::from_str::<ErrorCode>("77").is_err());
    }
}
