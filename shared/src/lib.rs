//! Shared types for PrintDock
//!
//! Printer models, the capability reconciliation pipeline, the manual
//! status state machine and the unified error/response types used by both
//! the printer service and the dashboard client.

pub mod error;
pub mod models;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use models::{
    BadgeStatus, Capabilities, CapabilityType, DisplayPrinter, ManualStatus, OverridePatch,
    PrinterRecord, ResolvedCapabilities, build_display, normalize, resolve,
};
