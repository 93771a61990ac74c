//! Unified error system for PrintDock
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Printer errors
//! - 2xxx: Job errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::PrinterBusy);
//!
//! let err = AppError::printer_not_found("HP-1")
//!     .with_detail("shop_id", "shop-7");
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(1001));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};

use crate::models::status::StatusError;

impl From<StatusError> for AppError {
    fn from(err: StatusError) -> Self {
        let code = match err {
            StatusError::PendingOff => ErrorCode::PrinterPendingOff,
            StatusError::NotOperatorTarget(_) => ErrorCode::InvalidStatusTarget,
            StatusError::Unknown(_) => ErrorCode::InvalidRequest,
        };
        AppError::with_message(code, err.to_string())
    }
}
