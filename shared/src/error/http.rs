//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::PrinterNotFound | Self::ShopNotFound | Self::JobNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::PrinterPendingOff
            | Self::PrinterBusy
            | Self::PrinterDisabled
            | Self::JobAlreadyAssigned => StatusCode::CONFLICT,

            // 503 Service Unavailable (transient, client can retry)
            Self::AgentUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 400 Bad Request (default for validation errors)
            Self::ValidationFailed | Self::InvalidRequest | Self::InvalidStatusTarget => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(
            ErrorCode::PrinterNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ErrorCode::JobNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(
            ErrorCode::PrinterPendingOff.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ErrorCode::PrinterBusy.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_bad_request_status() {
        assert_eq!(
            ErrorCode::InvalidStatusTarget.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_system_status() {
        assert_eq!(
            ErrorCode::AgentUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
