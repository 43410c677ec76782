//! # API Error Type
//!
//! Unified error type for client commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Turf Client                        │
//! │                                                                         │
//! │  UI                          Rust Client                                │
//! │  ──                          ───────────                                │
//! │                                                                         │
//! │  confirmPayment(id)                                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store Error? ─── StoreError::NotFound { .. } ──────┐            │  │
//! │  │         │                                           │            │  │
//! │  │         ▼                                           ▼            │  │
//! │  │  Role Error? ─── CoreError::Forbidden { .. } ─── ApiError ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  The UI receives { code: "FORBIDDEN", message: "player is not ..." }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage failures are logged in full and reported with a generic message.

use serde::Serialize;
use turf_core::{CoreError, ValidationError};
use turf_store::StoreError;

use crate::state::{ConfigError, SubmitError};

/// Error returned from client commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Booking not found: 7f7c..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// No signed-in user
    Unauthorized,

    /// Signed-in role may not do this
    Forbidden,

    /// Payment submission refused or failed
    PaymentError,

    /// Persistent storage failed
    StorageError,

    /// Anything else
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized() -> Self {
        ApiError::from(CoreError::NotAuthenticated)
    }

    pub fn payment(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::PaymentError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            StoreError::Serialization(e) => {
                tracing::error!("Serialization failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Stored data could not be read")
            }
            StoreError::Io(e) => {
                tracing::error!("Storage I/O failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Storage operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::BookingNotFound(id) => ApiError::not_found("Booking", &id),
            CoreError::PaymentNotFound(id) => ApiError::not_found("Payment", &id),
            CoreError::NotAuthenticated => {
                ApiError::new(ErrorCode::Unauthorized, CoreError::NotAuthenticated.to_string())
            }
            err @ CoreError::Forbidden { .. } => ApiError::new(ErrorCode::Forbidden, err.to_string()),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Invalid(e) => ApiError::from(e),
            other => ApiError::payment(other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::internal(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use turf_core::Role;

    #[test]
    fn test_serializes_screaming_code() {
        let err = ApiError::not_found("Booking", "b-1");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Booking not found: b-1");
    }

    #[test]
    fn test_store_errors_hide_details() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = ApiError::from(StoreError::from(io));
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(!err.message.contains("disk"));

        let err = ApiError::from(StoreError::not_found("Payment", "p-1"));
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_role_errors() {
        let err = ApiError::from(CoreError::Forbidden {
            role: Role::Player,
            action: "confirm payments".to_string(),
        });
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert_eq!(err.message, "player is not allowed to confirm payments");
        assert_eq!(ApiError::unauthorized().code, ErrorCode::Unauthorized);
    }

    #[test]
    fn test_submit_errors() {
        let err = ApiError::from(SubmitError::Invalid(ValidationError::required("payment method")));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "payment method is required");

        let err = ApiError::from(SubmitError::AlreadyProcessing);
        assert_eq!(err.code, ErrorCode::PaymentError);
    }
}
