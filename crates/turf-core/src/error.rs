//! # Error Types
//!
//! Domain-specific error types for turf-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  turf-core errors (this file)                                          │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Form/input validation failures                 │
//! │                                                                         │
//! │  turf-store errors (separate crate)                                    │
//! │  └── StoreError       - Storage and lookup failures                    │
//! │                                                                         │
//! │  turf-client errors (app)                                              │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → toast in the UI        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::Role;

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    /// No authenticated session is available for an operation that needs one.
    #[error("Not signed in")]
    NotAuthenticated,

    /// The signed-in role may not perform the operation.
    ///
    /// ## When This Occurs
    /// - A player tries to confirm a manual payment
    /// - A player asks for another player's bookings
    #[error("{role} is not allowed to {action}")]
    Forbidden { role: Role, action: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before any store is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. malformed email or phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::Forbidden {
            role: Role::Player,
            action: "confirm payments".to_string(),
        };
        assert_eq!(err.to_string(), "player is not allowed to confirm payments");

        let err = CoreError::BookingNotFound("b-1".to_string());
        assert_eq!(err.to_string(), "Booking not found: b-1");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("mobile number");
        assert_eq!(err.to_string(), "mobile number is required");

        let err = ValidationError::OutOfRange {
            field: "duration".to_string(),
            min: 1,
            max: 12,
        };
        assert_eq!(err.to_string(), "duration must be between 1 and 12");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("method").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
