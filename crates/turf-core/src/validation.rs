//! # Validation Module
//!
//! Input checks run by the client layer before a store is touched.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: UI form                                                       │
//! │  └── Field-level hints while typing                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: turf-client command / payment modal                          │
//! │  └── THIS MODULE: submit guards, booking sanity                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Stores                                                        │
//! │  └── Accept whatever passes; creation never fails                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewBooking, PaymentMethod};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest booking a turf accepts, in hours.
pub const MAX_BOOKING_HOURS: u32 = 12;

// =============================================================================
// Payment Modal
// =============================================================================

/// Guards the payment modal's submit button.
///
/// ## Rules
/// - A method must be selected
/// - Manual transfers need a non-blank contact (mobile) number
///
/// ## Returns
/// The selected method, so the caller can proceed without re-matching.
///
/// ## Example
/// ```rust
/// use turf_core::types::PaymentMethod;
/// use turf_core::validation::validate_payment_submission;
///
/// assert!(validate_payment_submission(None, "").is_err());
/// assert!(validate_payment_submission(Some(PaymentMethod::Manual), "  ").is_err());
/// assert!(validate_payment_submission(Some(PaymentMethod::PayLater), "").is_ok());
/// ```
pub fn validate_payment_submission(
    method: Option<PaymentMethod>,
    contact: &str,
) -> ValidationResult<PaymentMethod> {
    let method = method.ok_or_else(|| ValidationError::required("payment method"))?;

    if method.requires_contact() && contact.trim().is_empty() {
        return Err(ValidationError::required("mobile number"));
    }

    Ok(method)
}

/// Validates a payment amount.
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Booking
// =============================================================================

/// Minimal email shape check: one `@` with text on both sides and a dot in
/// the domain.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.contains('@') && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "expected name@domain".to_string(),
        });
    }
    Ok(())
}

/// Sanity checks for a booking about to be created.
///
/// ## Rules
/// - Turf id, turf name and player name are non-blank
/// - Player email is well-formed
/// - Duration is 1..=12 hours
/// - Total amount is positive
pub fn validate_new_booking(booking: &NewBooking) -> ValidationResult<()> {
    if booking.turf_id.trim().is_empty() {
        return Err(ValidationError::required("turf"));
    }
    if booking.turf_name.trim().is_empty() {
        return Err(ValidationError::required("turf name"));
    }
    if booking.player_name.trim().is_empty() {
        return Err(ValidationError::required("player name"));
    }
    validate_email(&booking.player_email)?;

    if booking.duration == 0 || booking.duration > MAX_BOOKING_HOURS {
        return Err(ValidationError::OutOfRange {
            field: "duration".to_string(),
            min: 1,
            max: i64::from(MAX_BOOKING_HOURS),
        });
    }

    validate_payment_amount(booking.total_amount)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BookingStatus;
    use chrono::{NaiveDate, NaiveTime};

    fn booking() -> NewBooking {
        NewBooking {
            turf_id: "turf-1".to_string(),
            turf_name: "Green Field Arena".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            duration: 2,
            player_name: "Demo Player".to_string(),
            player_email: "player@turf.com".to_string(),
            total_amount: Money::from_taka(2500),
            status: BookingStatus::Pending,
            payment_status: None,
            payment_id: None,
        }
    }

    #[test]
    fn test_payment_submission_guard() {
        assert_eq!(
            validate_payment_submission(None, "+8801711000000"),
            Err(ValidationError::required("payment method"))
        );
        assert_eq!(
            validate_payment_submission(Some(PaymentMethod::Manual), ""),
            Err(ValidationError::required("mobile number"))
        );
        assert_eq!(
            validate_payment_submission(Some(PaymentMethod::Manual), "+8801711000000"),
            Ok(PaymentMethod::Manual)
        );
        assert_eq!(
            validate_payment_submission(Some(PaymentMethod::Gateway), ""),
            Ok(PaymentMethod::Gateway)
        );
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("player@turf.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("player").is_err());
        assert!(validate_email("@turf.com").is_err());
        assert!(validate_email("a@b@turf.com").is_err());
        assert!(validate_email("player@localhost").is_err());
    }

    #[test]
    fn test_validate_new_booking() {
        assert!(validate_new_booking(&booking()).is_ok());

        let mut b = booking();
        b.duration = 0;
        assert!(matches!(
            validate_new_booking(&b),
            Err(ValidationError::OutOfRange { .. })
        ));

        let mut b = booking();
        b.total_amount = Money::zero();
        assert!(matches!(
            validate_new_booking(&b),
            Err(ValidationError::MustBePositive { .. })
        ));

        let mut b = booking();
        b.turf_name = "  ".to_string();
        assert_eq!(
            validate_new_booking(&b),
            Err(ValidationError::required("turf name"))
        );
    }
}
