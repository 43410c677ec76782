//! # Payment Commands
//!
//! ## Booking Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  open_booking_payment(booking_id)  ──► modal open, form empty           │
//! │  select_method / set_contact / set_reference                            │
//! │  submit_payment()                                                       │
//! │     ├── modal processes and records the Payment                         │
//! │     └── completion callback settles it onto the Booking                 │
//! │            (miss ──► settlement ledger ──► retry_pending_settlements)   │
//! │                                                                         │
//! │  confirm_payment(payment_id)   turf-owner / admin only                  │
//! │     ├── Payment  status ──► confirmed (stamped)                         │
//! │     └── Booking  payment_status ──► confirmed (same stamp)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use turf_core::validation::validate_payment_amount;
use turf_core::{CoreError, Money, Payment, PaymentStatus, Role};

use crate::commands::booking::get_booking;
use crate::commands::{require_role, require_user};
use crate::error::ApiError;
use crate::state::{
    AppState, ModalSnapshot, PaymentProcessor, PaymentRequest, RetryReport, SubmitOutcome,
    PAYMENT_FAILED_MESSAGE,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPaymentResponse {
    pub payment: Payment,
    /// Whether the linked booking was updated. Always false for tournament
    /// payments.
    pub settled: bool,
}

/// Opens the payment modal for one of the user's bookings.
pub fn open_booking_payment<P: PaymentProcessor>(
    state: &AppState<P>,
    booking_id: &str,
) -> Result<ModalSnapshot, ApiError> {
    debug!(%booking_id, "open_booking_payment command");
    let booking = get_booking(state, booking_id)?;

    let description = format!(
        "{} {} for {}h",
        booking.date.format("%d %b %Y"),
        booking.start_time.format("%H:%M"),
        booking.duration
    );
    state.checkout.open(
        PaymentRequest::for_booking(booking.id, booking.total_amount, booking.turf_name)
            .with_description(description),
    );
    Ok(state.checkout.snapshot())
}

/// Opens the payment modal for a tournament entry fee.
pub fn open_tournament_payment<P: PaymentProcessor>(
    state: &AppState<P>,
    tournament_id: &str,
    amount: Money,
    title: &str,
) -> Result<ModalSnapshot, ApiError> {
    debug!(%tournament_id, "open_tournament_payment command");
    require_user(state)?;
    validate_payment_amount(amount)?;

    state
        .checkout
        .open(PaymentRequest::for_tournament(tournament_id, amount, title));
    Ok(state.checkout.snapshot())
}

pub fn close_payment<P: PaymentProcessor>(state: &AppState<P>) {
    state.checkout.close();
}

/// Submits the open payment modal and settles the result onto its booking.
///
/// A missed settlement is not an error here: the payment exists, and the
/// ledger retries the booking update later.
pub async fn submit_payment<P: PaymentProcessor>(
    state: &AppState<P>,
) -> Result<SubmitPaymentResponse, ApiError> {
    debug!("submit_payment command");
    require_user(state)?;

    let booking_id = state
        .checkout
        .snapshot()
        .request
        .and_then(|request| request.booking_id);

    let mut settled = false;
    let outcome = state
        .checkout
        .submit(|payment_id, method| {
            if let Some(booking_id) = &booking_id {
                settled = state
                    .settlements
                    .settle(&state.bookings, payment_id, booking_id, method)
                    .is_ok();
            }
        })
        .await?;

    match outcome {
        SubmitOutcome::Completed { payment_id, .. } => {
            let payment = state
                .payments
                .get(&payment_id)
                .ok_or_else(|| ApiError::from(CoreError::PaymentNotFound(payment_id)))?;
            Ok(SubmitPaymentResponse { payment, settled })
        }
        SubmitOutcome::Failed => Err(ApiError::payment(PAYMENT_FAILED_MESSAGE)),
        SubmitOutcome::Cancelled => Err(ApiError::payment("Payment cancelled")),
    }
}

/// Confirms a payment and its booking. Turf owners and admins only.
pub fn confirm_payment<P: PaymentProcessor>(
    state: &AppState<P>,
    payment_id: &str,
) -> Result<Payment, ApiError> {
    debug!(%payment_id, "confirm_payment command");
    let operator = require_role(state, "confirm payments", Role::can_confirm_payments)?;

    let payment = state
        .payments
        .update_payment_status(payment_id, PaymentStatus::Confirmed, Some(&operator.id))
        .map_err(|err| {
            if err.is_not_found() {
                ApiError::from(CoreError::PaymentNotFound(payment_id.to_string()))
            } else {
                ApiError::from(err)
            }
        })?;

    if let Some(booking_id) = &payment.booking_id {
        if let Err(err) = state.bookings.update_payment_status(
            booking_id,
            PaymentStatus::Confirmed,
            Some(&operator.id),
        ) {
            warn!(%payment_id, %booking_id, error = %err, "Confirmed payment has no booking to update");
        }
    }

    info!(%payment_id, operator = %operator.id, "Payment confirmed");
    Ok(payment)
}

/// Manual payments waiting for an operator. Turf owners and admins only.
pub fn pending_confirmations<P: PaymentProcessor>(
    state: &AppState<P>,
) -> Result<Vec<Payment>, ApiError> {
    require_role(state, "review payments", Role::can_confirm_payments)?;
    Ok(state.payments.pending_confirmation())
}

/// The payment recorded for a booking the user may see.
pub fn booking_payment<P: PaymentProcessor>(
    state: &AppState<P>,
    booking_id: &str,
) -> Result<Option<Payment>, ApiError> {
    get_booking(state, booking_id)?;
    Ok(state.payments.payment_by_booking(booking_id))
}

pub fn tournament_payment<P: PaymentProcessor>(
    state: &AppState<P>,
    tournament_id: &str,
) -> Result<Option<Payment>, ApiError> {
    require_user(state)?;
    Ok(state.payments.payment_by_tournament(tournament_id))
}

pub fn retry_pending_settlements<P: PaymentProcessor>(state: &AppState<P>) -> RetryReport {
    let report = state.settlements.retry_pending(&state.bookings);
    if !report.settled.is_empty() {
        info!(settled = report.settled.len(), pending = report.still_pending, "Settlement retry pass");
    }
    report
}
