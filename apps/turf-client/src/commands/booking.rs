//! # Booking Commands
//!
//! The signed-in player is always the booking's player; callers never pass
//! a name or email.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use turf_core::validation::validate_new_booking;
use turf_core::{Booking, BookingStatus, CoreError, Money, NewBooking};

use crate::commands::require_user;
use crate::error::ApiError;
use crate::state::{AppState, PaymentProcessor, RetryReport};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub turf_id: String,
    pub turf_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration: u32,
    pub total_amount: Money,
}

pub fn create_booking<P: PaymentProcessor>(
    state: &AppState<P>,
    request: CreateBookingRequest,
) -> Result<Booking, ApiError> {
    debug!("create_booking command");
    let user = require_user(state)?;

    let new = NewBooking {
        turf_id: request.turf_id,
        turf_name: request.turf_name,
        date: request.date,
        start_time: request.start_time,
        duration: request.duration,
        player_name: user.name,
        player_email: user.email,
        total_amount: request.total_amount,
        status: BookingStatus::Pending,
        payment_status: None,
        payment_id: None,
    };
    validate_new_booking(&new)?;

    let id = state.bookings.create_booking(new);
    let booking = state
        .bookings
        .get(&id)
        .ok_or_else(|| ApiError::from(CoreError::BookingNotFound(id.clone())))?;

    info!(booking_id = %booking.id, turf = %booking.turf_name, amount = %booking.total_amount, "Booking created");
    Ok(booking)
}

/// Bookings made under the signed-in user's email.
pub fn my_bookings<P: PaymentProcessor>(state: &AppState<P>) -> Result<Vec<Booking>, ApiError> {
    debug!("my_bookings command");
    let user = require_user(state)?;
    Ok(state.bookings.bookings_by_user(&user.email))
}

/// Looks up one booking the signed-in user may see.
pub fn get_booking<P: PaymentProcessor>(
    state: &AppState<P>,
    booking_id: &str,
) -> Result<Booking, ApiError> {
    let user = require_user(state)?;
    match state.bookings.get(booking_id) {
        Some(booking) if user.role.sees_all_bookings() || booking.player_email == user.email => {
            Ok(booking)
        }
        _ => Err(CoreError::BookingNotFound(booking_id.to_string()).into()),
    }
}

/// Cancels a booking. Players may only cancel their own.
pub fn cancel_booking<P: PaymentProcessor>(
    state: &AppState<P>,
    booking_id: &str,
) -> Result<Booking, ApiError> {
    debug!(%booking_id, "cancel_booking command");
    let booking = get_booking(state, booking_id)?;
    if booking.is_cancelled() {
        return Ok(booking);
    }

    let booking = state
        .bookings
        .update_booking_status(booking_id, BookingStatus::Cancelled)?;
    info!(%booking_id, "Booking cancelled");
    Ok(booking)
}

/// Stores bookings received from the server, then retries any settlement
/// that was waiting for one of them.
///
/// Players may only import their own bookings.
pub fn import_bookings<P: PaymentProcessor>(
    state: &AppState<P>,
    bookings: Vec<Booking>,
) -> Result<RetryReport, ApiError> {
    debug!(count = bookings.len(), "import_bookings command");
    let user = require_user(state)?;

    if !user.role.sees_all_bookings() && bookings.iter().any(|b| b.player_email != user.email) {
        warn!(user_id = %user.id, role = %user.role, "Refused import of another player's booking");
        return Err(CoreError::Forbidden {
            role: user.role,
            action: "import other players' bookings".to_string(),
        }
        .into());
    }

    for booking in bookings {
        state.bookings.upsert(booking);
    }
    let report = state.settlements.retry_pending(&state.bookings);
    info!(
        settled = report.settled.len(),
        pending = report.still_pending,
        "Bookings imported"
    );
    Ok(report)
}
