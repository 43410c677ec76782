//! # Booking Store
//!
//! In-memory collection of turf reservations.
//!
//! ## Booking Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Booking Lifecycle                                 │
//! │                                                                         │
//! │  create_booking() ──► Booking { payment_status: unpaid (default) }     │
//! │        │                                                                │
//! │        ├── update_booking_status()  pending ⇄ confirmed → cancelled     │
//! │        │                                                                │
//! │        └── update_payment_status()  unpaid → pending/paid → confirmed   │
//! │                                      (confirmed stamps confirmed_at)    │
//! │                                                                         │
//! │  The two status axes move independently. Nothing is ever deleted.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};
use uuid::Uuid;

use turf_core::{Booking, BookingStatus, NewBooking, PaymentStatus};

use crate::clock::Clock;
use crate::error::{StoreError, StoreResult};

/// Owns the booking collection.
///
/// Every operation runs to completion under one lock, so callers observe
/// mutations in the order they were issued. Reads hand out clones.
#[derive(Debug)]
pub struct BookingStore {
    bookings: Mutex<Vec<Booking>>,
    clock: Arc<dyn Clock>,
}

impl BookingStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        BookingStore {
            bookings: Mutex::new(Vec::new()),
            clock,
        }
    }

    /// Appends a booking and returns its new id. Never fails.
    pub fn create_booking(&self, new: NewBooking) -> String {
        let id = Uuid::new_v4().to_string();
        let booking = Booking::from_new(id.clone(), new, self.clock.now());

        debug!(
            id = %booking.id,
            turf_id = %booking.turf_id,
            player = %booking.player_email,
            amount = %booking.total_amount,
            "Creating booking"
        );

        self.lock().push(booking);
        id
    }

    /// Stores a booking that already carries an id, such as one received
    /// from the server. Replaces an existing booking with the same id in
    /// place; otherwise appends.
    pub fn upsert(&self, booking: Booking) {
        let mut bookings = self.lock();
        match bookings.iter_mut().find(|b| b.id == booking.id) {
            Some(existing) => {
                debug!(id = %booking.id, "Replacing booking");
                *existing = booking;
            }
            None => {
                debug!(id = %booking.id, "Inserting booking");
                bookings.push(booking);
            }
        }
    }

    /// Bookings whose player email matches exactly, in insertion order.
    pub fn bookings_by_user(&self, email: &str) -> Vec<Booking> {
        self.lock()
            .iter()
            .filter(|b| b.player_email == email)
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<Booking> {
        self.lock().iter().find(|b| b.id == id).cloned()
    }

    /// Snapshot of every booking, in insertion order.
    pub fn all(&self) -> Vec<Booking> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the reservation status. Payment status is untouched.
    pub fn update_booking_status(&self, id: &str, status: BookingStatus) -> StoreResult<Booking> {
        self.modify(id, |booking| {
            debug!(%id, from = ?booking.status, to = ?status, "Updating booking status");
            booking.status = status;
        })
    }

    /// Replaces the payment status; `confirmed` applies the confirmation
    /// stamp.
    pub fn update_payment_status(
        &self,
        id: &str,
        status: PaymentStatus,
        confirmed_by: Option<&str>,
    ) -> StoreResult<Booking> {
        let now = self.clock.now();
        self.modify(id, |booking| {
            debug!(%id, from = ?booking.payment_status, to = ?status, "Updating booking payment status");
            booking.apply_payment_status(status, confirmed_by, now);
        })
    }

    /// Records which payment settled this booking.
    pub fn attach_payment(&self, id: &str, payment_id: &str) -> StoreResult<Booking> {
        self.modify(id, |booking| {
            debug!(%id, %payment_id, "Attaching payment to booking");
            booking.payment_id = Some(payment_id.to_string());
        })
    }

    fn modify<F>(&self, id: &str, f: F) -> StoreResult<Booking>
    where
        F: FnOnce(&mut Booking),
    {
        let mut bookings = self.lock();
        match bookings.iter_mut().find(|b| b.id == id) {
            Some(booking) => {
                f(booking);
                Ok(booking.clone())
            }
            None => {
                warn!(%id, "Booking update for unknown id ignored");
                Err(StoreError::not_found("Booking", id))
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Booking>> {
        self.bookings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
    use turf_core::Money;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(),
        ))
    }

    fn new_booking(email: &str) -> NewBooking {
        NewBooking {
            turf_id: "turf-1".to_string(),
            turf_name: "Green Field Arena".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 25).unwrap(),
            start_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            duration: 2,
            player_name: "Demo Player".to_string(),
            player_email: email.to_string(),
            total_amount: Money::from_taka(2500),
            status: BookingStatus::Confirmed,
            payment_status: None,
            payment_id: None,
        }
    }

    #[test]
    fn test_create_assigns_unique_ids_and_defaults() {
        let clock = clock();
        let store = BookingStore::new(clock.clone());

        let a = store.create_booking(new_booking("player@turf.com"));
        let b = store.create_booking(new_booking("player@turf.com"));
        assert_ne!(a, b);

        let booking = store.get(&a).unwrap();
        assert_eq!(booking.payment_status, PaymentStatus::Unpaid);
        assert_eq!(booking.created_at, clock.now());
        assert!(booking.confirmed_at.is_none());
    }

    #[test]
    fn test_bookings_by_user_filters_in_insertion_order() {
        let store = BookingStore::new(clock());
        let first = store.create_booking(new_booking("player@turf.com"));
        store.create_booking(new_booking("other@turf.com"));
        let third = store.create_booking(new_booking("player@turf.com"));

        let mine: Vec<String> = store
            .bookings_by_user("player@turf.com")
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(mine, vec![first, third]);

        assert!(store.bookings_by_user("PLAYER@turf.com").is_empty());
        assert!(store.bookings_by_user("ghost@turf.com").is_empty());
    }

    #[test]
    fn test_update_booking_status_leaves_payment_status() {
        let store = BookingStore::new(clock());
        let id = store.create_booking(new_booking("player@turf.com"));
        store
            .update_payment_status(&id, PaymentStatus::Paid, None)
            .unwrap();

        let booking = store
            .update_booking_status(&id, BookingStatus::Cancelled)
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert_eq!(booking.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_confirmed_stamp_set_once() {
        let clock = clock();
        let store = BookingStore::new(clock.clone());
        let id = store.create_booking(new_booking("player@turf.com"));
        let first_at = clock.now();

        let booking = store
            .update_payment_status(&id, PaymentStatus::Confirmed, Some("2"))
            .unwrap();
        assert_eq!(booking.confirmed_at, Some(first_at));
        assert_eq!(booking.confirmed_by.as_deref(), Some("2"));

        clock.advance(Duration::minutes(30));
        let booking = store
            .update_payment_status(&id, PaymentStatus::Confirmed, None)
            .unwrap();
        assert_eq!(booking.confirmed_at, Some(first_at));
        assert_eq!(booking.confirmed_by.as_deref(), Some("2"));
    }

    #[test]
    fn test_unknown_id_is_not_found_and_changes_nothing() {
        let store = BookingStore::new(clock());
        let id = store.create_booking(new_booking("player@turf.com"));
        let before = store.all();

        let err = store
            .update_payment_status("missing", PaymentStatus::Confirmed, Some("3"))
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(store
            .update_booking_status("missing", BookingStatus::Cancelled)
            .is_err());
        assert!(store.attach_payment("missing", "p-1").is_err());

        assert_eq!(store.all(), before);
        assert_eq!(store.get(&id).unwrap().status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_attach_payment() {
        let store = BookingStore::new(clock());
        let id = store.create_booking(new_booking("player@turf.com"));
        let booking = store.attach_payment(&id, "p-9").unwrap();
        assert_eq!(booking.payment_id.as_deref(), Some("p-9"));
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let clock = clock();
        let store = BookingStore::new(clock.clone());
        let first = store.create_booking(new_booking("player@turf.com"));
        store.create_booking(new_booking("player@turf.com"));

        let mut edited = store.get(&first).unwrap();
        edited.turf_name = "Renamed Arena".to_string();
        store.upsert(edited);
        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0].turf_name, "Renamed Arena");

        let remote = Booking::from_new("srv-1".to_string(), new_booking("x@turf.com"), clock.now());
        store.upsert(remote);
        assert_eq!(store.len(), 3);
        assert!(store.get("srv-1").is_some());
    }
}
