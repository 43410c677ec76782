//! # Payment Store
//!
//! In-memory collection of payment attempts. Mirrors the booking store's
//! status-update pattern.
//!
//! ## Lookups
//! Several payments may name the same booking or tournament; no uniqueness
//! is enforced. Lookups return the earliest one inserted.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};
use uuid::Uuid;

use turf_core::{NewPayment, Payment, PaymentStatus};

use crate::clock::Clock;
use crate::error::{StoreError, StoreResult};

/// Owns the payment collection.
#[derive(Debug)]
pub struct PaymentStore {
    payments: Mutex<Vec<Payment>>,
    clock: Arc<dyn Clock>,
}

impl PaymentStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        PaymentStore {
            payments: Mutex::new(Vec::new()),
            clock,
        }
    }

    /// Appends a payment and returns its new id. Never fails.
    pub fn create_payment(&self, new: NewPayment) -> String {
        let id = Uuid::new_v4().to_string();
        let payment = Payment::from_new(id.clone(), new, self.clock.now());

        debug!(
            id = %payment.id,
            method = %payment.method,
            status = ?payment.status,
            amount = %payment.amount,
            booking_id = ?payment.booking_id,
            tournament_id = ?payment.tournament_id,
            "Recording payment"
        );

        self.lock().push(payment);
        id
    }

    /// Replaces the status; `confirmed` applies the confirmation stamp.
    pub fn update_payment_status(
        &self,
        id: &str,
        status: PaymentStatus,
        confirmed_by: Option<&str>,
    ) -> StoreResult<Payment> {
        let now = self.clock.now();
        let mut payments = self.lock();
        match payments.iter_mut().find(|p| p.id == id) {
            Some(payment) => {
                debug!(%id, from = ?payment.status, to = ?status, "Updating payment status");
                payment.apply_status(status, confirmed_by, now);
                Ok(payment.clone())
            }
            None => {
                warn!(%id, "Payment update for unknown id ignored");
                Err(StoreError::not_found("Payment", id))
            }
        }
    }

    /// First payment (insertion order) linked to `booking_id`.
    pub fn payment_by_booking(&self, booking_id: &str) -> Option<Payment> {
        self.lock()
            .iter()
            .find(|p| p.booking_id.as_deref() == Some(booking_id))
            .cloned()
    }

    /// First payment (insertion order) linked to `tournament_id`.
    pub fn payment_by_tournament(&self, tournament_id: &str) -> Option<Payment> {
        self.lock()
            .iter()
            .find(|p| p.tournament_id.as_deref() == Some(tournament_id))
            .cloned()
    }

    pub fn get(&self, id: &str) -> Option<Payment> {
        self.lock().iter().find(|p| p.id == id).cloned()
    }

    pub fn all(&self) -> Vec<Payment> {
        self.lock().clone()
    }

    /// Manual payments still waiting for an operator, oldest first.
    pub fn pending_confirmation(&self) -> Vec<Payment> {
        self.lock()
            .iter()
            .filter(|p| p.awaits_confirmation())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Payment>> {
        self.payments.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, SystemClock};
    use chrono::{Duration, TimeZone, Utc};
    use turf_core::{Money, PaymentMethod};

    fn for_booking(booking_id: &str, method: PaymentMethod) -> NewPayment {
        NewPayment {
            booking_id: Some(booking_id.to_string()),
            tournament_id: None,
            amount: Money::from_taka(2500),
            method,
            status: method.resulting_status(),
            transaction_id: None,
        }
    }

    #[test]
    fn test_first_inserted_payment_wins_lookup() {
        let store = PaymentStore::new(Arc::new(SystemClock));
        let first = store.create_payment(for_booking("b-1", PaymentMethod::Manual));
        let second = store.create_payment(for_booking("b-1", PaymentMethod::Gateway));
        assert_ne!(first, second);

        assert_eq!(store.payment_by_booking("b-1").unwrap().id, first);
        assert!(store.payment_by_booking("b-2").is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_payment_by_tournament() {
        let store = PaymentStore::new(Arc::new(SystemClock));
        store.create_payment(for_booking("b-1", PaymentMethod::PayLater));
        let entry = store.create_payment(NewPayment {
            booking_id: None,
            tournament_id: Some("t-7".to_string()),
            amount: Money::from_taka(5000),
            method: PaymentMethod::Gateway,
            status: PaymentStatus::Paid,
            transaction_id: Some("TXNABCDEF1234".to_string()),
        });

        assert_eq!(store.payment_by_tournament("t-7").unwrap().id, entry);
        assert!(store.payment_by_tournament("b-1").is_none());
        assert!(store.payment_by_booking("t-7").is_none());
    }

    #[test]
    fn test_confirm_stamps_once() {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap(),
        ));
        let store = PaymentStore::new(clock.clone());
        let id = store.create_payment(for_booking("b-1", PaymentMethod::Manual));
        assert_eq!(store.pending_confirmation().len(), 1);

        let stamped_at = clock.now();
        let payment = store
            .update_payment_status(&id, PaymentStatus::Confirmed, Some("3"))
            .unwrap();
        assert_eq!(payment.confirmed_at, Some(stamped_at));

        clock.advance(Duration::days(1));
        let payment = store
            .update_payment_status(&id, PaymentStatus::Confirmed, None)
            .unwrap();
        assert_eq!(payment.confirmed_at, Some(stamped_at));
        assert_eq!(payment.confirmed_by.as_deref(), Some("3"));
        assert!(store.pending_confirmation().is_empty());
    }

    #[test]
    fn test_unknown_payment_id() {
        let store = PaymentStore::new(Arc::new(SystemClock));
        let err = store
            .update_payment_status("nope", PaymentStatus::Paid, None)
            .unwrap_err();
        assert_eq!(err.to_string(), "Payment not found: nope");
        assert!(store.is_empty());
    }
}
