//! # Settlement Ledger
//!
//! Applying a recorded payment to its booking is a separate step from
//! recording it. When that step misses, the settlement waits here until a
//! retry succeeds.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Payment Settlement                              │
//! │                                                                         │
//! │  1. PaymentStore.create_payment()          (done by the modal)         │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  2. settle(): BookingStore.attach_payment()                            │
//! │               BookingStore.update_payment_status(method outcome)       │
//! │            │                                                            │
//! │      ┌─────┴──────┐                                                     │
//! │      ▼            ▼                                                     │
//! │    Ok ──►      NotFound ──► pending ledger ──► retry_pending()          │
//! │   booking                                        (same two writes,      │
//! │   updated                                         idempotent)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, info, warn};

use turf_core::{Booking, PaymentMethod};
use turf_store::{BookingStore, StoreResult};

/// A payment that still has to be applied to its booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSettlement {
    pub payment_id: String,
    pub booking_id: String,
    pub method: PaymentMethod,
    pub attempts: u32,
}

/// Outcome of a retry pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryReport {
    /// Payment ids settled during this pass.
    pub settled: Vec<String>,
    pub still_pending: usize,
}

#[derive(Debug, Default)]
pub struct SettlementLedger {
    pending: Mutex<Vec<PendingSettlement>>,
}

impl SettlementLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `payment_id` to `booking_id`. On failure the settlement is
    /// kept for [`retry_pending`](Self::retry_pending) and the error is
    /// returned.
    pub fn settle(
        &self,
        bookings: &BookingStore,
        payment_id: &str,
        booking_id: &str,
        method: PaymentMethod,
    ) -> StoreResult<Booking> {
        match apply(bookings, payment_id, booking_id, method) {
            Ok(booking) => {
                info!(%payment_id, %booking_id, %method, "Payment settled");
                Ok(booking)
            }
            Err(err) => {
                warn!(%payment_id, %booking_id, error = %err, "Settlement deferred");
                self.record(payment_id, booking_id, method);
                Err(err)
            }
        }
    }

    /// Re-applies every pending settlement; successful ones leave the ledger.
    pub fn retry_pending(&self, bookings: &BookingStore) -> RetryReport {
        let mut pending = self.lock();
        let mut report = RetryReport::default();

        pending.retain_mut(|entry| {
            entry.attempts += 1;
            match apply(bookings, &entry.payment_id, &entry.booking_id, entry.method) {
                Ok(_) => {
                    info!(payment_id = %entry.payment_id, attempts = entry.attempts, "Deferred settlement applied");
                    report.settled.push(entry.payment_id.clone());
                    false
                }
                Err(err) => {
                    debug!(payment_id = %entry.payment_id, error = %err, "Settlement still pending");
                    true
                }
            }
        });

        report.still_pending = pending.len();
        report
    }

    pub fn pending(&self) -> Vec<PendingSettlement> {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn record(&self, payment_id: &str, booking_id: &str, method: PaymentMethod) {
        let mut pending = self.lock();
        match pending.iter_mut().find(|p| p.payment_id == payment_id) {
            Some(existing) => existing.attempts += 1,
            None => pending.push(PendingSettlement {
                payment_id: payment_id.to_string(),
                booking_id: booking_id.to_string(),
                method,
                attempts: 1,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PendingSettlement>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn apply(
    bookings: &BookingStore,
    payment_id: &str,
    booking_id: &str,
    method: PaymentMethod,
) -> StoreResult<Booking> {
    bookings.attach_payment(booking_id, payment_id)?;
    bookings.update_payment_status(booking_id, method.booking_payment_status(), None)
}
