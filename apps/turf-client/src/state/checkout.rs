//! # Checkout State
//!
//! The payment modal: a small state machine that collects a payment method,
//! runs simulated processing, and records the payment.
//!
//! ## Phases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Payment Modal Phases                             │
//! │                                                                         │
//! │             submit() (guard passes)                                     │
//! │   ┌──────┐ ─────────────────────────► ┌────────────┐                    │
//! │   │ Idle │                            │ Processing │                    │
//! │   └──────┘ ◄───── close() ─────────── └─────┬──────┘                    │
//! │      ▲              (cancels the delay)     │                           │
//! │      │                            ┌─────────┴─────────┐                 │
//! │      │                            ▼                   ▼                 │
//! │      │                     ┌───────────┐       ┌────────────┐           │
//! │      └──── close() ─────── │ Completed │       │ Failed(msg)│ ──┐       │
//! │                            └───────────┘       └────────────┘   │       │
//! │                                                      ▲  submit()│       │
//! │                                                      └──────────┘       │
//! │                                                                         │
//! │  Completed: payment recorded, completion callback invoked once.        │
//! │  Failed:    nothing recorded, form kept for retry.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Method Outcomes
//! | Method    | Payment status | Transaction id                     |
//! |-----------|----------------|------------------------------------|
//! | gateway   | paid           | `TXN` + 10 uppercase alphanumerics |
//! | manual    | unpaid         | reference as typed (may be empty)  |
//! | pay-later | unpaid         | none                               |

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use turf_core::validation::validate_payment_submission;
use turf_core::{
    Money, NewPayment, PaymentMethod, PaymentStatus, ValidationError,
    GATEWAY_TRANSACTION_SUFFIX_LEN,
};
use turf_store::{simulate_latency, PaymentStore};

/// Message shown to the user for any processing failure.
pub const PAYMENT_FAILED_MESSAGE: &str = "Payment processing failed. Please try again.";

// =============================================================================
// Modal Props & Phase
// =============================================================================

/// What the modal was opened for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: Money,
    pub title: String,
    pub description: String,
    pub booking_id: Option<String>,
    pub tournament_id: Option<String>,
}

impl PaymentRequest {
    pub fn for_booking(booking_id: impl Into<String>, amount: Money, title: impl Into<String>) -> Self {
        PaymentRequest {
            amount,
            title: title.into(),
            description: String::new(),
            booking_id: Some(booking_id.into()),
            tournament_id: None,
        }
    }

    pub fn for_tournament(
        tournament_id: impl Into<String>,
        amount: Money,
        title: impl Into<String>,
    ) -> Self {
        PaymentRequest {
            amount,
            title: title.into(),
            description: String::new(),
            booking_id: None,
            tournament_id: Some(tournament_id.into()),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "message", rename_all = "lowercase")]
pub enum PaymentPhase {
    Idle,
    Processing,
    Completed,
    Failed(String),
}

/// Read-only view of the modal for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalSnapshot {
    pub open: bool,
    pub request: Option<PaymentRequest>,
    pub method: Option<PaymentMethod>,
    pub contact: String,
    pub reference: String,
    pub phase: PaymentPhase,
    pub can_submit: bool,
}

/// Result of a submit that passed the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Completed {
        payment_id: String,
        method: PaymentMethod,
    },
    /// Processing failed; the phase carries the user-facing message.
    Failed,
    /// The modal was closed while processing.
    Cancelled,
}

/// Reasons a submit is refused before processing starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Payment modal is not open")]
    NotOpen,

    #[error("A payment is already being processed")]
    AlreadyProcessing,

    #[error("Payment already completed")]
    AlreadyCompleted,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

// =============================================================================
// Processor
// =============================================================================

/// Result of processing, before the payment is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedPayment {
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProcessingError {
    #[error("processing cancelled")]
    Cancelled,

    #[error("payment declined: {0}")]
    Declined(String),
}

/// Turns a submitted method into a processing result.
pub trait PaymentProcessor: Send + Sync {
    fn process(
        &self,
        method: PaymentMethod,
        reference: &str,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<ProcessedPayment, ProcessingError>> + Send;
}

/// Processor with a fixed delay and no real gateway behind it.
#[derive(Debug, Clone)]
pub struct SimulatedProcessor {
    latency: Duration,
    transaction_prefix: String,
}

impl SimulatedProcessor {
    pub fn new(latency: Duration, transaction_prefix: impl Into<String>) -> Self {
        SimulatedProcessor {
            latency,
            transaction_prefix: transaction_prefix.into(),
        }
    }
}

impl PaymentProcessor for SimulatedProcessor {
    async fn process(
        &self,
        method: PaymentMethod,
        reference: &str,
        cancel: &CancellationToken,
    ) -> Result<ProcessedPayment, ProcessingError> {
        simulate_latency(self.latency, cancel)
            .await
            .map_err(|_| ProcessingError::Cancelled)?;

        let transaction_id = match method {
            PaymentMethod::Gateway => Some(generate_transaction_id(&self.transaction_prefix)),
            PaymentMethod::Manual => Some(reference.to_string()),
            PaymentMethod::PayLater => None,
        };

        Ok(ProcessedPayment {
            status: method.resulting_status(),
            transaction_id,
        })
    }
}

/// `prefix` followed by ten uppercase alphanumerics.
pub fn generate_transaction_id(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GATEWAY_TRANSACTION_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{}{}", prefix, suffix.to_uppercase())
}

// =============================================================================
// Payment Modal
// =============================================================================

#[derive(Debug)]
struct ModalState {
    open: bool,
    request: Option<PaymentRequest>,
    method: Option<PaymentMethod>,
    contact: String,
    reference: String,
    phase: PaymentPhase,
    cancel: CancellationToken,
}

impl ModalState {
    fn closed() -> Self {
        ModalState {
            open: false,
            request: None,
            method: None,
            contact: String::new(),
            reference: String::new(),
            phase: PaymentPhase::Idle,
            cancel: CancellationToken::new(),
        }
    }

    fn passes_guard(&self) -> bool {
        self.open
            && matches!(self.phase, PaymentPhase::Idle | PaymentPhase::Failed(_))
            && validate_payment_submission(self.method, &self.contact).is_ok()
    }
}

/// The payment modal.
///
/// Field setters and `close` never wait, so the UI can close the modal while
/// `submit` is suspended in processing; the pending submit then resolves to
/// [`SubmitOutcome::Cancelled`] without recording anything.
#[derive(Debug)]
pub struct PaymentModal<P> {
    processor: P,
    payments: Arc<PaymentStore>,
    state: Mutex<ModalState>,
}

impl<P: PaymentProcessor> PaymentModal<P> {
    pub fn new(processor: P, payments: Arc<PaymentStore>) -> Self {
        PaymentModal {
            processor,
            payments,
            state: Mutex::new(ModalState::closed()),
        }
    }

    /// Opens the modal for `request` with an empty form.
    pub fn open(&self, request: PaymentRequest) {
        let mut state = self.lock();
        state.cancel.cancel();
        debug!(amount = %request.amount, title = %request.title, "Opening payment modal");
        *state = ModalState {
            open: true,
            request: Some(request),
            ..ModalState::closed()
        };
    }

    /// Closes the modal and resets it to idle. Cancels in-flight processing.
    pub fn close(&self) {
        let mut state = self.lock();
        if state.phase == PaymentPhase::Processing {
            info!("Payment modal closed during processing");
        }
        state.cancel.cancel();
        *state = ModalState::closed();
    }

    pub fn select_method(&self, method: PaymentMethod) {
        self.lock().method = Some(method);
    }

    pub fn set_contact(&self, contact: impl Into<String>) {
        self.lock().contact = contact.into();
    }

    pub fn set_reference(&self, reference: impl Into<String>) {
        self.lock().reference = reference.into();
    }

    pub fn phase(&self) -> PaymentPhase {
        self.lock().phase.clone()
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.lock().passes_guard()
    }

    pub fn snapshot(&self) -> ModalSnapshot {
        let state = self.lock();
        ModalSnapshot {
            open: state.open,
            request: state.request.clone(),
            method: state.method,
            contact: state.contact.clone(),
            reference: state.reference.clone(),
            phase: state.phase.clone(),
            can_submit: state.passes_guard(),
        }
    }

    /// Processes the selected method and records the payment.
    ///
    /// `on_complete` runs once, after the payment is recorded, with the new
    /// payment id and the method.
    pub async fn submit<F>(&self, on_complete: F) -> Result<SubmitOutcome, SubmitError>
    where
        F: FnOnce(&str, PaymentMethod),
    {
        let (request, method, reference, cancel) = {
            let mut state = self.lock();
            if !state.open {
                return Err(SubmitError::NotOpen);
            }
            match state.phase {
                PaymentPhase::Processing => return Err(SubmitError::AlreadyProcessing),
                PaymentPhase::Completed => return Err(SubmitError::AlreadyCompleted),
                PaymentPhase::Idle | PaymentPhase::Failed(_) => {}
            }
            let method = validate_payment_submission(state.method, &state.contact)?;
            let request = match state.request.clone() {
                Some(request) => request,
                None => return Err(SubmitError::NotOpen),
            };

            state.phase = PaymentPhase::Processing;
            (request, method, state.reference.clone(), state.cancel.clone())
        };

        info!(%method, amount = %request.amount, "Processing payment");
        let result = self.processor.process(method, &reference, &cancel).await;

        let payment_id = {
            let mut state = self.lock();
            if cancel.is_cancelled() {
                debug!(%method, "Payment processing abandoned");
                return Ok(SubmitOutcome::Cancelled);
            }

            match result {
                Ok(processed) => {
                    let payment_id = self.payments.create_payment(NewPayment {
                        booking_id: request.booking_id.clone(),
                        tournament_id: request.tournament_id.clone(),
                        amount: request.amount,
                        method,
                        status: processed.status,
                        transaction_id: processed.transaction_id,
                    });
                    state.phase = PaymentPhase::Completed;
                    payment_id
                }
                Err(ProcessingError::Cancelled) => {
                    state.phase = PaymentPhase::Idle;
                    return Ok(SubmitOutcome::Cancelled);
                }
                Err(err) => {
                    warn!(%method, error = %err, "Payment processing failed");
                    state.phase = PaymentPhase::Failed(PAYMENT_FAILED_MESSAGE.to_string());
                    return Ok(SubmitOutcome::Failed);
                }
            }
        };

        info!(%payment_id, %method, "Payment recorded");
        on_complete(&payment_id, method);

        Ok(SubmitOutcome::Completed { payment_id, method })
    }

    fn lock(&self) -> MutexGuard<'_, ModalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
