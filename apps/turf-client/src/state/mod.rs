//! # State Module
//!
//! Application state for the turf client.
//!
//! Each concern lives in its own focused type; [`AppState`] only holds them
//! side by side so commands can borrow exactly the pieces they need.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         AppState                                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │         │             │             │             │            │        │
//! │         ▼             ▼             ▼             ▼            ▼        │
//! │  ┌────────────┐ ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌─────────┐  │
//! │  │ConfigState │ │ Session   │ │ Booking   │ │ Payment   │ │Checkout │  │
//! │  │            │ │ Store     │ │ Store     │ │ Store     │ │ modal + │  │
//! │  │ read-only  │ │ Arc       │ │ Arc       │ │ Arc       │ │ ledger  │  │
//! │  └────────────┘ └───────────┘ └───────────┘ └───────────┘ └─────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Stores: one Mutex per collection, shared through Arc                │
//! │  • Checkout: Mutex around the form; close() never waits                │
//! │  • ConfigState: read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod checkout;
mod config;
mod settlement;

pub use checkout::{
    generate_transaction_id, ModalSnapshot, PaymentModal, PaymentPhase, PaymentProcessor,
    PaymentRequest, ProcessedPayment, ProcessingError, SimulatedProcessor, SubmitError,
    SubmitOutcome, PAYMENT_FAILED_MESSAGE,
};
pub use config::{ConfigError, ConfigState};
pub use settlement::{PendingSettlement, RetryReport, SettlementLedger};

use std::sync::Arc;

use turf_store::{BookingStore, Clock, KeyValueStorage, PaymentStore, SessionStore};

/// Every piece of client state, wired together.
#[derive(Debug)]
pub struct AppState<P = SimulatedProcessor> {
    pub config: ConfigState,
    pub session: Arc<SessionStore>,
    pub bookings: Arc<BookingStore>,
    pub payments: Arc<PaymentStore>,
    pub checkout: PaymentModal<P>,
    pub settlements: SettlementLedger,
}

impl AppState<SimulatedProcessor> {
    /// Restores the session from `storage` and builds empty stores.
    pub fn new(config: ConfigState, storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        let processor =
            SimulatedProcessor::new(config.payment_latency(), config.transaction_prefix.clone());
        Self::with_processor(config, storage, clock, processor)
    }
}

impl<P: PaymentProcessor> AppState<P> {
    pub fn with_processor(
        config: ConfigState,
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
        processor: P,
    ) -> Self {
        let session = Arc::new(SessionStore::restore(
            storage,
            clock.clone(),
            config.session_config(),
        ));
        let bookings = Arc::new(BookingStore::new(clock.clone()));
        let payments = Arc::new(PaymentStore::new(clock));
        let checkout = PaymentModal::new(processor, payments.clone());

        AppState {
            config,
            session,
            bookings,
            payments,
            checkout,
            settlements: SettlementLedger::new(),
        }
    }

    /// Cancels pending simulated work before the state is dropped.
    pub fn shutdown(&self) {
        self.checkout.close();
        self.session.teardown();
    }
}
