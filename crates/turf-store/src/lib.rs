//! # turf-store: State Stores for the Turf Booking Client
//!
//! This crate owns the client's state: the authenticated session, the
//! booking list and the payment list.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Turf Client Data Flow                            │
//! │                                                                         │
//! │  turf-client command (submit_payment)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   turf-store (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ SessionStore  │    │ BookingStore  │    │ PaymentStore │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ login/logout  │    │ create        │    │ create       │  │   │
//! │  │   │ update_user   │    │ by_user       │    │ by_booking   │  │   │
//! │  │   │ restore       │    │ status x2     │    │ by_tournament│  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  │   ┌───────▼───────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ KeyValue      │    │    Clock      │    │   delay      │  │   │
//! │  │   │ Storage       │    │ (stamps,      │    │ (cancellable │  │   │
//! │  │   │ (file/memory) │    │  expiry)      │    │  latency)    │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use turf_store::{MemoryStorage, SessionConfig, SessionStore, SystemClock};
//!
//! # async fn demo() {
//! let session = SessionStore::restore(
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(SystemClock),
//!     SessionConfig::default(),
//! );
//! assert!(session.login("player@turf.com", "player123").await);
//! # }
//! ```

pub mod clock;
pub mod delay;
pub mod error;
pub mod storage;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use delay::{simulate_latency, Cancelled};
pub use error::{StoreError, StoreResult};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::booking::BookingStore;
pub use store::payment::PaymentStore;
pub use store::session::{
    DemoAccount, SessionConfig, SessionStore, DEMO_ACCOUNTS, EXPIRY_KEY, USER_KEY,
};
