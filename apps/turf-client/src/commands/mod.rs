//! # Client Commands Module
//!
//! Every operation the UI can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports, session guards)
//! ├── auth.rs       ◄─── Login, logout, profile
//! ├── booking.rs    ◄─── Create, list, cancel bookings
//! ├── payment.rs    ◄─── Payment modal, settlement, operator confirmation
//! ├── dashboard.rs  ◄─── Role-scoped booking summary
//! └── config.rs     ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  UI event (submit in payment modal)                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  commands::payment::submit_payment(&state)                              │
//! │         │                                                               │
//! │         ├── require_user()      ◄── Unauthorized when signed out        │
//! │         ├── state.checkout      ◄── modal state machine                 │
//! │         └── state.settlements   ◄── applies payment to booking          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Result<SubmitPaymentResponse, ApiError> (serialized for the UI)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod booking;
pub mod config;
pub mod dashboard;
pub mod payment;

use turf_core::{CoreError, Role, User};

use crate::error::ApiError;
use crate::state::{AppState, PaymentProcessor};

/// The signed-in user, or `Unauthorized`.
pub(crate) fn require_user<P: PaymentProcessor>(state: &AppState<P>) -> Result<User, ApiError> {
    state
        .session
        .current_user()
        .ok_or_else(ApiError::unauthorized)
}

/// The signed-in user when `allowed` accepts their role, else `Forbidden`.
pub(crate) fn require_role<P, F>(state: &AppState<P>, action: &str, allowed: F) -> Result<User, ApiError>
where
    P: PaymentProcessor,
    F: Fn(&Role) -> bool,
{
    let user = require_user(state)?;
    if !allowed(&user.role) {
        tracing::warn!(user_id = %user.id, role = %user.role, %action, "Operation refused for role");
        return Err(CoreError::Forbidden {
            role: user.role,
            action: action.to_string(),
        }
        .into());
    }
    Ok(user)
}
