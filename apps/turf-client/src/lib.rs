//! # Turf Client Library
//!
//! Client-side state of the turf booking platform: configuration, the
//! three stores, the payment modal and the commands the UI calls.
//!
//! ## Module Organization
//! ```text
//! turf_client/
//! ├── lib.rs          ◄─── You are here (logging & startup)
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState wiring
//! │   ├── config.rs   ◄─── Configuration state
//! │   ├── checkout.rs ◄─── Payment modal state machine
//! │   └── settlement.rs ◄─ Payment → booking settlement ledger
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports, session guards
//! │   ├── auth.rs     ◄─── Login, logout, profile
//! │   ├── booking.rs  ◄─── Booking commands
//! │   ├── payment.rs  ◄─── Checkout and confirmation commands
//! │   ├── dashboard.rs ◄── Role-scoped summary
//! │   └── config.rs   ◄─── Configuration retrieval
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use state::{AppState, ConfigError, ConfigState};
use turf_store::{FileStorage, KeyValueStorage, MemoryStorage, SystemClock};

/// Builds the application state.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Client Startup                                    │
/// │                                                                         │
/// │  1. Load Configuration ──────────────────────────────────────────────► │
/// │     • defaults → turf.toml → TURF_* env                                 │
/// │                                                                         │
/// │  2. Determine Session File ──────────────────────────────────────────► │
/// │     • macOS: ~/Library/Application Support/com.turf.client/session.json │
/// │     • Windows: %APPDATA%/turf/client/data/session.json                  │
/// │     • Linux: ~/.local/share/client/session.json                         │
/// │     • No home directory: in-memory session only                         │
/// │                                                                         │
/// │  3. Restore Session ─────────────────────────────────────────────────► │
/// │     • expired or unreadable sessions are cleared                        │
/// │                                                                         │
/// │  4. Build Stores, Checkout and Settlement Ledger ────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn bootstrap(config_path: Option<PathBuf>) -> Result<AppState, ConfigError> {
    let config = ConfigState::load(config_path)?;

    let storage: Arc<dyn KeyValueStorage> = match config.session_file() {
        Some(path) => {
            info!(path = %path.display(), "Session file determined");
            Arc::new(FileStorage::new(path))
        }
        None => {
            warn!("No data directory available, session will not persist");
            Arc::new(MemoryStorage::new())
        }
    };

    let state = AppState::new(config, storage, Arc::new(SystemClock));
    info!(
        authenticated = state.session.is_authenticated(),
        "State initialized"
    );
    Ok(state)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=turf=trace` - Show trace for turf crates only
/// - Default: INFO, DEBUG for turf crates
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,turf=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use turf_core::Money;

    use crate::commands::booking::CreateBookingRequest;

    pub fn app() -> AppState {
        AppState::new(
            ConfigState::default(),
            Arc::new(MemoryStorage::new()),
            Arc::new(SystemClock),
        )
    }

    pub fn slot() -> CreateBookingRequest {
        CreateBookingRequest {
            turf_id: "turf-1".to_string(),
            turf_name: "Green Field Arena".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            duration: 2,
            total_amount: Money::from_taka(2500),
        }
    }
}
