//! # Simulated Latency
//!
//! The client has no backend, so login and payment processing wait a fixed
//! time to mimic a network round trip. The wait is cancellable: when the
//! owning view is torn down its token is cancelled and the pending
//! completion never lands.
//!
//! ```text
//!   caller ──► simulate_latency(d, token)
//!                    │
//!          ┌─────────┴──────────┐
//!          ▼                    ▼
//!     sleep(d) done        token.cancelled()
//!          │                    │
//!        Ok(())           Err(Cancelled)
//! ```

use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// The wait was abandoned before it finished.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Waits `duration` unless `cancel` fires first.
pub async fn simulate_latency(duration: Duration, cancel: &CancellationToken) -> Result<(), Cancelled> {
    if cancel.is_cancelled() {
        return Err(Cancelled);
    }
    tokio::select! {
        _ = cancel.cancelled() => Err(Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}
