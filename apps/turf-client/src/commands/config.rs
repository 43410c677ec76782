//! # Config Commands
//!
//! Commands for retrieving client configuration.

use tracing::debug;

use crate::state::{AppState, ConfigState, PaymentProcessor};

/// Gets the current client configuration.
///
/// ## When Used
/// - App startup (to configure UI)
/// - Currency formatting
#[must_use]
pub fn get_config<P: PaymentProcessor>(state: &AppState<P>) -> ConfigState {
    debug!("get_config command");
    state.config.clone()
}
