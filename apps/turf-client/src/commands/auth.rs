//! # Auth Commands

use tracing::{debug, info, warn};

use turf_core::validation::validate_email;
use turf_core::{CoreError, User, UserPatch};

use crate::commands::require_user;
use crate::error::{ApiError, ErrorCode};
use crate::state::{AppState, PaymentProcessor};

pub async fn login<P: PaymentProcessor>(
    state: &AppState<P>,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    debug!("login command");

    if !state.session.login(email.trim(), password).await {
        return Err(ApiError::new(
            ErrorCode::Unauthorized,
            "Invalid email or password",
        ));
    }
    require_user(state)
}

/// Signs out and closes any open payment modal.
pub fn logout<P: PaymentProcessor>(state: &AppState<P>) {
    debug!("logout command");
    state.checkout.close();
    state.session.logout();
}

pub fn current_user<P: PaymentProcessor>(state: &AppState<P>) -> Option<User> {
    state.session.current_user()
}

/// Updates the signed-in user's own profile. The role is not editable here.
pub fn update_profile<P: PaymentProcessor>(
    state: &AppState<P>,
    patch: UserPatch,
) -> Result<User, ApiError> {
    debug!("update_profile command");
    let user = require_user(state)?;

    if patch.role.is_some_and(|role| role != user.role) {
        warn!(user_id = %user.id, role = %user.role, "Refused role change through profile update");
        return Err(CoreError::Forbidden {
            role: user.role,
            action: "change their own role".to_string(),
        }
        .into());
    }
    if let Some(email) = &patch.email {
        validate_email(email)?;
    }
    let user = state
        .session
        .update_user(patch)
        .ok_or_else(ApiError::unauthorized)?;

    info!(user_id = %user.id, "Profile updated");
    Ok(user)
}
