//! # Turf Client Entry Point
//!
//! Headless walk through the client: restore or create a session, book a
//! slot, pay for it, and confirm the payment as the turf owner.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  bootstrap() ──► login(player) ──► create_booking ──► payment modal     │
//! │                                                          │              │
//! │                                      manual transfer ◄───┘              │
//! │                                          │                              │
//! │  dashboard ◄── confirm_payment ◄── login(owner) ◄── logout              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `TURF_CONFIG` points at an alternate `turf.toml`.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Duration, NaiveTime, Utc};
use tracing::{error, info};

use turf_client::commands::{auth, booking, dashboard, payment};
use turf_client::error::ApiError;
use turf_client::state::AppState;
use turf_client::{bootstrap, init_tracing};
use turf_core::{Money, PaymentMethod};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    info!("Starting turf client");

    let state = match bootstrap(std::env::var_os("TURF_CONFIG").map(PathBuf::from)) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    let result = run(&state).await;
    state.shutdown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Demo run failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(state: &AppState) -> Result<(), ApiError> {
    let player = auth::login(state, "player@turf.com", "player123").await?;
    info!(name = %player.name, expires_at = ?state.session.expires_at(), "Signed in");

    let tomorrow = Utc::now().date_naive() + Duration::days(1);
    let evening = NaiveTime::from_hms_opt(18, 0, 0)
        .ok_or_else(|| ApiError::internal("invalid start time"))?;
    let booked = booking::create_booking(
        state,
        booking::CreateBookingRequest {
            turf_id: "turf-1".to_string(),
            turf_name: "Green Field Arena".to_string(),
            date: tomorrow,
            start_time: evening,
            duration: 2,
            total_amount: Money::from_taka(2500),
        },
    )?;

    payment::open_booking_payment(state, &booked.id)?;
    state.checkout.select_method(PaymentMethod::Manual);
    state.checkout.set_contact("+8801711000000");
    state.checkout.set_reference("BK-20261019");
    let submitted = payment::submit_payment(state).await?;
    payment::close_payment(state);
    info!(
        payment_id = %submitted.payment.id,
        amount = %state.config.format_amount(submitted.payment.amount),
        settled = submitted.settled,
        "Payment submitted"
    );

    auth::logout(state);
    auth::login(state, "owner@turf.com", "owner123").await?;
    for pending in payment::pending_confirmations(state)? {
        payment::confirm_payment(state, &pending.id)?;
    }

    let summary = dashboard::dashboard_summary(state)?;
    info!(
        total = summary.total_bookings,
        active = summary.active,
        awaiting = summary.awaiting_confirmation,
        revenue = %summary.revenue_label,
        "Dashboard"
    );

    auth::logout(state);
    Ok(())
}
