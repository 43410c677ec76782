//! # Dashboard Commands
//!
//! Booking counts for the dashboard header, scoped by role: players see
//! their own bookings, turf owners and admins see all of them.

use serde::Serialize;
use tracing::debug;

use turf_core::{Booking, Money, PaymentStatus, Role};

use crate::commands::require_user;
use crate::error::ApiError;
use crate::state::{AppState, PaymentProcessor};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub role: Role,
    pub total_bookings: usize,
    /// Bookings not cancelled.
    pub active: usize,
    pub cancelled: usize,
    pub unpaid: usize,
    /// Booking payment status `pending`: submitted, not yet verified.
    pub awaiting_confirmation: usize,
    /// Sum over bookings whose payment is paid or confirmed.
    pub confirmed_revenue: Money,
    /// Display form of `confirmed_revenue`.
    pub revenue_label: String,
}

impl DashboardSummary {
    fn from_bookings(role: Role, bookings: &[Booking]) -> Self {
        let confirmed_revenue: Money = bookings
            .iter()
            .filter(|b| b.payment_status.is_settled())
            .map(|b| b.total_amount)
            .sum();

        DashboardSummary {
            role,
            total_bookings: bookings.len(),
            active: count(bookings, |b| !b.is_cancelled()),
            cancelled: count(bookings, Booking::is_cancelled),
            unpaid: count(bookings, |b| b.payment_status == PaymentStatus::Unpaid),
            awaiting_confirmation: count(bookings, |b| b.payment_status == PaymentStatus::Pending),
            confirmed_revenue,
            revenue_label: String::new(),
        }
    }
}

fn count(bookings: &[Booking], pred: impl Fn(&Booking) -> bool) -> usize {
    bookings.iter().filter(|b| pred(*b)).count()
}

pub fn dashboard_summary<P: PaymentProcessor>(
    state: &AppState<P>,
) -> Result<DashboardSummary, ApiError> {
    debug!("dashboard_summary command");
    let user = require_user(state)?;

    let bookings = if user.role.sees_all_bookings() {
        state.bookings.all()
    } else {
        state.bookings.bookings_by_user(&user.email)
    };

    let mut summary = DashboardSummary::from_bookings(user.role, &bookings);
    summary.revenue_label = state.config.format_amount(summary.confirmed_revenue);
    Ok(summary)
}
