//! # Domain Types
//!
//! Core domain types shared by the stores and the client layer.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │     Booking     │   │     Payment     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, email      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name, role     │   │  turf_id        │   │  booking_id?    │       │
//! │  │  avatar?        │   │  status         │   │  tournament_id? │       │
//! │  └─────────────────┘   │  payment_status │   │  method, status │       │
//! │                        │  payment_id? ───┼──►│                 │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Links between entities are ids only. No type owns another.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Confirmation Stamp
//! Bookings and payments share one rule: the first time the payment status
//! becomes `confirmed`, `confirmed_at` is set. Later confirmations keep the
//! original timestamp; a supplied confirming party always replaces the old one.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Role
// =============================================================================

/// The closed set of account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Player,
    TurfOwner,
    Admin,
}

impl Role {
    /// Operators may confirm manual payments.
    pub fn can_confirm_payments(&self) -> bool {
        matches!(self, Role::TurfOwner | Role::Admin)
    }

    /// Owners and admins see every booking; players only their own.
    pub fn sees_all_bookings(&self) -> bool {
        matches!(self, Role::TurfOwner | Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player => "player",
            Role::TurfOwner => "turf-owner",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// User
// =============================================================================

/// The authenticated user record, persisted under the `user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub avatar: Option<String>,
}

/// Partial update for the session user. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub avatar: Option<String>,
}

impl User {
    /// Merges a patch into this record. Values are taken as given.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar);
        }
    }
}

// =============================================================================
// Statuses
// =============================================================================

/// Reservation status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

/// Payment status, shared by bookings and payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
    /// Submitted, waiting for an operator to verify.
    Pending,
    Confirmed,
}

impl PaymentStatus {
    /// Paid or confirmed money counts toward revenue.
    pub fn is_settled(&self) -> bool {
        matches!(self, PaymentStatus::Paid | PaymentStatus::Confirmed)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the player chose to pay in the payment modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Mobile-banking transfer verified by an operator.
    Manual,
    /// Online gateway (simulated).
    Gateway,
    /// Pay at the venue.
    PayLater,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Manual => "manual",
            PaymentMethod::Gateway => "gateway",
            PaymentMethod::PayLater => "pay-later",
        }
    }

    /// Status recorded on the payment once processing finishes.
    pub fn resulting_status(&self) -> PaymentStatus {
        match self {
            PaymentMethod::Gateway => PaymentStatus::Paid,
            PaymentMethod::Manual | PaymentMethod::PayLater => PaymentStatus::Unpaid,
        }
    }

    /// Status applied to the linked booking when a payment is settled.
    ///
    /// ```text
    /// gateway   ──► paid     (money captured)
    /// manual    ──► pending  (awaiting operator confirmation)
    /// pay-later ──► unpaid   (collected at the venue)
    /// ```
    pub fn booking_payment_status(&self) -> PaymentStatus {
        match self {
            PaymentMethod::Gateway => PaymentStatus::Paid,
            PaymentMethod::Manual => PaymentStatus::Pending,
            PaymentMethod::PayLater => PaymentStatus::Unpaid,
        }
    }

    /// Manual transfers need a contact number before submit.
    pub fn requires_contact(&self) -> bool {
        matches!(self, PaymentMethod::Manual)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Confirmation Stamp
// =============================================================================

fn stamp_confirmation(
    confirmed_at: &mut Option<DateTime<Utc>>,
    confirmed_by: &mut Option<String>,
    confirmed_by_arg: Option<&str>,
    now: DateTime<Utc>,
) {
    if confirmed_at.is_none() {
        *confirmed_at = Some(now);
    }
    if let Some(by) = confirmed_by_arg {
        *confirmed_by = Some(by.to_string());
    }
}

// =============================================================================
// Booking
// =============================================================================

/// A reservation of a turf for a date/time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub turf_id: String,
    /// Turf name at time of booking (denormalized).
    pub turf_name: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[ts(as = "String")]
    pub start_time: NaiveTime,
    /// Duration in whole hours.
    pub duration: u32,
    pub player_name: String,
    pub player_email: String,
    pub total_amount: Money,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub confirmed_at: Option<DateTime<Utc>>,
    pub confirmed_by: Option<String>,
}

/// Booking fields supplied by the caller; id and creation time are assigned
/// by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub turf_id: String,
    pub turf_name: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[ts(as = "String")]
    pub start_time: NaiveTime,
    pub duration: u32,
    pub player_name: String,
    pub player_email: String,
    pub total_amount: Money,
    pub status: BookingStatus,
    /// Defaults to `unpaid` when omitted.
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub payment_id: Option<String>,
}

impl Booking {
    /// Materializes a new booking.
    pub fn from_new(id: String, new: NewBooking, created_at: DateTime<Utc>) -> Self {
        Booking {
            id,
            turf_id: new.turf_id,
            turf_name: new.turf_name,
            date: new.date,
            start_time: new.start_time,
            duration: new.duration,
            player_name: new.player_name,
            player_email: new.player_email,
            total_amount: new.total_amount,
            status: new.status,
            payment_status: new.payment_status.unwrap_or_default(),
            payment_id: new.payment_id,
            created_at,
            confirmed_at: None,
            confirmed_by: None,
        }
    }

    /// Replaces the payment status, stamping on `confirmed`.
    pub fn apply_payment_status(
        &mut self,
        status: PaymentStatus,
        confirmed_by: Option<&str>,
        now: DateTime<Utc>,
    ) {
        self.payment_status = status;
        if status == PaymentStatus::Confirmed {
            stamp_confirmation(&mut self.confirmed_at, &mut self.confirmed_by, confirmed_by, now);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }
}

// =============================================================================
// Payment
// =============================================================================

/// A recorded payment attempt.
///
/// Exactly one of `booking_id` / `tournament_id` is expected to be set;
/// the caller is responsible for that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub booking_id: Option<String>,
    pub tournament_id: Option<String>,
    pub amount: Money,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Gateway reference or the reference typed for a manual transfer.
    pub transaction_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub confirmed_at: Option<DateTime<Utc>>,
    pub confirmed_by: Option<String>,
}

/// Payment fields supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub booking_id: Option<String>,
    pub tournament_id: Option<String>,
    pub amount: Money,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
}

impl Payment {
    pub fn from_new(id: String, new: NewPayment, created_at: DateTime<Utc>) -> Self {
        Payment {
            id,
            booking_id: new.booking_id,
            tournament_id: new.tournament_id,
            amount: new.amount,
            method: new.method,
            status: new.status,
            transaction_id: new.transaction_id,
            created_at,
            confirmed_at: None,
            confirmed_by: None,
        }
    }

    /// Replaces the status, stamping on `confirmed`.
    pub fn apply_status(
        &mut self,
        status: PaymentStatus,
        confirmed_by: Option<&str>,
        now: DateTime<Utc>,
    ) {
        self.status = status;
        if status == PaymentStatus::Confirmed {
            stamp_confirmation(&mut self.confirmed_at, &mut self.confirmed_by, confirmed_by, now);
        }
    }

    /// Manual payments that an operator has not confirmed yet.
    pub fn awaits_confirmation(&self) -> bool {
        self.method == PaymentMethod::Manual && self.status != PaymentStatus::Confirmed
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_booking() -> NewBooking {
        NewBooking {
            turf_id: "turf-1".to_string(),
            turf_name: "Green Field Arena".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            duration: 2,
            player_name: "Demo Player".to_string(),
            player_email: "player@turf.com".to_string(),
            total_amount: Money::from_taka(2500),
            status: BookingStatus::Confirmed,
            payment_status: None,
            payment_id: None,
        }
    }

    #[test]
    fn test_role_serializes_kebab_case() {
        assert_eq!(serde_json::to_string(&Role::TurfOwner).unwrap(), "\"turf-owner\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!(Role::TurfOwner.to_string(), "turf-owner");
    }

    #[test]
    fn test_user_json_shape() {
        let user = User {
            id: "1".to_string(),
            email: "player@turf.com".to_string(),
            name: "Demo Player".to_string(),
            role: Role::Player,
            avatar: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "player");
        assert!(json.get("avatar").is_none());
    }

    #[test]
    fn test_user_patch_merges_only_given_fields() {
        let mut user = User {
            id: "1".to_string(),
            email: "player@turf.com".to_string(),
            name: "Demo Player".to_string(),
            role: Role::Player,
            avatar: None,
        };
        user.apply(UserPatch {
            name: Some("Rafi".to_string()),
            avatar: Some("/avatars/rafi.png".to_string()),
            ..Default::default()
        });
        assert_eq!(user.name, "Rafi");
        assert_eq!(user.email, "player@turf.com");
        assert_eq!(user.avatar.as_deref(), Some("/avatars/rafi.png"));
    }

    #[test]
    fn test_booking_payment_status_defaults_to_unpaid() {
        let booking = Booking::from_new("b-1".to_string(), new_booking(), Utc::now());
        assert_eq!(booking.payment_status, PaymentStatus::Unpaid);

        let mut explicit = new_booking();
        explicit.payment_status = Some(PaymentStatus::Paid);
        let booking = Booking::from_new("b-2".to_string(), explicit, Utc::now());
        assert_eq!(booking.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_confirmation_stamp_is_kept_on_reconfirm() {
        let t0 = Utc::now();
        let mut booking = Booking::from_new("b-1".to_string(), new_booking(), t0);

        booking.apply_payment_status(PaymentStatus::Confirmed, Some("owner-1"), t0);
        assert_eq!(booking.confirmed_at, Some(t0));
        assert_eq!(booking.confirmed_by.as_deref(), Some("owner-1"));

        let later = t0 + Duration::hours(1);
        booking.apply_payment_status(PaymentStatus::Confirmed, None, later);
        assert_eq!(booking.confirmed_at, Some(t0));
        assert_eq!(booking.confirmed_by.as_deref(), Some("owner-1"));

        booking.apply_payment_status(PaymentStatus::Confirmed, Some("admin-1"), later);
        assert_eq!(booking.confirmed_at, Some(t0));
        assert_eq!(booking.confirmed_by.as_deref(), Some("admin-1"));
    }

    #[test]
    fn test_non_confirmed_status_does_not_stamp() {
        let now = Utc::now();
        let mut payment = Payment::from_new(
            "p-1".to_string(),
            NewPayment {
                booking_id: Some("b-1".to_string()),
                tournament_id: None,
                amount: Money::from_taka(2500),
                method: PaymentMethod::Manual,
                status: PaymentStatus::Unpaid,
                transaction_id: None,
            },
            now,
        );
        payment.apply_status(PaymentStatus::Paid, Some("admin-1"), now);
        assert_eq!(payment.status, PaymentStatus::Paid);
        assert!(payment.confirmed_at.is_none());
        assert!(payment.confirmed_by.is_none());
        assert!(payment.awaits_confirmation());
    }

    #[test]
    fn test_method_outcomes() {
        assert_eq!(PaymentMethod::Gateway.resulting_status(), PaymentStatus::Paid);
        assert_eq!(PaymentMethod::Manual.resulting_status(), PaymentStatus::Unpaid);
        assert_eq!(PaymentMethod::PayLater.resulting_status(), PaymentStatus::Unpaid);
        assert_eq!(
            PaymentMethod::Manual.booking_payment_status(),
            PaymentStatus::Pending
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::PayLater).unwrap(),
            "\"pay-later\""
        );
    }
}
