//! # Store Module
//!
//! The three state holders of the client.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SessionStore ──► KeyValueStorage ("user", "sessionExpiry")            │
//! │                                                                         │
//! │  BookingStore ──► Mutex<Vec<Booking>>                                  │
//! │                                                                         │
//! │  PaymentStore ──► Mutex<Vec<Payment>>                                  │
//! │                                                                         │
//! │  No store holds a reference to another. Bookings and payments point at │
//! │  each other by id only; turf-client does the joining.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod booking;
pub mod payment;
pub mod session;
