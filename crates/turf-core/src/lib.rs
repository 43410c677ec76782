//! # turf-core: Pure Domain Logic for the Turf Booking Client
//!
//! This crate holds the domain types and rules shared by every layer of the
//! turf booking client. It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Turf Client Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          UI (dashboards, headers, payment modal view)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                turf-client (composition, commands)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               turf-store (Session/Booking/Payment)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ turf-core (THIS CRATE) ★                        │   │
//! │  │   types • money • validation • error                           │   │
//! │  │   NO I/O • NO TIMERS • PURE FUNCTIONS                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Booking, Payment, statuses)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Payment form and input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use turf_core::money::Money;
//!
//! let slot = Money::from_taka(1250);
//! let total = slot * 2;
//!
//! assert_eq!(total.poisha(), 250_000);
//! assert_eq!(total.to_string(), "৳2500.00");
//! ```

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

/// Absolute lifetime of a session, measured from login.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Prefix of synthesized gateway transaction references.
pub const GATEWAY_TRANSACTION_PREFIX: &str = "TXN";

/// Number of random characters following the gateway prefix.
pub const GATEWAY_TRANSACTION_SUFFIX_LEN: usize = 10;
