//! # Money Module
//!
//! Provides the `Money` type for booking totals and payment amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Slot prices are quoted in taka, but split bookings and discounts       │
//! │  produce fractions. Amounts are stored in poisha (1/100 taka) as i64    │
//! │  so that sums over a dashboard never drift.                             │
//! │                                                                         │
//! │    ৳1250 × 2 slots = 250_000 poisha = ৳2500.00                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use turf_core::money::Money;
//!
//! let hourly = Money::from_taka(1200);
//! let booking_total = hourly * 2 + Money::from_poisha(50);
//! assert_eq!(booking_total.to_string(), "৳2400.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

/// Poisha per taka.
const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in poisha (the smallest BDT unit).
///
/// ## Where Money is Used
/// ```text
/// Booking.total_amount ──► PaymentModal.amount ──► Payment.amount
///                                                      │
///                     Dashboard confirmed revenue ◄────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from poisha.
    #[inline]
    pub const fn from_poisha(poisha: i64) -> Self {
        Money(poisha)
    }

    /// Creates a Money value from whole taka.
    ///
    /// ## Example
    /// ```rust
    /// use turf_core::money::Money;
    ///
    /// assert_eq!(Money::from_taka(2500).poisha(), 250_000);
    /// ```
    #[inline]
    pub const fn from_taka(taka: i64) -> Self {
        Money(taka * MINOR_PER_MAJOR)
    }

    /// Returns the value in poisha.
    #[inline]
    pub const fn poisha(&self) -> i64 {
        self.0
    }

    /// Returns the whole-taka portion (truncated toward zero).
    #[inline]
    pub const fn taka(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the poisha remainder, always non-negative.
    #[inline]
    pub const fn poisha_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Formats with a caller-chosen currency symbol.
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.taka().abs(),
            self.poisha_part()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with("৳"))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Multiplication by a slot count or duration in hours.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_taka() {
        let money = Money::from_taka(2500);
        assert_eq!(money.poisha(), 250_000);
        assert_eq!(money.taka(), 2500);
        assert_eq!(money.poisha_part(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_poisha(250_050).to_string(), "৳2500.50");
        assert_eq!(Money::from_poisha(-550).to_string(), "-৳5.50");
        assert_eq!(Money::zero().to_string(), "৳0.00");
        assert_eq!(Money::from_taka(12).format_with("Tk "), "Tk 12.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let slot = Money::from_taka(1200);
        assert_eq!((slot * 2).poisha(), 240_000);
        assert_eq!((slot - Money::from_taka(200)).taka(), 1000);

        let total: Money = [slot, slot, Money::from_poisha(1)].iter().sum();
        assert_eq!(total.poisha(), 240_001);
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&Money::from_taka(25)).unwrap();
        assert_eq!(json, "2500");
    }
}
