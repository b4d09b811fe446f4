//! # Money Module
//!
//! Provides the `Money` type for monetary values.
//!
//! ## Integer Amounts Only
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Prices in the catalog are whole currency units (e.g. 1000 for a cola). │
//! │                                                                         │
//! │  Every amount - unit price, line charge, promotion discount,           │
//! │  membership discount, payable total - is an i64 count of those units.  │
//! │  Percentages are basis points, so 30% = 3000 bps, and the only         │
//! │  rounding happens in one place: `Money::percentage`.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::money::Money;
//! use till_core::types::DiscountRate;
//!
//! let price = Money::from_units(1000);
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.units(), 3000);
//!
//! let discount = line.percentage(DiscountRate::from_bps(3000));
//! assert_eq!(discount.units(), 900);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::DiscountRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in whole currency units.
///
/// ## Where Money is Used
/// ```text
/// ProductRecord.price ──► LineQuote.charge ──► Receipt.subtotal
///                     │                    │
///                     └──► free units ─────┴──► Receipt.promotion_discount
///
/// Receipt.subtotal - promotion - membership ──► Receipt.payable
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the amount in whole currency units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies a unit price by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let unit_price = Money::from_units(1500);
    /// assert_eq!(unit_price.multiply_quantity(2).units(), 3000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// Returns `rate` of this amount, rounded half up.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`
    /// The +5000 provides rounding (5000/10000 = 0.5)
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    /// use till_core::types::DiscountRate;
    ///
    /// let amount = Money::from_units(1_001);
    /// // 30% of 1001 = 300.3 → 300
    /// assert_eq!(amount.percentage(DiscountRate::from_bps(3000)).units(), 300);
    /// ```
    pub fn percentage(&self, rate: DiscountRate) -> Money {
        // i128 so large subtotals cannot overflow before the division
        let part = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money(part as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount with thousands separators (`18,300`).
///
/// ## Note
/// No currency symbol and no locale rules; the console appends its own unit.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if self.0 < 0 {
            write!(f, "-{}", grouped)
        } else {
            write!(f, "{}", grouped)
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
