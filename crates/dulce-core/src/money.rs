//! # Money Module
//!
//! Provides the `Money` type for handling peso amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floats a 20% coupon is computed as:                        │
//! │    subtotal * (20 / 100)  →  subtotal * 0.2000000000000000111...        │
//! │                                                                         │
//! │  Chained over many carts this drifts by whole pesos.                    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Pesos + Basis Points                             │
//! │    8000 * 2000 bps / 10000 = 1600     (exact)                           │
//! │    The only fractional step is rounded exactly ONCE                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use dulce_core::money::Money;
//!
//! let price = Money::from_pesos(2500);
//!
//! let doubled = price * 2;
//! let total = price + Money::from_pesos(500);
//! assert_eq!(total.pesos(), 3000);
//! assert_eq!(doubled.to_string(), "$5.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::DiscountRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in Chilean pesos.
///
/// The peso has no minor unit in circulation, so one unit of `Money` is one
/// peso and every amount the storefront shows is an integer.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product price ──► CartItem.unit_price ──► CartItem.line_total          │
/// │                                                 │                       │
/// │                                                 ▼                       │
/// │  Cart.subtotal ──► PricingEngine::compute ──► PricingResult             │
/// │                     (discount, shipping)        └──► "$9.400" in UI     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole pesos.
    ///
    /// ## Example
    /// ```rust
    /// use dulce_core::money::Money;
    ///
    /// let threshold = Money::from_pesos(15000);
    /// assert_eq!(threshold.pesos(), 15000);
    /// ```
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos)
    }

    /// Returns the value in pesos.
    #[inline]
    pub const fn pesos(&self) -> i64 {
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use dulce_core::money::Money;
    ///
    /// let cookie_box = Money::from_pesos(4990);
    /// assert_eq!(cookie_box.multiply_quantity(3).pesos(), 14970);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns `rate` of this amount, rounded half-up to the peso.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    /// The product is taken in i128 so large carts cannot overflow, and this
    /// is the only place where a fraction of a peso is ever rounded.
    /// Results outside the i64 range saturate.
    ///
    /// ## Example
    /// ```rust
    /// use dulce_core::money::Money;
    /// use dulce_core::types::DiscountRate;
    ///
    /// let subtotal = Money::from_pesos(8000);
    /// let twenty = DiscountRate::from_bps(2000);
    /// assert_eq!(subtotal.percentage_of(twenty).pesos(), 1600);
    ///
    /// // 12.5% of 999 = 124.875 → 125
    /// let rate = DiscountRate::from_bps(1250);
    /// assert_eq!(Money::from_pesos(999).percentage_of(rate).pesos(), 125);
    /// ```
    pub fn percentage_of(&self, rate: DiscountRate) -> Money {
        let portion = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_pesos(portion.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Subtracts `other`, flooring the result at zero.
    ///
    /// ## Example
    /// ```rust
    /// use dulce_core::money::Money;
    ///
    /// let rest = Money::from_pesos(1500).saturating_sub_floor(Money::from_pesos(2000));
    /// assert!(rest.is_zero());
    /// ```
    #[inline]
    pub fn saturating_sub_floor(self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }

    /// Formats a shipping fee the way the storefront shows it.
    ///
    /// Zero shipping is shown as `GRATIS`.
    ///
    /// ## Example
    /// ```rust
    /// use dulce_core::money::Money;
    ///
    /// assert_eq!(Money::zero().display_shipping(), "GRATIS");
    /// assert_eq!(Money::from_pesos(3000).display_shipping(), "$3.000");
    /// ```
    pub fn display_shipping(&self) -> String {
        if self.is_zero() {
            "GRATIS".to_string()
        } else {
            self.to_string()
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Chilean display: `$` prefix, `.` as thousands separator, no decimals.
///
/// ## Note
/// Amounts are shown exactly as stored; rounding never happens here.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.unsigned_abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{}${}", sign, grouped)
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

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pesos() {
        let money = Money::from_pesos(8000);
        assert_eq!(money.pesos(), 8000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_pesos(0).to_string(), "$0");
        assert_eq!(Money::from_pesos(999).to_string(), "$999");
        assert_eq!(Money::from_pesos(8000).to_string(), "$8.000");
        assert_eq!(Money::from_pesos(15000).to_string(), "$15.000");
        assert_eq!(Money::from_pesos(1234567).to_string(), "$1.234.567");
        assert_eq!(Money::from_pesos(-1600).to_string(), "-$1.600");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_pesos(1000);
        let b = Money::from_pesos(500);

        assert_eq!((a + b).pesos(), 1500);
        assert_eq!((a - b).pesos(), 500);
        assert_eq!((a * 3).pesos(), 3000);

        let mut c = a;
        c += b;
        c -= Money::from_pesos(200);
        assert_eq!(c.pesos(), 1300);
    }

    #[test]
    fn test_sum() {
        let total: Money = [1000, 2500, 4990]
            .into_iter()
            .map(Money::from_pesos)
            .sum();
        assert_eq!(total.pesos(), 8490);
    }

    #[test]
    fn test_percentage_of_exact() {
        let subtotal = Money::from_pesos(20000);
        let rate = DiscountRate::from_bps(2000);
        assert_eq!(subtotal.percentage_of(rate).pesos(), 4000);
    }

    #[test]
    fn test_percentage_of_rounds_half_up() {
        // 15% of 1 = 0.15 → 0
        assert_eq!(
            Money::from_pesos(1)
                .percentage_of(DiscountRate::from_bps(1500))
                .pesos(),
            0
        );
        // 50% of 1 = 0.5 → 1
        assert_eq!(
            Money::from_pesos(1)
                .percentage_of(DiscountRate::from_bps(5000))
                .pesos(),
            1
        );
    }

    #[test]
    fn test_percentage_of_large_amount_does_not_overflow() {
        let big = Money::from_pesos(i64::MAX / 2);
        let all = big.percentage_of(DiscountRate::from_bps(10000));
        assert_eq!(all, big);
    }

    #[test]
    fn test_percentage_of_saturates_above_hundred_percent() {
        let huge = Money::from_pesos(i64::MAX);
        let rate = DiscountRate::from_bps(50_000);
        assert_eq!(huge.percentage_of(rate).pesos(), i64::MAX);
        assert_eq!(
            Money::from_pesos(i64::MIN).percentage_of(rate).pesos(),
            i64::MIN
        );
    }

    #[test]
    fn test_saturating_sub_floor() {
        let a = Money::from_pesos(8000);
        assert_eq!(a.saturating_sub_floor(Money::from_pesos(1600)).pesos(), 6400);
        assert_eq!(a.saturating_sub_floor(Money::from_pesos(9000)), Money::zero());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_pesos(-100);
        assert!(negative.is_negative());
    }

    #[test]
    fn test_display_shipping() {
        assert_eq!(Money::zero().display_shipping(), "GRATIS");
        assert_eq!(Money::from_pesos(3000).display_shipping(), "$3.000");
    }
}
