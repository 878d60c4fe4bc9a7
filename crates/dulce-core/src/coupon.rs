//! # Coupons
//!
//! A coupon is a discount policy the shopper types in at the cart.
//!
//! ## Two Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CouponRecord (storage row)          Coupon (pricing input)             │
//! │  ───────────────────────────         ─────────────────────────          │
//! │  discount_type: "percentage"   ──►   kind: CouponKind::Percentage {     │
//! │  discount_value: 2000                        rate: 20%,                 │
//! │  maximum_discount_amount: None               max_discount: None }       │
//! │  minimum_order_amount: 5000    ──►   min_subtotal: $5.000               │
//! │                                                                         │
//! │  Unknown type / negative value ──►   kind: CouponKind::None             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Conversion never fails: a malformed row becomes a coupon with no effect
//! so the shopper can still check out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CouponError;
use crate::money::Money;
use crate::types::{DiscountRate, DiscountType};

// =============================================================================
// Coupon Kind
// =============================================================================

/// What a coupon does once it applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CouponKind {
    /// `rate` of the subtotal off, optionally capped at `max_discount`.
    Percentage {
        rate: DiscountRate,
        max_discount: Option<Money>,
    },
    /// A fixed amount off, never more than the subtotal.
    FixedAmount { amount: Money },
    /// Shipping is waived.
    FreeShipping,
    /// No effect.
    None,
}

impl CouponKind {
    /// Percentage coupon without a cap.
    pub const fn percentage(rate: DiscountRate) -> Self {
        CouponKind::Percentage {
            rate,
            max_discount: None,
        }
    }

    pub const fn fixed_amount(amount: Money) -> Self {
        CouponKind::FixedAmount { amount }
    }

    /// The stored tag for this kind.
    pub const fn discount_type(&self) -> DiscountType {
        match self {
            CouponKind::Percentage { .. } => DiscountType::Percentage,
            CouponKind::FixedAmount { .. } => DiscountType::FixedAmount,
            CouponKind::FreeShipping => DiscountType::FreeShipping,
            CouponKind::None => DiscountType::None,
        }
    }
}

impl Default for CouponKind {
    fn default() -> Self {
        CouponKind::None
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// A coupon ready to be priced.
///
/// `kind` and `min_subtotal` drive pricing. The remaining fields decide
/// whether the shopper may redeem it at all and are checked before pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Upper-case code the shopper types in.
    pub code: String,
    pub kind: CouponKind,
    /// Minimum subtotal for the coupon to have any effect.
    pub min_subtotal: Money,
    pub is_active: bool,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    /// `None` means unlimited.
    pub max_uses: Option<u32>,
    pub current_uses: u32,
}

impl Coupon {
    /// Creates an active coupon with no validity window and no usage limit.
    ///
    /// ## Example
    /// ```rust
    /// use dulce_core::coupon::{Coupon, CouponKind};
    /// use dulce_core::money::Money;
    /// use dulce_core::types::DiscountRate;
    ///
    /// let coupon = Coupon::new(
    ///     " test20 ",
    ///     CouponKind::percentage(DiscountRate::from_percent(20)),
    ///     Money::from_pesos(5000),
    /// );
    /// assert_eq!(coupon.code, "TEST20");
    /// assert!(coupon.applies_to(Money::from_pesos(5000)));
    /// assert!(!coupon.applies_to(Money::from_pesos(4999)));
    /// ```
    pub fn new(code: &str, kind: CouponKind, min_subtotal: Money) -> Self {
        Coupon {
            code: normalize_code(code),
            kind,
            min_subtotal,
            is_active: true,
            valid_from: None,
            valid_until: None,
            max_uses: None,
            current_uses: 0,
        }
    }

    /// Restricts the coupon to `[from, until]`.
    pub fn with_window(mut self, from: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        self.valid_from = Some(from);
        self.valid_until = Some(until);
        self
    }

    pub fn with_max_uses(mut self, max_uses: u32) -> Self {
        self.max_uses = Some(max_uses);
        self
    }

    /// Pricing gate: does this coupon have any effect on `subtotal`?
    ///
    /// A `None` coupon never applies; otherwise the subtotal must reach
    /// the coupon minimum.
    #[inline]
    pub fn applies_to(&self, subtotal: Money) -> bool {
        !matches!(self.kind, CouponKind::None) && subtotal >= self.min_subtotal
    }

    /// Active and inside its validity window at `now`.
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        if self.valid_from.is_some_and(|from| now < from) {
            return false;
        }
        if self.valid_until.is_some_and(|until| now > until) {
            return false;
        }
        true
    }

    /// Usage limit not yet reached.
    #[inline]
    pub fn has_uses_left(&self) -> bool {
        self.max_uses.map_or(true, |max| self.current_uses < max)
    }

    /// Current and with uses left.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.is_current(now) && self.has_uses_left()
    }

    /// Checks whether a shopper may attach this coupon to a cart.
    ///
    /// ## Check Order
    /// ```text
    /// inactive / outside window ──► Expired
    /// subtotal < min_subtotal   ──► MinimumNotMet
    /// max_uses reached          ──► Exhausted
    /// ```
    pub fn check_redeemable(&self, subtotal: Money, now: DateTime<Utc>) -> Result<(), CouponError> {
        if !self.is_current(now) {
            return Err(CouponError::Expired);
        }

        if subtotal < self.min_subtotal {
            return Err(CouponError::MinimumNotMet {
                minimum: self.min_subtotal,
            });
        }

        if !self.has_uses_left() {
            return Err(CouponError::Exhausted);
        }

        Ok(())
    }
}

/// Codes are stored and matched upper-case without surrounding whitespace.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Looks up the coupon a shopper typed in, ignoring case and padding.
///
/// ## Example
/// ```rust
/// use dulce_core::coupon::{find_coupon, Coupon, CouponKind};
/// use dulce_core::error::CouponError;
/// use dulce_core::money::Money;
///
/// let coupons = [Coupon::new("GRATIS2025", CouponKind::FreeShipping, Money::zero())];
/// assert!(find_coupon(&coupons, " gratis2025").is_ok());
/// assert_eq!(find_coupon(&coupons, "NOEXISTE"), Err(CouponError::NotFound));
/// ```
pub fn find_coupon<'a>(coupons: &'a [Coupon], code: &str) -> Result<&'a Coupon, CouponError> {
    let code = normalize_code(code);
    coupons
        .iter()
        .find(|c| c.code == code)
        .ok_or(CouponError::NotFound)
}

// =============================================================================
// Coupon Record
// =============================================================================

/// A coupon as stored by the back-office.
///
/// `discount_value` is basis points for `percentage` coupons
/// (2000 = 20%) and pesos for `fixed_amount` coupons; it is ignored
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponRecord {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub discount_type: DiscountType,
    #[serde(default)]
    pub discount_value: i64,
    #[serde(default)]
    pub minimum_order_amount: Money,
    #[serde(default)]
    pub maximum_discount_amount: Option<Money>,
    #[serde(default)]
    pub max_uses: Option<u32>,
    #[serde(default)]
    pub current_uses: u32,
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl CouponRecord {
    fn kind(&self) -> CouponKind {
        match self.discount_type {
            DiscountType::Percentage => {
                let Ok(bps) = u32::try_from(self.discount_value) else {
                    return self.degrade("percentage value out of range");
                };
                // a zero cap is stored for "no cap"
                let max_discount = self
                    .maximum_discount_amount
                    .filter(|cap| cap.is_positive());
                CouponKind::Percentage {
                    rate: DiscountRate::from_bps(bps),
                    max_discount,
                }
            }
            DiscountType::FixedAmount => {
                if self.discount_value < 0 {
                    return self.degrade("negative fixed amount");
                }
                CouponKind::fixed_amount(Money::from_pesos(self.discount_value))
            }
            DiscountType::FreeShipping => CouponKind::FreeShipping,
            DiscountType::None => CouponKind::None,
        }
    }

    fn degrade(&self, reason: &str) -> CouponKind {
        warn!(
            code = %self.code,
            discount_type = %self.discount_type,
            value = self.discount_value,
            reason,
            "Coupon record degraded to no effect"
        );
        CouponKind::None
    }
}

impl From<CouponRecord> for Coupon {
    fn from(record: CouponRecord) -> Self {
        let kind = record.kind();
        Coupon {
            code: normalize_code(&record.code),
            kind,
            min_subtotal: record.minimum_order_amount,
            is_active: record.is_active,
            valid_from: record.valid_from,
            valid_until: record.valid_until,
            max_uses: record.max_uses,
            current_uses: record.current_uses,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
