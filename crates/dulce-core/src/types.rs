//! # Domain Types
//!
//! Small value types shared by the coupon, cart and pricing modules.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  DiscountRate   │   │  DiscountType   │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  percentage     │   │  id             │       │
//! │  │  2000 = 20%     │   │  fixed_amount   │   │  name           │       │
//! │  └─────────────────┘   │  free_shipping  │   │  price (CLP)    │       │
//! │                        │  none           │   │  stock          │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Discount Rate
// =============================================================================

/// Percentage discount represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000.
/// Coupons are entered with two decimals in the back-office ("12.50"),
/// so bps hold every rate the form accepts without a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// 100% in basis points.
    pub const FULL_BPS: u32 = 10_000;

    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a rate from whole percentage points (`20` = 20%).
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        DiscountRate(percent.saturating_mul(100))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// Discount Type
// =============================================================================

/// The `discount_type` column of a stored coupon.
///
/// Anything the storefront does not recognise deserializes to
/// [`DiscountType::None`], so a bad row can never block checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Percentage off the subtotal.
    Percentage,
    /// Fixed peso amount off the subtotal.
    FixedAmount,
    /// Waives the shipping fee.
    FreeShipping,
    /// No effect.
    #[serde(other)]
    None,
}

impl DiscountType {
    /// Parses the stored tag, degrading unknown values to `None`.
    ///
    /// ## Example
    /// ```rust
    /// use dulce_core::types::DiscountType;
    ///
    /// assert_eq!(DiscountType::parse("percentage"), DiscountType::Percentage);
    /// assert_eq!(DiscountType::parse(" Free_Shipping "), DiscountType::FreeShipping);
    /// assert_eq!(DiscountType::parse("buy_one_get_one"), DiscountType::None);
    /// ```
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "percentage" => DiscountType::Percentage,
            "fixed_amount" => DiscountType::FixedAmount,
            "free_shipping" => DiscountType::FreeShipping,
            _ => DiscountType::None,
        }
    }

    /// Returns the stored tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::FixedAmount => "fixed_amount",
            DiscountType::FreeShipping => "free_shipping",
            DiscountType::None => "none",
        }
    }
}

impl Default for DiscountType {
    fn default() -> Self {
        DiscountType::None
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as the cart sees it.
///
/// Only the fields the cart needs; the catalog owns the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Unit price in pesos.
    pub price: Money,
    /// Units on hand.
    pub stock: i64,
    /// Whether the product is listed in the shop.
    pub available: bool,
}

impl Product {
    /// Checks if `quantity` units can be put in a cart.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.available && self.stock >= quantity
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_rate_from_percent() {
        let rate = DiscountRate::from_percent(20);
        assert_eq!(rate.bps(), 2000);
        assert_eq!(DiscountRate::from_percent(u32::MAX).bps(), u32::MAX);
    }

    #[test]
    fn test_discount_type_serde_known_tags() {
        let parsed: DiscountType = serde_json::from_str("\"fixed_amount\"").unwrap();
        assert_eq!(parsed, DiscountType::FixedAmount);
        assert_eq!(
            serde_json::to_string(&DiscountType::FreeShipping).unwrap(),
            "\"free_shipping\""
        );
    }

    #[test]
    fn test_discount_type_serde_unknown_degrades() {
        let parsed: DiscountType = serde_json::from_str("\"two_for_one\"").unwrap();
        assert_eq!(parsed, DiscountType::None);
    }

    #[test]
    fn test_discount_type_display_round_trips_parse() {
        for t in [
            DiscountType::Percentage,
            DiscountType::FixedAmount,
            DiscountType::FreeShipping,
            DiscountType::None,
        ] {
            assert_eq!(DiscountType::parse(&t.to_string()), t);
        }
    }

    #[test]
    fn test_product_can_sell() {
        let mut product = Product {
            id: 1,
            name: "Galletas de avena".to_string(),
            price: Money::from_pesos(2500),
            stock: 3,
            available: true,
        };
        assert!(product.can_sell(3));
        assert!(!product.can_sell(4));

        product.available = false;
        assert!(!product.can_sell(1));
    }
}
