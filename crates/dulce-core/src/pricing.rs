//! # Pricing Engine
//!
//! Turns a cart subtotal and an optional coupon into the amounts the cart
//! page and checkout show.
//!
//! ## Evaluation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal, coupon?                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Gate:     no coupon / kind None / subtotal < min ──► no coupon      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. Discount: percentage    subtotal × rate (≤ cap, ≤ subtotal)         │
//! │               fixed_amount  min(amount, subtotal)                       │
//! │               free_shipping standard fee if below threshold, else 0     │
//! │                             (display only)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. After discount: subtotal − discount, floored at 0                   │
//! │                     (free_shipping: subtotal, unchanged)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. Shipping: 0 if free_shipping coupon OR subtotal ≥ threshold         │
//! │               threshold uses the ORIGINAL subtotal                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  5. Final total = after discount + shipping                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use dulce_core::coupon::{Coupon, CouponKind};
//! use dulce_core::money::Money;
//! use dulce_core::pricing::PricingEngine;
//! use dulce_core::types::DiscountRate;
//!
//! let engine = PricingEngine::default();
//! let test20 = Coupon::new(
//!     "TEST20",
//!     CouponKind::percentage(DiscountRate::from_percent(20)),
//!     Money::from_pesos(5000),
//! );
//!
//! let result = engine.compute(Money::from_pesos(8000), Some(&test20));
//! assert_eq!(result.discount_amount.pesos(), 1600);
//! assert_eq!(result.shipping_cost.pesos(), 3000);
//! assert_eq!(result.final_total.pesos(), 9400);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::config::ShippingPolicy;
use crate::coupon::{Coupon, CouponKind};
use crate::money::Money;

// =============================================================================
// Pricing Result
// =============================================================================

/// Amounts shown on the cart page for one pricing run.
///
/// Computed fresh on every view; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    /// The input subtotal, echoed back.
    pub subtotal: Money,

    /// Discount shown to the shopper.
    pub discount_amount: Money,

    /// True when `discount_amount` is a waived shipping fee shown for
    /// transparency and was NOT subtracted from the subtotal.
    pub discount_is_display_only: bool,

    /// Subtotal after the discount, never negative.
    pub total_after_discount: Money,

    pub shipping_cost: Money,

    /// `total_after_discount + shipping_cost`.
    pub final_total: Money,
}

// =============================================================================
// Pricing Engine
// =============================================================================

/// Stateless pricing over a fixed shipping policy.
///
/// `compute` is a pure function of its arguments and the policy: it does
/// no I/O, holds no lock and never fails. The engine is `Copy`, so each
/// request can hold its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PricingEngine {
    policy: ShippingPolicy,
}

impl PricingEngine {
    pub const fn new(policy: ShippingPolicy) -> Self {
        PricingEngine { policy }
    }

    #[inline]
    pub const fn policy(&self) -> &ShippingPolicy {
        &self.policy
    }

    /// Prices a subtotal with an optional coupon.
    ///
    /// `subtotal` must already be validated as non-negative
    /// (see [`validate_subtotal`](crate::validation::validate_subtotal)).
    /// Coupon validity (dates, usage limits) is the caller's concern; only
    /// the coupon kind and minimum subtotal are looked at here.
    pub fn compute(&self, subtotal: Money, coupon: Option<&Coupon>) -> PricingResult {
        // 1. Applicability gate
        let kind = coupon
            .filter(|c| c.applies_to(subtotal))
            .map_or(CouponKind::None, |c| c.kind);

        let qualifies_by_amount = self.policy.qualifies_for_free_shipping(subtotal);

        // 2 + 3. Discount and subtotal after discount
        let (discount_amount, total_after_discount, discount_is_display_only) = match kind {
            CouponKind::Percentage { rate, max_discount } => {
                let mut discount = subtotal.percentage_of(rate);
                if let Some(cap) = max_discount {
                    discount = discount.min(cap);
                }
                let discount = discount.min(subtotal);
                (discount, subtotal.saturating_sub_floor(discount), false)
            }
            CouponKind::FixedAmount { amount } => {
                let discount = amount.min(subtotal).max(Money::zero());
                (discount, subtotal.saturating_sub_floor(discount), false)
            }
            CouponKind::FreeShipping => {
                let shown = if qualifies_by_amount {
                    Money::zero()
                } else {
                    self.policy.standard_shipping_cost
                };
                (shown, subtotal, true)
            }
            CouponKind::None => (Money::zero(), subtotal, false),
        };

        // 4. Shipping, on the original subtotal
        let shipping_cost = if matches!(kind, CouponKind::FreeShipping) || qualifies_by_amount {
            Money::zero()
        } else {
            self.policy.standard_shipping_cost
        };

        // 5. Final total
        let final_total = total_after_discount + shipping_cost;

        debug!(
            subtotal = subtotal.pesos(),
            coupon = coupon.map(|c| c.code.as_str()),
            applied = %kind.discount_type(),
            discount = discount_amount.pesos(),
            shipping = shipping_cost.pesos(),
            total = final_total.pesos(),
            "Cart priced"
        );

        PricingResult {
            subtotal,
            discount_amount,
            discount_is_display_only,
            total_after_discount,
            shipping_cost,
            final_total,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiscountRate;

    fn engine() -> PricingEngine {
        PricingEngine::default()
    }

    fn pesos(n: i64) -> Money {
        Money::from_pesos(n)
    }

    fn percentage(percent: u32, min: i64) -> Coupon {
        Coupon::new(
            "TEST20",
            CouponKind::percentage(DiscountRate::from_percent(percent)),
            pesos(min),
        )
    }

    fn fixed(amount: i64, min: i64) -> Coupon {
        Coupon::new("PRIMERACOMPRA", CouponKind::fixed_amount(pesos(amount)), pesos(min))
    }

    fn free_shipping(min: i64) -> Coupon {
        Coupon::new("GRATIS2025", CouponKind::FreeShipping, pesos(min))
    }

    fn assert_amounts(result: PricingResult, discount: i64, shipping: i64, total: i64) {
        assert_eq!(result.discount_amount, pesos(discount), "discount");
        assert_eq!(result.shipping_cost, pesos(shipping), "shipping");
        assert_eq!(result.final_total, pesos(total), "final total");
    }

    // -------------------------------------------------------------------------
    // Storefront coupon matrix (threshold 15000, shipping 3000)
    // -------------------------------------------------------------------------

    #[test]
    fn test_small_cart_percentage_coupon() {
        let result = engine().compute(pesos(8000), Some(&percentage(20, 5000)));
        assert_amounts(result, 1600, 3000, 9400);
        assert_eq!(result.total_after_discount, pesos(6400));
        assert!(!result.discount_is_display_only);
    }

    #[test]
    fn test_large_cart_percentage_coupon() {
        let result = engine().compute(pesos(20000), Some(&percentage(20, 5000)));
        assert_amounts(result, 4000, 0, 16000);
    }

    #[test]
    fn test_small_cart_free_shipping_coupon() {
        let result = engine().compute(pesos(8000), Some(&free_shipping(1000)));
        assert_amounts(result, 3000, 0, 8000);
        assert_eq!(result.total_after_discount, pesos(8000));
        assert!(result.discount_is_display_only);
    }

    #[test]
    fn test_large_cart_free_shipping_coupon() {
        let result = engine().compute(pesos(20000), Some(&free_shipping(1000)));
        assert_amounts(result, 0, 0, 20000);
    }

    #[test]
    fn test_small_cart_no_coupon() {
        let result = engine().compute(pesos(8000), None);
        assert_amounts(result, 0, 3000, 11000);
    }

    #[test]
    fn test_large_cart_no_coupon() {
        let result = engine().compute(pesos(20000), None);
        assert_amounts(result, 0, 0, 20000);
    }

    // -------------------------------------------------------------------------
    // Threshold interactions
    // -------------------------------------------------------------------------

    #[test]
    fn test_percentage_below_threshold_after_discount_keeps_free_shipping() {
        // 16000 - 20% = 12800, under the threshold; shipping stays free
        let result = engine().compute(pesos(16000), Some(&percentage(20, 0)));
        assert_amounts(result, 3200, 0, 12800);
    }

    #[test]
    fn test_fixed_amount_below_threshold_after_discount_keeps_free_shipping() {
        // 15000 - 2000 = 13000, under the threshold; shipping decided on 15000
        let result = engine().compute(pesos(15000), Some(&fixed(2000, 8000)));
        assert_amounts(result, 2000, 0, 13000);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_amounts(engine().compute(pesos(15000), None), 0, 0, 15000);
        assert_amounts(engine().compute(pesos(14999), None), 0, 3000, 17999);
    }

    // -------------------------------------------------------------------------
    // Coupon edge cases
    // -------------------------------------------------------------------------

    #[test]
    fn test_fixed_amount_larger_than_subtotal() {
        let result = engine().compute(pesos(1500), Some(&fixed(2000, 0)));
        assert_amounts(result, 1500, 3000, 3000);
        assert_eq!(result.total_after_discount, Money::zero());
    }

    #[test]
    fn test_percentage_over_hundred_never_goes_negative() {
        let result = engine().compute(pesos(8000), Some(&percentage(150, 0)));
        assert_eq!(result.discount_amount, pesos(8000));
        assert_eq!(result.total_after_discount, Money::zero());
        assert_eq!(result.final_total, pesos(3000));
    }

    #[test]
    fn test_percentage_cap() {
        let coupon = Coupon::new(
            "BLACKFRIDAY50",
            CouponKind::Percentage {
                rate: DiscountRate::from_percent(50),
                max_discount: Some(pesos(10000)),
            },
            pesos(5000),
        );
        let result = engine().compute(pesos(30000), Some(&coupon));
        assert_amounts(result, 10000, 0, 20000);
    }

    #[test]
    fn test_fractional_percentage_rounds_once() {
        // 12.5% of 8999 = 1124.875 → 1125
        let coupon = Coupon::new(
            "DOCEYMEDIO",
            CouponKind::percentage(DiscountRate::from_bps(1250)),
            Money::zero(),
        );
        let result = engine().compute(pesos(8999), Some(&coupon));
        assert_eq!(result.discount_amount, pesos(1125));
        assert_eq!(result.total_after_discount, pesos(7874));
    }

    #[test]
    fn test_coupon_below_minimum_is_inert() {
        let with = engine().compute(pesos(4000), Some(&percentage(20, 5000)));
        let without = engine().compute(pesos(4000), None);
        assert_eq!(with, without);

        let shipping = engine().compute(pesos(900), Some(&free_shipping(1000)));
        assert_amounts(shipping, 0, 3000, 3900);
    }

    #[test]
    fn test_none_coupon_is_inert() {
        let coupon = Coupon::new("NADA", CouponKind::None, Money::zero());
        let result = engine().compute(pesos(8000), Some(&coupon));
        assert_eq!(result, engine().compute(pesos(8000), None));
    }

    #[test]
    fn test_empty_cart_pays_shipping() {
        assert_amounts(engine().compute(Money::zero(), None), 0, 3000, 3000);
    }

    #[test]
    fn test_custom_policy() {
        let policy = ShippingPolicy::new(pesos(20000), pesos(3500)).unwrap();
        let engine = PricingEngine::new(policy);
        assert_eq!(engine.policy(), &policy);
        assert_amounts(engine.compute(pesos(16000), None), 0, 3500, 19500);
        assert_amounts(
            engine.compute(pesos(16000), Some(&free_shipping(0))),
            3500,
            0,
            16000,
        );
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = engine().compute(pesos(8000), None);
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["finalTotal"], 11000);
        assert_eq!(json["shippingCost"], 3000);
        assert_eq!(json["discountIsDisplayOnly"], false);
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_kind() -> impl Strategy<Value = CouponKind> {
            prop_oneof![
                (0u32..=10_000u32, proptest::option::of(0i64..50_000i64)).prop_map(
                    |(bps, cap)| CouponKind::Percentage {
                        rate: DiscountRate::from_bps(bps),
                        max_discount: cap.map(Money::from_pesos),
                    }
                ),
                (0i64..100_000i64).prop_map(|a| CouponKind::fixed_amount(Money::from_pesos(a))),
                Just(CouponKind::FreeShipping),
                Just(CouponKind::None),
            ]
        }

        fn any_coupon() -> impl Strategy<Value = Option<Coupon>> {
            proptest::option::of(
                (any_kind(), 0i64..30_000i64)
                    .prop_map(|(kind, min)| Coupon::new("PROP", kind, Money::from_pesos(min))),
            )
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 512,
                ..ProptestConfig::default()
            })]

            /// Property: same inputs, same result.
            #[test]
            fn compute_is_deterministic(
                subtotal in 0i64..1_000_000i64,
                coupon in any_coupon(),
            ) {
                let first = engine().compute(Money::from_pesos(subtotal), coupon.as_ref());
                let second = engine().compute(Money::from_pesos(subtotal), coupon.as_ref());
                prop_assert_eq!(first, second);
            }

            /// Property: final total is exactly the sum of its parts.
            #[test]
            fn totals_add_up_exactly(
                subtotal in 0i64..1_000_000i64,
                coupon in any_coupon(),
            ) {
                let r = engine().compute(Money::from_pesos(subtotal), coupon.as_ref());
                prop_assert_eq!(r.final_total, r.total_after_discount + r.shipping_cost);
                prop_assert!(!r.total_after_discount.is_negative());
                if r.discount_is_display_only {
                    prop_assert_eq!(r.total_after_discount, r.subtotal);
                } else {
                    prop_assert_eq!(r.total_after_discount + r.discount_amount, r.subtotal);
                }
            }

            /// Property: without a coupon, shipping follows the threshold.
            #[test]
            fn no_coupon_shipping_follows_threshold(subtotal in 0i64..1_000_000i64) {
                let r = engine().compute(Money::from_pesos(subtotal), None);
                prop_assert_eq!(r.discount_amount, Money::zero());
                if subtotal >= 15000 {
                    prop_assert_eq!(r.shipping_cost, Money::zero());
                    prop_assert_eq!(r.final_total.pesos(), subtotal);
                } else {
                    prop_assert_eq!(r.shipping_cost.pesos(), 3000);
                    prop_assert_eq!(r.final_total.pesos(), subtotal + 3000);
                }
            }

            /// Property: at or above the threshold no coupon can add shipping.
            #[test]
            fn threshold_uses_original_subtotal(
                subtotal in 15_000i64..1_000_000i64,
                coupon in any_coupon(),
            ) {
                let r = engine().compute(Money::from_pesos(subtotal), coupon.as_ref());
                prop_assert_eq!(r.shipping_cost, Money::zero());
            }

            /// Property: an inapplicable coupon prices like no coupon.
            #[test]
            fn inapplicable_coupon_matches_no_coupon(
                subtotal in 0i64..50_000i64,
                kind in any_kind(),
                extra in 1i64..10_000i64,
            ) {
                let coupon = Coupon::new("ALTO", kind, Money::from_pesos(subtotal + extra));
                let with = engine().compute(Money::from_pesos(subtotal), Some(&coupon));
                let without = engine().compute(Money::from_pesos(subtotal), None);
                prop_assert_eq!(with, without);
            }

            /// Property: percentage discount is the exact basis-point share,
            /// rounded half-up once, with no drift when re-priced.
            #[test]
            fn percentage_has_no_drift(
                subtotal in 0i64..1_000_000i64,
                bps in 0u32..=10_000u32,
                repeats in 1usize..20usize,
            ) {
                let coupon = Coupon::new(
                    "PCT",
                    CouponKind::percentage(DiscountRate::from_bps(bps)),
                    Money::zero(),
                );
                let expected = (subtotal as i128 * bps as i128 + 5000) / 10000;

                let mut chained = Money::zero();
                for _ in 0..repeats {
                    let r = engine().compute(Money::from_pesos(subtotal), Some(&coupon));
                    prop_assert_eq!(r.discount_amount.pesos() as i128, expected);
                    chained += r.total_after_discount;
                }
                prop_assert_eq!(
                    chained.pesos() as i128,
                    (subtotal as i128 - expected) * repeats as i128
                );
            }

            /// Property: fixed discount is min(amount, subtotal).
            #[test]
            fn fixed_amount_is_capped_by_subtotal(
                subtotal in 0i64..100_000i64,
                amount in 0i64..100_000i64,
            ) {
                let coupon = Coupon::new("FIJO", CouponKind::fixed_amount(Money::from_pesos(amount)), Money::zero());
                let r = engine().compute(Money::from_pesos(subtotal), Some(&coupon));
                prop_assert_eq!(r.discount_amount.pesos(), amount.min(subtotal));
                prop_assert!(!r.final_total.is_negative());
            }
        }
    }
}
