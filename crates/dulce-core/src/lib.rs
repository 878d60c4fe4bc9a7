//! # dulce-core: Cart Pricing for Dulce Bias
//!
//! Pure business logic behind the storefront cart: coupons, the
//! free-shipping rule, and the totals shown at checkout. No I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront                                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        Cart page / Checkout (templates, AJAX refresh)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ in-process call                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ dulce-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐           │   │
//! │  │   │  money  │  │ coupon  │  │  cart   │  │ pricing │           │   │
//! │  │   │  Money  │  │ Coupon  │  │  Cart   │  │ Engine  │           │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └─────────┘           │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Peso amounts with integer arithmetic
//! - [`types`] - Discount rates, discount types, products
//! - [`coupon`] - Coupons and their stored records
//! - [`pricing`] - The pricing engine
//! - [`cart`] - Cart lines and totals
//! - [`config`] - Shipping policy and store settings
//! - [`validation`] - Caller-boundary checks
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use dulce_core::{Coupon, CouponKind, Money, PricingEngine};
//!
//! let engine = PricingEngine::default();
//! let gratis = Coupon::new("GRATIS2025", CouponKind::FreeShipping, Money::from_pesos(1000));
//!
//! let result = engine.compute(Money::from_pesos(8000), Some(&gratis));
//! assert_eq!(result.discount_amount.pesos(), 3000); // shown, not subtracted
//! assert!(result.shipping_cost.is_zero());
//! assert_eq!(result.final_total.pesos(), 8000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod config;
pub mod coupon;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CartTotals};
pub use config::{ShippingPolicy, StoreConfig};
pub use coupon::{Coupon, CouponKind, CouponRecord};
pub use error::{ConfigError, CoreError, CoreResult, CouponError, ValidationError};
pub use money::Money;
pub use pricing::{PricingEngine, PricingResult};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Subtotal at or above which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Money = Money::from_pesos(15000);

/// Flat shipping fee below the threshold.
pub const STANDARD_SHIPPING_COST: Money = Money::from_pesos(3000);

/// Maximum distinct lines in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
