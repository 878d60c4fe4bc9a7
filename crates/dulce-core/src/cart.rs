//! # Cart
//!
//! The shopper's cart: line items, an optional coupon, and the totals the
//! cart page shows.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shopper Action          Cart Method              State Change          │
//! │  ──────────────          ───────────              ────────────          │
//! │                                                                         │
//! │  "Agregar al carrito" ──► add_item() ───────────► items.push / qty += n │
//! │  Change quantity ───────► update_quantity() ────► items[i].qty = n      │
//! │  Remove ────────────────► remove_item() ────────► items.remove(i)       │
//! │  Enter coupon code ─────► apply_coupon() ───────► coupon = Some(c)      │
//! │  Remove coupon ─────────► remove_coupon() ──────► coupon = None         │
//! │  View cart ─────────────► totals() ─────────────► (read only)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use crate::coupon::Coupon;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{PricingEngine, PricingResult};
use crate::types::Product;
use crate::validation::{validate_price, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// An item in the cart.
///
/// The unit price is frozen when the item is added, so the cart keeps
/// showing the same line total even if the catalog price changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: i64,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `product_id` (adding the same product increases quantity)
/// - Quantity is always 1..=999
/// - At most 100 lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub coupon: Option<Coupon>,
    pub created_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            coupon: None,
            created_at: Utc::now(),
        }
    }

    /// Adds a product to the cart or increases quantity if already present.
    ///
    /// ## Errors
    /// - `Validation` if `quantity` is not 1..=999 or the price is negative
    /// - `QuantityTooLarge` if the merged quantity would exceed 999
    /// - `CartTooLarge` if a new line would exceed 100 lines
    /// - `InsufficientStock` if the product cannot cover the new quantity
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;
        validate_price(product.price)?;

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            ensure_stock(product, new_qty)?;
            item.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }
        ensure_stock(product, quantity)?;

        self.items.push(CartItem::from_product(product, quantity));
        Ok(())
    }

    /// Sets the quantity of an item; 0 removes it.
    pub fn update_quantity(&mut self, product_id: i64, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }
        validate_quantity(quantity)?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or(CoreError::ItemNotInCart(product_id))?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: i64) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == initial_len {
            Err(CoreError::ItemNotInCart(product_id))
        } else {
            Ok(())
        }
    }

    /// Empties the cart, coupon included.
    pub fn clear(&mut self) {
        self.items.clear();
        self.coupon = None;
        self.created_at = Utc::now();
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of line totals, before discount and shipping.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Attaches a coupon after checking it can be redeemed on this cart.
    ///
    /// Replaces any coupon already attached.
    pub fn apply_coupon(&mut self, coupon: Coupon, now: DateTime<Utc>) -> CoreResult<()> {
        coupon.check_redeemable(self.subtotal(), now)?;

        info!(code = %coupon.code, kind = %coupon.kind.discount_type(), "Coupon applied");
        self.coupon = Some(coupon);
        Ok(())
    }

    /// Detaches the coupon, returning it if there was one.
    pub fn remove_coupon(&mut self) -> Option<Coupon> {
        let removed = self.coupon.take();
        if let Some(coupon) = &removed {
            info!(code = %coupon.code, "Coupon removed");
        }
        removed
    }

    /// The attached coupon if it is still valid at `now`.
    ///
    /// A coupon that expired or ran out of uses after being attached is
    /// ignored rather than removed, so the cart page can still name it.
    pub fn active_coupon(&self, now: DateTime<Utc>) -> Option<&Coupon> {
        self.coupon.as_ref().filter(|c| c.is_valid(now))
    }

    /// Prices the cart.
    pub fn totals(&self, engine: &PricingEngine, now: DateTime<Utc>) -> CartTotals {
        let coupon = self.active_coupon(now);
        CartTotals {
            item_count: self.item_count(),
            total_quantity: self.total_quantity(),
            coupon_code: coupon.map(|c| c.code.clone()),
            pricing: engine.compute(self.subtotal(), coupon),
        }
    }
}

fn ensure_stock(product: &Product, quantity: i64) -> CoreResult<()> {
    if product.can_sell(quantity) {
        Ok(())
    } else {
        Err(CoreError::InsufficientStock {
            product: product.name.clone(),
            available: product.stock,
            requested: quantity,
        })
    }
}

/// Cart summary returned to the cart page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    /// Code of the coupon that was priced, if any.
    pub coupon_code: Option<String>,
    pub pricing: PricingResult,
}
