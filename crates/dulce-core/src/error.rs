//! # Error Types
//!
//! Domain-specific error types for dulce-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  CoreError          - Cart operations                                  │
//! │  ├── ValidationError - Input rejected at the caller boundary           │
//! │  └── CouponError     - Coupon cannot be redeemed (shown to shopper)    │
//! │  ConfigError        - Startup configuration                            │
//! │                                                                         │
//! │  PricingEngine::compute has NO error type: it is total.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `CouponError` messages are the storefront's Spanish strings; they are
//! rendered to shoppers verbatim.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and checkout errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product is not in the cart.
    #[error("Product {0} not in cart")]
    ItemNotInCart(i64),

    /// Not enough stock to cover the requested quantity.
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Coupon rejected (wraps CouponError).
    #[error("{0}")]
    Coupon(#[from] CouponError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before pricing runs; the engine itself assumes valid input.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Coupon Error
// =============================================================================

/// Reasons a shopper's coupon cannot be applied to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponError {
    /// No coupon with that code.
    #[error("El código de cupón no es válido")]
    NotFound,

    /// Coupon is inactive or outside its validity window.
    #[error("El cupón ha expirado o no está disponible")]
    Expired,

    /// Cart subtotal is below the coupon minimum.
    #[error("El monto mínimo para este cupón es {minimum}")]
    MinimumNotMet { minimum: Money },

    /// Usage limit reached.
    #[error("Este cupón ya no está disponible")]
    Exhausted,
}

// =============================================================================
// Config Error
// =============================================================================

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("{0} must not be negative")]
    NegativeAmount(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
