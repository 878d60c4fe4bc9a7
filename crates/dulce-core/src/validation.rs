//! # Validation Module
//!
//! Input checks run at the caller boundary, before anything is priced.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Back-office coupon form                                      │
//! │  └── validate_coupon_record: code, value, validity window              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart / checkout                                              │
//! │  ├── validate_quantity, validate_price                                 │
//! │  └── validate_subtotal                                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: PricingEngine::compute                                       │
//! │  └── assumes valid input, never fails; bad coupon data degrades        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use dulce_core::money::Money;
//! use dulce_core::validation::{validate_quantity, validate_subtotal};
//!
//! validate_subtotal(Money::from_pesos(8000)).unwrap();
//! assert!(validate_subtotal(Money::from_pesos(-1)).is_err());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::coupon::CouponRecord;
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{DiscountRate, DiscountType};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest coupon code the back-office accepts.
pub const MAX_COUPON_CODE_LEN: usize = 50;

// =============================================================================
// Amount Validators
// =============================================================================

/// Validates a cart subtotal before pricing.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (empty cart)
pub fn validate_subtotal(subtotal: Money) -> ValidationResult<()> {
    if subtotal.is_negative() {
        return Err(ValidationError::Negative {
            field: "subtotal".to_string(),
        });
    }

    Ok(())
}

/// Validates a product price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Coupon Validators
// =============================================================================

/// Validates a coupon code as typed in the back-office.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 50 characters
/// - Letters, numbers, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use dulce_core::validation::validate_coupon_code;
///
/// assert!(validate_coupon_code("BIENVENIDO20").is_ok());
/// assert!(validate_coupon_code("envio gratis").is_err());
/// ```
pub fn validate_coupon_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.chars().count() > MAX_COUPON_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_COUPON_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a coupon before it is saved.
///
/// ## Rules
/// - Code passes [`validate_coupon_code`]
/// - Percentage and fixed-amount values must be positive
/// - Percentage must not exceed 100% (10000 bps)
/// - Minimum order and maximum discount must not be negative
/// - `valid_until` must be after `valid_from` when both are set
pub fn validate_coupon_record(record: &CouponRecord) -> ValidationResult<()> {
    validate_coupon_code(&record.code)?;

    match record.discount_type {
        DiscountType::Percentage | DiscountType::FixedAmount if record.discount_value <= 0 => {
            return Err(ValidationError::MustBePositive {
                field: "discount_value".to_string(),
            });
        }
        DiscountType::Percentage if record.discount_value > DiscountRate::FULL_BPS as i64 => {
            return Err(ValidationError::OutOfRange {
                field: "discount_value".to_string(),
                min: 1,
                max: DiscountRate::FULL_BPS as i64,
            });
        }
        _ => {}
    }

    if record.minimum_order_amount.is_negative() {
        return Err(ValidationError::Negative {
            field: "minimum_order_amount".to_string(),
        });
    }

    if record
        .maximum_discount_amount
        .is_some_and(|cap| cap.is_negative())
    {
        return Err(ValidationError::Negative {
            field: "maximum_discount_amount".to_string(),
        });
    }

    if let (Some(from), Some(until)) = (record.valid_from, record.valid_until) {
        if until <= from {
            return Err(ValidationError::InvalidFormat {
                field: "valid_until".to_string(),
                reason: "must be after valid_from".to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn record(discount_type: DiscountType, value: i64) -> CouponRecord {
        CouponRecord {
            code: "PRIMERACOMPRA".to_string(),
            name: "Primera Compra".to_string(),
            discount_type,
            discount_value: value,
            minimum_order_amount: Money::from_pesos(8000),
            maximum_discount_amount: None,
            max_uses: Some(500),
            current_uses: 0,
            valid_from: None,
            valid_until: None,
            is_active: true,
        }
    }

    #[test]
    fn test_validate_subtotal() {
        assert!(validate_subtotal(Money::zero()).is_ok());
        assert!(validate_subtotal(Money::from_pesos(8000)).is_ok());
        assert!(validate_subtotal(Money::from_pesos(-1)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_pesos(-100)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_coupon_code() {
        assert!(validate_coupon_code("GRATIS2025").is_ok());
        assert!(validate_coupon_code("black_friday-50").is_ok());

        assert!(validate_coupon_code("").is_err());
        assert!(validate_coupon_code("   ").is_err());
        assert!(validate_coupon_code("DESCUENTO 20").is_err());
        assert!(validate_coupon_code(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_coupon_record_values() {
        assert!(validate_coupon_record(&record(DiscountType::Percentage, 2000)).is_ok());
        assert!(validate_coupon_record(&record(DiscountType::Percentage, 10000)).is_ok());
        assert!(validate_coupon_record(&record(DiscountType::FixedAmount, 2000)).is_ok());
        assert!(validate_coupon_record(&record(DiscountType::FreeShipping, 0)).is_ok());

        assert!(matches!(
            validate_coupon_record(&record(DiscountType::Percentage, 0)),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_coupon_record(&record(DiscountType::Percentage, 10001)),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_coupon_record(&record(DiscountType::FixedAmount, -5)),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_validate_coupon_record_amounts() {
        let mut rec = record(DiscountType::Percentage, 5000);
        rec.maximum_discount_amount = Some(Money::from_pesos(-1));
        assert!(validate_coupon_record(&rec).is_err());

        let mut rec = record(DiscountType::FixedAmount, 2000);
        rec.minimum_order_amount = Money::from_pesos(-8000);
        assert!(validate_coupon_record(&rec).is_err());
    }

    #[test]
    fn test_validate_coupon_record_window() {
        let start = Utc.with_ymd_and_hms(2025, 11, 28, 0, 0, 0).unwrap();

        let mut rec = record(DiscountType::Percentage, 5000);
        rec.valid_from = Some(start);
        rec.valid_until = Some(start + Duration::days(5));
        assert!(validate_coupon_record(&rec).is_ok());

        rec.valid_until = Some(start);
        assert!(validate_coupon_record(&rec).is_err());
    }
}
