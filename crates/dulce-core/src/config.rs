//! # Configuration
//!
//! Shipping policy and store settings, loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`DULCE_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization. `ShippingPolicy` is
//! `Copy`, so every request works on its own copy and no lock is involved.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::money::Money;
use crate::{FREE_SHIPPING_THRESHOLD, STANDARD_SHIPPING_COST};

// =============================================================================
// Shipping Policy
// =============================================================================

/// The flat-rate shipping rule.
///
/// Carts whose subtotal reaches `free_shipping_threshold` ship free;
/// every other cart pays `standard_shipping_cost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    pub free_shipping_threshold: Money,
    pub standard_shipping_cost: Money,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        ShippingPolicy {
            free_shipping_threshold: FREE_SHIPPING_THRESHOLD,
            standard_shipping_cost: STANDARD_SHIPPING_COST,
        }
    }
}

impl ShippingPolicy {
    /// Creates a policy, rejecting negative amounts.
    pub fn new(threshold: Money, standard_cost: Money) -> Result<Self, ConfigError> {
        if threshold.is_negative() {
            return Err(ConfigError::NegativeAmount(
                "free_shipping_threshold".to_string(),
            ));
        }
        if standard_cost.is_negative() {
            return Err(ConfigError::NegativeAmount(
                "standard_shipping_cost".to_string(),
            ));
        }

        Ok(ShippingPolicy {
            free_shipping_threshold: threshold,
            standard_shipping_cost: standard_cost,
        })
    }

    /// Loads the policy from environment variables.
    ///
    /// ## Environment Variables
    /// - `DULCE_FREE_SHIPPING_THRESHOLD`: pesos (default 15000)
    /// - `DULCE_STANDARD_SHIPPING_COST`: pesos (default 3000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ShippingPolicy::default();

        let threshold = pesos_var(
            &lookup,
            "DULCE_FREE_SHIPPING_THRESHOLD",
            defaults.free_shipping_threshold,
        )?;
        let standard_cost = pesos_var(
            &lookup,
            "DULCE_STANDARD_SHIPPING_COST",
            defaults.standard_shipping_cost,
        )?;

        let policy = ShippingPolicy::new(threshold, standard_cost)?;
        debug!(
            threshold = policy.free_shipping_threshold.pesos(),
            standard_cost = policy.standard_shipping_cost.pesos(),
            "Shipping policy loaded"
        );
        Ok(policy)
    }

    /// Checks if `subtotal` ships free on amount alone.
    #[inline]
    pub fn qualifies_for_free_shipping(&self, subtotal: Money) -> bool {
        subtotal >= self.free_shipping_threshold
    }
}

fn pesos_var<F>(lookup: &F, key: &str, default: Money) -> Result<Money, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(Money::from_pesos)
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

// =============================================================================
// Store Config
// =============================================================================

/// Store-wide settings the pricing layer needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Store name (shown on quotes)
    pub store_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    pub shipping: ShippingPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            store_name: "Dulce Bias".to_string(),
            currency_code: "CLP".to_string(),
            shipping: ShippingPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Creates a StoreConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `DULCE_STORE_NAME`: Override store name
    /// - `DULCE_FREE_SHIPPING_THRESHOLD`, `DULCE_STANDARD_SHIPPING_COST`:
    ///   see [`ShippingPolicy::from_env`]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = StoreConfig::default();

        if let Some(name) = lookup("DULCE_STORE_NAME") {
            config.store_name = name;
        }

        config.shipping = ShippingPolicy::from_lookup(lookup)?;
        Ok(config)
    }
}
