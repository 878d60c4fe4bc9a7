//! # pricing-check
//!
//! Prints cart pricing with the shipping policy the storefront would load.
//!
//! ## Modes
//! ```text
//! pricing-check                              coupon matrix (6 scenarios)
//! pricing-check --subtotal 8000              quote without coupon
//! pricing-check -s 8000 -c test20.json       quote with a stored coupon row
//! ```

mod args;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dulce_core::validation::{validate_coupon_record, validate_subtotal};
use dulce_core::{
    Coupon, CouponKind, CouponRecord, DiscountRate, Money, PricingEngine, PricingResult,
    StoreConfig,
};

use crate::args::{Args, Command, USAGE};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let Some(args) = Args::parse(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let config = StoreConfig::from_env().context("loading store configuration")?;
    let engine = PricingEngine::new(config.shipping);
    info!(
        store = %config.store_name,
        threshold = %engine.policy().free_shipping_threshold,
        shipping = %engine.policy().standard_shipping_cost,
        "Configuration loaded"
    );

    match args.command {
        Command::Matrix => run_matrix(&engine, args.json),
        Command::Quote { subtotal, coupon } => {
            run_quote(&engine, Money::from_pesos(subtotal), coupon.as_deref(), args.json)
        }
    }
}

// =============================================================================
// Quote
// =============================================================================

fn run_quote(
    engine: &PricingEngine,
    subtotal: Money,
    coupon_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    validate_subtotal(subtotal)?;

    let coupon = coupon_path.map(load_coupon).transpose()?;
    if let Some(coupon) = &coupon {
        if let Err(reason) = coupon.check_redeemable(subtotal, Utc::now()) {
            warn!(code = %coupon.code, %reason, "Coupon would be rejected at the cart");
        }
    }

    let result = engine.compute(subtotal, coupon.as_ref());
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn load_coupon(path: &Path) -> Result<Coupon> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading coupon record {}", path.display()))?;
    let record: CouponRecord = serde_json::from_str(&raw)
        .with_context(|| format!("parsing coupon record {}", path.display()))?;
    if let Err(err) = validate_coupon_record(&record) {
        warn!(code = %record.code, %err, "Coupon record fails back-office validation");
    }
    Ok(Coupon::from(record))
}

// =============================================================================
// Matrix
// =============================================================================

struct Scenario {
    name: &'static str,
    subtotal: i64,
    coupon: Option<Coupon>,
}

fn scenarios() -> Vec<Scenario> {
    let test20 = Coupon::new(
        "TEST20",
        CouponKind::percentage(DiscountRate::from_percent(20)),
        Money::from_pesos(5000),
    );
    let gratis = Coupon::new("GRATIS2025", CouponKind::FreeShipping, Money::from_pesos(1000));

    vec![
        Scenario {
            name: "Carrito pequeño + cupón 20% (TEST20)",
            subtotal: 8000,
            coupon: Some(test20.clone()),
        },
        Scenario {
            name: "Carrito grande + cupón 20% (TEST20)",
            subtotal: 20000,
            coupon: Some(test20),
        },
        Scenario {
            name: "Carrito pequeño + envío gratis (GRATIS2025)",
            subtotal: 8000,
            coupon: Some(gratis.clone()),
        },
        Scenario {
            name: "Carrito grande + envío gratis (GRATIS2025)",
            subtotal: 20000,
            coupon: Some(gratis),
        },
        Scenario {
            name: "Carrito pequeño sin cupón",
            subtotal: 8000,
            coupon: None,
        },
        Scenario {
            name: "Carrito grande sin cupón",
            subtotal: 20000,
            coupon: None,
        },
    ]
}

fn run_matrix(engine: &PricingEngine, json: bool) -> Result<()> {
    let results: Vec<(&str, PricingResult)> = scenarios()
        .iter()
        .map(|s| {
            (
                s.name,
                engine.compute(Money::from_pesos(s.subtotal), s.coupon.as_ref()),
            )
        })
        .collect();

    if json {
        let rows: Vec<serde_json::Value> = results
            .iter()
            .map(|(name, result)| serde_json::json!({ "scenario": name, "result": result }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for (i, (name, result)) in results.iter().enumerate() {
        println!("{}. {}", i + 1, name);
        println!("{}", "-".repeat(50));
        print_result(result);
        println!();
    }
    Ok(())
}

fn print_result(result: &PricingResult) {
    let discount = if result.discount_amount.is_zero() {
        result.discount_amount.to_string()
    } else {
        format!("-{}", result.discount_amount)
    };
    let note = if result.discount_is_display_only && result.discount_amount.is_positive() {
        "  (envío)"
    } else {
        ""
    };

    println!("Subtotal:        {}", result.subtotal);
    println!("Descuento:       {}{}", discount, note);
    println!("Total s/envío:   {}", result.total_after_discount);
    println!("Envío:           {}", result.shipping_cost.display_shipping());
    println!("TOTAL FINAL:     {}", result.final_total);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_matches_storefront_expectations() {
        let engine = PricingEngine::default();
        let expected = [
            (1600, 3000, 9400),
            (4000, 0, 16000),
            (3000, 0, 8000),
            (0, 0, 20000),
            (0, 3000, 11000),
            (0, 0, 20000),
        ];

        for (scenario, (discount, shipping, total)) in scenarios().iter().zip(expected) {
            let r = engine.compute(Money::from_pesos(scenario.subtotal), scenario.coupon.as_ref());
            assert_eq!(r.discount_amount.pesos(), discount, "{}", scenario.name);
            assert_eq!(r.shipping_cost.pesos(), shipping, "{}", scenario.name);
            assert_eq!(r.final_total.pesos(), total, "{}", scenario.name);
        }
    }
}
