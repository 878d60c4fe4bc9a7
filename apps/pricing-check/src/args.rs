//! Command line parsing.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the storefront coupon matrix.
    Matrix,
    /// Price one subtotal, optionally with a coupon record file.
    Quote {
        subtotal: i64,
        coupon: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    /// Emit JSON instead of the text report.
    pub json: bool,
}

pub const USAGE: &str = "\
Usage: pricing-check [--subtotal <pesos> [--coupon <record.json>]] [--json]

With no --subtotal, prints the coupon matrix.

Environment:
  DULCE_FREE_SHIPPING_THRESHOLD  free shipping from this subtotal (default 15000)
  DULCE_STANDARD_SHIPPING_COST   flat fee below the threshold (default 3000)
  RUST_LOG                       log filter (default info)";

impl Args {
    /// Parses arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut subtotal: Option<i64> = None;
        let mut coupon: Option<PathBuf> = None;
        let mut json = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--subtotal" | "-s" => {
                    let raw = args.next().context("--subtotal needs a value")?;
                    let value = raw
                        .parse::<i64>()
                        .with_context(|| format!("invalid subtotal: {raw}"))?;
                    subtotal = Some(value);
                }
                "--coupon" | "-c" => {
                    let path = args.next().context("--coupon needs a file path")?;
                    coupon = Some(PathBuf::from(path));
                }
                "--json" => json = true,
                "--help" | "-h" => return Ok(None),
                other => bail!("unknown argument: {other}\n\n{USAGE}"),
            }
        }

        let command = match (subtotal, coupon) {
            (Some(subtotal), coupon) => Command::Quote { subtotal, coupon },
            (None, None) => Command::Matrix,
            (None, Some(_)) => bail!("--coupon requires --subtotal"),
        };

        Ok(Some(Args { command, json }))
    }
}
