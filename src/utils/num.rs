//! Numeric utilities for balance arithmetic.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Parse a decimal string into an `f64`, coercing any failure to `0.0`.
///
/// Goes through [`Decimal`] rather than `f64::from_str` so that degenerate
/// inputs like `"NaN"` or `"inf"` are rejected instead of entering a sum.
pub fn parse_units(s: &str) -> f64 {
    s.trim()
        .parse::<Decimal>()
        .ok()
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

/// Safe division that returns zero unless the divisor is strictly positive.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
