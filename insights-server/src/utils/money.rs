//! Money calculation utilities using rust_decimal for precision
//!
//! All aggregation arithmetic is done using `Decimal` internally, then
//! converted to `f64` at the serialization boundary.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for serialization, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Share of `part` in `total` as a percentage, rounded to 2 decimal places
///
/// Returns 0.0 when `total` is zero; the division is guarded, not a panic.
pub fn percentage(part: Decimal, total: Decimal) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    to_f64(part * Decimal::ONE_HUNDRED / total)
}
