//! Money calculation utilities using rust_decimal for precision
//!
//! Order lines keep `unit_price` as `f64` at rest; every calculation runs
//! in `Decimal` and converts back to `f64` for storage/serialization.

use super::error::FlowError;
use crate::db::models::OrderLine;
use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price per line
const MAX_UNIT_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: u32 = 9999;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), FlowError> {
    if !value.is_finite() {
        return Err(FlowError::Validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate one order line before it is priced into an order
pub fn validate_line(unit_price: f64, quantity: u32) -> Result<(), FlowError> {
    require_finite(unit_price, "unit_price")?;
    if unit_price < 0.0 {
        return Err(FlowError::Validation(format!(
            "unit_price must be non-negative, got {}",
            unit_price
        )));
    }
    if unit_price > MAX_UNIT_PRICE {
        return Err(FlowError::Validation(format!(
            "unit_price exceeds maximum allowed ({}), got {}",
            MAX_UNIT_PRICE, unit_price
        )));
    }
    if quantity == 0 {
        return Err(FlowError::Validation(
            "quantity must be positive".to_string(),
        ));
    }
    if quantity > MAX_QUANTITY {
        return Err(FlowError::Validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Line subtotal: unit_price * quantity
pub fn line_subtotal(unit_price: f64, quantity: u32) -> Decimal {
    (to_decimal(unit_price) * Decimal::from(quantity))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Order total: sum of line subtotals. Client-supplied totals are never
/// read; this is the only total that gets stored.
pub fn order_total(lines: &[OrderLine]) -> f64 {
    let total: Decimal = lines.iter().map(|line| line.subtotal()).sum();
    to_f64(total)
}
