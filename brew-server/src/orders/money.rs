//! Money calculation utilities using rust_decimal for precision
//!
//! Totals are accumulated as `Decimal`, then converted to `f64` (2 decimal
//! places) for storage and serialization. Ingredient quantities go through
//! the same path at 6 decimal places, matching the `ROUND(.., 6)` the
//! inventory ledger applies to stored balances.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Scale of ingredient quantities (demand, consumption, stock)
pub const QUANTITY_DECIMAL_PLACES: u32 = 6;

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

/// unit price × quantity
#[inline]
pub fn line_total(unit_price: f64, quantity: i64) -> Decimal {
    to_decimal(unit_price) * Decimal::from(quantity)
}

/// Convert an ingredient quantity back to f64, rounded to 6 decimal places
#[inline]
pub fn quantity_to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(QUANTITY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// recipe quantity per unit × ordered quantity
#[inline]
pub fn ingredient_demand(per_unit: f64, quantity: i64) -> f64 {
    quantity_to_f64(to_decimal(per_unit) * Decimal::from(quantity))
}

/// a + b for ingredient quantities
#[inline]
pub fn add_quantities(a: f64, b: f64) -> f64 {
    quantity_to_f64(to_decimal(a) + to_decimal(b))
}
