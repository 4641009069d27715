//! Input validation helpers
//!
//! Centralized length and range limits shared by the CRUD handlers and the
//! order placement request checks.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: customer, menu item, ingredient
pub const MAX_NAME_LEN: usize = 200;

/// Menu item descriptions
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Units of measure (ml, g, shots, ...)
pub const MAX_UNIT_LEN: usize = 32;

/// Encoded order notes, in bytes
pub const MAX_NOTES_BYTES: usize = 4096;

// ── Numeric limits ──────────────────────────────────────────────────

/// Maximum ordered quantity per line
pub const MAX_QUANTITY: i64 = 9999;

/// Maximum unit price for a menu item or ingredient
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Maximum on-hand quantity for an ingredient
pub const MAX_STOCK: f64 = 1_000_000_000.0;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is non-empty and within the limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_required_text(v, field, max_len),
        None => Ok(()),
    }
}

/// Validate a finite, non-negative amount not above `max`.
pub fn validate_amount(value: f64, field: &str, max: f64) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > max {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({max}), got {value}"
        )));
    }
    Ok(())
}

/// Validate a finite, strictly positive amount not above `max`.
pub fn validate_positive_amount(value: f64, field: &str, max: f64) -> Result<(), AppError> {
    validate_amount(value, field, max)?;
    if value == 0.0 {
        return Err(AppError::validation(format!("{field} must be greater than 0")));
    }
    Ok(())
}

/// Validate an ordered quantity (1..=MAX_QUANTITY).
pub fn validate_quantity(value: i64, field: &str) -> Result<(), AppError> {
    if !(1..=MAX_QUANTITY).contains(&value) {
        return Err(AppError::validation(format!(
            "{field} must be between 1 and {MAX_QUANTITY}, got {value}"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate a referenced row id.
pub fn validate_id(value: i64, field: &str) -> Result<(), AppError> {
    if value <= 0 {
        return Err(AppError::validation(format!(
            "{field} must be a positive id, got {value}"
        )));
    }
    Ok(())
}
