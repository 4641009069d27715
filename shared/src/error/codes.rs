//! Unified error codes for the brew backend
//!
//! Error codes are shared by brew-server and its API clients.
//! They are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 6xxx: Menu errors
//! - 7xxx: Inventory errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can branch on
/// them without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order is already closed
    OrderAlreadyClosed = 4002,
    /// Order notes could not be encoded
    OrderNotesInvalid = 4004,
    /// Not enough stock for an ingredient
    InsufficientInventory = 4005,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item has invalid price
    MenuItemInvalidPrice = 6002,
    /// Menu item is referenced by orders
    MenuItemInUse = 6003,
    /// Recipe is invalid
    RecipeInvalid = 6101,

    // ==================== 7xxx: Inventory ====================
    /// Ingredient not found
    IngredientNotFound = 7001,
    /// Ingredient is referenced by a recipe
    IngredientInUse = 7002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Success",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyClosed => "Order is already closed",
            ErrorCode::OrderNotesInvalid => "Order notes could not be encoded",
            ErrorCode::InsufficientInventory => "Insufficient inventory",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemInvalidPrice => "Menu item has invalid price",
            ErrorCode::MenuItemInUse => "Menu item is referenced by orders",
            ErrorCode::RecipeInvalid => "Recipe is invalid",

            // Inventory
            ErrorCode::IngredientNotFound => "Ingredient not found",
            ErrorCode::IngredientInUse => "Ingredient is used by a recipe",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyClosed),
            4004 => Ok(ErrorCode::OrderNotesInvalid),
            4005 => Ok(ErrorCode::InsufficientInventory),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuItemInvalidPrice),
            6003 => Ok(ErrorCode::MenuItemInUse),
            6101 => Ok(ErrorCode::RecipeInvalid),

            // Inventory
            7001 => Ok(ErrorCode::IngredientNotFound),
            7002 => Ok(ErrorCode::IngredientInUse),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
