//! Inventory Model

use serde::{Deserialize, Serialize};

/// Inventory entry, keyed by ingredient id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryItem {
    pub ingredient_id: i64,
    pub name: String,
    /// Unit of measure (ml, g, shots, ...)
    pub unit: String,
    /// On-hand quantity, never negative
    pub quantity: f64,
    /// Purchase price per unit
    pub price: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create inventory entry payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemCreate {
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    pub price: Option<f64>,
}

/// Update inventory entry payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryItemUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
}

/// One ingredient consumed by an accepted placement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryUpdate {
    pub ingredient_id: i64,
    pub name: String,
    pub quantity_used: f64,
    /// On-hand balance right after this deduction
    pub remaining: f64,
}
