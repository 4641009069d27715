//! Menu Model

use serde::{Deserialize, Serialize};

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Unit price, non-negative
    pub price: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Recipe entry: how much of one ingredient a single unit consumes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RecipeEntry {
    pub ingredient_id: i64,
    pub quantity: f64,
}

/// Menu item with its recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItemDetail {
    #[serde(flatten)]
    pub item: MenuItem,
    pub ingredients: Vec<RecipeEntry>,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub ingredients: Vec<RecipeEntry>,
}

/// Update menu item payload
///
/// `ingredients`, when present, replaces the whole recipe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub ingredients: Option<Vec<RecipeEntry>>,
}
