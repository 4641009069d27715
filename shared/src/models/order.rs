//! Order Model

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::inventory::InventoryUpdate;

/// Order status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    #[default]
    New,
    Closed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order line: a menu item and how many units were ordered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub menu_item_id: i64,
    pub quantity: i64,
}

/// Order with its lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    /// Opaque notes, returned exactly as stored
    pub notes: Value,
    pub status: OrderStatus,
    /// Total fixed at placement time
    pub total: f64,
    pub created_at: i64,
    pub updated_at: i64,
    /// Lines in insertion order
    pub items: Vec<OrderLine>,
}

/// Status history record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderStatusChange {
    pub id: i64,
    pub order_id: i64,
    pub status: OrderStatus,
    pub changed_at: i64,
}

/// Place order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub customer_name: String,
    /// Any JSON value; absent means `{}`
    #[serde(default)]
    pub notes: Option<Value>,
    pub items: Vec<OrderLine>,
}

/// Update order payload (replaces all lines)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderRequest {
    pub customer_name: Option<String>,
    pub notes: Option<Value>,
    pub items: Vec<OrderLine>,
}

/// Batch placement payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOrderRequest {
    pub orders: Vec<PlaceOrderRequest>,
}

/// Placement outcome kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Accepted,
    Rejected,
}

/// Result of one placement attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderOutcome {
    pub customer_name: String,
    /// Assigned id, absent when the placement was rolled back
    pub order_id: Option<i64>,
    pub status: OutcomeStatus,
    /// "OK" when accepted, otherwise the rejection reason
    pub reason: String,
    /// Zero when rejected
    pub total: f64,
    /// Empty when rejected
    pub inventory_updates: Vec<InventoryUpdate>,
}

impl OrderOutcome {
    pub fn is_accepted(&self) -> bool {
        self.status == OutcomeStatus::Accepted
    }
}

/// Per-ingredient consumption summed over a batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientConsumption {
    pub ingredient_id: i64,
    pub name: String,
    pub quantity_used: f64,
    /// Balance after the last deduction in the batch
    pub remaining: f64,
}

/// Batch placement summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchSummary {
    pub total_orders: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub total_revenue: f64,
    pub inventory_consumption: Vec<IngredientConsumption>,
}

/// Batch placement result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchOutcome {
    pub processed_orders: Vec<OrderOutcome>,
    pub summary: BatchSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde() {
        assert_eq!(serde_json::to_string(&OrderStatus::Closed).unwrap(), "\"closed\"");
        let status: OrderStatus = serde_json::from_str("\"new\"").unwrap();
        assert_eq!(status, OrderStatus::New);
        assert_eq!(OrderStatus::Closed.to_string(), "closed");
    }

    #[test]
    fn test_place_request_notes_default() {
        let req: PlaceOrderRequest = serde_json::from_str(
            r#"{"customer_name":"Ana","items":[{"menu_item_id":1,"quantity":2}]}"#,
        )
        .unwrap();
        assert!(req.notes.is_none());
        assert_eq!(req.items[0].quantity, 2);
    }

    #[test]
    fn test_outcome_serialize() {
        let outcome = OrderOutcome {
            customer_name: "Ana".to_string(),
            order_id: None,
            status: OutcomeStatus::Rejected,
            reason: "insufficient inventory".to_string(),
            total: 0.0,
            inventory_updates: vec![],
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "rejected");
        assert!(json["order_id"].is_null());
        assert!(!outcome.is_accepted());
    }
}
