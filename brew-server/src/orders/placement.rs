//! Order placement engine
//!
//! One placement is one SQLite transaction:
//!
//! ```text
//! validate + encode notes          (no transaction yet)
//! BEGIN
//!   insert header (status new)     first statement is a write: takes the lock
//!   for each line, in request order
//!     resolve price + recipe       missing item aborts
//!     upsert line (merge duplicates)
//!     for each recipe ingredient
//!       conditional deduct         shortfall aborts
//!   store total
//! COMMIT                           any failure above rolls everything back
//! ```

use rust_decimal::Decimal;
use shared::models::{InventoryUpdate, OrderLine, OrderStatus, PlaceOrderRequest};
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::error::{OrderError, Shortfall};
use super::money;
use crate::db::repository::inventory::{self, Deduction};
use crate::db::repository::{menu, order as order_repo};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTES_BYTES, validate_id, validate_quantity, validate_required_text,
};

/// A placement request that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOrder {
    pub customer_name: String,
    /// Notes encoded as JSON text
    pub notes: String,
    pub lines: Vec<OrderLine>,
}

/// A committed placement
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub order_id: i64,
    pub customer_name: String,
    pub total: f64,
    pub inventory_updates: Vec<InventoryUpdate>,
}

/// Check a request and encode its notes. Runs before any transaction opens.
pub fn validate_request(request: &PlaceOrderRequest) -> Result<ValidatedOrder, OrderError> {
    let customer_name = validate_customer_name(&request.customer_name)?;
    let lines = validate_lines(&request.items)?;
    let notes = encode_notes(request.notes.as_ref())?;

    Ok(ValidatedOrder {
        customer_name,
        notes,
        lines,
    })
}

pub(crate) fn validate_customer_name(name: &str) -> Result<String, OrderError> {
    validate_required_text(name, "customer_name", MAX_NAME_LEN)
        .map_err(|e| OrderError::Validation(e.message))?;
    Ok(name.trim().to_string())
}

pub(crate) fn validate_lines(items: &[OrderLine]) -> Result<Vec<OrderLine>, OrderError> {
    if items.is_empty() {
        return Err(OrderError::Validation(
            "Order must contain at least one item".into(),
        ));
    }
    for (i, line) in items.iter().enumerate() {
        validate_id(line.menu_item_id, &format!("items[{i}].menu_item_id"))
            .and_then(|_| validate_quantity(line.quantity, &format!("items[{i}].quantity")))
            .map_err(|e| OrderError::Validation(e.message))?;
    }
    Ok(items.to_vec())
}

/// Encode notes to JSON text; absent notes become `{}`
pub(crate) fn encode_notes(notes: Option<&serde_json::Value>) -> Result<String, OrderError> {
    let encoded = match notes {
        Some(value) => {
            serde_json::to_string(value).map_err(|e| OrderError::NotesEncoding(e.to_string()))?
        }
        None => "{}".to_string(),
    };
    if encoded.len() > MAX_NOTES_BYTES {
        return Err(OrderError::NotesEncoding(format!(
            "notes are {} bytes, max {MAX_NOTES_BYTES}",
            encoded.len()
        )));
    }
    Ok(encoded)
}

/// Validate and place an order
pub async fn place_order(
    pool: &SqlitePool,
    request: &PlaceOrderRequest,
) -> Result<Placement, OrderError> {
    let order = validate_request(request)?;
    execute(pool, &order).await
}

/// Place an already validated order in a single transaction
pub async fn execute(pool: &SqlitePool, order: &ValidatedOrder) -> Result<Placement, OrderError> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let result = apply(&mut tx, order, now).await;
    match result {
        Ok(placement) => {
            tx.commit().await?;
            tracing::info!(
                order_id = placement.order_id,
                customer = %placement.customer_name,
                total = placement.total,
                lines = order.lines.len(),
                "Order placed"
            );
            Ok(placement)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "Failed to roll back placement");
            }
            match &err {
                OrderError::InsufficientInventory(s) => tracing::warn!(
                    customer = %order.customer_name,
                    ingredient_id = s.ingredient_id,
                    ingredient = %s.name,
                    required = s.required,
                    available = s.available,
                    "Order rejected: insufficient inventory"
                ),
                OrderError::Storage(msg) => tracing::error!(
                    customer = %order.customer_name,
                    error = %msg,
                    "Order placement failed"
                ),
                other => tracing::warn!(
                    customer = %order.customer_name,
                    reason = %other,
                    "Order rejected"
                ),
            }
            Err(err)
        }
    }
}

async fn apply(
    tx: &mut Transaction<'_, Sqlite>,
    order: &ValidatedOrder,
    now: i64,
) -> Result<Placement, OrderError> {
    let order_id = order_repo::insert_header_tx(tx, &order.customer_name, &order.notes, now).await?;
    order_repo::record_status_tx(tx, order_id, OrderStatus::New, now).await?;

    let mut total = Decimal::ZERO;
    let mut inventory_updates = Vec::new();

    for line in &order.lines {
        let recipe = menu::find_recipe_and_price(&mut **tx, line.menu_item_id)
            .await?
            .ok_or(OrderError::MenuItemNotFound(line.menu_item_id))?;

        order_repo::upsert_line_tx(tx, order_id, line.menu_item_id, line.quantity).await?;
        total += money::line_total(recipe.price, line.quantity);

        // Each ingredient of this line is checked and deducted before the
        // next one, so the first shortfall in request order is reported.
        for entry in &recipe.ingredients {
            let required = money::ingredient_demand(entry.quantity, line.quantity);
            match inventory::check_and_deduct_tx(tx, entry.ingredient_id, required, now).await? {
                Deduction::Applied { name, remaining } => {
                    inventory_updates.push(InventoryUpdate {
                        ingredient_id: entry.ingredient_id,
                        name,
                        quantity_used: required,
                        remaining,
                    });
                }
                Deduction::Insufficient { name, available } => {
                    return Err(OrderError::InsufficientInventory(Shortfall {
                        ingredient_id: entry.ingredient_id,
                        name,
                        required,
                        available,
                    }));
                }
                Deduction::Missing => {
                    return Err(OrderError::IngredientNotFound(entry.ingredient_id));
                }
            }
        }
    }

    let total = money::to_f64(total);
    order_repo::set_total_tx(tx, order_id, total, now).await?;

    Ok(Placement {
        order_id,
        customer_name: order.customer_name.clone(),
        total,
        inventory_updates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(items: Vec<(i64, i64)>) -> PlaceOrderRequest {
        PlaceOrderRequest {
            customer_name: "Ana".into(),
            notes: None,
            items: items
                .into_iter()
                .map(|(menu_item_id, quantity)| OrderLine {
                    menu_item_id,
                    quantity,
                })
                .collect(),
        }
    }

    #[test]
    fn test_validate_defaults_notes() {
        let order = validate_request(&request(vec![(1, 2)])).unwrap();
        assert_eq!(order.notes, "{}");
        assert_eq!(order.customer_name, "Ana");
    }

    #[test]
    fn test_validate_rejects_bad_lines() {
        let err = validate_request(&request(vec![])).unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));

        let err = validate_request(&request(vec![(1, 0)])).unwrap_err();
        assert!(matches!(err, OrderError::Validation(ref m) if m.contains("items[0].quantity")));

        let err = validate_request(&request(vec![(1, 1), (2, -4)])).unwrap_err();
        assert!(matches!(err, OrderError::Validation(ref m) if m.contains("items[1].quantity")));

        let err = validate_request(&request(vec![(0, 1)])).unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
    }

    #[test]
    fn test_validate_customer_name() {
        let mut req = request(vec![(1, 1)]);
        req.customer_name = "  ".into();
        assert!(matches!(
            validate_request(&req).unwrap_err(),
            OrderError::Validation(_)
        ));

        req.customer_name = "  Ben ".into();
        assert_eq!(validate_request(&req).unwrap().customer_name, "Ben");
    }

    #[test]
    fn test_notes_encoded_verbatim() {
        let mut req = request(vec![(1, 1)]);
        req.notes = Some(json!({"size": "large", "shots": 2}));
        let order = validate_request(&req).unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&order.notes).unwrap();
        assert_eq!(decoded, json!({"size": "large", "shots": 2}));
    }

    #[test]
    fn test_oversized_notes_rejected() {
        let mut req = request(vec![(1, 1)]);
        req.notes = Some(json!("x".repeat(MAX_NOTES_BYTES)));
        assert!(matches!(
            validate_request(&req).unwrap_err(),
            OrderError::NotesEncoding(_)
        ));
    }
}
