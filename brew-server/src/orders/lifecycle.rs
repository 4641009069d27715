//! Order lifecycle: reads, close, update, delete
//!
//! An order is `new` from placement until it is closed. Closed orders are
//! read-only.

use rust_decimal::Decimal;
use shared::models::{Order, OrderLine, OrderStatus, OrderStatusChange, UpdateOrderRequest};
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::error::OrderError;
use super::money;
use super::placement::{encode_notes, validate_customer_name, validate_lines};
use crate::db::repository::{menu, order as order_repo};

pub async fn list_orders(pool: &SqlitePool) -> Result<Vec<Order>, OrderError> {
    Ok(order_repo::find_all(pool).await?)
}

pub async fn get_order(pool: &SqlitePool, id: i64) -> Result<Order, OrderError> {
    order_repo::find_by_id(pool, id)
        .await?
        .ok_or(OrderError::OrderNotFound(id))
}

pub async fn get_history(pool: &SqlitePool, id: i64) -> Result<Vec<OrderStatusChange>, OrderError> {
    let history = order_repo::find_history(pool, id).await?;
    // Every order has at least its `new` entry
    if history.is_empty() {
        return Err(OrderError::OrderNotFound(id));
    }
    Ok(history)
}

/// Move an order from `new` to `closed`
pub async fn close_order(pool: &SqlitePool, id: i64) -> Result<Order, OrderError> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    if !order_repo::mark_closed_tx(&mut tx, id, now).await? {
        let status = order_repo::find_status_tx(&mut tx, id).await?;
        tx.rollback().await?;
        return Err(match status {
            None => OrderError::OrderNotFound(id),
            Some(_) => OrderError::OrderClosed(id),
        });
    }
    order_repo::record_status_tx(&mut tx, id, OrderStatus::Closed, now).await?;
    tx.commit().await?;

    tracing::info!(order_id = id, "Order closed");
    get_order(pool, id).await
}

/// Remove an order, its lines and its history. Stock is not restored.
pub async fn delete_order(pool: &SqlitePool, id: i64) -> Result<(), OrderError> {
    let mut tx = pool.begin().await?;
    if !order_repo::delete_tx(&mut tx, id).await? {
        tx.rollback().await?;
        return Err(OrderError::OrderNotFound(id));
    }
    tx.commit().await?;

    tracing::info!(order_id = id, "Order deleted");
    Ok(())
}

/// Edit a `new` order.
///
/// Header fields are overwritten when present. `items` replaces all lines
/// and the total is recomputed at current menu prices. Inventory is left
/// untouched.
pub async fn update_order(
    pool: &SqlitePool,
    id: i64,
    request: &UpdateOrderRequest,
) -> Result<Order, OrderError> {
    let customer_name = request
        .customer_name
        .as_deref()
        .map(validate_customer_name)
        .transpose()?;
    let notes = request.notes.as_ref().map(|n| encode_notes(Some(n))).transpose()?;
    let lines = validate_lines(&request.items)?;

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let result = apply_update(
        &mut tx,
        id,
        customer_name.as_deref(),
        notes.as_deref(),
        &lines,
        now,
    )
    .await;
    match result {
        Ok(()) => {
            tx.commit().await?;
            tracing::info!(order_id = id, "Order updated");
            get_order(pool, id).await
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "Failed to roll back order update");
            }
            tracing::warn!(order_id = id, reason = %err, "Order update rejected");
            Err(err)
        }
    }
}

async fn apply_update(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    customer_name: Option<&str>,
    notes: Option<&str>,
    lines: &[OrderLine],
    now: i64,
) -> Result<(), OrderError> {
    match order_repo::find_status_tx(tx, id).await? {
        None => return Err(OrderError::OrderNotFound(id)),
        Some(OrderStatus::Closed) => return Err(OrderError::OrderClosed(id)),
        Some(OrderStatus::New) => {}
    }

    order_repo::update_header_tx(tx, id, customer_name, notes, now).await?;

    order_repo::delete_lines_tx(tx, id).await?;
    let mut total = Decimal::ZERO;
    for line in lines {
        let recipe = menu::find_recipe_and_price(&mut **tx, line.menu_item_id)
            .await?
            .ok_or(OrderError::MenuItemNotFound(line.menu_item_id))?;
        order_repo::upsert_line_tx(tx, id, line.menu_item_id, line.quantity).await?;
        total += money::line_total(recipe.price, line.quantity);
    }
    order_repo::set_total_tx(tx, id, money::to_f64(total), now).await?;
    Ok(())
}
