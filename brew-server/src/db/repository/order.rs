//! Order Repository
//!
//! Order headers, lines and status history. Write helpers take the caller's
//! transaction; placement and lifecycle rules live in `crate::orders`.

use super::RepoResult;
use shared::models::{Order, OrderLine, OrderStatus, OrderStatusChange};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;

/// Order header as stored (notes still encoded)
#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_name: String,
    notes: String,
    status: OrderStatus,
    total: f64,
    created_at: i64,
    updated_at: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct LineRow {
    order_id: i64,
    menu_item_id: i64,
    quantity: i64,
}

const SELECT_HEADER: &str =
    "SELECT id, customer_name, notes, status, total, created_at, updated_at FROM orders";

impl OrderRow {
    fn into_order(self, items: Vec<OrderLine>) -> Order {
        // Notes are always written by this module as JSON; unreadable text is
        // handed back as a plain string instead of failing the read.
        let notes = serde_json::from_str(&self.notes)
            .unwrap_or(serde_json::Value::String(self.notes));
        Order {
            id: self.id,
            customer_name: self.customer_name,
            notes,
            status: self.status,
            total: self.total,
            created_at: self.created_at,
            updated_at: self.updated_at,
            items,
        }
    }
}

// ── Reads ─────────────────────────

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let headers = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_HEADER} ORDER BY id"))
        .fetch_all(pool)
        .await?;
    let lines = sqlx::query_as::<_, LineRow>(
        "SELECT order_id, menu_item_id, quantity FROM order_items ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let mut by_order: HashMap<i64, Vec<OrderLine>> = HashMap::new();
    for line in lines {
        by_order.entry(line.order_id).or_default().push(OrderLine {
            menu_item_id: line.menu_item_id,
            quantity: line.quantity,
        });
    }

    Ok(headers
        .into_iter()
        .map(|row| {
            let items = by_order.remove(&row.id).unwrap_or_default();
            row.into_order(items)
        })
        .collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let Some(row) = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_HEADER} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };
    let items = find_lines(pool, id).await?;
    Ok(Some(row.into_order(items)))
}

/// Lines of one order in insertion order
pub async fn find_lines(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderLine>> {
    let lines = sqlx::query_as::<_, OrderLine>(
        "SELECT menu_item_id, quantity FROM order_items WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(lines)
}

pub async fn find_history(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderStatusChange>> {
    let rows = sqlx::query_as::<_, OrderStatusChange>(
        "SELECT id, order_id, status, changed_at FROM order_status_history WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Current status of an order, `None` if it does not exist
pub async fn find_status_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
) -> RepoResult<Option<OrderStatus>> {
    let status = sqlx::query_scalar::<_, OrderStatus>("SELECT status FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(status)
}

// ── Writes (transaction-scoped) ─────────────────────────

/// Insert a `new` order header and return its id
pub async fn insert_header_tx(
    tx: &mut Transaction<'_, Sqlite>,
    customer_name: &str,
    notes: &str,
    now: i64,
) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO orders (customer_name, notes, status, total, created_at, updated_at) VALUES (?1, ?2, ?3, 0, ?4, ?4) RETURNING id",
    )
    .bind(customer_name)
    .bind(notes)
    .bind(OrderStatus::New)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;
    Ok(id)
}

/// Insert a line, or add to the quantity of the existing line for the same item
pub async fn upsert_line_tx(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
    menu_item_id: i64,
    quantity: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_items (order_id, menu_item_id, quantity) VALUES (?1, ?2, ?3) \
         ON CONFLICT (order_id, menu_item_id) DO UPDATE SET quantity = order_items.quantity + excluded.quantity",
    )
    .bind(order_id)
    .bind(menu_item_id)
    .bind(quantity)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn delete_lines_tx(tx: &mut Transaction<'_, Sqlite>, order_id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM order_items WHERE order_id = ?")
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn set_total_tx(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
    total: f64,
    now: i64,
) -> RepoResult<()> {
    sqlx::query("UPDATE orders SET total = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(total)
        .bind(now)
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Overwrite customer name and/or notes; `None` keeps the stored value
pub async fn update_header_tx(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
    customer_name: Option<&str>,
    notes: Option<&str>,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "UPDATE orders SET customer_name = COALESCE(?1, customer_name), notes = COALESCE(?2, notes), updated_at = ?3 WHERE id = ?4",
    )
    .bind(customer_name)
    .bind(notes)
    .bind(now)
    .bind(order_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Move a `new` order to `closed`. Returns false when no `new` order matched.
pub async fn mark_closed_tx(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4")
        .bind(OrderStatus::Closed)
        .bind(now)
        .bind(order_id)
        .bind(OrderStatus::New)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn record_status_tx(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
    status: OrderStatus,
    now: i64,
) -> RepoResult<()> {
    sqlx::query("INSERT INTO order_status_history (order_id, status, changed_at) VALUES (?1, ?2, ?3)")
        .bind(order_id)
        .bind(status)
        .bind(now)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Remove an order with its lines and status history
pub async fn delete_tx(tx: &mut Transaction<'_, Sqlite>, order_id: i64) -> RepoResult<bool> {
    sqlx::query("DELETE FROM order_status_history WHERE order_id = ?")
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM order_items WHERE order_id = ?")
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{insert_menu_item, test_pool};
    use serde_json::json;

    #[tokio::test]
    async fn test_upsert_merges_duplicate_lines() {
        let pool = test_pool().await;
        let latte = insert_menu_item(&pool, "Latte", 3.5, &[]).await;
        let mocha = insert_menu_item(&pool, "Mocha", 4.0, &[]).await;

        let mut tx = pool.begin().await.unwrap();
        let id = insert_header_tx(&mut tx, "Ana", "{}", 1).await.unwrap();
        upsert_line_tx(&mut tx, id, latte, 2).await.unwrap();
        upsert_line_tx(&mut tx, id, mocha, 1).await.unwrap();
        upsert_line_tx(&mut tx, id, latte, 1).await.unwrap();
        tx.commit().await.unwrap();

        let lines = find_lines(&pool, id).await.unwrap();
        assert_eq!(
            lines,
            vec![
                OrderLine {
                    menu_item_id: latte,
                    quantity: 3
                },
                OrderLine {
                    menu_item_id: mocha,
                    quantity: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_notes_round_trip_verbatim() {
        let pool = test_pool().await;
        let notes = json!({"milk": "oat", "extra": [1, 2, {"hot": true}]});

        let mut tx = pool.begin().await.unwrap();
        let id = insert_header_tx(&mut tx, "Ana", &notes.to_string(), 1)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let order = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(order.notes, notes);
        assert_eq!(order.status, OrderStatus::New);
        assert!(order.items.is_empty());
    }

    #[tokio::test]
    async fn test_mark_closed_only_once() {
        let pool = test_pool().await;
        let mut tx = pool.begin().await.unwrap();
        let id = insert_header_tx(&mut tx, "Ana", "{}", 1).await.unwrap();
        assert!(mark_closed_tx(&mut tx, id, 2).await.unwrap());
        assert!(!mark_closed_tx(&mut tx, id, 3).await.unwrap());
        assert_eq!(
            find_status_tx(&mut tx, id).await.unwrap(),
            Some(OrderStatus::Closed)
        );
        assert_eq!(find_status_tx(&mut tx, id + 1).await.unwrap(), None);
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_find_all_groups_lines() {
        let pool = test_pool().await;
        let latte = insert_menu_item(&pool, "Latte", 3.5, &[]).await;

        let mut tx = pool.begin().await.unwrap();
        let first = insert_header_tx(&mut tx, "Ana", "{}", 1).await.unwrap();
        let second = insert_header_tx(&mut tx, "Ben", "{}", 1).await.unwrap();
        upsert_line_tx(&mut tx, second, latte, 4).await.unwrap();
        tx.commit().await.unwrap();

        let orders = find_all(&pool).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, first);
        assert!(orders[0].items.is_empty());
        assert_eq!(orders[1].items[0].quantity, 4);
    }
}
