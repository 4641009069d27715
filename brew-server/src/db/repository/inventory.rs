//! Inventory Repository
//!
//! Stock rows are only decremented through [`check_and_deduct_tx`], inside a
//! placement transaction. The CRUD functions serve manual stock management.

use super::{RepoError, RepoResult};
use shared::models::{InventoryItem, InventoryItemCreate, InventoryItemUpdate};
use sqlx::{Sqlite, SqlitePool, Transaction};

const SELECT_COLUMNS: &str =
    "SELECT ingredient_id, name, unit, quantity, price, created_at, updated_at FROM inventory";

/// Result of a conditional stock deduction
#[derive(Debug, Clone, PartialEq)]
pub enum Deduction {
    /// Stock was decremented; `remaining` is the new on-hand balance
    Applied { name: String, remaining: f64 },
    /// Row exists but holds less than requested; nothing was changed
    Insufficient { name: String, available: f64 },
    /// No such ingredient
    Missing,
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<InventoryItem>> {
    let items = sqlx::query_as::<_, InventoryItem>(&format!(
        "{SELECT_COLUMNS} ORDER BY ingredient_id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, ingredient_id: i64) -> RepoResult<Option<InventoryItem>> {
    let item = sqlx::query_as::<_, InventoryItem>(&format!(
        "{SELECT_COLUMNS} WHERE ingredient_id = ?"
    ))
    .bind(ingredient_id)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

/// Ids from `ids` that have no inventory row, in input order
pub async fn find_missing_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<i64>> {
    let mut missing = Vec::new();
    for &id in ids {
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT ingredient_id FROM inventory WHERE ingredient_id = ?")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        if exists.is_none() && !missing.contains(&id) {
            missing.push(id);
        }
    }
    Ok(missing)
}

pub async fn create(pool: &SqlitePool, data: InventoryItemCreate) -> RepoResult<InventoryItem> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO inventory (name, unit, quantity, price, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5) RETURNING ingredient_id",
    )
    .bind(data.name.trim())
    .bind(data.unit.trim())
    .bind(data.quantity)
    .bind(data.price.unwrap_or(0.0))
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create inventory item".into()))
}

pub async fn update(
    pool: &SqlitePool,
    ingredient_id: i64,
    data: InventoryItemUpdate,
) -> RepoResult<InventoryItem> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE inventory SET name = COALESCE(?1, name), unit = COALESCE(?2, unit), quantity = COALESCE(?3, quantity), price = COALESCE(?4, price), updated_at = ?5 WHERE ingredient_id = ?6",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.unit.as_deref().map(str::trim))
    .bind(data.quantity)
    .bind(data.price)
    .bind(now)
    .bind(ingredient_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Ingredient {ingredient_id} not found"
        )));
    }
    find_by_id(pool, ingredient_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Ingredient {ingredient_id} not found")))
}

/// Delete an ingredient that no recipe uses
pub async fn delete(pool: &SqlitePool, ingredient_id: i64) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    let used_by: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM menu_item_ingredients WHERE ingredient_id = ?",
    )
    .bind(ingredient_id)
    .fetch_one(&mut *tx)
    .await?;
    if used_by > 0 {
        return Err(RepoError::Conflict(format!(
            "Ingredient {ingredient_id} is used by {used_by} menu item(s)"
        )));
    }

    let rows = sqlx::query("DELETE FROM inventory WHERE ingredient_id = ?")
        .bind(ingredient_id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Ingredient {ingredient_id} not found"
        )));
    }

    tx.commit().await?;
    Ok(())
}

/// Atomically deduct `amount` from an ingredient if enough is on hand.
///
/// The check and the write are one conditional UPDATE, so two transactions
/// can never both take the last units. The new balance is rounded to 6
/// decimal places so repeated fractional deductions do not drift. When
/// nothing was updated the row is read again to report the current balance.
pub async fn check_and_deduct_tx(
    tx: &mut Transaction<'_, Sqlite>,
    ingredient_id: i64,
    amount: f64,
    now: i64,
) -> RepoResult<Deduction> {
    let applied: Option<(String, f64)> = sqlx::query_as(
        "UPDATE inventory SET quantity = ROUND(quantity - ?1, 6), updated_at = ?2 WHERE ingredient_id = ?3 AND quantity >= ?1 RETURNING name, quantity",
    )
    .bind(amount)
    .bind(now)
    .bind(ingredient_id)
    .fetch_optional(&mut **tx)
    .await?;

    if let Some((name, remaining)) = applied {
        return Ok(Deduction::Applied { name, remaining });
    }

    let current: Option<(String, f64)> =
        sqlx::query_as("SELECT name, quantity FROM inventory WHERE ingredient_id = ?")
            .bind(ingredient_id)
            .fetch_optional(&mut **tx)
            .await?;

    Ok(match current {
        Some((name, available)) => Deduction::Insufficient { name, available },
        None => Deduction::Missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{insert_ingredient, insert_menu_item, stock_of, test_pool};

    #[tokio::test]
    async fn test_create_update_delete() {
        let pool = test_pool().await;

        let item = create(
            &pool,
            InventoryItemCreate {
                name: " Milk ".into(),
                unit: "ml".into(),
                quantity: 500.0,
                price: Some(0.02),
            },
        )
        .await
        .unwrap();
        assert_eq!(item.name, "Milk");
        assert_eq!(item.quantity, 500.0);

        let updated = update(
            &pool,
            item.ingredient_id,
            InventoryItemUpdate {
                quantity: Some(750.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.quantity, 750.0);
        assert_eq!(updated.unit, "ml");

        delete(&pool, item.ingredient_id).await.unwrap();
        assert!(find_by_id(&pool, item.ingredient_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let pool = test_pool().await;
        let err = update(&pool, 42, InventoryItemUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_used_by_recipe_is_conflict() {
        let pool = test_pool().await;
        let milk = insert_ingredient(&pool, "milk", 10.0).await;
        insert_menu_item(&pool, "Latte", 3.5, &[(milk, 1.0)]).await;

        let err = delete(&pool, milk).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
        assert_eq!(stock_of(&pool, milk).await, 10.0);
    }

    #[tokio::test]
    async fn test_negative_stock_rejected_by_schema() {
        let pool = test_pool().await;
        let milk = insert_ingredient(&pool, "milk", 10.0).await;
        let err = update(
            &pool,
            milk,
            InventoryItemUpdate {
                quantity: Some(-1.0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_check_and_deduct() {
        let pool = test_pool().await;
        let milk = insert_ingredient(&pool, "milk", 10.0).await;

        let mut tx = pool.begin().await.unwrap();
        let first = check_and_deduct_tx(&mut tx, milk, 7.0, 1).await.unwrap();
        assert_eq!(
            first,
            Deduction::Applied {
                name: "milk".into(),
                remaining: 3.0
            }
        );

        // Re-read inside the same transaction sees the earlier deduction
        let second = check_and_deduct_tx(&mut tx, milk, 4.0, 1).await.unwrap();
        assert_eq!(
            second,
            Deduction::Insufficient {
                name: "milk".into(),
                available: 3.0
            }
        );

        let missing = check_and_deduct_tx(&mut tx, 999, 1.0, 1).await.unwrap();
        assert_eq!(missing, Deduction::Missing);
        tx.commit().await.unwrap();

        assert_eq!(stock_of(&pool, milk).await, 3.0);
    }

    #[tokio::test]
    async fn test_deduct_exact_balance_reaches_zero() {
        let pool = test_pool().await;
        let beans = insert_ingredient(&pool, "beans", 2.5).await;

        let mut tx = pool.begin().await.unwrap();
        let result = check_and_deduct_tx(&mut tx, beans, 2.5, 1).await.unwrap();
        assert!(matches!(result, Deduction::Applied { remaining, .. } if remaining == 0.0));
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_repeated_fractional_deductions_do_not_drift() {
        let pool = test_pool().await;
        let syrup = insert_ingredient(&pool, "syrup", 1.0).await;

        let mut tx = pool.begin().await.unwrap();
        for _ in 0..3 {
            check_and_deduct_tx(&mut tx, syrup, 0.1, 1).await.unwrap();
        }
        tx.commit().await.unwrap();

        // 1.0 - 0.1 - 0.1 - 0.1 in f64 is 0.7000000000000001
        assert_eq!(stock_of(&pool, syrup).await, 0.7);
    }

    #[tokio::test]
    async fn test_find_missing_ids() {
        let pool = test_pool().await;
        let milk = insert_ingredient(&pool, "milk", 1.0).await;
        let missing = find_missing_ids(&pool, &[milk, 77, 78, 77]).await.unwrap();
        assert_eq!(missing, vec![77, 78]);
    }
}
