//! Menu Repository
//!
//! Menu items, their recipes, and the recipe resolver consulted by order
//! placement.

use super::{RepoError, RepoResult};
use shared::models::{MenuItem, MenuItemCreate, MenuItemDetail, MenuItemUpdate, RecipeEntry};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

const SELECT_COLUMNS: &str =
    "SELECT id, name, description, price, created_at, updated_at FROM menu_items";

/// Unit price and per-unit ingredient needs of one menu item
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub price: f64,
    pub ingredients: Vec<RecipeEntry>,
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let items = sqlx::query_as::<_, MenuItem>(&format!("{SELECT_COLUMNS} ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let item = sqlx::query_as::<_, MenuItem>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

/// Menu item together with its recipe
pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItemDetail>> {
    let Some(item) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let mut conn = pool.acquire().await?;
    let ingredients = find_recipe_entries(&mut conn, id).await?;
    Ok(Some(MenuItemDetail { item, ingredients }))
}

async fn find_recipe_entries(
    conn: &mut SqliteConnection,
    menu_item_id: i64,
) -> RepoResult<Vec<RecipeEntry>> {
    let entries = sqlx::query_as::<_, RecipeEntry>(
        "SELECT ingredient_id, quantity FROM menu_item_ingredients WHERE menu_item_id = ? ORDER BY ingredient_id",
    )
    .bind(menu_item_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(entries)
}

/// Current price and recipe of a menu item, `None` if it does not exist.
///
/// Takes a bare connection so placement can call it inside its own
/// transaction and observe prices as of that instant.
pub async fn find_recipe_and_price(
    conn: &mut SqliteConnection,
    menu_item_id: i64,
) -> RepoResult<Option<Recipe>> {
    let price: Option<f64> = sqlx::query_scalar("SELECT price FROM menu_items WHERE id = ?")
        .bind(menu_item_id)
        .fetch_optional(&mut *conn)
        .await?;
    let Some(price) = price else {
        return Ok(None);
    };
    let ingredients = find_recipe_entries(conn, menu_item_id).await?;
    Ok(Some(Recipe { price, ingredients }))
}

pub async fn create(pool: &SqlitePool, data: MenuItemCreate) -> RepoResult<MenuItemDetail> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO menu_items (name, description, price, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4) RETURNING id",
    )
    .bind(data.name.trim())
    .bind(data.description.trim())
    .bind(data.price)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    replace_recipe(&mut tx, id, &data.ingredients).await?;

    tx.commit().await?;

    find_detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

/// Update a menu item; a present `ingredients` list replaces the recipe
pub async fn update(pool: &SqlitePool, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItemDetail> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE menu_items SET name = COALESCE(?1, name), description = COALESCE(?2, description), price = COALESCE(?3, price), updated_at = ?4 WHERE id = ?5",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.description.as_deref().map(str::trim))
    .bind(data.price)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }

    if let Some(ref ingredients) = data.ingredients {
        replace_recipe(&mut tx, id, ingredients).await?;
    }

    tx.commit().await?;

    find_detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))
}

/// Delete a menu item that no order references
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    let referenced: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE menu_item_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
    if referenced > 0 {
        return Err(RepoError::Conflict(format!(
            "Menu item {id} is referenced by {referenced} order line(s)"
        )));
    }

    sqlx::query("DELETE FROM menu_item_ingredients WHERE menu_item_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM menu_items WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }

    tx.commit().await?;
    Ok(())
}

// ── Recipe (internal helpers) ─────────────────────────

async fn replace_recipe(
    tx: &mut Transaction<'_, Sqlite>,
    menu_item_id: i64,
    ingredients: &[RecipeEntry],
) -> RepoResult<()> {
    sqlx::query("DELETE FROM menu_item_ingredients WHERE menu_item_id = ?")
        .bind(menu_item_id)
        .execute(&mut **tx)
        .await?;
    for entry in ingredients {
        sqlx::query(
            "INSERT INTO menu_item_ingredients (menu_item_id, ingredient_id, quantity) VALUES (?1, ?2, ?3)",
        )
        .bind(menu_item_id)
        .bind(entry.ingredient_id)
        .bind(entry.quantity)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
