use super::*;
use crate::db::test_support::{count_rows, insert_ingredient, insert_menu_item, stock_of, test_pool};
use shared::models::{OrderLine, OrderStatus, OutcomeStatus, PlaceOrderRequest};
use sqlx::SqlitePool;

/// Ids created by [`seed_latte`]
struct Cafe {
    milk: i64,
    espresso: i64,
    latte: i64,
}

/// Latte at 3.50, one milk and one espresso per cup
async fn seed_latte(pool: &SqlitePool, milk_on_hand: f64, espresso_on_hand: f64) -> Cafe {
    let milk = insert_ingredient(pool, "milk", milk_on_hand).await;
    let espresso = insert_ingredient(pool, "espresso", espresso_on_hand).await;
    let latte = insert_menu_item(pool, "Latte", 3.5, &[(milk, 1.0), (espresso, 1.0)]).await;
    Cafe {
        milk,
        espresso,
        latte,
    }
}

fn request(customer: &str, items: &[(i64, i64)]) -> PlaceOrderRequest {
    PlaceOrderRequest {
        customer_name: customer.to_string(),
        notes: None,
        items: items
            .iter()
            .map(|&(menu_item_id, quantity)| OrderLine {
                menu_item_id,
                quantity,
            })
            .collect(),
    }
}

/// Row counts of every table a placement writes
async fn order_table_counts(pool: &SqlitePool) -> (i64, i64, i64) {
    (
        count_rows(pool, "orders").await,
        count_rows(pool, "order_items").await,
        count_rows(pool, "order_status_history").await,
    )
}

mod test_concurrency;
mod test_lifecycle;
