use super::*;
use serde_json::json;
use shared::models::UpdateOrderRequest;

async fn placed_order(pool: &SqlitePool) -> (Cafe, i64) {
    let cafe = seed_latte(pool, 10.0, 10.0).await;
    let placement = place_order(pool, &request("Ana", &[(cafe.latte, 1)]))
        .await
        .unwrap();
    (cafe, placement.order_id)
}

fn update(items: &[(i64, i64)]) -> UpdateOrderRequest {
    UpdateOrderRequest {
        customer_name: None,
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

// ========================================================================
// Close
// ========================================================================

#[tokio::test]
async fn test_close_twice_is_state_conflict() {
    let pool = test_pool().await;
    let (_, id) = placed_order(&pool).await;

    let closed = lifecycle::close_order(&pool, id).await.unwrap();
    assert_eq!(closed.status, OrderStatus::Closed);
    let updated_at = closed.updated_at;

    let err = lifecycle::close_order(&pool, id).await.unwrap_err();
    assert!(matches!(err, OrderError::OrderClosed(x) if x == id));
    let err = lifecycle::close_order(&pool, id).await.unwrap_err();
    assert!(matches!(err, OrderError::OrderClosed(_)));

    let order = lifecycle::get_order(&pool, id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Closed);
    assert_eq!(order.updated_at, updated_at);

    let history = lifecycle::get_history(&pool, id).await.unwrap();
    let statuses: Vec<_> = history.iter().map(|h| h.status).collect();
    assert_eq!(statuses, vec![OrderStatus::New, OrderStatus::Closed]);
}

#[tokio::test]
async fn test_close_missing_order() {
    let pool = test_pool().await;
    let err = lifecycle::close_order(&pool, 77).await.unwrap_err();
    assert!(matches!(err, OrderError::OrderNotFound(77)));
    let err = lifecycle::get_history(&pool, 77).await.unwrap_err();
    assert!(matches!(err, OrderError::OrderNotFound(77)));
}

// ========================================================================
// Delete
// ========================================================================

#[tokio::test]
async fn test_delete_removes_lines_and_history() {
    let pool = test_pool().await;
    let (cafe, id) = placed_order(&pool).await;
    lifecycle::close_order(&pool, id).await.unwrap();

    lifecycle::delete_order(&pool, id).await.unwrap();

    assert_eq!(order_table_counts(&pool).await, (0, 0, 0));
    // Consumed stock stays consumed
    assert_eq!(stock_of(&pool, cafe.milk).await, 9.0);

    let err = lifecycle::delete_order(&pool, id).await.unwrap_err();
    assert!(matches!(err, OrderError::OrderNotFound(_)));
}

// ========================================================================
// Update
// ========================================================================

#[tokio::test]
async fn test_update_replaces_lines_without_touching_stock() {
    let pool = test_pool().await;
    let (cafe, id) = placed_order(&pool).await;
    let cookie = insert_menu_item(&pool, "Cookie", 1.25, &[]).await;

    let mut req = update(&[(cookie, 2), (cafe.latte, 1), (cookie, 1)]);
    req.customer_name = Some(" Bea ".into());
    req.notes = Some(json!({"table": 4}));
    let order = lifecycle::update_order(&pool, id, &req).await.unwrap();

    assert_eq!(order.customer_name, "Bea");
    assert_eq!(order.notes, json!({"table": 4}));
    assert_eq!(
        order.items,
        vec![
            OrderLine {
                menu_item_id: cookie,
                quantity: 3
            },
            OrderLine {
                menu_item_id: cafe.latte,
                quantity: 1
            },
        ]
    );
    assert_eq!(order.total, 7.25);
    assert_eq!(stock_of(&pool, cafe.milk).await, 9.0);
}

#[tokio::test]
async fn test_update_keeps_header_when_absent() {
    let pool = test_pool().await;
    let (cafe, id) = placed_order(&pool).await;

    let order = lifecycle::update_order(&pool, id, &update(&[(cafe.latte, 2)]))
        .await
        .unwrap();
    assert_eq!(order.customer_name, "Ana");
    assert_eq!(order.notes, json!({}));
    assert_eq!(order.total, 7.0);
}

#[tokio::test]
async fn test_update_closed_order_rejected() {
    let pool = test_pool().await;
    let (cafe, id) = placed_order(&pool).await;
    lifecycle::close_order(&pool, id).await.unwrap();

    let err = lifecycle::update_order(&pool, id, &update(&[(cafe.latte, 5)]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::OrderClosed(_)));

    let order = lifecycle::get_order(&pool, id).await.unwrap();
    assert_eq!(order.items[0].quantity, 1);
}

#[tokio::test]
async fn test_update_unknown_item_rolls_back() {
    let pool = test_pool().await;
    let (cafe, id) = placed_order(&pool).await;

    let err = lifecycle::update_order(&pool, id, &update(&[(cafe.latte, 2), (999, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::MenuItemNotFound(999)));

    let order = lifecycle::get_order(&pool, id).await.unwrap();
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 1);
    assert_eq!(order.total, 3.5);

    let err = lifecycle::update_order(&pool, 555, &update(&[(cafe.latte, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::OrderNotFound(555)));
}

#[tokio::test]
async fn test_list_orders() {
    let pool = test_pool().await;
    let (cafe, first) = placed_order(&pool).await;
    let second = place_order(&pool, &request("Ben", &[(cafe.latte, 2)]))
        .await
        .unwrap()
        .order_id;

    let orders = lifecycle::list_orders(&pool).await.unwrap();
    let ids: Vec<_> = orders.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![first, second]);
    assert_eq!(orders[1].items[0].quantity, 2);
}
