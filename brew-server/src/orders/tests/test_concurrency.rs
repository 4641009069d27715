use super::*;
use crate::db::DbService;

/// Five customers race for ten units of milk, three units each
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_placements_never_oversell() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");
    let db = DbService::new(path.to_str().unwrap(), 4).await.unwrap();
    let pool = db.pool;

    let cafe = seed_latte(&pool, 10.0, 100.0).await;

    let handles = (0..5).map(|i| {
        let pool = pool.clone();
        let req = request(&format!("customer {i}"), &[(cafe.latte, 3)]);
        tokio::spawn(async move { place_order(&pool, &req).await })
    });
    let results = futures::future::join_all(handles).await;

    let mut accepted = 0;
    for result in results {
        match result.unwrap() {
            Ok(_) => accepted += 1,
            Err(OrderError::InsufficientInventory(s)) => {
                assert_eq!(s.ingredient_id, cafe.milk);
                assert!(s.available < 3.0);
            }
            Err(other) => panic!("unexpected placement error: {other:?}"),
        }
    }

    let milk = stock_of(&pool, cafe.milk).await;
    assert_eq!(accepted, 3);
    assert_eq!(milk, 1.0);
    assert_eq!(stock_of(&pool, cafe.espresso).await, 91.0);
    assert_eq!(count_rows(&pool, "orders").await, 3);
}
