//! Batch placement
//!
//! Each request is placed in its own transaction, in submission order. A
//! rejected request never affects the others.

use rust_decimal::Decimal;
use shared::models::{
    BatchOutcome, BatchSummary, IngredientConsumption, OrderOutcome, PlaceOrderRequest,
};
use sqlx::SqlitePool;
use std::collections::HashMap;

use super::{money, outcome, placement};

pub async fn place_orders(pool: &SqlitePool, requests: &[PlaceOrderRequest]) -> BatchOutcome {
    let mut processed_orders = Vec::with_capacity(requests.len());
    for request in requests {
        let result = placement::place_order(pool, request).await;
        let (record, _) = outcome::report(&request.customer_name, result);
        processed_orders.push(record);
    }

    let summary = summarize(&processed_orders);
    tracing::info!(
        total = summary.total_orders,
        accepted = summary.accepted,
        rejected = summary.rejected,
        revenue = summary.total_revenue,
        "Batch placement finished"
    );

    BatchOutcome {
        processed_orders,
        summary,
    }
}

/// Counts, revenue and per-ingredient consumption over accepted outcomes
pub fn summarize(outcomes: &[OrderOutcome]) -> BatchSummary {
    let mut revenue = Decimal::ZERO;
    let mut accepted = 0;
    let mut consumption: Vec<IngredientConsumption> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for record in outcomes.iter().filter(|o| o.is_accepted()) {
        accepted += 1;
        revenue += money::to_decimal(record.total);

        for update in &record.inventory_updates {
            match index.get(&update.ingredient_id) {
                Some(&i) => {
                    let entry = &mut consumption[i];
                    entry.quantity_used =
                        money::add_quantities(entry.quantity_used, update.quantity_used);
                    entry.remaining = update.remaining;
                }
                None => {
                    index.insert(update.ingredient_id, consumption.len());
                    consumption.push(IngredientConsumption {
                        ingredient_id: update.ingredient_id,
                        name: update.name.clone(),
                        quantity_used: update.quantity_used,
                        remaining: update.remaining,
                    });
                }
            }
        }
    }

    BatchSummary {
        total_orders: outcomes.len(),
        accepted,
        rejected: outcomes.len() - accepted,
        total_revenue: money::to_f64(revenue),
        inventory_consumption: consumption,
    }
}
