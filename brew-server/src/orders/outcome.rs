//! Outcome reporter
//!
//! Turns a placement result into the record returned to API callers.

use shared::models::{OrderOutcome, OutcomeStatus};

use super::error::OrderError;
use super::placement::Placement;

/// Reason reported for every accepted placement
pub const ACCEPTED_REASON: &str = "OK";

pub fn accepted(placement: Placement) -> OrderOutcome {
    OrderOutcome {
        customer_name: placement.customer_name,
        order_id: Some(placement.order_id),
        status: OutcomeStatus::Accepted,
        reason: ACCEPTED_REASON.to_string(),
        total: placement.total,
        inventory_updates: placement.inventory_updates,
    }
}

/// Nothing was committed, so there is no order id, total or consumption
pub fn rejected(customer_name: &str, err: &OrderError) -> OrderOutcome {
    OrderOutcome {
        customer_name: customer_name.trim().to_string(),
        order_id: None,
        status: OutcomeStatus::Rejected,
        reason: err.public_message(),
        total: 0.0,
        inventory_updates: Vec::new(),
    }
}

pub fn report(
    customer_name: &str,
    result: Result<Placement, OrderError>,
) -> (OrderOutcome, Option<OrderError>) {
    match result {
        Ok(placement) => (accepted(placement), None),
        Err(err) => (rejected(customer_name, &err), Some(err)),
    }
}
