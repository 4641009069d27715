//! Orders API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::core::ServerState;
use crate::orders::{batch, lifecycle, outcome, placement};
use crate::utils::{ApiResponse, AppError, AppResult};
use shared::models::{
    BatchOrderRequest, BatchOutcome, Order, OrderStatusChange, PlaceOrderRequest,
    UpdateOrderRequest,
};

/// POST /api/orders
///
/// The outcome record is always in `data`; the status code follows the
/// rejection class.
pub async fn place(
    State(state): State<ServerState>,
    Json(payload): Json<PlaceOrderRequest>,
) -> Response {
    let result = placement::place_order(&state.pool, &payload).await;
    match outcome::report(&payload.customer_name, result) {
        (record, None) => (StatusCode::CREATED, ApiResponse::success(record)).into_response(),
        (record, Some(err)) => {
            let err = AppError::from(err);
            ApiResponse::error_with_data(&err, record).into_response()
        }
    }
}

/// POST /api/orders/batch-process
pub async fn place_batch(
    State(state): State<ServerState>,
    Json(payload): Json<BatchOrderRequest>,
) -> AppResult<ApiResponse<BatchOutcome>> {
    if payload.orders.is_empty() {
        return Err(AppError::validation("orders must not be empty"));
    }
    let result = batch::place_orders(&state.pool, &payload.orders).await;
    Ok(ApiResponse::success(result))
}

/// GET /api/orders
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Order>>> {
    let orders = lifecycle::list_orders(&state.pool).await?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Order>> {
    let order = lifecycle::get_order(&state.pool, id).await?;
    Ok(ApiResponse::success(order))
}

/// PUT /api/orders/{id} - replace lines of a `new` order
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateOrderRequest>,
) -> AppResult<ApiResponse<Order>> {
    let order = lifecycle::update_order(&state.pool, id, &payload).await?;
    Ok(ApiResponse::success(order))
}

/// DELETE /api/orders/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    lifecycle::delete_order(&state.pool, id).await?;
    Ok(ApiResponse::ok())
}

/// POST /api/orders/{id}/close
pub async fn close(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Order>> {
    let order = lifecycle::close_order(&state.pool, id).await?;
    Ok(ApiResponse::success(order))
}

/// GET /api/orders/{id}/history
pub async fn history(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Vec<OrderStatusChange>>> {
    let history = lifecycle::get_history(&state.pool, id).await?;
    Ok(ApiResponse::success(history))
}
