//! Inventory API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::repository::{RepoError, inventory};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PRICE, MAX_STOCK, MAX_UNIT_LEN, validate_amount, validate_optional_text,
    validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{InventoryItem, InventoryItemCreate, InventoryItemUpdate};

fn not_found(ingredient_id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::IngredientNotFound,
        format!("Ingredient {ingredient_id} not found"),
    )
    .with_detail("ingredient_id", ingredient_id)
}

fn map_repo_error(err: RepoError, ingredient_id: i64) -> AppError {
    match err {
        RepoError::NotFound(_) => not_found(ingredient_id),
        RepoError::Conflict(msg) => AppError::with_message(ErrorCode::IngredientInUse, msg)
            .with_detail("ingredient_id", ingredient_id),
        other => other.into(),
    }
}

fn validate_create(payload: &InventoryItemCreate) -> AppResult<()> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.unit, "unit", MAX_UNIT_LEN)?;
    validate_amount(payload.quantity, "quantity", MAX_STOCK)?;
    if let Some(price) = payload.price {
        validate_amount(price, "price", MAX_PRICE)?;
    }
    Ok(())
}

fn validate_update(payload: &InventoryItemUpdate) -> AppResult<()> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.unit, "unit", MAX_UNIT_LEN)?;
    if let Some(quantity) = payload.quantity {
        validate_amount(quantity, "quantity", MAX_STOCK)?;
    }
    if let Some(price) = payload.price {
        validate_amount(price, "price", MAX_PRICE)?;
    }
    Ok(())
}

/// GET /api/inventory
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<InventoryItem>>> {
    let items = inventory::find_all(&state.pool).await?;
    Ok(ApiResponse::success(items))
}

/// GET /api/inventory/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<InventoryItem>> {
    let item = inventory::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ApiResponse::success(item))
}

/// POST /api/inventory
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<InventoryItemCreate>,
) -> AppResult<(StatusCode, ApiResponse<InventoryItem>)> {
    validate_create(&payload)?;
    let item = inventory::create(&state.pool, payload).await?;
    tracing::info!(ingredient_id = item.ingredient_id, name = %item.name, "Ingredient created");
    Ok((StatusCode::CREATED, ApiResponse::success(item)))
}

/// PUT /api/inventory/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<InventoryItemUpdate>,
) -> AppResult<ApiResponse<InventoryItem>> {
    validate_update(&payload)?;
    let item = inventory::update(&state.pool, id, payload)
        .await
        .map_err(|e| map_repo_error(e, id))?;
    tracing::info!(ingredient_id = id, quantity = item.quantity, "Ingredient updated");
    Ok(ApiResponse::success(item))
}

/// DELETE /api/inventory/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    inventory::delete(&state.pool, id)
        .await
        .map_err(|e| map_repo_error(e, id))?;
    tracing::info!(ingredient_id = id, "Ingredient deleted");
    Ok(ApiResponse::ok())
}
