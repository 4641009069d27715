//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::collections::HashSet;

use crate::core::ServerState;
use crate::db::repository::{RepoError, inventory, menu};
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_PRICE, MAX_STOCK, validate_amount, validate_id,
    validate_optional_text, validate_positive_amount, validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{MenuItem, MenuItemCreate, MenuItemDetail, MenuItemUpdate, RecipeEntry};

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {id} not found"))
        .with_detail("menu_item_id", id)
}

fn map_repo_error(err: RepoError, id: i64) -> AppError {
    match err {
        RepoError::NotFound(_) => not_found(id),
        RepoError::Conflict(msg) => {
            AppError::with_message(ErrorCode::MenuItemInUse, msg).with_detail("menu_item_id", id)
        }
        other => other.into(),
    }
}

/// Recipe shape checks plus existence of every referenced ingredient
async fn validate_recipe(state: &ServerState, ingredients: &[RecipeEntry]) -> AppResult<()> {
    let mut seen = HashSet::new();
    for (i, entry) in ingredients.iter().enumerate() {
        validate_id(entry.ingredient_id, &format!("ingredients[{i}].ingredient_id"))?;
        validate_positive_amount(entry.quantity, &format!("ingredients[{i}].quantity"), MAX_STOCK)?;
        if !seen.insert(entry.ingredient_id) {
            return Err(AppError::with_message(
                ErrorCode::RecipeInvalid,
                format!("Ingredient {} appears more than once", entry.ingredient_id),
            )
            .with_detail("ingredient_id", entry.ingredient_id));
        }
    }

    let ids: Vec<i64> = ingredients.iter().map(|e| e.ingredient_id).collect();
    let missing = inventory::find_missing_ids(&state.pool, &ids).await?;
    if let Some(&first) = missing.first() {
        return Err(AppError::with_message(
            ErrorCode::IngredientNotFound,
            format!("Ingredient {first} not found"),
        )
        .with_detail("ingredient_id", first)
        .with_detail("missing", missing));
    }
    Ok(())
}

fn validate_price(price: f64) -> AppResult<()> {
    validate_amount(price, "price", MAX_PRICE).map_err(|e| {
        AppError::with_message(ErrorCode::MenuItemInvalidPrice, e.message).with_detail("price", price)
    })
}

/// GET /api/menu
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<MenuItem>>> {
    let items = menu::find_all(&state.pool).await?;
    Ok(ApiResponse::success(items))
}

/// GET /api/menu/{id} - item with its recipe
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<MenuItemDetail>> {
    let detail = menu::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ApiResponse::success(detail))
}

/// POST /api/menu
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<(StatusCode, ApiResponse<MenuItemDetail>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_price(payload.price)?;
    validate_recipe(&state, &payload.ingredients).await?;

    let detail = menu::create(&state.pool, payload).await?;
    tracing::info!(
        menu_item_id = detail.item.id,
        name = %detail.item.name,
        ingredients = detail.ingredients.len(),
        "Menu item created"
    );
    Ok((StatusCode::CREATED, ApiResponse::success(detail)))
}

/// PUT /api/menu/{id} - a present `ingredients` list replaces the recipe
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<ApiResponse<MenuItemDetail>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price)?;
    }
    if let Some(ref ingredients) = payload.ingredients {
        validate_recipe(&state, ingredients).await?;
    }

    let detail = menu::update(&state.pool, id, payload)
        .await
        .map_err(|e| map_repo_error(e, id))?;
    tracing::info!(menu_item_id = id, price = detail.item.price, "Menu item updated");
    Ok(ApiResponse::success(detail))
}

/// DELETE /api/menu/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    menu::delete(&state.pool, id)
        .await
        .map_err(|e| map_repo_error(e, id))?;
    tracing::info!(menu_item_id = id, "Menu item deleted");
    Ok(ApiResponse::ok())
}
