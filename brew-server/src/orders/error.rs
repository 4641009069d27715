//! Order errors
//!
//! Business rejections are plain variants so callers can branch on them
//! without parsing messages.

use crate::db::repository::RepoError;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Ingredient shortfall that rejected a placement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shortfall {
    pub ingredient_id: i64,
    pub name: String,
    pub required: f64,
    pub available: f64,
}

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{0}")]
    Validation(String),

    #[error("Order notes could not be encoded: {0}")]
    NotesEncoding(String),

    #[error("Order {0} not found")]
    OrderNotFound(i64),

    #[error("Menu item {0} not found")]
    MenuItemNotFound(i64),

    #[error("Ingredient {0} not found")]
    IngredientNotFound(i64),

    #[error(
        "Insufficient inventory: ingredient {} ({}) required {}, available {}",
        .0.ingredient_id, .0.name, .0.required, .0.available
    )]
    InsufficientInventory(Shortfall),

    #[error("Order {0} is already closed")]
    OrderClosed(i64),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl OrderError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::NotesEncoding(_) => ErrorCode::OrderNotesInvalid,
            Self::OrderNotFound(_) => ErrorCode::OrderNotFound,
            Self::MenuItemNotFound(_) => ErrorCode::MenuItemNotFound,
            Self::IngredientNotFound(_) => ErrorCode::IngredientNotFound,
            Self::InsufficientInventory(_) => ErrorCode::InsufficientInventory,
            Self::OrderClosed(_) => ErrorCode::OrderAlreadyClosed,
            Self::Storage(_) => ErrorCode::InternalError,
        }
    }

    /// Storage failures; everything else is the caller's to fix
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Text safe to show a client. Storage detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Storage(_) => ErrorCode::InternalError.message().to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Storage(err.to_string())
    }
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Validation(msg) => OrderError::Validation(msg),
            other => OrderError::Storage(other.to_string()),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let code = err.code();
        match err {
            OrderError::Storage(msg) => {
                tracing::error!(error = %msg, "Order storage error");
                AppError::new(code)
            }
            OrderError::InsufficientInventory(ref s) => {
                AppError::with_message(code, err.to_string())
                    .with_detail("ingredient_id", s.ingredient_id)
                    .with_detail("name", s.name.clone())
                    .with_detail("required", s.required)
                    .with_detail("available", s.available)
            }
            OrderError::OrderNotFound(id) | OrderError::OrderClosed(id) => {
                AppError::with_message(code, err.to_string()).with_detail("order_id", id)
            }
            OrderError::MenuItemNotFound(id) => {
                AppError::with_message(code, err.to_string()).with_detail("menu_item_id", id)
            }
            OrderError::IngredientNotFound(id) => {
                AppError::with_message(code, err.to_string()).with_detail("ingredient_id", id)
            }
            OrderError::Validation(_) | OrderError::NotesEncoding(_) => {
                AppError::with_message(code, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn milk_shortfall() -> OrderError {
        OrderError::InsufficientInventory(Shortfall {
            ingredient_id: 1,
            name: "milk".into(),
            required: 3.0,
            available: 2.0,
        })
    }

    #[test]
    fn test_insufficient_inventory_message() {
        assert_eq!(
            milk_shortfall().to_string(),
            "Insufficient inventory: ingredient 1 (milk) required 3, available 2"
        );
    }

    #[test]
    fn test_app_error_mapping() {
        let err: AppError = milk_shortfall().into();
        assert_eq!(err.code, ErrorCode::InsufficientInventory);
        assert_eq!(err.http_status(), StatusCode::UNPROCESSABLE_ENTITY);
        let details = err.details.unwrap();
        assert_eq!(details.get("required").unwrap(), 3.0);
        assert_eq!(details.get("available").unwrap(), 2.0);

        let err: AppError = OrderError::OrderClosed(5).into();
        assert_eq!(err.http_status(), StatusCode::CONFLICT);

        let err: AppError = OrderError::MenuItemNotFound(9).into();
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);

        let err: AppError = OrderError::Validation("quantity must be positive".into()).into();
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_error_is_opaque() {
        let err = OrderError::Storage("database is locked".into());
        assert!(err.is_infrastructure());
        assert_eq!(err.public_message(), "Internal server error");

        let app: AppError = err.into();
        assert_eq!(app.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!app.message.contains("locked"));
    }
}
