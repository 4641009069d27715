//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::MenuItemNotFound
            | Self::IngredientNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::OrderAlreadyClosed
            | Self::MenuItemInUse
            | Self::IngredientInUse => StatusCode::CONFLICT,

            // 422 Unprocessable Entity (business rejection)
            Self::InsufficientInventory => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation)
            Self::ValidationFailed
            | Self::OrderNotesInvalid
            | Self::MenuItemInvalidPrice
            | Self::RecipeInvalid => StatusCode::BAD_REQUEST,
        }
    }
}
