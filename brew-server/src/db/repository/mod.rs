//! Repository Module
//!
//! Free async functions over `SqlitePool` / `Transaction`, one file per table
//! group. Functions ending in `_tx` run inside a caller-owned transaction.

pub mod inventory;
pub mod menu;
pub mod order;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row not found".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Conflict(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                RepoError::Conflict(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.is_check_violation() => {
                RepoError::Validation(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Conflict(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Repository database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_to_app_error() {
        let err: AppError = RepoError::NotFound("Menu item 3 not found".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Menu item 3 not found");

        let err: AppError = RepoError::Conflict("in use".into()).into();
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);

        // Storage detail never reaches the client
        let err: AppError = RepoError::Database("disk I/O error at page 12".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database error");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: RepoError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
