//! Utility module
//!
//! - [`AppError`] - application error (from shared::error)
//! - [`ApiResponse`] - API response envelope (from shared::error)
//! - logging and input validation helpers

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
