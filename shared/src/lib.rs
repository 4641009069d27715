//! Shared types for the brew backend
//!
//! Types used by brew-server and its API clients: the unified error system,
//! response envelope, data models and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
