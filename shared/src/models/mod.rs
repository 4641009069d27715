//! Data models
//!
//! Shared between brew-server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod inventory;
pub mod menu;
pub mod order;

// Re-exports
pub use inventory::*;
pub use menu::*;
pub use order::*;
