//! Brew Server - coffee-shop order backend
//!
//! # Architecture
//!
//! - **Orders** (`orders`): atomic order placement against ingredient stock,
//!   batch placement, and the order lifecycle
//! - **Database** (`db`): SQLite pool, migrations and repositories
//! - **HTTP API** (`api`): axum routers for menu, inventory and orders
//!
//! # Layout
//!
//! ```text
//! brew-server/src/
//! ├── core/          # config, state, server, bootstrap errors
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # pool, migrations, repositories
//! ├── orders/        # placement engine, outcomes, lifecycle
//! └── utils/         # logging, validation
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use orders::{OrderError, place_order};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and initialise logging from the environment
pub fn setup_environment() {
    if let Err(e) = dotenv::dotenv() {
        // Missing .env is normal outside development
        if !e.not_found() {
            eprintln!("Failed to load .env: {e}");
        }
    }

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}
