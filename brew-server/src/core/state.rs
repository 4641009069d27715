//! Server state shared by every handler

use anyhow::Context;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::core::{Config, Result, ServerError};
use crate::db::DbService;

/// Cloned into each request; both fields are cheap handles
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        Self {
            config: Arc::new(config),
            pool,
        }
    }

    /// Prepare the work directory and open the database
    pub async fn initialize(config: &Config) -> Result<Self> {
        config
            .ensure_work_dir()
            .with_context(|| format!("Failed to create work directory {}", config.work_dir))?;

        let db = DbService::new(&config.database_path, config.db_max_connections)
            .await
            .map_err(|e| ServerError::Database(e.message))?;

        Ok(Self::new(config.clone(), db.pool))
    }
}
