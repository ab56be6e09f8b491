//! SQLite-backed repository implementations.

mod articles;
mod lists;
mod util;
mod versions;

pub use util::map_sqlx_error;

use std::sync::Arc;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use super::error::InfraError;

#[derive(Clone)]
pub struct SqliteRepositories {
    pool: Arc<SqlitePool>,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool, InfraError> {
        SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|err| InfraError::database(err.to_string()))
    }

    /// Single-connection pool over a private in-memory database. A second
    /// connection would see a different database, so the pool is pinned to
    /// one; used by the test suite.
    pub async fn connect_in_memory() -> Result<SqlitePool, InfraError> {
        SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|err| InfraError::database(err.to_string()))
    }

    pub async fn run_migrations(pool: &SqlitePool) -> Result<(), InfraError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|err| InfraError::database(err.to_string()))
    }

    pub async fn health_check(&self) -> Result<(), InfraError> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .map(|_| ())
            .map_err(|err| InfraError::database(err.to_string()))
    }
}
