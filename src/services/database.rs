//! Relational database handle.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::debug;

use crate::config::{ConfigMap, DatabaseConfig};
use crate::error::BootstrapError;

/// Postgres connection pool, created lazily from the `database` section.
/// The URL is validated at construction; no connection is dialed until the
/// pool is first used.
#[derive(Debug)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn from_config(config: &ConfigMap) -> Result<Self, BootstrapError> {
        let db: DatabaseConfig = config.section("database")?;
        let pool = PgPoolOptions::new()
            .max_connections(db.max_connections)
            .connect_lazy(&db.url)
            .map_err(|e| {
                BootstrapError::resource("database", format!("invalid database url: {e}"))
            })?;
        debug!(max_connections = db.max_connections, "database pool ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
