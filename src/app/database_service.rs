//! The database service.
//!
//! Owns the SQLite connection pool shared by all requests. It is responsible for:
//! 1.  Connecting to the configured database file (creating it when missing).
//! 2.  Ensuring the restaurants/addresses/reviews schema exists.
//! 3.  Handing each request its own [`UnitOfWork`] backed by a pooled connection.

use crate::app::repository::SqliteRepository;
use crate::app::unit_of_work::UnitOfWork;
use crate::errors::ReviewsError;
use crate::infra::Config;
use crate::storage::{ensure_schema, gateway, TABLES};
use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

#[derive(Clone)]
pub struct DatabaseService {
    pool: SqlitePool,
}

impl DatabaseService {
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Connects using `DATABASE_URL`/`DB_MAX_CONNECTIONS` from the config and ensures the schema.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .with_context(|| format!("invalid DATABASE_URL '{}'", config.database_url))?;
        Self::connect_with(options, config.max_connections).await
    }

    /// Opens (or creates) a database file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::new().filename(path.as_ref());
        Self::connect_with(options, crate::infra::config::DEFAULT_MAX_CONNECTIONS).await
    }

    async fn connect_with(options: SqliteConnectOptions, max_connections: u32) -> anyhow::Result<Self> {
        let options = options.create_if_missing(true).foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .context("failed to connect to the database")?;

        ensure_schema(&pool)
            .await
            .context("failed to ensure the database schema")?;
        info!(max_connections, "database ready");

        Ok(Self { pool })
    }

    /// Starts a unit of work holding its own pooled connection.
    pub async fn begin_unit_of_work(&self) -> Result<UnitOfWork<SqliteRepository>, ReviewsError> {
        UnitOfWork::begin(&self.pool).await
    }

    /// Row counts per table, in schema order.
    pub async fn table_counts(&self) -> anyhow::Result<Vec<(&'static str, i64)>> {
        let mut conn = self.pool.acquire().await?;
        let mut counts = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            counts.push((*table, gateway::count_rows(&mut conn, table).await?));
        }
        Ok(counts)
    }
}
