//! PostgreSQL persistence for the system manager.
//!
//! Repositories follow the zero-sized-struct convention (`&PgPool` as the
//! first argument); [`stores`] adapts them to the core store traits.

pub mod models;
pub mod repositories;
pub mod stores;

use sqlx::postgres::PgPoolOptions;
use sysmgr_core::store::Stores;

pub use stores::{PgApplicationRegistry, PgJobStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// An open database connection.
///
/// Lifecycle is `open` → [`stores`](Database::stores) → [`close`](Database::close).
#[derive(Debug, Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Connect, verify reachability and apply migrations.
    pub async fn open(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = create_pool(database_url).await?;
        tracing::info!("Database connection pool created");

        health_check(&pool).await?;
        tracing::info!("Database health check passed");

        run_migrations(&pool)
            .await
            .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }

    /// Wrap an existing pool (migrations are assumed to be applied).
    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Store handles backed by this database.
    pub fn stores(&self) -> Stores {
        Stores::new(
            std::sync::Arc::new(PgApplicationRegistry::new(self.pool.clone())),
            std::sync::Arc::new(PgJobStore::new(self.pool.clone())),
        )
    }

    pub async fn close(self) {
        self.pool.close().await;
        tracing::info!("Database connection pool closed");
    }
}
