//! PostgreSQL storage layer for annolab.
//!
//! Connection pool construction, embedded migrations, and the model and
//! repository layers. Repositories are zero-sized structs with async
//! CRUD methods that accept `&PgPool` as their first argument.

pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;

/// Shared connection pool type.
pub type DbPool = sqlx::PgPool;

/// Default maximum number of pooled connections.
const MAX_CONNECTIONS: u32 = 20;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::debug!("Applying database migrations");
    sqlx::migrate!("../../db/migrations").run(pool).await
}
