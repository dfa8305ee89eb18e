use super::{DbConnection, DbPool};
use anyhow::{Result, anyhow};
use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Crée le pool r2d2 vers Postgres
pub fn create_pool(database_url: &str, max_size: u32) -> Result<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    diesel::r2d2::Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| anyhow!("Failed to create database pool: {e}"))
}

pub fn get_connection(pool: &DbPool) -> Result<DbConnection> {
    pool.get()
        .map_err(|e| anyhow!("Unable to get a connection from the pool: {e}"))
}

/// Applique les migrations embarquées qui n'ont pas encore tourné
pub fn run_migrations(pool: &DbPool) -> Result<usize> {
    let mut conn = get_connection(pool)?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("Failed to run migrations: {e}"))?;

    for version in &applied {
        tracing::info!(%version, "Applied migration");
    }

    Ok(applied.len())
}

#[cfg(test)]
pub(crate) fn test_pool() -> DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = create_pool(&database_url, 5).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    pool
}
