pub mod credential_repository;
pub mod token_repository;
pub mod user_repository;

use diesel::PgConnection;

use super::error::RepositoryError;
use super::{DbConnection, DbPool};

/// Implémentation Postgres des stores (diesel + r2d2)
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<DbConnection, RepositoryError> {
        self.pool.get().map_err(Into::into)
    }
}

impl std::fmt::Debug for PgStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgStore")
            .field("max_size", &self.pool.max_size())
            .finish_non_exhaustive()
    }
}

fn as_pg(conn: &mut DbConnection) -> &mut PgConnection {
    conn
}
