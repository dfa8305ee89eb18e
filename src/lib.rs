//! Persistance des comptes utilisateur: `user`, `user_authentication` et
//! `user_authentication_token`, derrière une interface de stores étroite,
//! plus le service et les routes HTTP qui l'exposent.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod response;

use std::sync::Arc;

use anyhow::Result;

use auth::password::PasswordManager;
use auth::services::AccountService;
use config::{Config, StoreBackend};
use db::memory::MemoryStore;
use db::repositories::PgStore;
use db::store::AccountStore;

/// Ouvre le store choisi par la configuration et construit le service
pub fn build_service(config: &Config) -> Result<AccountService> {
    let store: Arc<dyn AccountStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = db::connection::create_pool(&config.database_url, config.db_pool_size)?;
            if config.run_migrations {
                let applied = db::connection::run_migrations(&pool)?;
                tracing::info!(applied, "Database schema is up to date");
            }
            Arc::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("⚠️  Using the in-memory store, accounts are lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    Ok(AccountService::new(
        store,
        PasswordManager::new(config.bcrypt_cost),
    ))
}
