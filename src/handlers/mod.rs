pub mod auth;
pub mod health;
pub mod users;

use std::sync::Arc;

use crate::auth::services::AccountService;
use crate::error::AppError;

/// Exécute un appel au service (diesel, bcrypt) sur le pool bloquant de tokio
pub(crate) async fn blocking<T, F>(service: &Arc<AccountService>, f: F) -> Result<T, AppError>
where
    F: FnOnce(&AccountService) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let service = Arc::clone(service);
    tokio::task::spawn_blocking(move || f(&service)).await?
}
