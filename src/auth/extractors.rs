use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::auth::services::AccountService;
use crate::error::AppError;

/// Extracteur d'authentification pour les routes protégées.
/// Valide `Authorization: Bearer <jeton de session>` via le token store,
/// ce qui met aussi à jour `timestamp_last_used`.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: String,
}

impl SessionUser {
    /// Refuse les actions sur le compte d'un autre utilisateur
    pub fn ensure_owner(&self, user_id: &str, action: &str) -> Result<(), AppError> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(AppError::unauthorized(format!(
                "You can only {action} your own account"
            )))
        }
    }
}

fn bearer_token(parts: &Parts) -> Result<String, AppError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AppError::InvalidTokenFormat)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::InvalidTokenFormat)?;

    // Doit être de type Bearer
    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(AppError::InvalidTokenFormat)
}

impl FromRequestParts<Arc<AccountService>> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        service: &Arc<AccountService>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let service = Arc::clone(service);
        let user_id =
            tokio::task::spawn_blocking(move || service.validate_token(&token)).await??;

        Ok(SessionUser { user_id })
    }
}
