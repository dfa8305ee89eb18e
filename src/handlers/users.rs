use std::sync::Arc;

use account_store_api::{ChangePasswordRequest, UpdateProfileRequest, UserResponse};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use super::blocking;
use crate::auth::extractors::SessionUser;
use crate::auth::services::AccountService;
use crate::error::AppError;
use crate::response::{AppResponse, AppResult};

/// GET /users/me
/// Profil de l'utilisateur courant
pub async fn get_current_user(
    session: SessionUser,
    State(service): State<Arc<AccountService>>,
) -> AppResult<UserResponse> {
    let user = blocking(&service, move |service| service.get_user(&session.user_id)).await?;
    Ok(AppResponse::ok(user))
}

/// GET /users/{id}
pub async fn get_user_by_id(
    Path(user_id): Path<String>,
    _session: SessionUser,
    State(service): State<Arc<AccountService>>,
) -> AppResult<UserResponse> {
    let user = blocking(&service, move |service| service.get_user(&user_id)).await?;
    Ok(AppResponse::ok(user))
}

/// PATCH /users/{id}
/// Met à jour le profil de son propre compte (email uniquement)
pub async fn update_user(
    Path(user_id): Path<String>,
    session: SessionUser,
    State(service): State<Arc<AccountService>>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> AppResult<UserResponse> {
    session.ensure_owner(&user_id, "update")?;
    let Json(payload) = payload?;

    let user =
        blocking(&service, move |service| service.update_profile(&user_id, payload)).await?;
    Ok(AppResponse::ok(user))
}

/// DELETE /users/{id}
/// Supprime son propre compte
pub async fn delete_user(
    Path(user_id): Path<String>,
    session: SessionUser,
    State(service): State<Arc<AccountService>>,
) -> Result<AppResponse<()>, AppError> {
    session.ensure_owner(&user_id, "delete")?;

    blocking(&service, move |service| service.delete_user(&user_id)).await?;
    Ok(AppResponse::no_content())
}

/// POST /users/{id}/change-password
pub async fn change_password(
    Path(user_id): Path<String>,
    session: SessionUser,
    State(service): State<Arc<AccountService>>,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> AppResult<serde_json::Value> {
    session.ensure_owner(&user_id, "change the password of")?;
    let Json(payload) = payload?;

    blocking(&service, move |service| {
        service.change_password(&user_id, &payload.old_password, &payload.new_password)
    })
    .await?;

    Ok(AppResponse::ok(serde_json::json!({
        "message": "Password changed successfully"
    })))
}
