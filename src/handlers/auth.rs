// src/handlers/auth.rs

use std::sync::Arc;

use account_store_api::{
    LoginAvailabilityQuery, LoginAvailabilityResponse, LoginRequest, RegisterRequest,
    SessionResponse, TokenLoginRequest,
};
use axum::Json;
use axum::extract::{Query, State};

use super::blocking;
use crate::auth::extractors::SessionUser;
use crate::auth::services::AccountService;
use crate::error::AppError;
use crate::response::{AppResponse, AppResult};

/// GET /auth/login-available?login=
/// Le login est-il libre ?
pub async fn login_available(
    State(service): State<Arc<AccountService>>,
    Query(query): Query<LoginAvailabilityQuery>,
) -> AppResult<LoginAvailabilityResponse> {
    let login = query.login;
    let available = {
        let login = login.clone();
        blocking(&service, move |service| service.is_login_free(&login)).await?
    };

    Ok(AppResponse::ok(LoginAvailabilityResponse { login, available }))
}

/// POST /auth/register
/// Inscription d'un nouvel utilisateur
pub async fn register(
    State(service): State<Arc<AccountService>>,
    payload: Result<Json<RegisterRequest>, axum::extract::rejection::JsonRejection>,
) -> AppResult<SessionResponse> {
    let Json(payload) = payload?;
    let session = blocking(&service, move |service| service.register(payload)).await?;
    Ok(AppResponse::created(session))
}

/// POST /auth/login
/// Connexion par login et mot de passe
pub async fn login(
    State(service): State<Arc<AccountService>>,
    payload: Result<Json<LoginRequest>, axum::extract::rejection::JsonRejection>,
) -> AppResult<SessionResponse> {
    let Json(payload) = payload?;
    let session = blocking(&service, move |service| {
        service.authenticate_with_credentials(&payload.login, &payload.password, payload.remember)
    })
    .await?;
    Ok(AppResponse::ok(session))
}

/// POST /auth/token
/// Connexion par jeton de session
pub async fn token_login(
    State(service): State<Arc<AccountService>>,
    payload: Result<Json<TokenLoginRequest>, axum::extract::rejection::JsonRejection>,
) -> AppResult<SessionResponse> {
    let Json(payload) = payload?;
    let session = blocking(&service, move |service| {
        service.authenticate_with_token(&payload.token)
    })
    .await?;
    Ok(AppResponse::ok(session))
}

/// POST /auth/logout
/// Déconnexion: révoque le jeton courant
pub async fn logout(
    session: SessionUser,
    State(service): State<Arc<AccountService>>,
) -> Result<AppResponse<()>, AppError> {
    blocking(&service, move |service| service.logout(&session.user_id)).await?;
    Ok(AppResponse::no_content())
}
