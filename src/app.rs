// src/app.rs

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::auth::services::AccountService;
use crate::handlers::auth::{login, login_available, logout, register, token_login};
use crate::handlers::health::health;
use crate::handlers::users::{
    change_password, delete_user, get_current_user, get_user_by_id, update_user,
};

/// Routes d'authentification
pub fn auth_routes() -> Router<Arc<AccountService>> {
    Router::new()
        .route("/login-available", get(login_available))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/token", post(token_login))
        // Protégée par le jeton de session (SessionUser)
        .route("/logout", post(logout))
}

/// Routes utilisateur, toutes protégées
pub fn user_routes() -> Router<Arc<AccountService>> {
    Router::new()
        .route("/me", get(get_current_user))
        .route(
            "/{id}",
            get(get_user_by_id).patch(update_user).delete(delete_user),
        )
        .route("/{id}/change-password", post(change_password))
}

/// Construit l'application complète
pub fn build_router(service: Arc<AccountService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .with_state(service)
        // Middleware global de tracing
        .layer(TraceLayer::new_for_http())
}
