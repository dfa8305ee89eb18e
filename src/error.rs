// src/error.rs

use account_store_api::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::auth::password::PasswordError;
use crate::db::error::RepositoryError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    // === Erreurs Repository ===
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Duplicate(String),
    #[error("Unknown user: {0}")]
    UnknownUser(String),
    #[error("Database error: {0}")]
    DatabaseError(String),

    // === Erreurs d'Authentification ===
    #[error("Invalid login or password")]
    InvalidCredentials,
    #[error("Invalid session token")]
    InvalidToken,
    #[error("Login already taken: {0}")]
    LoginTaken(String),
    #[error("Invalid token format")]
    InvalidTokenFormat,

    // === Erreurs de Hashing ===
    #[error("Password hashing failed: {0}")]
    PasswordHashingFailed(String),

    // === Erreurs de Validation ===
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // === Erreurs métier ===
    #[error("Unauthorized: {0}")]
    UnauthorizedAction(String),

    // === Erreurs internes ===
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, internal_detail) = self.get_error_info();

        if let Some(ref detail) = internal_detail {
            tracing::error!(error_code, %status, detail, "Internal server error");
        }

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details: None,
        });

        (status, body).into_response()
    }
}

impl AppError {
    /// Informations d'erreur pour la réponse HTTP
    fn get_error_info(&self) -> (StatusCode, &'static str, String, Option<String>) {
        match self {
            // 404 Not Found
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),

            // 409 Conflict
            AppError::Duplicate(msg) => {
                (StatusCode::CONFLICT, "DUPLICATE_ENTRY", msg.clone(), None)
            }
            AppError::UnknownUser(msg) => {
                (StatusCode::CONFLICT, "UNKNOWN_USER", msg.clone(), None)
            }
            AppError::LoginTaken(login) => (
                StatusCode::CONFLICT,
                "LOGIN_TAKEN",
                format!("Login '{login}' is already taken"),
                None,
            ),

            // 401 Unauthorized
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid login or password".to_string(),
                None,
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid session token".to_string(),
                None,
            ),
            AppError::UnauthorizedAction(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
            }

            // 400 Bad Request
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone(), None)
            }
            AppError::InvalidTokenFormat => (
                StatusCode::BAD_REQUEST,
                "INVALID_TOKEN_FORMAT",
                "Token format is invalid".to_string(),
                None,
            ),

            // 500 Internal Server Error
            AppError::PasswordHashingFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "HASHING_ERROR",
                "An error occurred while processing your request".to_string(),
                Some(msg.clone()),
            ),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "An error occurred with the database".to_string(),
                Some(msg.clone()),
            ),
            AppError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
                Some(msg.clone()),
            ),
        }
    }

    // === Constructeurs helpers ===
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::InternalServerError(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::UnauthorizedAction(msg.into())
    }

    /// Code de statut HTTP
    pub fn status_code(&self) -> StatusCode {
        self.get_error_info().0
    }
}

// === Conversions automatiques depuis d'autres types d'erreurs ===

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => AppError::NotFound(msg),
            RepositoryError::DuplicateKey(msg) => AppError::Duplicate(msg),
            RepositoryError::ForeignKeyViolation(msg) => AppError::UnknownUser(msg),
            RepositoryError::PoolError(msg) | RepositoryError::DatabaseError(msg) => {
                AppError::DatabaseError(msg)
            }
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::PasswordHashingFailed(err.to_string())
    }
}

// Depuis axum::extract::rejection::JsonRejection
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::invalid_input(format!("Invalid JSON: {err}"))
    }
}

// Tâche bloquante annulée ou paniquée
impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::internal(format!("Blocking task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_displays_correct_message() {
        let err = AppError::not_found("User");
        assert_eq!(err.to_string(), "Not found: User");
    }

    #[test]
    fn not_found_maps_to_404_status() {
        assert_eq!(
            AppError::not_found("test").status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn repository_errors_keep_their_meaning() {
        assert_eq!(
            AppError::from(RepositoryError::duplicate_key("user_id u1")).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(RepositoryError::foreign_key("user u9")).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(RepositoryError::not_found("user u9")).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RepositoryError::PoolError("timeout".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn authentication_failures_map_to_401_status() {
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn validation_error_maps_to_400_status() {
        assert_eq!(
            AppError::validation("test").status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn internal_error_maps_to_500_status() {
        assert_eq!(
            AppError::internal("test").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn login_taken_into_response_sets_409_status() {
        let response = AppError::LoginTaken("alice".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
