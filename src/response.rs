use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Type générique pour les réponses des handlers
///
/// ```rust,ignore
/// AppResponse::ok(user)          // 200 + JSON
/// AppResponse::created(session)  // 201 + JSON
/// AppResponse::no_content()      // 204
/// ```
pub struct AppResponse<T> {
    status: StatusCode,
    body: Option<T>,
}

impl<T> AppResponse<T>
where
    T: Serialize,
{
    pub fn new(status: StatusCode, body: T) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    /// 200 OK avec des données
    pub fn ok(body: T) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// 201 Created avec des données
    pub fn created(body: T) -> Self {
        Self::new(StatusCode::CREATED, body)
    }
}

impl AppResponse<()> {
    /// 204 No Content
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
        }
    }
}

impl<T> IntoResponse for AppResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}

/// Résultat des handlers
pub type AppResult<T> = Result<AppResponse<T>, crate::error::AppError>;
