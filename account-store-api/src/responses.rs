use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub user_id: String,
    pub email: Option<String>,
    pub email_confirmed: bool,
    pub timestamp_register: DateTime<Utc>,
    pub timestamp_active: DateTime<Utc>,
    pub crystals: i32,
    pub double_crystals: Option<DateTime<Utc>>,
    pub experience: i32,
    pub premium: Option<DateTime<Utc>>,
}

/// Result of a successful registration or login.
///
/// `token` is only present when a session token was issued
/// (`remember` on register/login, always on token login).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionResponse {
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginAvailabilityResponse {
    pub login: String,
    pub available: bool,
}
