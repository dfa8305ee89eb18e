use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// -------- REQUEST DTOs --------
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    pub login: String,
    pub password: String, // Plain text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issue a session token right away
    #[serde(default)]
    pub remember: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub login: String,
    pub password: String, // Plain text
    #[serde(default)]
    pub remember: bool,
}

/// Login with a previously issued session token
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TokenLoginRequest {
    pub token: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginAvailabilityQuery {
    pub login: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Self-service profile update (`PATCH /users/{id}`).
///
/// Only the email is player-editable; balances, experience, premium and the
/// confirmation flag are rejected as unknown fields. `null` clears the email.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<Option<String>>,
}

/// Partial update of a user row, for trusted callers of the service.
///
/// A missing field is left untouched. For the nullable columns (`email`,
/// `double_crystals`, `premium`) an explicit `null` clears the value.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserRequest {
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_confirmed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_active: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crystals: Option<i32>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub double_crystals: Option<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<i32>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub premium: Option<Option<DateTime<Utc>>>,
}

// Present-but-null must become Some(None), not None.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
