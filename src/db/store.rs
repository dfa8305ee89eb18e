//! Narrow repository interface over the three account tables.
//!
//! Each operation is one atomic unit against the backing store. Callers pass
//! the current time in so the store never reads a clock on its own.

use chrono::{DateTime, Utc};

use super::error::RepositoryError;
use super::models::credential::UserAuthentication;
use super::models::token::UserAuthenticationToken;
use super::models::user::{NewUser, UpdateUser, User};

pub trait UserStore {
    /// Fails with `DuplicateKey` if the identifier already exists.
    fn create_user(&self, new_user: &NewUser) -> Result<User, RepositoryError>;

    fn find_user(&self, user_id: &str) -> Result<User, RepositoryError>;

    /// An empty changeset returns the current row.
    fn update_user(&self, user_id: &str, changes: &UpdateUser) -> Result<User, RepositoryError>;

    /// Removes the user together with its credential and token rows.
    fn delete_user(&self, user_id: &str) -> Result<(), RepositoryError>;
}

pub trait CredentialStore {
    /// Upsert keyed by `user_id`.
    ///
    /// `ForeignKeyViolation` if the user does not exist, `DuplicateKey` if the
    /// login name belongs to someone else.
    fn set_credentials(
        &self,
        credentials: &UserAuthentication,
    ) -> Result<UserAuthentication, RepositoryError>;

    fn find_by_login(&self, login_user: &str) -> Result<UserAuthentication, RepositoryError>;

    fn find_credentials(&self, user_id: &str) -> Result<UserAuthentication, RepositoryError>;
}

pub trait TokenStore {
    /// Replaces any previous token of the user; both timestamps are set to `now`.
    fn issue_token(
        &self,
        user_id: &str,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<UserAuthenticationToken, RepositoryError>;

    /// Looks the token up and bumps `timestamp_last_used`.
    fn refresh_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<UserAuthenticationToken, RepositoryError>;

    /// Deletes the user's token. No token is not an error.
    fn revoke_token(&self, user_id: &str) -> Result<(), RepositoryError>;
}

/// Everything the account service needs from a backend.
pub trait AccountStore: UserStore + CredentialStore + TokenStore + Send + Sync {}

impl<T> AccountStore for T where T: UserStore + CredentialStore + TokenStore + Send + Sync {}
