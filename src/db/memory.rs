//! In-process store with the same constraint semantics as the Postgres
//! schema: primary keys, the foreign keys to `user`, unique login and token
//! values, cascading delete. Good for development and tests; all state is
//! lost when the process exits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::error::RepositoryError;
use super::models::credential::UserAuthentication;
use super::models::token::UserAuthenticationToken;
use super::models::user::{NewUser, UpdateUser, User};
use super::store::{CredentialStore, TokenStore, UserStore};

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    /// keyed by `user_id`
    credentials: HashMap<String, UserAuthentication>,
    /// keyed by `user_id`
    tokens: HashMap<String, UserAuthenticationToken>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::PoolError("memory store lock poisoned".to_string()))
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl UserStore for MemoryStore {
    fn create_user(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.lock()?;

        if tables.users.contains_key(&new_user.user_id) {
            return Err(RepositoryError::duplicate_key(format!(
                "user_id {}",
                new_user.user_id
            )));
        }

        let user = User::from(new_user.clone());
        tables.users.insert(user.user_id.clone(), user.clone());
        Ok(user)
    }

    fn find_user(&self, user_id: &str) -> Result<User, RepositoryError> {
        self.lock()?
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("user {user_id}")))
    }

    fn update_user(&self, user_id: &str, changes: &UpdateUser) -> Result<User, RepositoryError> {
        let mut tables = self.lock()?;

        let user = tables
            .users
            .get_mut(user_id)
            .ok_or_else(|| RepositoryError::not_found(format!("user {user_id}")))?;
        changes.apply_to(user);
        Ok(user.clone())
    }

    fn delete_user(&self, user_id: &str) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;

        if tables.users.remove(user_id).is_none() {
            return Err(RepositoryError::not_found(format!("user {user_id}")));
        }
        tables.credentials.remove(user_id);
        tables.tokens.remove(user_id);
        Ok(())
    }
}

impl CredentialStore for MemoryStore {
    fn set_credentials(
        &self,
        credentials: &UserAuthentication,
    ) -> Result<UserAuthentication, RepositoryError> {
        let mut tables = self.lock()?;

        if !tables.users.contains_key(&credentials.user_id) {
            return Err(RepositoryError::foreign_key(format!(
                "user {}",
                credentials.user_id
            )));
        }

        let login_taken = tables.credentials.values().any(|existing| {
            existing.login_user == credentials.login_user && existing.user_id != credentials.user_id
        });
        if login_taken {
            return Err(RepositoryError::duplicate_key(format!(
                "login {}",
                credentials.login_user
            )));
        }

        tables
            .credentials
            .insert(credentials.user_id.clone(), credentials.clone());
        Ok(credentials.clone())
    }

    fn find_by_login(&self, login_user: &str) -> Result<UserAuthentication, RepositoryError> {
        self.lock()?
            .credentials
            .values()
            .find(|credentials| credentials.login_user == login_user)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("login {login_user}")))
    }

    fn find_credentials(&self, user_id: &str) -> Result<UserAuthentication, RepositoryError> {
        self.lock()?
            .credentials
            .get(user_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("credentials of {user_id}")))
    }
}

impl TokenStore for MemoryStore {
    fn issue_token(
        &self,
        user_id: &str,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<UserAuthenticationToken, RepositoryError> {
        let mut tables = self.lock()?;

        if !tables.users.contains_key(user_id) {
            return Err(RepositoryError::foreign_key(format!("user {user_id}")));
        }
        let collides = tables
            .tokens
            .values()
            .any(|existing| existing.token == token && existing.user_id != user_id);
        if collides {
            return Err(RepositoryError::duplicate_key("session token"));
        }

        let row = UserAuthenticationToken::issued(user_id, token, now);
        tables.tokens.insert(user_id.to_string(), row.clone());
        Ok(row)
    }

    fn refresh_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<UserAuthenticationToken, RepositoryError> {
        let mut tables = self.lock()?;

        let row = tables
            .tokens
            .values_mut()
            .find(|row| row.token == token)
            .ok_or_else(|| RepositoryError::not_found("session token"))?;
        row.timestamp_last_used = row.last_used_after(now);
        Ok(row.clone())
    }

    fn revoke_token(&self, user_id: &str) -> Result<(), RepositoryError> {
        self.lock()?.tokens.remove(user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn registered_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn store_with_user(user_id: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .create_user(&NewUser::new(user_id, registered_at()))
            .expect("create user");
        store
    }

    #[test]
    fn create_then_find_round_trips() {
        let store = MemoryStore::new();
        let new_user = NewUser::new("u1", registered_at())
            .with_email(Some("u1@example.com".to_string()))
            .with_crystals(5)
            .with_experience(12);

        let created = store.create_user(&new_user).expect("create");
        let found = store.find_user("u1").expect("find");

        assert_eq!(created, found);
        assert_eq!(found.crystals, 5);
        assert_eq!(found.experience, 12);
        assert_eq!(found.email.as_deref(), Some("u1@example.com"));
    }

    #[test]
    fn duplicate_identifier_is_rejected() {
        let store = store_with_user("u1");

        let result = store.create_user(&NewUser::new("u1", Utc::now()));

        assert!(matches!(result, Err(RepositoryError::DuplicateKey(_))));
    }

    #[test]
    fn find_unknown_user_is_not_found() {
        let store = MemoryStore::new();
        assert!(store.find_user("nobody").unwrap_err().is_not_found());
    }

    #[test]
    fn update_mutates_existing_user() {
        let store = store_with_user("u1");
        let later = registered_at() + Duration::days(2);

        let updated = store
            .update_user(
                "u1",
                &UpdateUser {
                    email_confirmed: Some(true),
                    timestamp_active: Some(later),
                    double_crystals: Some(Some(later)),
                    ..Default::default()
                },
            )
            .expect("update");

        assert!(updated.email_confirmed);
        assert_eq!(updated.timestamp_active, later);
        assert_eq!(updated.double_crystals, Some(later));
        assert_eq!(store.find_user("u1").expect("find"), updated);
    }

    #[test]
    fn update_unknown_user_is_not_found() {
        let store = MemoryStore::new();
        let result = store.update_user("ghost", &UpdateUser::default());
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn credentials_for_unknown_user_violate_foreign_key() {
        let store = MemoryStore::new();

        let result = store.set_credentials(&UserAuthentication::new("ghost", "alice", "h", "s"));

        assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
    }

    #[test]
    fn lookup_by_login_returns_owner() {
        let store = store_with_user("u1");
        store
            .set_credentials(&UserAuthentication::new("u1", "alice", "h", "s"))
            .expect("set credentials");

        let found = store.find_by_login("alice").expect("lookup");

        assert_eq!(found.user_id, "u1");
        assert_eq!(found.password_hash, "h");
        assert_eq!(found.password_salt, "s");
    }

    #[test]
    fn login_name_belongs_to_one_user() {
        let store = store_with_user("u1");
        store
            .create_user(&NewUser::new("u2", registered_at()))
            .expect("create u2");
        store
            .set_credentials(&UserAuthentication::new("u1", "alice", "h", "s"))
            .expect("first owner");

        let result = store.set_credentials(&UserAuthentication::new("u2", "alice", "h", "s"));
        assert!(matches!(result, Err(RepositoryError::DuplicateKey(_))));

        // the owner may re-set its own login
        store
            .set_credentials(&UserAuthentication::new("u1", "alice", "h2", "s2"))
            .expect("same owner");
        assert_eq!(store.find_by_login("alice").expect("lookup").password_hash, "h2");
    }

    #[test]
    fn token_for_unknown_user_violates_foreign_key() {
        let store = MemoryStore::new();
        let result = store.issue_token("ghost", "token", Utc::now());
        assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
    }

    #[test]
    fn refresh_never_moves_last_used_below_creation() {
        let store = store_with_user("u1");
        let issued_at = registered_at() + Duration::hours(1);
        store.issue_token("u1", "token", issued_at).expect("issue");

        let stale = store
            .refresh_token("token", issued_at - Duration::minutes(30))
            .expect("refresh");
        assert_eq!(stale.timestamp_last_used, issued_at);

        let later = store
            .refresh_token("token", issued_at + Duration::minutes(30))
            .expect("refresh");
        assert_eq!(later.timestamp_last_used, issued_at + Duration::minutes(30));
        assert!(later.timestamp_created <= later.timestamp_last_used);
    }

    #[test]
    fn reissue_replaces_previous_token() {
        let store = store_with_user("u1");
        store.issue_token("u1", "first", Utc::now()).expect("issue");
        store.issue_token("u1", "second", Utc::now()).expect("reissue");

        assert!(store.refresh_token("first", Utc::now()).unwrap_err().is_not_found());
        assert_eq!(
            store.refresh_token("second", Utc::now()).expect("refresh").user_id,
            "u1"
        );
    }

    #[test]
    fn revoke_removes_token_and_tolerates_absence() {
        let store = store_with_user("u1");
        store.issue_token("u1", "token", Utc::now()).expect("issue");

        store.revoke_token("u1").expect("revoke");
        store.revoke_token("u1").expect("revoke twice");

        assert!(store.refresh_token("token", Utc::now()).unwrap_err().is_not_found());
    }

    #[test]
    fn delete_user_cascades_to_dependent_rows() {
        let store = store_with_user("u1");
        store
            .set_credentials(&UserAuthentication::new("u1", "alice", "h", "s"))
            .expect("set credentials");
        store.issue_token("u1", "token", Utc::now()).expect("issue");

        store.delete_user("u1").expect("delete");

        assert!(store.find_user("u1").unwrap_err().is_not_found());
        assert!(store.find_by_login("alice").unwrap_err().is_not_found());
        assert!(store.refresh_token("token", Utc::now()).unwrap_err().is_not_found());
        assert!(store.delete_user("u1").unwrap_err().is_not_found());
    }
}
