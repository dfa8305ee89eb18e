use diesel::pg::upsert::excluded;
use diesel::prelude::*;

use super::{PgStore, as_pg};
use crate::db::error::RepositoryError;
use crate::db::models::credential::UserAuthentication;
use crate::db::schema::user_authentication;
use crate::db::store::CredentialStore;

impl CredentialStore for PgStore {
    /// Crée ou remplace login, hash et sel d'un utilisateur
    fn set_credentials(
        &self,
        credentials: &UserAuthentication,
    ) -> Result<UserAuthentication, RepositoryError> {
        let mut conn = self.conn()?;

        diesel::insert_into(user_authentication::table)
            .values(credentials)
            .on_conflict(user_authentication::user_id)
            .do_update()
            .set((
                user_authentication::login_user.eq(excluded(user_authentication::login_user)),
                user_authentication::password_hash
                    .eq(excluded(user_authentication::password_hash)),
                user_authentication::password_salt
                    .eq(excluded(user_authentication::password_salt)),
            ))
            .returning(UserAuthentication::as_returning())
            .get_result(as_pg(&mut conn))
            .map_err(|err| match RepositoryError::from(err) {
                RepositoryError::ForeignKeyViolation(_) => {
                    RepositoryError::foreign_key(format!("user {}", credentials.user_id))
                }
                RepositoryError::DuplicateKey(_) => {
                    RepositoryError::duplicate_key(format!("login {}", credentials.login_user))
                }
                other => other,
            })
    }

    /// Recherche par nom de login
    fn find_by_login(&self, login_user: &str) -> Result<UserAuthentication, RepositoryError> {
        let mut conn = self.conn()?;

        user_authentication::table
            .filter(user_authentication::login_user.eq(login_user))
            .select(UserAuthentication::as_select())
            .first(as_pg(&mut conn))
            .optional()?
            .ok_or_else(|| RepositoryError::not_found(format!("login {login_user}")))
    }

    fn find_credentials(&self, user_id: &str) -> Result<UserAuthentication, RepositoryError> {
        let mut conn = self.conn()?;

        user_authentication::table
            .find(user_id)
            .select(UserAuthentication::as_select())
            .first(as_pg(&mut conn))
            .optional()?
            .ok_or_else(|| RepositoryError::not_found(format!("credentials of {user_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::user::NewUser;
    use crate::db::repositories::test_support::{pg_store, unique_id};
    use crate::db::store::UserStore;
    use chrono::Utc;

    #[test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    fn lookup_by_login_returns_owner() {
        let store = pg_store();
        let user_id = unique_id("u1");
        let login = unique_id("alice");
        store
            .create_user(&NewUser::new(user_id.clone(), Utc::now()))
            .expect("create user");

        store
            .set_credentials(&UserAuthentication::new(user_id.clone(), login.clone(), "h", "s"))
            .expect("set credentials");

        let found = store.find_by_login(&login).expect("lookup");
        assert_eq!(found.user_id, user_id);
        assert_eq!(found.password_hash, "h");
        assert_eq!(found.password_salt, "s");

        let _ = store.delete_user(&user_id);
    }

    #[test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    fn credentials_for_unknown_user_violate_foreign_key() {
        let store = pg_store();

        let result = store.set_credentials(&UserAuthentication::new(
            unique_id("ghost"),
            unique_id("nobody"),
            "h",
            "s",
        ));

        assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
    }

    #[test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    fn set_credentials_replaces_previous_row() {
        let store = pg_store();
        let user_id = unique_id("rot");
        store
            .create_user(&NewUser::new(user_id.clone(), Utc::now()))
            .expect("create user");
        let old_login = unique_id("old");
        let new_login = unique_id("new");

        store
            .set_credentials(&UserAuthentication::new(user_id.clone(), old_login.clone(), "h1", "s1"))
            .expect("first");
        store
            .set_credentials(&UserAuthentication::new(user_id.clone(), new_login.clone(), "h2", "s2"))
            .expect("second");

        assert!(store.find_by_login(&old_login).unwrap_err().is_not_found());
        let current = store.find_credentials(&user_id).expect("current");
        assert_eq!(current.login_user, new_login);
        assert_eq!(current.password_hash, "h2");

        let _ = store.delete_user(&user_id);
    }

    #[test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    fn login_name_is_unique() {
        let store = pg_store();
        let first = unique_id("a");
        let second = unique_id("b");
        let login = unique_id("shared");
        for user_id in [&first, &second] {
            store
                .create_user(&NewUser::new(user_id.clone(), Utc::now()))
                .expect("create user");
        }

        store
            .set_credentials(&UserAuthentication::new(first.clone(), login.clone(), "h", "s"))
            .expect("first owner");
        let result =
            store.set_credentials(&UserAuthentication::new(second.clone(), login.clone(), "h", "s"));

        assert!(matches!(result, Err(RepositoryError::DuplicateKey(_))));

        let _ = store.delete_user(&first);
        let _ = store.delete_user(&second);
    }
}
