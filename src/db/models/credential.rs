use diesel::{Insertable, Queryable, Selectable};

use crate::db::schema::user_authentication;

/// Ligne `user_authentication`: login, hash et sel vont toujours ensemble.
#[derive(Queryable, Selectable, Insertable, Clone, PartialEq, Eq)]
#[diesel(table_name = user_authentication)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserAuthentication {
    pub user_id: String,
    pub login_user: String,
    pub password_hash: String,
    pub password_salt: String,
}

impl UserAuthentication {
    pub fn new(
        user_id: impl Into<String>,
        login_user: impl Into<String>,
        password_hash: impl Into<String>,
        password_salt: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            login_user: login_user.into(),
            password_hash: password_hash.into(),
            password_salt: password_salt.into(),
        }
    }
}

// Hash and salt stay out of logs.
impl std::fmt::Debug for UserAuthentication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAuthentication")
            .field("user_id", &self.user_id)
            .field("login_user", &self.login_user)
            .finish_non_exhaustive()
    }
}
