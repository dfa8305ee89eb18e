use diesel::prelude::*;

use super::{PgStore, as_pg};
use crate::db::error::RepositoryError;
use crate::db::models::user::{NewUser, UpdateUser, User};
use crate::db::schema::user;
use crate::db::store::UserStore;

impl UserStore for PgStore {
    /// Créer un nouvel utilisateur
    fn create_user(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        let mut conn = self.conn()?;

        diesel::insert_into(user::table)
            .values(new_user)
            .returning(User::as_returning())
            .get_result(as_pg(&mut conn))
            .map_err(|err| match RepositoryError::from(err) {
                RepositoryError::DuplicateKey(_) => {
                    RepositoryError::duplicate_key(format!("user_id {}", new_user.user_id))
                }
                other => other,
            })
    }

    /// Trouver un utilisateur par identifiant
    fn find_user(&self, user_id: &str) -> Result<User, RepositoryError> {
        let mut conn = self.conn()?;

        user::table
            .find(user_id)
            .select(User::as_select())
            .first(as_pg(&mut conn))
            .optional()?
            .ok_or_else(|| RepositoryError::not_found(format!("user {user_id}")))
    }

    /// Mettre à jour les champs modifiables
    fn update_user(&self, user_id: &str, changes: &UpdateUser) -> Result<User, RepositoryError> {
        // diesel refuses an empty SET clause
        if changes.is_empty() {
            return self.find_user(user_id);
        }

        let mut conn = self.conn()?;

        diesel::update(user::table.find(user_id))
            .set(changes)
            .returning(User::as_returning())
            .get_result(as_pg(&mut conn))
            .optional()?
            .ok_or_else(|| RepositoryError::not_found(format!("user {user_id}")))
    }

    /// Supprimer un utilisateur (cascade sur l'authentification et le jeton)
    fn delete_user(&self, user_id: &str) -> Result<(), RepositoryError> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(user::table.find(user_id)).execute(as_pg(&mut conn))?;
        if deleted == 0 {
            return Err(RepositoryError::not_found(format!("user {user_id}")));
        }

        tracing::debug!(user_id, "Deleted user");
        Ok(())
    }
}
