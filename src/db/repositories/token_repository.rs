use chrono::{DateTime, Utc};
use diesel::pg::upsert::excluded;
use diesel::prelude::*;

use super::{PgStore, as_pg};
use crate::db::error::RepositoryError;
use crate::db::models::token::UserAuthenticationToken;
use crate::db::schema::user_authentication_token;
use crate::db::store::TokenStore;

impl TokenStore for PgStore {
    /// Émet (ou remplace) le jeton de session d'un utilisateur
    fn issue_token(
        &self,
        user_id: &str,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<UserAuthenticationToken, RepositoryError> {
        let mut conn = self.conn()?;
        let row = UserAuthenticationToken::issued(user_id, token, now);

        diesel::insert_into(user_authentication_token::table)
            .values(&row)
            .on_conflict(user_authentication_token::user_id)
            .do_update()
            .set((
                user_authentication_token::timestamp_created
                    .eq(excluded(user_authentication_token::timestamp_created)),
                user_authentication_token::timestamp_last_used
                    .eq(excluded(user_authentication_token::timestamp_last_used)),
                user_authentication_token::token.eq(excluded(user_authentication_token::token)),
            ))
            .returning(UserAuthenticationToken::as_returning())
            .get_result(as_pg(&mut conn))
            .map_err(|err| match RepositoryError::from(err) {
                RepositoryError::ForeignKeyViolation(_) => {
                    RepositoryError::foreign_key(format!("user {user_id}"))
                }
                other => other,
            })
    }

    /// Valide un jeton et met à jour sa date de dernière utilisation
    fn refresh_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<UserAuthenticationToken, RepositoryError> {
        let mut conn = self.conn()?;

        as_pg(&mut conn).transaction::<_, RepositoryError, _>(|conn| {
            let current = user_authentication_token::table
                .filter(user_authentication_token::token.eq(token))
                .select(UserAuthenticationToken::as_select())
                .for_update()
                .first(conn)
                .optional()?
                .ok_or_else(|| RepositoryError::not_found("session token"))?;

            diesel::update(user_authentication_token::table.find(current.user_id.as_str()))
                .set(
                    user_authentication_token::timestamp_last_used
                        .eq(current.last_used_after(now)),
                )
                .returning(UserAuthenticationToken::as_returning())
                .get_result(conn)
                .map_err(Into::into)
        })
    }

    fn revoke_token(&self, user_id: &str) -> Result<(), RepositoryError> {
        let mut conn = self.conn()?;

        diesel::delete(user_authentication_token::table.find(user_id))
            .execute(as_pg(&mut conn))?;

        Ok(())
    }
}
