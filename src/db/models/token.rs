use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable, Selectable};

use crate::db::schema::user_authentication_token;

/// Ligne `user_authentication_token`: un seul jeton de session par utilisateur
#[derive(Queryable, Selectable, Insertable, Clone, PartialEq, Eq)]
#[diesel(table_name = user_authentication_token)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserAuthenticationToken {
    pub user_id: String,
    pub timestamp_created: DateTime<Utc>,
    pub timestamp_last_used: DateTime<Utc>,
    pub token: String,
}

impl UserAuthenticationToken {
    pub fn issued(user_id: impl Into<String>, token: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            timestamp_created: now,
            timestamp_last_used: now,
            token: token.into(),
        }
    }

    /// Horodatage de dernière utilisation après un usage à `now`.
    ///
    /// Never moves backwards and never precedes `timestamp_created`,
    /// even if the caller's clock is behind the stored values.
    pub fn last_used_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.max(self.timestamp_last_used).max(self.timestamp_created)
    }
}

impl std::fmt::Debug for UserAuthenticationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAuthenticationToken")
            .field("user_id", &self.user_id)
            .field("timestamp_created", &self.timestamp_created)
            .field("timestamp_last_used", &self.timestamp_last_used)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn last_used_never_precedes_creation() {
        let now = Utc::now();
        let token = UserAuthenticationToken::issued("u1", "t", now);

        assert_eq!(token.last_used_after(now - Duration::hours(3)), now);
    }

    #[test]
    fn last_used_never_moves_backwards() {
        let created = Utc::now();
        let mut token = UserAuthenticationToken::issued("u1", "t", created);
        token.timestamp_last_used = created + Duration::minutes(10);

        assert_eq!(
            token.last_used_after(created + Duration::minutes(5)),
            created + Duration::minutes(10)
        );
        assert_eq!(
            token.last_used_after(created + Duration::minutes(20)),
            created + Duration::minutes(20)
        );
    }
}
