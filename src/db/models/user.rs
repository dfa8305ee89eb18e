use account_store_api::{UpdateUserRequest, UserResponse};
use chrono::{DateTime, Utc};
use diesel::{AsChangeset, Insertable, Queryable, Selectable};

use crate::db::schema::user;

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = user)]
pub struct NewUser {
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

impl NewUser {
    /// Nouvel utilisateur sans cristaux ni expérience, actif depuis son inscription
    pub fn new(user_id: impl Into<String>, registered_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            email_confirmed: false,
            timestamp_register: registered_at,
            timestamp_active: registered_at,
            crystals: 0,
            double_crystals: None,
            experience: 0,
            premium: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    #[must_use]
    pub fn with_crystals(mut self, crystals: i32) -> Self {
        self.crystals = crystals;
        self
    }

    #[must_use]
    pub fn with_experience(mut self, experience: i32) -> Self {
        self.experience = experience;
        self
    }
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = user)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
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

impl From<NewUser> for User {
    fn from(new_user: NewUser) -> Self {
        Self {
            user_id: new_user.user_id,
            email: new_user.email,
            email_confirmed: new_user.email_confirmed,
            timestamp_register: new_user.timestamp_register,
            timestamp_active: new_user.timestamp_active,
            crystals: new_user.crystals,
            double_crystals: new_user.double_crystals,
            experience: new_user.experience,
            premium: new_user.premium,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            user_id: user.user_id,
            email: user.email,
            email_confirmed: user.email_confirmed,
            timestamp_register: user.timestamp_register,
            timestamp_active: user.timestamp_active,
            crystals: user.crystals,
            double_crystals: user.double_crystals,
            experience: user.experience,
            premium: user.premium,
        }
    }
}

/// Champs modifiables d'un utilisateur.
///
/// `None` laisse la colonne intacte; pour les colonnes nullables,
/// `Some(None)` remet la valeur à NULL.
#[derive(AsChangeset, Debug, Clone, Default, PartialEq, Eq)]
#[diesel(table_name = user)]
pub struct UpdateUser {
    pub email: Option<Option<String>>,
    pub email_confirmed: Option<bool>,
    pub timestamp_active: Option<DateTime<Utc>>,
    pub crystals: Option<i32>,
    pub double_crystals: Option<Option<DateTime<Utc>>>,
    pub experience: Option<i32>,
    pub premium: Option<Option<DateTime<Utc>>>,
}

impl UpdateUser {
    pub fn touch(at: DateTime<Utc>) -> Self {
        Self {
            timestamp_active: Some(at),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applique les changements sur une ligne déjà chargée
    pub fn apply_to(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
        if let Some(email_confirmed) = self.email_confirmed {
            user.email_confirmed = email_confirmed;
        }
        if let Some(timestamp_active) = self.timestamp_active {
            user.timestamp_active = timestamp_active;
        }
        if let Some(crystals) = self.crystals {
            user.crystals = crystals;
        }
        if let Some(double_crystals) = self.double_crystals {
            user.double_crystals = double_crystals;
        }
        if let Some(experience) = self.experience {
            user.experience = experience;
        }
        if let Some(premium) = self.premium {
            user.premium = premium;
        }
    }
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            email: request.email,
            email_confirmed: request.email_confirmed,
            timestamp_active: request.timestamp_active,
            crystals: request.crystals,
            double_crystals: request.double_crystals,
            experience: request.experience,
            premium: request.premium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_user_starts_empty_and_active_at_registration() {
        let registered_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let new_user = NewUser::new("u1", registered_at);

        assert_eq!(new_user.crystals, 0);
        assert_eq!(new_user.experience, 0);
        assert_eq!(new_user.timestamp_active, registered_at);
        assert!(!new_user.email_confirmed);
    }

    #[test]
    fn apply_to_clears_nullable_columns() {
        let registered_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut user = User::from(
            NewUser::new("u1", registered_at).with_email(Some("a@example.com".to_string())),
        );
        user.premium = Some(registered_at);

        let changes = UpdateUser {
            email: Some(None),
            premium: Some(None),
            crystals: Some(25),
            ..Default::default()
        };
        changes.apply_to(&mut user);

        assert_eq!(user.email, None);
        assert_eq!(user.premium, None);
        assert_eq!(user.crystals, 25);
        assert_eq!(user.timestamp_register, registered_at);
    }

    #[test]
    fn default_changeset_is_empty() {
        assert!(UpdateUser::default().is_empty());
        assert!(!UpdateUser::touch(Utc::now()).is_empty());
    }
}
