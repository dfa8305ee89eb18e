// src/auth/services.rs

use std::sync::Arc;

use account_store_api::{
    RegisterRequest, SessionResponse, UpdateProfileRequest, UpdateUserRequest, UserResponse,
};
use chrono::Utc;

use super::password::{MAX_PASSWORD_BYTES, PasswordManager};
use super::token::{TOKEN_LENGTH, generate_token, generate_user_id};
use crate::db::error::RepositoryError;
use crate::db::models::credential::UserAuthentication;
use crate::db::models::user::{NewUser, UpdateUser, User};
use crate::db::store::AccountStore;
use crate::error::AppError;

pub const LOGIN_MAX_LENGTH: usize = 32;
pub const PASSWORD_MIN_LENGTH: usize = 5;
pub const PASSWORD_MAX_LENGTH: usize = 100;
pub const EMAIL_MAX_LENGTH: usize = 255;

/// Registre des comptes: inscription, connexion par mot de passe ou par
/// jeton, et gestion du profil, au-dessus des trois stores.
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    passwords: PasswordManager,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, passwords: PasswordManager) -> Self {
        Self { store, passwords }
    }

    /// Le login est-il encore libre ?
    pub fn is_login_free(&self, login: &str) -> Result<bool, AppError> {
        Self::validate_login(login)?;

        match self.store.find_by_login(login) {
            Ok(_) => Ok(false),
            Err(err) if err.is_not_found() => Ok(true),
            Err(err) => Err(err.into()),
        }
    }

    /// Inscription d'un nouvel utilisateur
    pub fn register(&self, request: RegisterRequest) -> Result<SessionResponse, AppError> {
        Self::validate_login(&request.login)?;
        Self::validate_password(&request.password)?;
        if let Some(email) = &request.email {
            Self::validate_email(email)?;
        }

        if !self.is_login_free(&request.login)? {
            return Err(AppError::LoginTaken(request.login));
        }

        let salted = self.passwords.hash(&request.password)?;

        let new_user = NewUser::new(generate_user_id(), Utc::now()).with_email(request.email);
        let user = self.store.create_user(&new_user)?;

        let credentials =
            UserAuthentication::new(&user.user_id, &request.login, salted.hash, salted.salt);
        if let Err(err) = self.store.set_credentials(&credentials) {
            // Pas d'utilisateur sans identifiants
            if let Err(cleanup) = self.store.delete_user(&user.user_id) {
                tracing::warn!(user_id = %user.user_id, error = %cleanup, "Failed to remove half-registered user");
            }
            return Err(match err {
                RepositoryError::DuplicateKey(_) => AppError::LoginTaken(request.login),
                other => other.into(),
            });
        }

        tracing::info!(user_id = %user.user_id, login = %request.login, "Registered user");

        let token = if request.remember {
            Some(self.create_authentication_token(&user.user_id)?)
        } else {
            None
        };

        Ok(SessionResponse {
            user: user.into(),
            token,
        })
    }

    /// Connexion par login et mot de passe
    pub fn authenticate_with_credentials(
        &self,
        login: &str,
        password: &str,
        remember: bool,
    ) -> Result<SessionResponse, AppError> {
        let credentials = match self.store.find_by_login(login) {
            Ok(credentials) => credentials,
            Err(err) if err.is_not_found() => {
                tracing::debug!("failed login attempt (unknown login)");
                return Err(AppError::InvalidCredentials);
            }
            Err(err) => return Err(err.into()),
        };

        let valid = PasswordManager::verify(
            password,
            &credentials.password_hash,
            &credentials.password_salt,
        )
        .unwrap_or_else(|err| {
            tracing::warn!(user_id = %credentials.user_id, error = %err, "Unusable credential row");
            false
        });
        if !valid {
            tracing::debug!(user_id = %credentials.user_id, "failed login attempt (credentials)");
            return Err(AppError::InvalidCredentials);
        }

        let user = self.touch(&credentials.user_id)?;
        tracing::info!(user_id = %user.user_id, "Client authenticated with credentials");

        let token = if remember {
            Some(self.create_authentication_token(&user.user_id)?)
        } else {
            None
        };

        Ok(SessionResponse {
            user: user.into(),
            token,
        })
    }

    /// Connexion par jeton de session
    pub fn authenticate_with_token(&self, token: &str) -> Result<SessionResponse, AppError> {
        let user_id = self.validate_token(token)?;
        let user = self.touch(&user_id)?;
        tracing::info!(user_id = %user.user_id, "Client authenticated with token");

        Ok(SessionResponse {
            user: user.into(),
            token: Some(token.to_string()),
        })
    }

    /// Valide un jeton et renvoie l'identifiant de son propriétaire
    pub fn validate_token(&self, token: &str) -> Result<String, AppError> {
        if token.is_empty() || token.len() > TOKEN_LENGTH {
            return Err(AppError::InvalidToken);
        }

        match self.store.refresh_token(token, Utc::now()) {
            Ok(row) => Ok(row.user_id),
            Err(err) if err.is_not_found() => {
                tracing::debug!("failed login attempt (token)");
                Err(AppError::InvalidToken)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Émet un nouveau jeton de session; l'ancien est remplacé
    pub fn create_authentication_token(&self, user_id: &str) -> Result<String, AppError> {
        let token = generate_token();

        match self.store.issue_token(user_id, &token, Utc::now()) {
            Ok(_) => Ok(token),
            Err(RepositoryError::ForeignKeyViolation(_)) => {
                Err(AppError::not_found(format!("user {user_id}")))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Déconnexion: révoque le jeton de l'utilisateur
    pub fn logout(&self, user_id: &str) -> Result<(), AppError> {
        self.store.revoke_token(user_id)?;
        tracing::info!(user_id, "Revoked session token");
        Ok(())
    }

    /// Récupère un utilisateur par son identifiant
    pub fn get_user(&self, user_id: &str) -> Result<UserResponse, AppError> {
        Ok(self.store.find_user(user_id)?.into())
    }

    /// Mise à jour complète d'un utilisateur, réservée aux appelants de
    /// confiance (serveur de jeu). Un nouvel email n'est plus confirmé,
    /// sauf si la requête fixe elle-même `email_confirmed`.
    pub fn update_user(
        &self,
        user_id: &str,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, AppError> {
        if let Some(Some(email)) = &request.email {
            Self::validate_email(email)?;
        }

        let mut changes = UpdateUser::from(request);
        if let Some(email) = &changes.email
            && changes.email_confirmed.is_none()
            && self.store.find_user(user_id)?.email != *email
        {
            changes.email_confirmed = Some(false);
        }

        let user = self.store.update_user(user_id, &changes)?;
        Ok(user.into())
    }

    /// Mise à jour du profil par le joueur lui-même: seul l'email change
    pub fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<UserResponse, AppError> {
        self.update_user(
            user_id,
            UpdateUserRequest {
                email: request.email,
                ..Default::default()
            },
        )
    }

    /// Supprime un utilisateur et ses lignes dépendantes
    pub fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        self.store.delete_user(user_id)?;
        tracing::info!(user_id, "Deleted user");
        Ok(())
    }

    /// Change le mot de passe de l'utilisateur et révoque son jeton de session
    pub fn change_password(
        &self,
        user_id: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        Self::validate_password(new_password)?;

        let credentials = self.store.find_credentials(user_id)?;

        let valid = PasswordManager::verify(
            old_password,
            &credentials.password_hash,
            &credentials.password_salt,
        )
        .unwrap_or(false);
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let salted = self.passwords.hash(new_password)?;
        self.store.set_credentials(&UserAuthentication::new(
            user_id,
            credentials.login_user,
            salted.hash,
            salted.salt,
        ))?;
        // Les sessions ouvertes avec l'ancien mot de passe sont fermées
        self.store.revoke_token(user_id)?;

        tracing::info!(user_id, "Password changed, session token revoked");
        Ok(())
    }

    fn touch(&self, user_id: &str) -> Result<User, AppError> {
        Ok(self
            .store
            .update_user(user_id, &UpdateUser::touch(Utc::now()))?)
    }

    // === Validation ===

    fn validate_login(login: &str) -> Result<(), AppError> {
        if login.is_empty() || login.len() > LOGIN_MAX_LENGTH {
            return Err(AppError::validation(format!(
                "Login must be 1 to {LOGIN_MAX_LENGTH} characters"
            )));
        }
        if !login
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            return Err(AppError::validation(
                "Login may only contain letters, digits, '_', '.' and '-'",
            ));
        }
        Ok(())
    }

    fn validate_password(password: &str) -> Result<(), AppError> {
        let length = password.chars().count();
        if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&length) {
            return Err(AppError::validation(format!(
                "Password must be {PASSWORD_MIN_LENGTH} to {PASSWORD_MAX_LENGTH} characters"
            )));
        }
        // bcrypt ne lit que les 72 premiers octets
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::validation(format!(
                "Password must not exceed {MAX_PASSWORD_BYTES} bytes"
            )));
        }
        Ok(())
    }

    fn validate_email(email: &str) -> Result<(), AppError> {
        let well_formed = email.len() <= EMAIL_MAX_LENGTH
            && !email.chars().any(char::is_whitespace)
            && email
                .split_once('@')
                .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));

        if well_formed {
            Ok(())
        } else {
            Err(AppError::validation("Invalid email format"))
        }
    }
}
