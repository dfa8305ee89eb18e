use rand::{Rng, distr::Alphanumeric};

/// Longueur d'un jeton de session (colonne `token`)
pub const TOKEN_LENGTH: usize = 64;

/// Jeton de session opaque, alphanumérique
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Nouvel identifiant utilisateur: UUIDv4 sans tirets, 32 caractères
pub fn generate_user_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
