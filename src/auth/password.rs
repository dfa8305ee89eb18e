use bcrypt::{DEFAULT_COST, Version, hash_with_salt};
use rand::{Rng, distr::Alphanumeric};

/// Longueur du sel stocké dans `password_salt`
pub const SALT_LENGTH: usize = 16;

/// bcrypt ignore tout ce qui dépasse 72 octets
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(bcrypt::BcryptError),
    #[error("Password verification failed: {0}")]
    VerificationFailed(bcrypt::BcryptError),
    #[error("Stored salt must be {SALT_LENGTH} bytes, got {0}")]
    MalformedSalt(usize),
    #[error("Stored hash is not a bcrypt hash")]
    MalformedHash,
    #[error("Password is {0} bytes, bcrypt keeps only {MAX_PASSWORD_BYTES}")]
    TooLong(usize),
}

/// A hash/salt pair as stored in `user_authentication`.
#[derive(Clone, PartialEq, Eq)]
pub struct SaltedHash {
    pub hash: String,
    pub salt: String,
}

impl std::fmt::Debug for SaltedHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SaltedHash(..)")
    }
}

/// Hachage bcrypt avec un sel explicite de 16 caractères.
///
/// The 16 ASCII bytes of the salt are fed to bcrypt as its raw salt, so the
/// `$2b$` output (60 chars) and the salt column both fit the schema.
#[derive(Debug, Clone, Copy)]
pub struct PasswordManager {
    cost: u32,
}

impl Default for PasswordManager {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordManager {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn generate_salt() -> String {
        rand::rng()
            .sample_iter(Alphanumeric)
            .take(SALT_LENGTH)
            .map(char::from)
            .collect()
    }

    pub fn hash(&self, password: &str) -> Result<SaltedHash, PasswordError> {
        let salt = Self::generate_salt();
        let hash = self.hash_with(password, &salt)?;
        Ok(SaltedHash { hash, salt })
    }

    pub fn hash_with(&self, password: &str, salt: &str) -> Result<String, PasswordError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong(password.len()));
        }
        let raw_salt = Self::raw_salt(salt)?;
        hash_with_salt(password, self.cost, raw_salt)
            .map(|parts| parts.format_for_version(Version::TwoB))
            .map_err(PasswordError::HashingFailed)
    }

    /// Vérifie un mot de passe contre la paire hash/sel stockée.
    ///
    /// The hash is recomputed from the salt column at the cost recorded in
    /// the stored hash, so a salt that does not belong to the hash fails.
    pub fn verify(password: &str, hash: &str, salt: &str) -> Result<bool, PasswordError> {
        let raw_salt = Self::raw_salt(salt)?;
        if password.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }

        // $2b$CC$<salt><hash>
        let cost = hash
            .get(4..6)
            .and_then(|cost| cost.parse::<u32>().ok())
            .ok_or(PasswordError::MalformedHash)?;
        if !hash.starts_with("$2") {
            return Err(PasswordError::MalformedHash);
        }
        let stored = hash.get(7..).ok_or(PasswordError::MalformedHash)?;

        let computed = hash_with_salt(password, cost, raw_salt)
            .map(|parts| parts.format_for_version(Version::TwoB))
            .map_err(PasswordError::VerificationFailed)?;

        Ok(constant_time_eq(computed.get(7..).unwrap_or_default(), stored))
    }

    fn raw_salt(salt: &str) -> Result<[u8; SALT_LENGTH], PasswordError> {
        salt.as_bytes()
            .try_into()
            .map_err(|_| PasswordError::MalformedSalt(salt.len()))
    }
}

fn constant_time_eq(left: &str, right: &str) -> bool {
    left.len() == right.len()
        && left
            .bytes()
            .zip(right.bytes())
            .fold(0u8, |acc, (l, r)| acc | (l ^ r))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt's minimum cost keeps the tests fast
    fn manager() -> PasswordManager {
        PasswordManager::new(4)
    }

    #[test]
    fn verify_returns_true_when_password_matches() {
        let password = "secure_password_@123P";
        let salted = manager().hash(password).expect("Hashing failed");

        assert!(
            PasswordManager::verify(password, &salted.hash, &salted.salt)
                .expect("Verification failed")
        );
    }

    #[test]
    fn verify_returns_false_when_password_does_not_match() {
        let salted = manager().hash("secure_password_@123P").expect("Hashing failed");

        assert!(
            !PasswordManager::verify("wrong_password_@123", &salted.hash, &salted.salt)
                .expect("Verification failed")
        );
    }

    #[test]
    fn output_fits_the_credential_columns() {
        let salted = manager().hash("fits").expect("Hashing failed");

        assert_eq!(salted.salt.len(), SALT_LENGTH);
        assert!(salted.hash.len() <= 64, "hash is {} chars", salted.hash.len());
        assert!(salted.hash.starts_with("$2b$04$"));
    }

    #[test]
    fn same_salt_gives_same_hash() {
        let salt = PasswordManager::generate_salt();

        let first = manager().hash_with("password", &salt).unwrap();
        let second = manager().hash_with("password", &salt).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn fresh_salts_give_different_hashes() {
        let first = manager().hash("password").unwrap();
        let second = manager().hash("password").unwrap();

        assert_ne!(first.salt, second.salt);
        assert_ne!(first.hash, second.hash);
    }

    #[test]
    fn malformed_salt_is_rejected() {
        let salted = manager().hash("password").unwrap();

        let result = PasswordManager::verify("password", &salted.hash, "s");
        assert!(matches!(result, Err(PasswordError::MalformedSalt(1))));
    }

    #[test]
    fn verify_rejects_a_salt_that_does_not_belong_to_the_hash() {
        let salted = manager().hash("password").unwrap();
        let other_salt = PasswordManager::generate_salt();

        let result = PasswordManager::verify("password", &salted.hash, &other_salt);
        assert!(!result.expect("Verification failed"));
    }

    #[test]
    fn verify_uses_the_cost_stored_in_the_hash() {
        let salted = PasswordManager::new(5).hash("password").unwrap();

        assert!(salted.hash.starts_with("$2b$05$"));
        assert!(PasswordManager::verify("password", &salted.hash, &salted.salt).unwrap());
    }

    #[test]
    fn malformed_hash_is_rejected() {
        let salt = PasswordManager::generate_salt();

        let result = PasswordManager::verify("password", "not-a-hash", &salt);
        assert!(matches!(result, Err(PasswordError::MalformedHash)));
    }

    #[test]
    fn passwords_beyond_bcrypt_limit_are_refused() {
        let long = "a".repeat(MAX_PASSWORD_BYTES + 1);

        let result = manager().hash(&long);
        assert!(matches!(result, Err(PasswordError::TooLong(73))));
    }

    #[test]
    fn passwords_sharing_a_72_byte_prefix_do_not_match() {
        let prefix = "a".repeat(MAX_PASSWORD_BYTES - 8);
        let salted = manager().hash(&format!("{prefix}REALTAIL")).unwrap();

        let same_prefix = format!("{prefix}othertai");
        let longer = format!("{prefix}REALTAIL-and-more");

        assert!(!PasswordManager::verify(&same_prefix, &salted.hash, &salted.salt).unwrap());
        assert!(!PasswordManager::verify(&longer, &salted.hash, &salted.salt).unwrap());
    }

    #[test]
    fn verify_fails_when_case_differs() {
        let salted = manager().hash("MyPassword").unwrap();

        let result = PasswordManager::verify("mypassword", &salted.hash, &salted.salt);

        assert!(result.is_ok());
        assert!(!result.unwrap()); // Should be false, not error
    }
}
