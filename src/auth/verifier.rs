//! Admin credential verification against an externally supplied hash

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::AuthError;

/// Environment variable naming the admin user
pub const ADMIN_USER_ENV: &str = "FOLIO_ADMIN_USER";
/// Environment variable holding the admin password as an Argon2 PHC string
pub const ADMIN_HASH_ENV: &str = "FOLIO_ADMIN_PASSWORD_HASH";

/// Decides whether a username/password pair may administer the blog
pub trait Verifier {
    fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError>;
}

/// Checks the password against an Argon2 hash kept outside the code
pub struct Argon2Verifier {
    username: String,
    hash: String,
    argon2: Argon2<'static>,
}

impl Argon2Verifier {
    pub fn new(username: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            hash: hash.into(),
            argon2: Argon2::default(),
        }
    }

    /// Read the admin identity from the environment
    pub fn from_env() -> Result<Self, AuthError> {
        let username = std::env::var(ADMIN_USER_ENV)
            .map_err(|_| AuthError::NotConfigured(ADMIN_USER_ENV))?;
        let hash = std::env::var(ADMIN_HASH_ENV)
            .map_err(|_| AuthError::NotConfigured(ADMIN_HASH_ENV))?;
        Ok(Self::new(username, hash))
    }
}

impl Verifier for Argon2Verifier {
    fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(&self.hash).map_err(|e| AuthError::Hashing(e.to_string()))?;
        let password_ok = self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok();
        Ok(password_ok && username == self.username)
    }
}

/// Hash a password into the PHC string expected in [`ADMIN_HASH_ENV`]
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        let verifier = Argon2Verifier::new("admin", hash);

        assert!(verifier.verify("admin", "correct horse").unwrap());
        assert!(!verifier.verify("admin", "wrong").unwrap());
        assert!(!verifier.verify("someone", "correct horse").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let verifier = Argon2Verifier::new("admin", "plain-text-password");
        assert!(matches!(
            verifier.verify("admin", "plain-text-password"),
            Err(AuthError::Hashing(_))
        ));
    }
}
