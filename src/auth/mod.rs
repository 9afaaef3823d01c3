//! Admin authentication: credential storage, login session, password checks

mod credentials;
mod session;
mod verifier;

use thiserror::Error;

pub use credentials::CredentialStore;
pub use session::{Session, LOGGED_IN_KEY, LOGIN_TIME_KEY, TOKEN_KEY};
pub use verifier::{hash_password, Argon2Verifier, Verifier, ADMIN_HASH_ENV, ADMIN_USER_ENV};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Not logged in: run `folio-rs login` first")]
    NotLoggedIn,

    #[error("{0} is not set")]
    NotConfigured(&'static str),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Credential store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Credential store is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}
