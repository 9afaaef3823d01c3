//! Admin login session and token management

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::{AuthError, CredentialStore, Verifier};
use crate::config::TOKEN_ENV;

pub const LOGGED_IN_KEY: &str = "admin-logged-in";
pub const LOGIN_TIME_KEY: &str = "admin-login-time";
pub const TOKEN_KEY: &str = "github-token";

/// Login state kept in the credential store
pub struct Session {
    store: CredentialStore,
    lifetime: Duration,
}

impl Session {
    pub fn new(store: CredentialStore, lifetime_hours: i64) -> Self {
        Self {
            store,
            lifetime: Duration::hours(lifetime_hours),
        }
    }

    /// Check the credentials and start a session
    pub fn login(
        &mut self,
        verifier: &dyn Verifier,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        if !verifier.verify(username, password)? {
            tracing::warn!("Rejected admin login for {:?}", username);
            return Err(AuthError::InvalidCredentials);
        }

        self.store.set(LOGGED_IN_KEY, "true")?;
        self.store
            .set(LOGIN_TIME_KEY, &now.timestamp_millis().to_string())?;
        tracing::info!("Admin session started");
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.store.remove(LOGGED_IN_KEY)?;
        self.store.remove(LOGIN_TIME_KEY)
    }

    /// Whether a session exists and has not expired; expired ones are cleared
    pub fn is_active(&mut self, now: DateTime<Utc>) -> Result<bool, AuthError> {
        match self.login_time() {
            Some(started) if now.signed_duration_since(started) < self.lifetime => Ok(true),
            Some(_) => {
                tracing::info!("Admin session expired");
                self.logout()?;
                Ok(false)
            }
            None => Ok(false),
        }
    }

    /// Fail unless a session is active
    pub fn require(&mut self, now: DateTime<Utc>) -> Result<(), AuthError> {
        if self.is_active(now)? {
            Ok(())
        } else {
            Err(AuthError::NotLoggedIn)
        }
    }

    fn login_time(&self) -> Option<DateTime<Utc>> {
        if self.store.get(LOGGED_IN_KEY) != Some("true") {
            return None;
        }
        let millis = self.store.get(LOGIN_TIME_KEY)?.parse::<i64>().ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }

    /// GitHub token: the environment first, then the stored one
    pub fn token(&self) -> Option<String> {
        std::env::var(TOKEN_ENV)
            .ok()
            .or_else(|| self.store.get(TOKEN_KEY).map(str::to_string))
            .filter(|t| !t.trim().is_empty())
    }

    pub fn set_token(&mut self, token: &str) -> Result<(), AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return self.clear_token();
        }
        self.store.set(TOKEN_KEY, token)
    }

    pub fn clear_token(&mut self) -> Result<(), AuthError> {
        self.store.remove(TOKEN_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixed(bool);

    impl Verifier for Fixed {
        fn verify(&self, _username: &str, _password: &str) -> Result<bool, AuthError> {
            Ok(self.0)
        }
    }

    fn session(tmp: &TempDir) -> Session {
        let store = CredentialStore::open(tmp.path().join("credentials.json")).unwrap();
        Session::new(store, 24)
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_login_then_expire() {
        let tmp = TempDir::new().unwrap();
        let mut session = session(&tmp);

        assert!(!session.is_active(noon()).unwrap());
        session.login(&Fixed(true), "admin", "pw", noon()).unwrap();
        assert!(session.is_active(noon() + Duration::hours(23)).unwrap());
        assert!(!session.is_active(noon() + Duration::hours(24)).unwrap());

        // Expired sessions are cleared, not just reported
        assert!(!session.is_active(noon()).unwrap());
    }

    #[test]
    fn test_rejected_login_leaves_no_session() {
        let tmp = TempDir::new().unwrap();
        let mut session = session(&tmp);

        let err = session.login(&Fixed(false), "admin", "pw", noon()).unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(matches!(session.require(noon()), Err(AuthError::NotLoggedIn)));
    }

    #[test]
    fn test_logout() {
        let tmp = TempDir::new().unwrap();
        let mut session = session(&tmp);
        session.login(&Fixed(true), "admin", "pw", noon()).unwrap();
        session.logout().unwrap();
        assert!(!session.is_active(noon()).unwrap());
    }

    #[test]
    fn test_session_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        session(&tmp).login(&Fixed(true), "admin", "pw", noon()).unwrap();
        assert!(session(&tmp).is_active(noon()).unwrap());
    }

    #[test]
    fn test_token_storage() {
        let tmp = TempDir::new().unwrap();
        let mut session = session(&tmp);

        session.set_token("  ghp_example  ").unwrap();
        assert_eq!(session.store.get(TOKEN_KEY), Some("ghp_example"));

        session.set_token("").unwrap();
        assert_eq!(session.store.get(TOKEN_KEY), None);
    }
}
