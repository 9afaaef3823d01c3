//! Admin login, logout and token commands

use anyhow::Result;
use chrono::Utc;
use std::io::BufRead;

use crate::auth::{self, Argon2Verifier};
use crate::Folio;

/// Start an admin session. Without `password` it is read from stdin.
pub fn login(folio: &Folio, username: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => {
            eprint!("Password: ");
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    let verifier = Argon2Verifier::from_env()?;
    let mut session = folio.session()?;
    session.login(&verifier, username, &password, Utc::now())?;

    println!("Logged in for {} hours.", folio.config.session_hours);
    if session.token().is_none() {
        println!("No GitHub token stored yet: run `folio-rs token set <token>`.");
    }
    Ok(())
}

pub fn logout(folio: &Folio) -> Result<()> {
    folio.session()?.logout()?;
    println!("Logged out.");
    Ok(())
}

/// Store the GitHub token; requires an active session
pub fn set_token(folio: &Folio, token: &str) -> Result<()> {
    let mut session = folio.session()?;
    session.require(Utc::now())?;
    session.set_token(token)?;
    println!("GitHub token saved to {:?}", folio.credentials_path);
    Ok(())
}

pub fn clear_token(folio: &Folio) -> Result<()> {
    folio.session()?.clear_token()?;
    println!("GitHub token removed.");
    Ok(())
}

/// Print the hash to put in FOLIO_ADMIN_PASSWORD_HASH
pub fn hash_password(password: &str) -> Result<()> {
    println!("{}", auth::hash_password(password)?);
    Ok(())
}
