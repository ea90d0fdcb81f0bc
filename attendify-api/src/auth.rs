//! Teacher credential hashing and login
//!
//! Passwords are stored only as salted PBKDF2 hashes. Login failures use
//! one message for unknown email and wrong password alike, so responses
//! cannot be used to enumerate accounts.

use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::Pbkdf2;
use rand_core::OsRng;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::warn;

use attendify_common::{Error, Result};

const LOGIN_FAILED: &str = "Invalid email or password";

/// Authenticated teacher identity
#[derive(Debug, Clone, Serialize)]
pub struct TeacherIdentity {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Pbkdf2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| Error::Internal(format!("Password hashing failed: {}", err)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash
///
/// An unparseable stored hash counts as a mismatch (logged) rather than a
/// distinct error, keeping the login response uniform.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Pbkdf2.verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(err) => {
            warn!("Unparseable stored password hash: {}", err);
            false
        }
    }
}

/// Authenticate a teacher by email and password
pub async fn login_teacher(db: &SqlitePool, email: &str, password: &str) -> Result<TeacherIdentity> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(Error::Validation("Missing email or password".to_string()));
    }

    let row: Option<(i64, String, String, String)> =
        sqlx::query_as("SELECT id, Full_Name, Email, Password FROM Teachers WHERE Email = ? LIMIT 1")
            .bind(email.trim())
            .fetch_optional(db)
            .await?;

    let Some((id, name, email, stored_hash)) = row else {
        return Err(Error::Auth(LOGIN_FAILED.to_string()));
    };

    if !verify_password(password, &stored_hash) {
        return Err(Error::Auth(LOGIN_FAILED.to_string()));
    }

    Ok(TeacherIdentity { id, name, email })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("s3cret").unwrap();
        assert_ne!(hash, "s3cret");
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("s3cret").unwrap();
        let b = hash_password("s3cret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unparseable_hash_is_mismatch() {
        assert!(!verify_password("s3cret", "not-a-phc-string"));
    }
}
