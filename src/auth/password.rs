//! Password hashing and verification using Argon2.
//!
//! Registration stores an Argon2 hash with a per-password random salt; login
//! re-derives the hash for comparison. The cost parameters are the crate
//! defaults, which are deliberately expensive to resist offline brute force.

use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{self, PasswordHashString, SaltString},
};
use rand::rngs::OsRng;

use crate::prelude::*;

/// Hashes a plaintext password for storage.
///
/// The returned PHC string embeds the salt and parameters needed for later
/// verification.
///
/// # Examples
///
/// ```rust
/// use brewlog::auth::password::generate_password_hash;
///
/// let hash = generate_password_hash("Abcdef1!").unwrap();
/// assert!(hash.starts_with("$argon2"));
/// ```
pub fn generate_password_hash(pw: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    Ok(argon2.hash_password(pw.as_bytes(), &salt)?.to_string())
}

/// Verifies a plaintext password against a stored hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only when the stored hash string
/// itself cannot be parsed.
pub fn is_password_valid(pw: &str, hash: &str) -> Result<bool> {
    let hash = PasswordHashString::new(hash)?;

    Ok(Argon2::default()
        .verify_password(pw.as_bytes(), &hash.password_hash())
        .is_ok())
}

impl From<password_hash::Error> for Error {
    fn from(value: password_hash::Error) -> Self {
        Self::PasswordHash(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() -> Result<()> {
        let hash = generate_password_hash("Espresso9#")?;
        assert!(is_password_valid("Espresso9#", &hash)?);
        assert!(!is_password_valid("Espresso9!", &hash)?);
        Ok(())
    }

    #[test]
    fn hashes_are_salted() -> Result<()> {
        let first = generate_password_hash("Espresso9#")?;
        let second = generate_password_hash("Espresso9#")?;
        assert_ne!(first, second);
        Ok(())
    }
}
