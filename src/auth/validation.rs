//! Registration credential policy.
//!
//! Email format and password strength checks applied before a user row is
//! ever created. Both return crate errors that the web boundary turns into
//! 400 responses.

use std::sync::LazyLock;

use regex::Regex;

use crate::prelude::*;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern must compile")
});

/// Checks that `email` looks like `local@domain.tld`.
///
/// The domain must contain at least one dot and end in a 2+ letter segment.
///
/// # Examples
///
/// ```rust
/// use brewlog::auth::validation::validate_email;
///
/// assert!(validate_email("user@example.com").is_ok());
/// assert!(validate_email("not-an-email").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<()> {
    if !EMAIL_RE.is_match(email) {
        return Err(Error::InvalidEmailFormat);
    }
    Ok(())
}

/// Checks the password strength policy.
///
/// Accepts passwords of at least [`MIN_PASSWORD_LEN`] characters containing
/// an uppercase letter, a lowercase letter, a digit, and a punctuation or
/// symbol character. All four class flags are collected in one pass over the
/// string before the verdict.
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::WeakPassword);
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;

    for ch in password.chars() {
        if ch.is_uppercase() {
            has_upper = true;
        } else if ch.is_lowercase() {
            has_lower = true;
        } else if ch.is_numeric() {
            has_digit = true;
        } else if !ch.is_whitespace() && !ch.is_control() {
            has_special = true;
        }
    }

    if !has_upper || !has_lower || !has_digit || !has_special {
        return Err(Error::WeakPassword);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.domain.org").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in [
            "not-an-email",
            "missing-at.example.com",
            "user@nodot",
            "user@domain.x",
            "@example.com",
            "user@",
            "",
        ] {
            assert!(
                matches!(validate_email(email), Err(Error::InvalidEmailFormat)),
                "expected rejection for {email:?}"
            );
        }
    }

    #[test]
    fn rejects_short_passwords() {
        assert!(matches!(
            validate_password("Ab1!"),
            Err(Error::WeakPassword)
        ));
        assert!(matches!(
            validate_password("Abcde1!"),
            Err(Error::WeakPassword)
        ));
    }

    #[test]
    fn rejects_missing_character_classes() {
        // each case drops exactly one required class
        for password in ["abcdef1!", "ABCDEF1!", "Abcdefg!", "Abcdefg1"] {
            assert!(
                matches!(validate_password(password), Err(Error::WeakPassword)),
                "expected rejection for {password:?}"
            );
        }
    }

    #[test]
    fn accepts_password_with_all_classes() {
        assert!(validate_password("Abcdef1!").is_ok());
        assert!(validate_password("C0ffee-Time").is_ok());
    }
}
