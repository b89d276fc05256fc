//! Common validation utilities.

use validator::ValidationError;

use crate::password::MIN_PASSWORD_LENGTH;

/// Maximum length for usernames.
const MAX_USERNAME_LENGTH: usize = 150;

/// Validates a username: non-empty, bounded length, word characters only.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() || username.len() > MAX_USERNAME_LENGTH {
        let mut err = ValidationError::new("username_length");
        err.message = Some("Username must be 1-150 characters".into());
        return Err(err);
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '@' | '+'))
    {
        let mut err = ValidationError::new("username_charset");
        err.message = Some("Username may only contain letters, digits and .@+-_".into());
        return Err(err);
    }

    Ok(())
}

/// Validates password strength (minimum length only; complexity rules are a
/// policy decision left to deployments).
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        let mut err = ValidationError::new("password_too_short");
        err.message = Some("Password must be at least 8 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Lightweight email shape check: one `@`, non-empty local part and domain,
/// domain contains a dot. Full RFC validation is intentionally out of scope.
pub fn validate_email_format(email: &str) -> Result<(), ValidationError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_format");
        err.message = Some("Invalid email address".into());
        Err(err)
    }
}
