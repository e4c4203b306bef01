//! Input validation for profile edits.
//!
//! Each validator returns the trimmed value on success.

use regex::Regex;

use crate::types::{UserError, UserResult};

const MAX_NAME_LEN: usize = 80;
const MAX_EMAIL_LEN: usize = 255;
const MAX_ADDRESS_LEN: usize = 200;

/// Validate a display name
pub fn validate_user_name(name: &str) -> UserResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(UserError::ValidationFailed("Name cannot be empty".to_string()));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(UserError::ValidationFailed(format!(
            "Name must be at most {MAX_NAME_LEN} characters long"
        )));
    }

    Ok(name.to_string())
}

/// Validate email format
pub fn validate_email(email: &str) -> UserResult<String> {
    let email = email.trim();
    let email_regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map_err(|_| UserError::ValidationFailed("Invalid email regex".to_string()))?;

    if !email_regex.is_match(email) {
        return Err(UserError::ValidationFailed("Invalid email format".to_string()));
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(UserError::ValidationFailed("Email too long".to_string()));
    }

    Ok(email.to_string())
}

/// Validate a delivery address
pub fn validate_address(address: &str) -> UserResult<String> {
    let address = address.trim();
    if address.is_empty() {
        return Err(UserError::ValidationFailed("Address cannot be empty".to_string()));
    }

    if address.chars().count() > MAX_ADDRESS_LEN {
        return Err(UserError::ValidationFailed("Address too long".to_string()));
    }

    Ok(address.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_user_name() {
        assert_eq!(validate_user_name("  Ana Silva ").unwrap(), "Ana Silva");
        assert!(validate_user_name("   ").is_err());
        assert!(validate_user_name(&"x".repeat(81)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(" ana@example.pt ").unwrap(), "ana@example.pt");
        assert!(validate_email("ana@example").is_err());
        assert!(validate_email("ana example@x.pt").is_err());
        assert!(validate_email("@example.pt").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_validate_address() {
        assert_eq!(
            validate_address("Rua Augusta 10, Lisboa").unwrap(),
            "Rua Augusta 10, Lisboa"
        );
        assert!(validate_address("").is_err());
    }
}
