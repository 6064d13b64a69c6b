//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{ValidationError, ValidationResult};
use crate::models::RegisterRequest;

/// Validate username
pub fn validate_username(username: &str) -> ValidationResult<()> {
    if username.is_empty() {
        return Err(ValidationError::Missing("Username"));
    }

    if username.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "Username",
            max: 32,
        });
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err(ValidationError::Format(
            "Username can only contain letters, numbers, and underscores",
        ));
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> ValidationResult<()> {
    if email.is_empty() {
        return Err(ValidationError::Missing("Email"));
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "Email",
            max: 254,
        });
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(ValidationError::Format("Invalid email format"));
    }

    Ok(())
}

/// Validate password
///
/// Strength rules belong to the backend; the client only refuses to send
/// an empty or oversized password.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Missing("Password"));
    }

    if password.len() > 128 {
        return Err(ValidationError::TooLong {
            field: "Password",
            max: 128,
        });
    }

    Ok(())
}

/// Validate a URL slug (`lowercase-words-like-this`)
pub fn validate_slug(slug: &str) -> ValidationResult<()> {
    if slug.is_empty() {
        return Err(ValidationError::Missing("Slug"));
    }

    static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = SLUG_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("Failed to compile slug regex")
    });

    if !regex.is_match(slug) {
        return Err(ValidationError::Format(
            "Slug can only contain lowercase letters, numbers, and single hyphens",
        ));
    }

    Ok(())
}

/// Validate a registration payload field by field
pub fn validate_registration(request: &RegisterRequest) -> ValidationResult<()> {
    validate_email(&request.email)?;
    validate_username(&request.username)?;
    validate_password(&request.password)?;

    if let Some(full_name) = &request.full_name {
        if full_name.len() > 100 {
            return Err(ValidationError::TooLong {
                field: "Full name",
                max: 100,
            });
        }
    }

    Ok(())
}

/// Turn a title into a slug
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("ab").is_ok());
        assert!(validate_username("john_doe42").is_ok());
        assert_eq!(
            validate_username(""),
            Err(ValidationError::Missing("Username"))
        );
        assert!(validate_username("john doe").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("jane.doe+blog@example.co.uk").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
        assert_eq!(validate_email(""), Err(ValidationError::Missing("Email")));
    }

    #[test]
    fn test_validate_password_accepts_short_passwords() {
        assert!(validate_password("x").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("future-of-javascript-2024").is_ok());
        assert!(validate_slug("Technology").is_err());
        assert!(validate_slug("double--hyphen").is_err());
        assert!(validate_slug("-leading").is_err());
    }

    #[test]
    fn test_validate_registration_reports_first_failure() {
        let request = RegisterRequest {
            email: "broken".to_string(),
            username: "".to_string(),
            full_name: None,
            password: "x".to_string(),
        };
        assert_eq!(
            validate_registration(&request),
            Err(ValidationError::Format("Invalid email format"))
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(
            slugify("The Future of JavaScript: What's Coming in 2024"),
            "the-future-of-javascript-what-s-coming-in-2024"
        );
        assert_eq!(slugify("  Hello, World!  "), "hello-world");
        assert_eq!(slugify("***"), "");
    }
}
