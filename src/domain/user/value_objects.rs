use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Email value object representing a plausible email address
///
/// # Invariants
/// - Must contain '@' character
/// - Must be at least 3 characters long
/// - Surrounding whitespace is removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use nutrisense_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new(" ann@example.com ").expect("valid email");
    /// assert_eq!(email.as_str(), "ann@example.com");
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, String> {
        let email = email.into().trim().to_string();
        if Self::is_valid(&email) {
            Ok(Email(email))
        } else {
            Err(format!("Invalid email: {}", email))
        }
    }

    fn is_valid(email: &str) -> bool {
        email.contains('@') && email.len() >= 3
    }

    /// Returns the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Email::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

/// Write-only password
///
/// Never serialized or printed; the provider is the only consumer.
#[derive(Clone)]
pub struct Password(SecretString);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(SecretString::from(password.into()))
    }

    /// Exposes the plaintext for the outbound provider request
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Credential submitted on signup or login. Never persisted locally.
#[derive(Debug, Clone)]
pub struct Credential {
    pub email: Email,
    pub password: Password,
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email() {
        assert!(Email::new("test@example.com").is_ok());
    }

    #[test]
    fn email_is_trimmed() {
        let email = Email::new("  a@b.com\n").unwrap();
        assert_eq!(email.as_str(), "a@b.com");
    }

    #[test]
    fn invalid_email_no_at_symbol() {
        assert!(Email::new("invalid").is_err());
    }

    #[test]
    fn invalid_email_too_short() {
        assert!(Email::new("a@").is_err());
    }

    #[test]
    fn invalid_email_whitespace_only() {
        assert!(Email::new("   ").is_err());
    }

    #[test]
    fn email_deserializes_with_validation() {
        let email: Email = serde_json::from_str("\"ann@example.com\"").unwrap();
        assert_eq!(email.as_str(), "ann@example.com");
        assert!(serde_json::from_str::<Email>("\"nope\"").is_err());
    }

    #[test]
    fn password_debug_is_redacted() {
        let password = Password::new("pw123456");
        assert_eq!(format!("{:?}", password), "Password(***)");
        assert_eq!(password.expose(), "pw123456");
    }
}
