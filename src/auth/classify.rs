// Maps opaque provider failures onto the gateway's error taxonomy
//
// Known fragility: when the provider omits a structured error code the only
// signal left is the human-readable message, so we fall back to substring
// matching. Reworded provider messages silently land in `Unrecognized`.

use crate::domain::errors::ProviderError;

/// Provider failure conditions the gateway reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFailure {
    EmailProviderDisabled,
    InvalidCredentials,
    EmailNotConfirmed,
    SignupDisabled,
    Unrecognized,
}

impl ProviderFailure {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "email_provider_disabled" => Some(Self::EmailProviderDisabled),
            "invalid_credentials" => Some(Self::InvalidCredentials),
            "email_not_confirmed" => Some(Self::EmailNotConfirmed),
            "signup_disabled" => Some(Self::SignupDisabled),
            _ => None,
        }
    }

    fn from_message(message: &str) -> Self {
        if message.contains("Email logins are disabled") {
            Self::EmailProviderDisabled
        } else if message.contains("Invalid login credentials") {
            Self::InvalidCredentials
        } else if message.contains("Email not confirmed") || message.contains("email_confirmed_at")
        {
            Self::EmailNotConfirmed
        } else if message.contains("signup_disabled") || message.contains("Signups not allowed") {
            Self::SignupDisabled
        } else {
            Self::Unrecognized
        }
    }
}

/// Classify a provider error, structured code first
pub fn classify(err: &ProviderError) -> ProviderFailure {
    err.code
        .as_deref()
        .and_then(ProviderFailure::from_code)
        .unwrap_or_else(|| ProviderFailure::from_message(&err.message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coded(code: &str, message: &str) -> ProviderError {
        ProviderError::http(400, Some(code.to_string()), message)
    }

    fn uncoded(message: &str) -> ProviderError {
        ProviderError::http(400, None, message)
    }

    #[test]
    fn structured_codes_take_priority() {
        assert_eq!(
            classify(&coded("invalid_credentials", "something reworded")),
            ProviderFailure::InvalidCredentials
        );
        assert_eq!(
            classify(&coded("email_not_confirmed", "")),
            ProviderFailure::EmailNotConfirmed
        );
        assert_eq!(
            classify(&coded("email_provider_disabled", "")),
            ProviderFailure::EmailProviderDisabled
        );
        assert_eq!(classify(&coded("signup_disabled", "")), ProviderFailure::SignupDisabled);
    }

    #[test]
    fn unknown_code_falls_back_to_message() {
        assert_eq!(
            classify(&coded("invalid_grant", "Invalid login credentials")),
            ProviderFailure::InvalidCredentials
        );
    }

    #[test]
    fn substring_fallback() {
        assert_eq!(
            classify(&uncoded("AuthApiError: Email logins are disabled")),
            ProviderFailure::EmailProviderDisabled
        );
        assert_eq!(
            classify(&uncoded("Invalid login credentials")),
            ProviderFailure::InvalidCredentials
        );
        assert_eq!(classify(&uncoded("Email not confirmed")), ProviderFailure::EmailNotConfirmed);
        assert_eq!(
            classify(&uncoded("missing email_confirmed_at")),
            ProviderFailure::EmailNotConfirmed
        );
        assert_eq!(classify(&uncoded("signup_disabled")), ProviderFailure::SignupDisabled);
    }

    #[test]
    fn anything_else_is_unrecognized() {
        assert_eq!(classify(&uncoded("Database error")), ProviderFailure::Unrecognized);
        assert_eq!(
            classify(&ProviderError::transport("connection refused")),
            ProviderFailure::Unrecognized
        );
    }
}
