use thiserror::Error;

/// Remediation shown when the provider has email logins switched off
pub const ENABLE_EMAIL_PROVIDER_STEPS: &str =
    "Go to Supabase Dashboard → Authentication → Providers → Enable Email";

/// Outcome classes of a gateway operation that failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// A required request field was absent or blank
    #[error("{0}")]
    MissingField(String),

    /// A field was present but unusable
    #[error("{0}")]
    InvalidInput(String),

    /// The provider has a feature disabled at the account level
    #[error("{message}")]
    Configuration { message: String, details: String },

    /// Credentials rejected, email unconfirmed or registration closed
    #[error("{0}")]
    Authentication(String),

    /// No usable access token was presented
    #[error("User not authenticated")]
    NotAuthenticated,

    /// Anything else the provider reported, passed through verbatim
    #[error("{0}")]
    Provider(String),
}

impl AuthError {
    pub fn email_and_password_required() -> Self {
        Self::MissingField("Email and password are required".to_string())
    }

    pub fn email_required() -> Self {
        Self::MissingField("Email is required".to_string())
    }

    pub(crate) fn email_provider_disabled(message: &str) -> Self {
        Self::Configuration {
            message: message.to_string(),
            details: ENABLE_EMAIL_PROVIDER_STEPS.to_string(),
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
