use thiserror::Error;

/// Failure reported by the hosted provider (auth service or table store)
///
/// `status` is `None` when the request never produced an HTTP response.
/// `code` is the provider's machine-readable error code when it sent one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: String,
}

impl ProviderError {
    /// Creates an error from an HTTP error response
    pub fn http(status: u16, code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            code,
            message: message.into(),
        }
    }

    /// Creates an error for a request that failed before a response arrived
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: None,
            message: message.into(),
        }
    }

    /// True when the provider refused the presented access token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::http(status.as_u16(), None, err.to_string()),
            None => Self::transport(err.to_string()),
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
