use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::AuthError;

/// API error type with HTTP status code and message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Remediation hint rendered as `details`
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    /// Attaches remediation details
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingField(message) | AuthError::InvalidInput(message) => {
                Self::bad_request(message)
            }
            AuthError::Configuration { message, details } => {
                Self::bad_request(message).with_details(details)
            }
            AuthError::Authentication(message) => Self::unauthorized(message),
            AuthError::NotAuthenticated => {
                Self::unauthorized(AuthError::NotAuthenticated.to_string())
            }
            AuthError::Provider(message) => Self::internal_server_error(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn plain_error_body() {
        let (status, body) = body_of(ApiError::unauthorized("nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "nope" }));
    }

    #[tokio::test]
    async fn configuration_error_carries_details() {
        let err = AuthError::Configuration {
            message: "disabled".into(),
            details: "enable it".into(),
        };
        let (status, body) = body_of(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "disabled", "details": "enable it" }));
    }

    #[test]
    fn taxonomy_status_codes() {
        let cases = [
            (AuthError::email_and_password_required(), StatusCode::BAD_REQUEST),
            (AuthError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST),
            (AuthError::Authentication("no".into()), StatusCode::UNAUTHORIZED),
            (AuthError::NotAuthenticated, StatusCode::UNAUTHORIZED),
            (AuthError::Provider("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn not_authenticated_message() {
        assert_eq!(ApiError::from(AuthError::NotAuthenticated).message, "User not authenticated");
    }
}
