use serde::Deserialize;

use crate::domain::errors::{ProviderError, ProviderResult};

/// Union of the error bodies the auth service and table store send
///
/// Auth (current): `{"code": 400, "error_code": "...", "msg": "..."}`
/// Auth (legacy):  `{"error": "invalid_grant", "error_description": "..."}`
/// Tables:         `{"code": "42P01", "message": "...", "details": ..., "hint": ...}`
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error_code: Option<String>,
    code: Option<serde_json::Value>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Build a [`ProviderError`] from a non-success response body
pub(crate) fn parse_error_body(status: u16, body: &str) -> ProviderError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    let code = parsed
        .error_code
        .or_else(|| parsed.code.as_ref().and_then(|c| c.as_str()).map(String::from))
        .or_else(|| parsed.error.clone());

    let message = parsed
        .msg
        .or(parsed.error_description)
        .or(parsed.message)
        .or(parsed.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("provider responded with status {}", status)
            } else {
                body.trim().to_string()
            }
        });

    ProviderError::http(status, code, message)
}

/// Pass successful responses through, turn the rest into errors
pub(crate) async fn check(response: reqwest::Response) -> ProviderResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(parse_error_body(status.as_u16(), &body))
}
