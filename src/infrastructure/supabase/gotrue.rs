use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};

use super::client::SupabaseClient;
use super::error::check;
use crate::domain::errors::{ProviderError, ProviderResult};
use crate::domain::identity::{AuthResponse, AuthSession, AuthUser, IdentityProvider, UserMetadata};
use crate::domain::user::value_objects::{Credential, Email, Password};

/// Identity adapter over the hosted auth REST API (`/auth/v1`)
pub struct SupabaseIdentityProvider {
    client: SupabaseClient,
}

impl SupabaseIdentityProvider {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

/// Session body: token fields with the user nested
#[derive(Deserialize)]
struct SessionBody {
    #[serde(flatten)]
    session: AuthSession,
    user: Option<AuthUser>,
}

/// Newer servers wrap the unconfirmed user as `{"user": ..., "session": null}`
#[derive(Deserialize)]
struct WrappedBody {
    user: Option<AuthUser>,
    session: Option<AuthSession>,
}

/// Normalize the three shapes signup and sign-in may answer with
fn parse_auth_response(body: Value) -> ProviderResult<AuthResponse> {
    let decode = |e: serde_json::Error| {
        ProviderError::transport(format!("unexpected auth response: {}", e))
    };

    if body.get("access_token").is_some() {
        let SessionBody { session, user } = serde_json::from_value(body).map_err(decode)?;
        return Ok(AuthResponse {
            user,
            session: Some(session),
        });
    }

    if body.get("user").is_some() || body.get("session").is_some() {
        let WrappedBody { user, session } = serde_json::from_value(body).map_err(decode)?;
        return Ok(AuthResponse { user, session });
    }

    if body.get("id").is_some() {
        let user: AuthUser = serde_json::from_value(body).map_err(decode)?;
        return Ok(AuthResponse {
            user: Some(user),
            session: None,
        });
    }

    Ok(AuthResponse::default())
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn sign_up(
        &self,
        credential: &Credential,
        metadata: &UserMetadata,
    ) -> ProviderResult<AuthResponse> {
        let response = self
            .client
            .request(Method::POST, "/auth/v1/signup")
            .json(&json!({
                "email": credential.email.as_str(),
                "password": credential.password.expose(),
                "data": metadata,
            }))
            .send()
            .await?;

        let body: Value = check(response).await?.json().await?;
        parse_auth_response(body)
    }

    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &Password,
    ) -> ProviderResult<AuthResponse> {
        let response = self
            .client
            .request(Method::POST, "/auth/v1/token")
            .query(&[("grant_type", "password")])
            .json(&json!({
                "email": email.as_str(),
                "password": password.expose(),
            }))
            .send()
            .await?;

        let body: Value = check(response).await?.json().await?;
        parse_auth_response(body)
    }

    async fn sign_out(&self, access_token: &str) -> ProviderResult<()> {
        let response = self
            .client
            .user_request(Method::POST, "/auth/v1/logout", access_token)
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> ProviderResult<AuthUser> {
        let response = self
            .client
            .user_request(Method::GET, "/auth/v1/user", access_token)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    async fn resend_confirmation(&self, email: &Email) -> ProviderResult<()> {
        let response = self
            .client
            .request(Method::POST, "/auth/v1/resend")
            .json(&json!({
                "type": "signup",
                "email": email.as_str(),
            }))
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    async fn update_user_metadata(
        &self,
        access_token: &str,
        metadata: &UserMetadata,
    ) -> ProviderResult<AuthUser> {
        let response = self
            .client
            .user_request(Method::PUT, "/auth/v1/user", access_token)
            .json(&json!({ "data": metadata }))
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    async fn health(&self) -> ProviderResult<()> {
        let response = self
            .client
            .request(Method::GET, "/auth/v1/health")
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_json() -> Value {
        json!({
            "id": "8d1c1b7e-0000-4000-8000-000000000001",
            "aud": "authenticated",
            "email": "a@b.com",
            "created_at": "2024-05-01T10:00:00.000000Z",
            "email_confirmed_at": null,
            "user_metadata": {"name": "Ann", "display_name": "Ann"}
        })
    }

    #[test]
    fn session_body_splits_user_out() {
        let mut body = json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1714557600,
            "refresh_token": "refresh"
        });
        body["user"] = user_json();

        let response = parse_auth_response(body).unwrap();
        let session = response.session.unwrap();
        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.refresh_token.as_deref(), Some("refresh"));
        assert!(!session.extra.contains_key("user"));
        assert_eq!(response.user.unwrap().email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn bare_user_means_confirmation_pending() {
        let response = parse_auth_response(user_json()).unwrap();
        assert!(response.session.is_none());
        assert_eq!(
            response.user.unwrap().id,
            "8d1c1b7e-0000-4000-8000-000000000001"
        );
    }

    #[test]
    fn wrapped_user_with_null_session() {
        let response = parse_auth_response(json!({"user": user_json(), "session": null})).unwrap();
        assert!(response.user.is_some());
        assert!(response.session.is_none());
    }

    #[test]
    fn unknown_body_yields_empty_response() {
        let response = parse_auth_response(json!({})).unwrap();
        assert_eq!(response, AuthResponse::default());
    }

    #[test]
    fn malformed_user_is_an_error() {
        let err = parse_auth_response(json!({"id": "x"})).unwrap_err();
        assert!(err.message.starts_with("unexpected auth response"));
    }
}
