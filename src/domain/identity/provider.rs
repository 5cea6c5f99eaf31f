use async_trait::async_trait;

use super::{AuthResponse, AuthUser, UserMetadata};
use crate::domain::errors::ProviderResult;
use crate::domain::user::value_objects::{Credential, Email, Password};

/// Port to the hosted identity service
///
/// Implementations hold no per-user state: calls that act on a signed-in
/// user take that user's access token explicitly.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new user; `metadata` is stored with the auth user
    async fn sign_up(
        &self,
        credential: &Credential,
        metadata: &UserMetadata,
    ) -> ProviderResult<AuthResponse>;

    /// Exchange email and password for a session
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &Password,
    ) -> ProviderResult<AuthResponse>;

    /// Revoke the session behind an access token
    async fn sign_out(&self, access_token: &str) -> ProviderResult<()>;

    /// Fetch the user owning an access token
    async fn get_user(&self, access_token: &str) -> ProviderResult<AuthUser>;

    /// Send the signup confirmation email again
    async fn resend_confirmation(&self, email: &Email) -> ProviderResult<()>;

    /// Replace the signed-in user's metadata
    async fn update_user_metadata(
        &self,
        access_token: &str,
        metadata: &UserMetadata,
    ) -> ProviderResult<AuthUser>;

    /// Check the service is reachable
    async fn health(&self) -> ProviderResult<()>;
}
