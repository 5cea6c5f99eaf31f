use serde::Serialize;
use std::sync::Arc;

use super::classify::{classify, ProviderFailure};
use super::errors::{AuthError, AuthResult};
use super::persistence::ProfilePersistence;
use crate::domain::errors::ProviderError;
use crate::domain::identity::{AuthResponse, AuthSession, AuthUser, IdentityProvider, UserMetadata};
use crate::domain::repositories::{ProfileRepository, ProfileRow, UserProfile};
use crate::domain::user::value_objects::{Credential, Email, Password};

/// Successful signup plus what happened to the secondary write
#[derive(Debug, Clone)]
pub struct SignupOutcome {
    pub response: AuthResponse,
    pub persistence: ProfilePersistence,
}

/// Current user enriched with profile data when available
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentUser {
    #[serde(flatten)]
    pub user: AuthUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Gateway operations over the identity provider and profile table
///
/// Every provider failure is classified and returned immediately; nothing
/// is retried.
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileRepository>,
}

impl AuthService {
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { identity, profiles }
    }

    /// Register a user, then persist the display name best-effort
    pub async fn signup(
        &self,
        email: Option<&str>,
        password: Option<&str>,
        name: Option<&str>,
    ) -> AuthResult<SignupOutcome> {
        let credential = Credential {
            email: required_email(email, password)?,
            password: Password::new(required_password(
                password,
                AuthError::email_and_password_required,
            )?),
            name: name.map(str::trim).filter(|n| !n.is_empty()).map(String::from),
        };

        tracing::info!(email = %credential.email, "attempting signup");

        let metadata = UserMetadata::with_name(credential.name.clone());
        let response = self
            .identity
            .sign_up(&credential, &metadata)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "provider signup failed");
                match classify(&e) {
                    ProviderFailure::EmailProviderDisabled => AuthError::email_provider_disabled(
                        "Email registration is disabled. Please enable Email provider in Supabase Authentication settings.",
                    ),
                    _ => AuthError::Provider(e.message),
                }
            })?;

        let persistence = match &response.user {
            Some(user) => {
                self.persist_profile(user, response.session.as_ref(), &credential, &metadata)
                    .await
            }
            None => ProfilePersistence::Skipped,
        };

        Ok(SignupOutcome {
            response,
            persistence,
        })
    }

    /// Two-step best-effort write: profile row, else auth metadata
    async fn persist_profile(
        &self,
        user: &AuthUser,
        session: Option<&AuthSession>,
        credential: &Credential,
        metadata: &UserMetadata,
    ) -> ProfilePersistence {
        let profile = UserProfile::for_new_user(user, &credential.email, credential.name.clone());

        let access_token = session.map(|s| s.access_token.as_str());
        let profile_error = match self.profiles.insert(&profile, access_token).await {
            Ok(()) => {
                tracing::info!(user_id = %user.id, "user profile created");
                return ProfilePersistence::ProfileRow;
            }
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "profile creation failed (non-critical)");
                e
            }
        };

        let metadata_result = match session {
            Some(session) => self
                .identity
                .update_user_metadata(&session.access_token, metadata)
                .await
                .map(|_| ()),
            None => Err(ProviderError::transport("no active session")),
        };

        match metadata_result {
            Ok(()) => {
                tracing::info!(user_id = %user.id, "user metadata updated");
                ProfilePersistence::UserMetadata { profile_error }
            }
            Err(metadata_error) => {
                tracing::warn!(user_id = %user.id, error = %metadata_error, "user metadata update failed");
                ProfilePersistence::Lost {
                    profile_error,
                    metadata_error,
                }
            }
        }
    }

    /// Password sign-in
    pub async fn login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> AuthResult<AuthResponse> {
        let email = required_email(email, password)?;
        let password = Password::new(required_password(
            password,
            AuthError::email_and_password_required,
        )?);

        tracing::info!(email = %email, "attempting login");

        let response = self
            .identity
            .sign_in_with_password(&email, &password)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "provider login failed");
                login_error(e)
            })?;

        tracing::info!(
            user_id = response.user.as_ref().map(|u| u.id.as_str()).unwrap_or("None"),
            "login successful"
        );
        Ok(response)
    }

    /// Revoke the caller's session; without a token there is nothing to do
    pub async fn logout(&self, access_token: Option<&str>) -> AuthResult<()> {
        let Some(token) = access_token else {
            tracing::debug!("logout without access token");
            return Ok(());
        };

        match self.identity.sign_out(token).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_unauthorized() => {
                tracing::debug!(error = %e, "session already expired or revoked");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "logout failed");
                Err(AuthError::Provider(e.message))
            }
        }
    }

    /// Fetch the caller and enrich them with their profile row
    pub async fn current_user(&self, access_token: Option<&str>) -> AuthResult<CurrentUser> {
        let token = access_token.ok_or(AuthError::NotAuthenticated)?;

        let user = self.identity.get_user(token).await.map_err(|e| {
            if e.is_unauthorized() {
                AuthError::NotAuthenticated
            } else {
                tracing::warn!(error = %e, "get user failed");
                AuthError::Provider(e.message)
            }
        })?;

        let profile = match self.profiles.find_by_id(&user.id, Some(token)).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "profile fetch failed (non-critical)");
                None
            }
        };

        let display_name = match &profile {
            Some(profile) => profile.name.clone(),
            None => user.metadata_name().map(String::from),
        };

        Ok(CurrentUser {
            user,
            profile,
            display_name,
        })
    }

    /// Ask the provider to send the signup confirmation email again
    pub async fn resend_confirmation(&self, email: Option<&str>) -> AuthResult<()> {
        let email = Email::new(required(email, AuthError::email_required)?)
            .map_err(AuthError::InvalidInput)?;

        self.identity.resend_confirmation(&email).await.map_err(|e| {
            tracing::warn!(error = %e, "resend confirmation failed");
            AuthError::Provider(e.message)
        })
    }

    /// DEVELOPMENT ONLY: mark a profile confirmed without the provider
    ///
    /// Touches only the profile table. The auth user stays unconfirmed and
    /// the provider may still refuse logins for it.
    pub async fn confirm_email_bypassing_provider(&self, email: Option<&str>) -> AuthResult<()> {
        let email = Email::new(required(email, AuthError::email_required)?)
            .map_err(AuthError::InvalidInput)?;

        tracing::warn!(email = %email, "manually confirming email (dev override)");

        self.profiles.mark_email_confirmed(&email).await.map_err(|e| {
            tracing::error!(error = %e, "profile confirmation update failed");
            AuthError::Provider("Failed to update confirmation status".to_string())
        })
    }

    /// Dump the profile table
    pub async fn list_profiles(&self) -> AuthResult<Vec<ProfileRow>> {
        self.profiles.find_all().await.map_err(|e| {
            tracing::warn!(error = %e, "debug users query failed");
            AuthError::Provider(e.message)
        })
    }

    /// Connectivity check against the table store
    pub async fn check_store(&self) -> Result<(), ProviderError> {
        self.profiles.ping().await
    }

    /// Human-readable identity connectivity; never fails
    pub async fn connection_status(&self) -> String {
        match self.identity.health().await {
            Ok(()) => "Connected".to_string(),
            Err(e) => format!("Connection error: {}", e),
        }
    }
}

fn required<'a>(value: Option<&'a str>, missing: fn() -> AuthError) -> AuthResult<&'a str> {
    value.filter(|v| !v.trim().is_empty()).ok_or_else(missing)
}

/// Passwords are taken verbatim; only an absent or empty one is missing
fn required_password<'a>(value: Option<&'a str>, missing: fn() -> AuthError) -> AuthResult<&'a str> {
    value.filter(|v| !v.is_empty()).ok_or_else(missing)
}

/// Both fields are checked for presence before the email format
fn required_email(email: Option<&str>, password: Option<&str>) -> AuthResult<Email> {
    let email = required(email, AuthError::email_and_password_required)?;
    required_password(password, AuthError::email_and_password_required)?;
    Email::new(email).map_err(AuthError::InvalidInput)
}

fn login_error(err: ProviderError) -> AuthError {
    match classify(&err) {
        ProviderFailure::EmailProviderDisabled => AuthError::email_provider_disabled(
            "Email login is disabled. Please enable Email provider in Supabase Authentication settings.",
        ),
        ProviderFailure::InvalidCredentials => AuthError::Authentication(
            "Invalid email or password. Please check your credentials.".to_string(),
        ),
        ProviderFailure::EmailNotConfirmed => AuthError::Authentication(
            "Please confirm your email address before signing in.".to_string(),
        ),
        ProviderFailure::SignupDisabled => {
            AuthError::Authentication("User registration is currently disabled.".to_string())
        }
        ProviderFailure::Unrecognized => {
            AuthError::Provider(format!("Login failed: {}", err.message))
        }
    }
}
