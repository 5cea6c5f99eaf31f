//! In-memory provider used by tests and local experiments
//!
//! Mirrors the hosted service closely enough for the gateway logic:
//! error codes and messages match what the real auth service returns.
//! Every call is recorded, and any operation can be made to fail.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::errors::{ProviderError, ProviderResult};
use crate::domain::identity::{AuthResponse, AuthSession, AuthUser, IdentityProvider, UserMetadata};
use crate::domain::repositories::{ProfileRepository, ProfileRow, UserProfile};
use crate::domain::user::value_objects::{Credential, Email, Password};

/// Call log plus injected failures shared by both fakes
#[derive(Default)]
struct Script {
    calls: Vec<&'static str>,
    failures: HashMap<&'static str, ProviderError>,
}

impl Script {
    fn enter(&mut self, op: &'static str) -> ProviderResult<()> {
        self.calls.push(op);
        match self.failures.get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

struct StoredUser {
    user: AuthUser,
    password: String,
}

#[derive(Default)]
struct IdentityState {
    script: Script,
    users: HashMap<String, StoredUser>,
    tokens: HashMap<String, String>,
}

/// Fake identity service
pub struct InMemoryIdentityProvider {
    require_confirmation: bool,
    state: Mutex<IdentityState>,
}

impl InMemoryIdentityProvider {
    /// Users are confirmed at signup and receive a session immediately
    pub fn new() -> Self {
        Self {
            require_confirmation: false,
            state: Mutex::new(IdentityState::default()),
        }
    }

    /// Users stay unconfirmed until [`confirm`](Self::confirm) is called
    pub fn requiring_confirmation() -> Self {
        Self {
            require_confirmation: true,
            state: Mutex::new(IdentityState::default()),
        }
    }

    /// Make every later call of `op` fail with `err`
    pub async fn fail(&self, op: &'static str, err: ProviderError) {
        self.state.lock().await.script.failures.insert(op, err);
    }

    /// Names of the operations called so far, in order
    pub async fn calls(&self) -> Vec<&'static str> {
        self.state.lock().await.script.calls.clone()
    }

    /// Simulate the user clicking the confirmation link
    pub async fn confirm(&self, email: &str) {
        if let Some(stored) = self.state.lock().await.users.get_mut(email) {
            stored.user.email_confirmed_at = Some(Utc::now());
        }
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn new_session(state: &mut IdentityState, user_id: String) -> AuthSession {
    let token = format!("token-{}", Uuid::new_v4());
    state.tokens.insert(token.clone(), user_id);
    AuthSession {
        access_token: token,
        token_type: Some("bearer".to_string()),
        expires_in: Some(3600),
        expires_at: Some(Utc::now().timestamp() + 3600),
        refresh_token: Some(Uuid::new_v4().to_string()),
        extra: Map::new(),
    }
}

fn metadata_map(metadata: &UserMetadata) -> Map<String, Value> {
    match serde_json::to_value(metadata) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn invalid_jwt() -> ProviderError {
    ProviderError::http(401, Some("bad_jwt".into()), "invalid JWT: token is unknown")
}

fn user_for_token<'a>(state: &'a mut IdentityState, token: &str) -> ProviderResult<&'a mut AuthUser> {
    let IdentityState { tokens, users, .. } = state;
    let user_id = tokens.get(token).ok_or_else(invalid_jwt)?;
    users
        .values_mut()
        .map(|stored| &mut stored.user)
        .find(|user| &user.id == user_id)
        .ok_or_else(invalid_jwt)
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_up(
        &self,
        credential: &Credential,
        metadata: &UserMetadata,
    ) -> ProviderResult<AuthResponse> {
        let mut state = self.state.lock().await;
        state.script.enter("sign_up")?;

        let email = credential.email.as_str().to_string();
        if state.users.contains_key(&email) {
            return Err(ProviderError::http(
                422,
                Some("user_already_exists".into()),
                "User already registered",
            ));
        }

        let now = Utc::now();
        let user = AuthUser {
            id: Uuid::new_v4().to_string(),
            email: Some(email.clone()),
            created_at: now,
            email_confirmed_at: (!self.require_confirmation).then_some(now),
            user_metadata: metadata_map(metadata),
            extra: Map::new(),
        };
        state.users.insert(
            email,
            StoredUser {
                user: user.clone(),
                password: credential.password.expose().to_string(),
            },
        );

        let session = (!self.require_confirmation).then(|| new_session(&mut state, user.id.clone()));
        Ok(AuthResponse {
            user: Some(user),
            session,
        })
    }

    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &Password,
    ) -> ProviderResult<AuthResponse> {
        let mut state = self.state.lock().await;
        state.script.enter("sign_in_with_password")?;

        let user = match state.users.get(email.as_str()) {
            Some(stored) if stored.password == password.expose() => stored.user.clone(),
            _ => {
                return Err(ProviderError::http(
                    400,
                    Some("invalid_credentials".into()),
                    "Invalid login credentials",
                ))
            }
        };
        if !user.is_email_confirmed() {
            return Err(ProviderError::http(
                400,
                Some("email_not_confirmed".into()),
                "Email not confirmed",
            ));
        }

        let session = new_session(&mut state, user.id.clone());
        Ok(AuthResponse {
            user: Some(user),
            session: Some(session),
        })
    }

    async fn sign_out(&self, access_token: &str) -> ProviderResult<()> {
        let mut state = self.state.lock().await;
        state.script.enter("sign_out")?;
        state.tokens.remove(access_token).map(|_| ()).ok_or_else(invalid_jwt)
    }

    async fn get_user(&self, access_token: &str) -> ProviderResult<AuthUser> {
        let mut state = self.state.lock().await;
        state.script.enter("get_user")?;
        user_for_token(&mut state, access_token).map(|user| user.clone())
    }

    async fn resend_confirmation(&self, _email: &Email) -> ProviderResult<()> {
        self.state.lock().await.script.enter("resend_confirmation")
    }

    async fn update_user_metadata(
        &self,
        access_token: &str,
        metadata: &UserMetadata,
    ) -> ProviderResult<AuthUser> {
        let mut state = self.state.lock().await;
        state.script.enter("update_user_metadata")?;
        let user = user_for_token(&mut state, access_token)?;
        user.user_metadata.extend(metadata_map(metadata));
        Ok(user.clone())
    }

    async fn health(&self) -> ProviderResult<()> {
        self.state.lock().await.script.enter("health")
    }
}

#[derive(Default)]
struct ProfileState {
    script: Script,
    rows: Vec<UserProfile>,
    access_tokens: Vec<Option<String>>,
}

/// Fake profile table
#[derive(Default)]
pub struct InMemoryProfileRepository {
    state: Mutex<ProfileState>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call of `op` fail with `err`
    pub async fn fail(&self, op: &'static str, err: ProviderError) {
        self.state.lock().await.script.failures.insert(op, err);
    }

    /// Names of the operations called so far, in order
    pub async fn calls(&self) -> Vec<&'static str> {
        self.state.lock().await.script.calls.clone()
    }

    /// Tokens presented to `insert` and `find_by_id`, in call order
    pub async fn access_tokens(&self) -> Vec<Option<String>> {
        self.state.lock().await.access_tokens.clone()
    }

    /// Current rows, bypassing the call log
    pub async fn rows(&self) -> Vec<UserProfile> {
        self.state.lock().await.rows.clone()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn insert(&self, profile: &UserProfile, access_token: Option<&str>) -> ProviderResult<()> {
        let mut state = self.state.lock().await;
        state.access_tokens.push(access_token.map(String::from));
        state.script.enter("insert")?;
        if state.rows.iter().any(|row| row.id == profile.id) {
            return Err(ProviderError::http(
                409,
                Some("23505".into()),
                "duplicate key value violates unique constraint \"users_pkey\"",
            ));
        }
        state.rows.push(profile.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &str,
        access_token: Option<&str>,
    ) -> ProviderResult<Option<ProfileRow>> {
        let mut state = self.state.lock().await;
        state.access_tokens.push(access_token.map(String::from));
        state.script.enter("find_by_id")?;
        Ok(state
            .rows
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .map(ProfileRow::from))
    }

    async fn find_all(&self) -> ProviderResult<Vec<ProfileRow>> {
        let mut state = self.state.lock().await;
        state.script.enter("find_all")?;
        Ok(state.rows.iter().cloned().map(ProfileRow::from).collect())
    }

    async fn mark_email_confirmed(&self, email: &Email) -> ProviderResult<()> {
        let mut state = self.state.lock().await;
        state.script.enter("mark_email_confirmed")?;
        let now = Utc::now();
        for row in state.rows.iter_mut().filter(|row| row.email == email.as_str()) {
            row.email_confirmed = true;
            row.updated_at = Some(now);
        }
        Ok(())
    }

    async fn ping(&self) -> ProviderResult<()> {
        self.state.lock().await.script.enter("ping")
    }
}
