use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::middleware::BearerToken;
use crate::api::state::AppState;
use crate::auth::service::CurrentUser;
use crate::domain::identity::{AuthSession, AuthUser};

/// Request body for signup
///
/// Fields are optional so absence is reported as our own 400.
#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Request body for login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body carrying only an email
#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: Option<String>,
}

/// User and session returned by signup and login
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub message: String,
    pub user: Option<AuthUser>,
    pub session: Option<AuthSession>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub user: CurrentUser,
}

/// Register a new user
///
/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthPayload>), ApiError> {
    let Json(req) = payload?;

    let outcome = state
        .auth
        .signup(req.email.as_deref(), req.password.as_deref(), req.name.as_deref())
        .await?;

    tracing::debug!(persistence = ?outcome.persistence, "signup secondary write finished");

    let message = if outcome.response.user.is_some() {
        "User created successfully! Please check your email for confirmation."
    } else {
        "User created successfully!"
    };

    Ok((
        StatusCode::CREATED,
        Json(AuthPayload {
            message: message.to_string(),
            user: outcome.response.user,
            session: outcome.response.session,
        }),
    ))
}

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthPayload>, ApiError> {
    let Json(req) = payload?;

    let response = state
        .auth
        .login(req.email.as_deref(), req.password.as_deref())
        .await?;

    Ok(Json(AuthPayload {
        message: "Login successful".to_string(),
        user: response.user,
        session: response.session,
    }))
}

/// Revoke the caller's session
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    token: Option<BearerToken>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .auth
        .logout(token.as_ref().map(|BearerToken(t)| t.as_str()))
        .await?;

    Ok(Json(MessageResponse {
        message: "Logout successful".to_string(),
    }))
}

/// Send the confirmation email again
///
/// POST /auth/resend-confirmation
pub async fn resend_confirmation(
    State(state): State<AppState>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = payload?;

    state.auth.resend_confirmation(req.email.as_deref()).await?;

    Ok(Json(MessageResponse {
        message: "Confirmation email sent successfully".to_string(),
    }))
}

/// Current user with profile data
///
/// GET /auth/user
pub async fn current_user(
    State(state): State<AppState>,
    token: Option<BearerToken>,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let user = state
        .auth
        .current_user(token.as_ref().map(|BearerToken(t)| t.as_str()))
        .await?;

    Ok(Json(CurrentUserResponse { user }))
}
