// Development-only routes. They bypass the provider's security controls
// and are mounted only when DEV_ENDPOINTS_ENABLED is set.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use super::auth::EmailRequest;
use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::repositories::ProfileRow;

#[derive(Debug, Serialize)]
pub struct ManualConfirmationResponse {
    pub message: &'static str,
    pub warning: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DebugUsersResponse {
    pub message: &'static str,
    pub users_table: Vec<ProfileRow>,
    pub users_count: usize,
}

#[derive(Debug, Serialize)]
pub struct AuthInstructions {
    pub step1: &'static str,
    pub step2: &'static str,
    pub step3: &'static str,
    pub step4: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub message: &'static str,
    pub supabase_url: String,
    pub supabase_key_status: &'static str,
    pub connection_status: String,
    pub auth_instructions: AuthInstructions,
}

/// Flip the profile's confirmation flag without the provider (DEV MODE)
///
/// POST /auth/confirm-email-manual
pub async fn confirm_email_manual(
    State(state): State<AppState>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> Result<Json<ManualConfirmationResponse>, ApiError> {
    let Json(req) = payload?;

    state
        .auth
        .confirm_email_bypassing_provider(req.email.as_deref())
        .await?;

    Ok(Json(ManualConfirmationResponse {
        message: "Email confirmation updated successfully (DEV MODE)",
        warning: "This is for development only. Use proper email confirmation in production.",
    }))
}

/// Dump the profile table
///
/// GET /debug/users
pub async fn users(State(state): State<AppState>) -> Result<Json<DebugUsersResponse>, ApiError> {
    let rows = state.auth.list_profiles().await?;

    Ok(Json(DebugUsersResponse {
        message: "Debug info retrieved successfully",
        users_count: rows.len(),
        users_table: rows,
    }))
}

/// Auth configuration diagnostics; read-only and always 200
///
/// GET /debug/auth-status
pub async fn auth_status(State(state): State<AppState>) -> Json<AuthStatusResponse> {
    Json(AuthStatusResponse {
        message: "Auth debug info",
        supabase_url: state.info.supabase_url.clone(),
        supabase_key_status: state.info.key_status(),
        connection_status: state.auth.connection_status().await,
        auth_instructions: AuthInstructions {
            step1: "Go to Supabase Dashboard → Authentication → Providers",
            step2: "Enable \"Email\" provider",
            step3: "Enable \"Allow new signups\"",
            step4: "Save settings",
        },
    })
}
