use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub message: &'static str,
    pub status: &'static str,
    pub supabase_url: String,
    pub supabase_key: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ConnectionCheck {
    pub message: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Service banner
///
/// GET /
pub async fn home(State(state): State<AppState>) -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "Nutrisense API is running!",
        status: "success",
        supabase_url: state.info.supabase_url.clone(),
        supabase_key: state.info.key_status(),
    })
}

/// Table store connectivity check
///
/// GET /test
pub async fn connection_test(State(state): State<AppState>) -> impl IntoResponse {
    match state.auth.check_store().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ConnectionCheck {
                message: "Supabase connection successful",
                status: "success",
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "store connectivity check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ConnectionCheck {
                    message: "Supabase connection failed",
                    status: "error",
                    error: Some(e.message),
                }),
            )
        }
    }
}
