use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{auth, debug, status};
use super::state::AppState;

/// Builds the gateway router
///
/// Development routes are mounted only when the state enables them.
pub fn router(state: AppState) -> Router {
    let mut router = Router::new()
        // Status
        .route("/", get(status::home))
        .route("/test", get(status::connection_test))
        // Auth routes
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/resend-confirmation", post(auth::resend_confirmation))
        .route("/auth/user", get(auth::current_user));

    if state.dev_endpoints_enabled {
        router = router
            .route("/auth/confirm-email-manual", post(debug::confirm_email_manual))
            .route("/debug/users", get(debug::users))
            .route("/debug/auth-status", get(debug::auth_status));
    }

    router.with_state(state)
}
