//! Live tests against a real hosted project
//!
//! Require `SUPABASE_URL` and `SUPABASE_ANON_KEY`; run with
//! `cargo test -- --ignored`. Each run registers a fresh address.

use nutrisense_api::auth::AuthService;
use nutrisense_api::auth::AuthError;
use nutrisense_api::config::AppConfig;
use nutrisense_api::infrastructure::supabase::{
    SupabaseClient, SupabaseIdentityProvider, SupabaseProfileRepository,
};
use std::sync::Arc;

fn setup_service() -> AuthService {
    dotenv::dotenv().ok();
    let config = AppConfig::from_env().expect("SUPABASE_URL and SUPABASE_ANON_KEY must be set");
    let client = SupabaseClient::new(&config.supabase).expect("build http client");

    AuthService::new(
        Arc::new(SupabaseIdentityProvider::new(client.clone())),
        Arc::new(SupabaseProfileRepository::new(client, &config.probe_table)),
    )
}

#[tokio::test]
#[ignore]
async fn test_signup_then_login() {
    let service = setup_service();
    let email = format!("nutrisense-{}@example.com", uuid::Uuid::new_v4());

    let outcome = service
        .signup(Some(&email), Some("pw123456"), Some("Ann"))
        .await
        .expect("signup");
    let user = outcome.response.user.expect("user returned");
    assert_eq!(user.email.as_deref(), Some(email.as_str()));

    match service.login(Some(&email), Some("pw123456")).await {
        Ok(response) => assert_eq!(response.user.expect("user").id, user.id),
        Err(AuthError::Authentication(message)) => {
            assert_eq!(message, "Please confirm your email address before signing in.")
        }
        Err(other) => panic!("unexpected login failure: {:?}", other),
    }
}

#[tokio::test]
#[ignore]
async fn test_connection_status() {
    let service = setup_service();
    assert_eq!(service.connection_status().await, "Connected");
}
