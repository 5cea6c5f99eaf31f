use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use nutrisense_api::api::{self, AppState, ServiceInfo};
use nutrisense_api::auth::AuthService;
use nutrisense_api::config::AppConfig;
use nutrisense_api::infrastructure::supabase::{
    SupabaseClient, SupabaseIdentityProvider, SupabaseProfileRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nutrisense_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;

    // Provider clients share one connection pool
    let client = SupabaseClient::new(&config.supabase)?;
    let identity = Arc::new(SupabaseIdentityProvider::new(client.clone()));
    let profiles = Arc::new(SupabaseProfileRepository::new(client, &config.probe_table));

    if config.dev_endpoints_enabled {
        tracing::warn!(
            "DEV_ENDPOINTS_ENABLED is set: /auth/confirm-email-manual and /debug/* bypass provider security"
        );
    }

    let state = AppState {
        auth: Arc::new(AuthService::new(identity, profiles)),
        info: Arc::new(ServiceInfo::new(&config.supabase.url, true)),
        dev_endpoints_enabled: config.dev_endpoints_enabled,
    };

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = config.addr();
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
