use libro_session::{
    ApiClient, AppState, FileTokenStore, SessionStore,
    api::AuthApiState,
    config::{AppConfig, Env},
    create_router,
    session::{SystemClock, TransportState},
};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, installs logging, restores the session from the profile's token store
/// and serves the local shell.
#[tokio::main]
async fn main() {
    // 1. Configuration
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "libro_session=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Client shell starting in {:?} mode", config.env);

    // 3. API Client
    let api = Arc::new(ApiClient::new(&config.api_base_url));
    tracing::info!("REST API at {}", api.base_url());

    // 4. Session Restore
    // Must finish before the router exists, so no guarded page is served from a stale state.
    let tokens = Arc::new(FileTokenStore::new(&config.profile_dir));
    let session = SessionStore::initialize(
        tokens,
        api.clone() as TransportState,
        Arc::new(SystemClock),
    );

    let app_state = AppState {
        session: Arc::new(RwLock::new(session)),
        api: api as AuthApiState,
        config: config.clone(),
    };

    // 5. Router and Server Startup
    let app = create_router(app_state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .expect("FATAL: Failed to bind the shell address. Check LIBRO_BIND_ADDR.");

    tracing::info!("Listening on {}", config.bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{}/swagger-ui", config.bind_addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: Shell server terminated unexpectedly.");
}
