use axum::{
    Router,
    extract::{FromRef, Request, State},
    http::HeaderName,
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Session core: token persistence, claim decoding, session state, route guard.
pub mod token_store;
pub mod claims;
pub mod session;
pub mod guard;
pub mod error;

// Client surface around the core.
pub mod api;
pub mod config;
pub mod handlers;
pub mod layout;
pub mod models;

// Route table and the Public / Authenticated / Admin routers.
pub mod routes;
use routes::{admin, authenticated, public};

use guard::{AccessRequirement, Decision, HOME_PATH};

// --- Public Re-exports ---

pub use api::{ApiClient, AuthApi, AuthApiState};
pub use config::AppConfig;
pub use session::{SessionState, SessionStore};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreState};

/// ApiDoc
///
/// OpenAPI document of the shell's session endpoints, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::get_session, handlers::login, handlers::register, handlers::logout),
    components(
        schemas(
            models::SessionView, models::LoginRequest, models::RegisterRequest,
            models::LoginOutcome, models::RedirectView, models::PageView, models::Role,
            layout::HeaderKind,
        )
    ),
    tags(
        (name = "libro-session", description = "Libro client session shell")
    )
)]
struct ApiDoc;

/// AppState
///
/// Everything the shell's handlers and guards need: the one session container, the auth API it
/// forwards credentials to, and the configuration.
#[derive(Clone)]
pub struct AppState {
    pub session: SessionState,
    pub api: AuthApiState,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for SessionState {
    fn from_ref(app_state: &AppState) -> SessionState {
        app_state.session.clone()
    }
}

impl FromRef<AppState> for AuthApiState {
    fn from_ref(app_state: &AppState) -> AuthApiState {
        app_state.api.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// guard_request
///
/// Runs the route guard for one navigation. A session that lapsed since the last request is
/// collapsed first, so the decision never trusts an expired identity. The lock is released before
/// the inner handler runs.
async fn guard_request(
    state: &AppState,
    requirement: AccessRequirement,
    request: Request,
    next: Next,
) -> Response {
    let decision = {
        let mut session = state.session.write();
        session.revalidate();
        guard::evaluate(session.access(), requirement, request.uri().path())
    };

    match decision {
        Decision::Allow => next.run(request).await,
        Decision::Redirect(to) => Redirect::to(to).into_response(),
    }
}

/// Guard layer of the authenticated router.
async fn session_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    guard_request(&state, AccessRequirement::RequiresSession, request, next).await
}

/// Guard layer of the admin router.
async fn admin_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    guard_request(&state, AccessRequirement::RequiresAdmin, request, next).await
}

/// create_router
///
/// Assembles the shell: the three access-segregated routers with their guard layers, the
/// catch-all redirect home, docs, and the observability layers.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public pages and session endpoints: no guard.
        .merge(public::public_routes())
        // Library pages: session guard.
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), session_guard)),
        )
        // Administration pages: admin guard.
        .merge(
            admin::admin_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), admin_guard)),
        )
        // Catch all
        .fallback(|| async { Redirect::to(HOME_PATH) })
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one HTTP request, correlated by the `x-request-id` header.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
