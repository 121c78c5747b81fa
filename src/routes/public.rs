use crate::{AppState, guard::AccessRequirement, handlers, routes};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Everything reachable without a session: the health check, the session endpoints the login
/// and register screens talk to, and every `Public` page of the route table.
pub fn public_routes() -> Router<AppState> {
    let router = Router::new()
        // GET /health
        .route("/health", get(|| async { "ok" }))
        // GET /session
        // Current session as the UI sees it (never an error; anonymous when logged out).
        .route("/session", get(handlers::get_session))
        // POST /session/login
        // Authenticates against the API and adopts the returned token.
        .route("/session/login", post(handlers::login))
        // POST /session/register
        .route("/session/register", post(handlers::register))
        // POST /session/logout
        // Idempotent; also used when already logged out.
        .route("/session/logout", post(handlers::logout));

    routes::destinations(AccessRequirement::Public).fold(router, |router, destination| {
        router.route(destination.path, get(handlers::render_page))
    })
}
