use crate::{AppState, guard::AccessRequirement, handlers, routes};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// The library pages (dashboard, book list, detail, reader).
///
/// Access Control Strategy:
/// `create_router` wraps this router in the session guard layer. Visitors without a valid session
/// are redirected to the login page before any handler runs.
pub fn authenticated_routes() -> Router<AppState> {
    routes::destinations(AccessRequirement::RequiresSession).fold(Router::new(), |router, destination| {
        router.route(destination.path, get(handlers::render_page))
    })
}
