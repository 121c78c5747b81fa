use crate::{AppState, guard::AccessRequirement, handlers, routes};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Administration pages. Wrapped by `create_router` in the admin guard layer: anonymous visitors
/// go to the login page, signed-in non-admins go back to their dashboard.
pub fn admin_routes() -> Router<AppState> {
    routes::destinations(AccessRequirement::RequiresAdmin).fold(Router::new(), |router, destination| {
        router.route(destination.path, get(handlers::render_page))
    })
}
