//! Router Module Index
//!
//! The application's static route table and the three access-segregated routers built from it.
//! Every page the client can show is declared once in `ROUTE_TABLE`; the routers below register
//! each destination under the router whose guard matches its `AccessRequirement`.

use crate::{
    guard::{self, AccessRequirement, Decision, HOME_PATH},
    session::Access,
};

/// Pages anyone may open.
pub mod public;

/// Pages behind the session guard.
pub mod authenticated;

/// Pages behind the admin guard.
pub mod admin;

/// Destination
///
/// One navigable page: its path pattern (`{param}` marks a variable segment), the page it
/// renders, and who may open it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    pub path: &'static str,
    pub page: &'static str,
    pub access: AccessRequirement,
}

const fn destination(path: &'static str, page: &'static str, access: AccessRequirement) -> Destination {
    Destination { path, page, access }
}

use AccessRequirement::{Public, RequiresAdmin, RequiresSession};

pub const ROUTE_TABLE: &[Destination] = &[
    // Marketing and auth screens
    destination("/", "landing", Public),
    destination("/learn-more", "learn-more", Public),
    destination("/login", "login", Public),
    destination("/register", "register", Public),
    destination("/privacy", "privacy-policy", Public),
    destination("/terms", "terms-of-service", Public),
    destination("/features", "features", Public),
    destination("/faq", "faq", Public),
    destination("/about", "about", Public),
    destination("/contact", "contact", Public),
    destination("/blog", "blog", Public),
    // Library
    destination("/dashboard", "user-dashboard", RequiresSession),
    destination("/books", "book-list", RequiresSession),
    destination("/books/{id}", "book-detail", RequiresSession),
    destination("/read/{id}", "book-reader", RequiresSession),
    // Administration
    destination("/admin/dashboard", "admin-dashboard", RequiresAdmin),
    destination("/admin/books", "admin-book-list", RequiresAdmin),
];

/// All destinations carrying the given requirement.
pub fn destinations(access: AccessRequirement) -> impl Iterator<Item = &'static Destination> {
    ROUTE_TABLE.iter().filter(move |d| d.access == access)
}

/// resolve
///
/// Finds the destination a concrete path belongs to. A trailing slash is ignored;
/// a `{param}` segment matches any single non-empty segment.
pub fn resolve(path: &str) -> Option<&'static Destination> {
    let path = normalize(path);
    ROUTE_TABLE.iter().find(|d| matches(d.path, path))
}

/// navigate
///
/// Resolution plus the guard. Unknown paths go home.
pub fn navigate(access: Access, path: &str) -> Decision {
    match resolve(path) {
        Some(destination) => guard::evaluate(access, destination.access, path),
        None => Decision::Redirect(HOME_PATH),
    }
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

fn matches(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');
    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(expected), Some(actual)) => {
                let is_param = expected.starts_with('{') && expected.ends_with('}');
                if is_param {
                    if actual.is_empty() {
                        return false;
                    }
                } else if expected != actual {
                    return false;
                }
            }
            _ => return false,
        }
    }
}
