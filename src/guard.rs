use serde::{Deserialize, Serialize};

use crate::{models::Role, session::Access};

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";
/// Default landing page of an authenticated, non-admin user.
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Landing page of an administrator.
pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";
/// Catch-all target for unknown paths.
pub const HOME_PATH: &str = "/";

/// AccessRequirement
///
/// Access level attached to each navigable destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessRequirement {
    Public,
    RequiresSession,
    RequiresAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(&'static str),
}

/// evaluate
///
/// The guard's whole transition function. Synchronous and pure: it only looks at the two
/// predicates in `access`, never at the token.
///
/// The original target is not remembered when redirecting to the login page.
pub fn evaluate(access: Access, requirement: AccessRequirement, target: &str) -> Decision {
    let decision = match requirement {
        AccessRequirement::Public => Decision::Allow,
        AccessRequirement::RequiresSession if access.authenticated => Decision::Allow,
        AccessRequirement::RequiresSession => Decision::Redirect(LOGIN_PATH),
        AccessRequirement::RequiresAdmin if access.authenticated && access.admin => Decision::Allow,
        AccessRequirement::RequiresAdmin if access.authenticated => Decision::Redirect(DASHBOARD_PATH),
        AccessRequirement::RequiresAdmin => Decision::Redirect(LOGIN_PATH),
    };

    if let Decision::Redirect(to) = decision {
        tracing::debug!(path = target, ?requirement, redirect = to, "navigation redirected");
    }
    decision
}

/// Where a freshly logged-in user lands.
pub fn landing_for(role: Role) -> &'static str {
    match role {
        Role::Admin => ADMIN_DASHBOARD_PATH,
        Role::User => DASHBOARD_PATH,
    }
}
