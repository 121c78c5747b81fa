use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// Pages rendered edge to edge instead of inside the content container.
const FULL_WIDTH_PAGES: [&str; 5] = ["/", "/login", "/register", "/privacy", "/terms"];
// Auth screens bring their own branding.
const HEADERLESS_PAGES: [&str; 2] = ["/login", "/register"];

/// HeaderKind
///
/// Which navigation header frames a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum HeaderKind {
    Hidden,
    Admin,
    User,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chrome {
    pub header: HeaderKind,
    pub full_width: bool,
}

/// chrome_for
///
/// Picks the page frame from the path and whether someone is signed in. The admin header is
/// chosen by path alone; access to admin pages is the guard's concern.
pub fn chrome_for(path: &str, authenticated: bool) -> Chrome {
    let header = if HEADERLESS_PAGES.contains(&path) {
        HeaderKind::Hidden
    } else if path.starts_with("/admin") {
        HeaderKind::Admin
    } else if authenticated && path != "/" {
        HeaderKind::User
    } else {
        HeaderKind::Public
    };

    Chrome {
        header,
        full_width: FULL_WIDTH_PAGES.contains(&path),
    }
}
