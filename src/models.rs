use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::layout::HeaderKind;

// --- Identity ---

/// Role
///
/// The RBAC field carried by the token's `role` claim and by the login response.
/// Serialized as the server spells it: "USER" / "ADMIN".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Maps a raw role string to a `Role`. Only "ADMIN" (any case) grants admin; anything else,
    /// including a missing claim, is a plain user.
    pub fn from_claim(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.trim().eq_ignore_ascii_case("admin") => Role::Admin,
            _ => Role::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

/// SessionView
///
/// What the UI layer is allowed to see of the session: the two guard predicates plus the
/// current identity, or nulls when anonymous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionView {
    pub is_authenticated: bool,
    pub is_admin: bool,
    pub subject: Option<String>,
    pub role: Option<Role>,
    #[ts(type = "string | null")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// PageView
///
/// Descriptor returned for every page the guard let through.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PageView {
    pub path: String,
    pub page: String,
    pub header: HeaderKind,
    pub full_width: bool,
    pub session: SessionView,
}

/// RedirectView
///
/// Tells the UI where to navigate next (after register, logout).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RedirectView {
    pub redirect: String,
}

/// LoginOutcome
///
/// Response of the shell's login endpoint: the new session and the role's landing page.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginOutcome {
    pub session: SessionView,
    pub redirect: String,
}

// --- REST API Payloads ---

/// LoginRequest
///
/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// RegisterRequest
///
/// Body of `POST /auth/register`. New accounts are always created with the USER role.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegisterRequest {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// AuthResponse
///
/// Returned by both auth endpoints: the bearer token and the identity it was issued for.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
    // Kept as the raw string; mapped through `Role::from_claim`.
    pub role: String,
}

/// Book
///
/// A catalogue entry as served by `/books`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub page_count: Option<i32>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// DashboardStats
///
/// Aggregates served by `GET /admin/dashboard`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub total_books: i64,
    pub total_users: i64,
    pub books_added_today: i64,
    pub total_views: i64,
    #[serde(default)]
    pub books_by_category: HashMap<String, i64>,
    #[serde(default)]
    pub recent_books: Vec<Book>,
}

/// UserSummary
///
/// One row of `GET /admin/users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserSummary {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}
