use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::{
    error::ApiError,
    models::{AuthResponse, Book, DashboardStats, LoginRequest, RegisterRequest, UserSummary},
    session::CredentialTransport,
};

// 1. AuthApi Contract
/// AuthApi
///
/// The two authentication endpoints the session endpoints call. Split out from `ApiClient` so the
/// shell can be exercised against a mock server implementation.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// POST /auth/login
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    /// POST /auth/register. The response body is not used: registration does not sign in.
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError>;
}

pub type AuthApiState = Arc<dyn AuthApi>;

// 2. The REST Client
/// ApiClient
///
/// Thin `reqwest` wrapper around the library REST API.
///
/// It carries the default credential header: once Session State calls `set_bearer`, every request
/// is sent with `Authorization: Bearer <token>` until `clear_bearer`.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    bearer: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer: RwLock::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_bearer(&self) -> bool {
        self.bearer.read().is_some()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        let bearer = self.bearer.read().clone();
        match bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %response.url(), "api request rejected");
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        Ok(Self::send(builder).await?.json::<T>().await?)
    }

    // --- Books ---

    pub async fn list_books(&self) -> Result<Vec<Book>, ApiError> {
        Self::send_json(self.request(Method::GET, "/books")).await
    }

    pub async fn get_book(&self, id: i64) -> Result<Book, ApiError> {
        Self::send_json(self.request(Method::GET, &format!("/books/{}", id))).await
    }

    pub async fn create_book(&self, book: &Book) -> Result<Book, ApiError> {
        Self::send_json(self.request(Method::POST, "/books").json(book)).await
    }

    pub async fn update_book(&self, id: i64, book: &Book) -> Result<Book, ApiError> {
        Self::send_json(self.request(Method::PUT, &format!("/books/{}", id)).json(book)).await
    }

    pub async fn delete_book(&self, id: i64) -> Result<(), ApiError> {
        Self::send(self.request(Method::DELETE, &format!("/books/{}", id))).await?;
        Ok(())
    }

    // --- Administration ---

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        Self::send_json(self.request(Method::GET, "/admin/dashboard")).await
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>, ApiError> {
        Self::send_json(self.request(Method::GET, "/admin/users")).await
    }

    /// Flips the account's enabled flag and returns the updated user.
    pub async fn toggle_user_enabled(&self, id: i64) -> Result<UserSummary, ApiError> {
        Self::send_json(self.request(Method::PUT, &format!("/admin/users/{}/enable", id))).await
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        Self::send_json(self.request(Method::POST, "/auth/login").json(request)).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        Self::send(self.request(Method::POST, "/auth/register").json(request)).await?;
        Ok(())
    }
}

impl CredentialTransport for ApiClient {
    fn set_bearer(&self, token: &str) {
        *self.bearer.write() = Some(token.to_string());
    }

    fn clear_bearer(&self) {
        self.bearer.write().take();
    }
}
