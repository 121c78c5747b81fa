#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use libro_session::{
    SessionStore,
    api::AuthApi,
    error::ApiError,
    models::{AuthResponse, LoginRequest, RegisterRequest},
    session::{CredentialTransport, ManualClock},
    token_store::MemoryTokenStore,
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;

// The client never verifies signatures; any secret works for minting fixtures.
pub const TEST_JWT_SECRET: &str = "libro-test-secret";

/// Fixed "now" all session tests start from.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

pub fn in_one_hour() -> DateTime<Utc> {
    epoch() + Duration::hours(1)
}

pub fn mint_raw(claims: &Value) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Token shaped like the ones the library API issues.
pub fn mint_token(sub: &str, role: &str, expires_at: DateTime<Utc>) -> String {
    mint_raw(&json!({
        "sub": sub,
        "role": role,
        "iat": epoch().timestamp(),
        "exp": expires_at.timestamp(),
    }))
}

// --- Mock Collaborators ---

/// Remembers the credential header the session last set.
#[derive(Default)]
pub struct RecordingTransport {
    bearer: Mutex<Option<String>>,
}

impl RecordingTransport {
    pub fn bearer(&self) -> Option<String> {
        self.bearer.lock().clone()
    }
}

impl CredentialTransport for RecordingTransport {
    fn set_bearer(&self, token: &str) {
        *self.bearer.lock() = Some(token.to_string());
    }

    fn clear_bearer(&self) {
        self.bearer.lock().take();
    }
}

/// Everything a session test needs to poke at.
pub struct Harness {
    pub tokens: MemoryTokenStore,
    pub transport: Arc<RecordingTransport>,
    pub clock: ManualClock,
}

impl Harness {
    pub fn new(tokens: MemoryTokenStore) -> Self {
        Self {
            tokens,
            transport: Arc::new(RecordingTransport::default()),
            clock: ManualClock::new(epoch()),
        }
    }

    pub fn empty() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    pub fn with_token(token: &str) -> Self {
        Self::new(MemoryTokenStore::with_token(token))
    }

    /// A fresh store over the same storage, as after a page reload.
    pub fn session(&self) -> SessionStore {
        SessionStore::initialize(
            Arc::new(self.tokens.clone()),
            self.transport.clone(),
            Arc::new(self.clock.clone()),
        )
    }
}

/// Stand-in for the library API's auth endpoints.
pub struct MockAuthApi {
    pub login_result: Result<AuthResponse, u16>,
    pub register_status: Option<u16>,
    pub login_calls: Mutex<Vec<String>>,
}

impl MockAuthApi {
    pub fn accepting(token: &str, username: &str, role: &str) -> Self {
        Self {
            login_result: Ok(AuthResponse {
                token: token.to_string(),
                username: username.to_string(),
                role: role.to_string(),
            }),
            register_status: None,
            login_calls: Mutex::new(vec![]),
        }
    }

    pub fn rejecting(status: u16) -> Self {
        Self {
            login_result: Err(status),
            register_status: Some(status),
            login_calls: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.login_calls.lock().push(request.username.clone());
        self.login_result.clone().map_err(ApiError::Status)
    }

    async fn register(&self, _request: &RegisterRequest) -> Result<(), ApiError> {
        match self.register_status {
            Some(status) => Err(ApiError::Status(status)),
            None => Ok(()),
        }
    }
}
