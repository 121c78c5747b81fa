use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};

use crate::{
    claims::validate_claims,
    error::SessionError,
    models::{Role, SessionView},
    token_store::TokenStoreState,
};

// --- Collaborators ---

/// Clock
///
/// Source of "now" for expiry checks. Injected so tests can move time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// ManualClock
///
/// A clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock() = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// CredentialTransport
///
/// The outbound HTTP client's default credential header. Session State attaches the bearer token
/// here on login/restore and removes it on logout so later API calls carry (or stop carrying) it.
pub trait CredentialTransport: Send + Sync {
    fn set_bearer(&self, token: &str);
    fn clear_bearer(&self);
}

pub type ClockState = Arc<dyn Clock>;
pub type TransportState = Arc<dyn CredentialTransport>;

// --- Session Model ---

/// Identity
///
/// The authenticated user as derived from a stored token or a login response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(Identity),
}

impl Session {
    /// The identity, only if it is still valid at `now`.
    pub fn identity_at(&self, now: DateTime<Utc>) -> Option<&Identity> {
        match self {
            Session::Authenticated(identity) if identity.expires_at > now => Some(identity),
            _ => None,
        }
    }

    pub fn access_at(&self, now: DateTime<Utc>) -> Access {
        match self.identity_at(now) {
            Some(identity) => Access {
                authenticated: true,
                admin: identity.role == Role::Admin,
            },
            None => Access::anonymous(),
        }
    }
}

/// Access
///
/// Snapshot of the two predicates the route guard is allowed to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Access {
    pub authenticated: bool,
    pub admin: bool,
}

impl Access {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user() -> Self {
        Self {
            authenticated: true,
            admin: false,
        }
    }

    pub fn admin() -> Self {
        Self {
            authenticated: true,
            admin: true,
        }
    }
}

// --- Session State ---

/// SessionStore
///
/// The single source of truth about who is using this client. It owns its Token Store, the
/// transport whose credential header it drives, and the clock it re-validates against.
///
/// A `SessionStore` can only be obtained through [`SessionStore::initialize`], which restores the
/// session from storage before returning; a guard can never observe an uninitialized store.
///
/// Reads (`is_authenticated`, `is_admin`, `subject`, `role`) re-check expiry on every call, so a
/// session that lapses while the client is open stops being trusted immediately. `revalidate`
/// additionally performs the cleanup (storage and header) for a lapsed session.
pub struct SessionStore {
    session: Session,
    tokens: TokenStoreState,
    transport: TransportState,
    clock: ClockState,
}

impl SessionStore {
    /// Builds the store and runs `initialize_from_storage`.
    pub fn initialize(tokens: TokenStoreState, transport: TransportState, clock: ClockState) -> Self {
        let mut store = Self {
            session: Session::Anonymous,
            tokens,
            transport,
            clock,
        };
        store.initialize_from_storage();
        store
    }

    /// initialize_from_storage
    ///
    /// Seeds the session from the stored token. An absent token yields an anonymous session.
    /// A malformed or expired token also yields an anonymous session and is removed from storage,
    /// so the client never holds a token without a matching session.
    pub fn initialize_from_storage(&mut self) {
        let Some(token) = self.tokens.load() else {
            tracing::debug!("no stored token, starting anonymous");
            self.transport.clear_bearer();
            self.session = Session::Anonymous;
            return;
        };

        match validate_claims(&token, self.clock.now()) {
            Ok(claims) => {
                tracing::info!(subject = %claims.subject, role = claims.role.as_str(), "session restored");
                self.transport.set_bearer(&token);
                self.session = Session::Authenticated(Identity {
                    subject: claims.subject,
                    role: claims.role,
                    expires_at: claims.expires_at,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding stored token");
                self.reset();
            }
        }
    }

    /// login
    ///
    /// Adopts the result of a successful server authentication: persists the token, replaces any
    /// prior session and attaches the bearer header. Subject and role come from the response;
    /// the expiry instant comes from the token's `exp` claim.
    ///
    /// A token that cannot be decoded, or is already expired, is not kept: the store ends up
    /// anonymous and the error is returned so the caller can report a failed login.
    pub fn login(&mut self, token: &str, subject: &str, role: Role) -> Result<(), SessionError> {
        let claims = match validate_claims(token, self.clock.now()) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!(subject, error = %e, "rejecting login token");
                self.reset();
                return Err(e);
            }
        };

        self.tokens.save(token);
        self.transport.set_bearer(token);
        self.session = Session::Authenticated(Identity {
            subject: subject.to_string(),
            role,
            expires_at: claims.expires_at,
        });

        tracing::info!(subject, role = role.as_str(), expires_at = %claims.expires_at, "logged in");
        Ok(())
    }

    /// logout
    ///
    /// Clears storage, the session and the bearer header. Safe to call when already anonymous.
    pub fn logout(&mut self) {
        if let Some(identity) = self.identity() {
            tracing::info!(subject = %identity.subject, "logged out");
        }
        self.reset();
    }

    /// Collapses a session whose expiry has passed since it was established, with the same cleanup
    /// as a failed restore. Returns whether a session is still active.
    pub fn revalidate(&mut self) -> bool {
        let now = self.clock.now();
        let lapsed = match &self.session {
            Session::Anonymous => return false,
            Session::Authenticated(identity) if identity.expires_at > now => return true,
            Session::Authenticated(identity) => identity.subject.clone(),
        };

        tracing::warn!(subject = %lapsed, "session expired");
        self.reset();
        false
    }

    fn reset(&mut self) {
        self.tokens.clear();
        self.transport.clear_bearer();
        self.session = Session::Anonymous;
    }

    // --- Read-only views ---

    pub fn identity(&self) -> Option<&Identity> {
        self.session.identity_at(self.clock.now())
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.identity().is_some_and(|identity| identity.role == Role::Admin)
    }

    pub fn subject(&self) -> Option<&str> {
        self.identity().map(|identity| identity.subject.as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|identity| identity.role)
    }

    /// The guard's input, evaluated once against a single clock reading.
    pub fn access(&self) -> Access {
        self.session.access_at(self.clock.now())
    }

    pub fn view(&self) -> SessionView {
        let now = self.clock.now();
        let access = self.session.access_at(now);
        let identity = self.session.identity_at(now);
        SessionView {
            is_authenticated: access.authenticated,
            is_admin: access.admin,
            subject: identity.map(|i| i.subject.clone()),
            role: identity.map(|i| i.role),
            expires_at: identity.map(|i| i.expires_at),
        }
    }
}

/// SessionState
///
/// The session container as shared by the local shell. Every mutator runs to completion under the
/// write lock; the lock is never held across an `.await`.
pub type SessionState = Arc<RwLock<SessionStore>>;
