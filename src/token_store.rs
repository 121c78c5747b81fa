use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;

/// File name of the single durable key holding the raw token.
pub const TOKEN_KEY: &str = "token";

// 1. TokenStore Contract
/// TokenStore
///
/// Durable home of the one bearer token of a client profile. The token is opaque here: the store
/// never parses it.
///
/// None of the operations fail observably. A storage failure on `save` leaves the client logged in
/// for the current run only; a failure on `load` looks like "no token".
pub trait TokenStore: Send + Sync {
    /// Writes the token, replacing any prior value.
    fn save(&self, token: &str);

    /// Returns the stored token, if any. No side effects.
    fn load(&self) -> Option<String>;

    /// Removes the stored token. Idempotent.
    fn clear(&self);
}

// 2. The Durable Implementation
/// FileTokenStore
///
/// Keeps the token in `<profile_dir>/token`. The file holds the raw token string and nothing else.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store rooted at the given profile directory. The directory is created on first `save`.
    pub fn new(profile_dir: impl AsRef<Path>) -> Self {
        Self {
            path: profile_dir.as_ref().join(TOKEN_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, token: &str) {
        if let Err(e) = self.write(token) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist token");
        }
    }

    fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read token");
                None
            }
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove token");
            }
        }
    }
}

// 3. The In-Memory Implementation
/// MemoryTokenStore
///
/// Non-durable store for ephemeral profiles and tests. Clones share the same slot, so a test can
/// keep a handle and inspect what the session wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded with a token, as if left behind by a previous run.
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.save(token);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, token: &str) {
        *self.slot.lock() = Some(token.to_string());
    }

    fn load(&self) -> Option<String> {
        self.slot.lock().clone()
    }

    fn clear(&self) {
        self.slot.lock().take();
    }
}

/// TokenStoreState
///
/// The shared handle Session State owns.
pub type TokenStoreState = Arc<dyn TokenStore>;
