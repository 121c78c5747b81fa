use std::{env, path::PathBuf};

/// AppConfig
///
/// Holds the client's configuration. Immutable once loaded and pulled into the shell state via
/// FromRef.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Base URL of the library REST API, including its `/api` prefix.
    pub api_base_url: String,
    // Directory of the client profile; the token store lives inside it.
    pub profile_dir: PathBuf,
    // Address the local shell listens on.
    pub bind_addr: String,
    // Runtime environment marker. Selects log format and which settings are mandatory.
    pub env: Env,
}

/// Env
///
/// Runtime context: local development or a production deployment.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const LOCAL_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_PROFILE_DIR: &str = ".libro";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

impl Default for AppConfig {
    /// default
    ///
    /// Safe, non-panicking configuration for tests.
    fn default() -> Self {
        Self {
            api_base_url: LOCAL_API_URL.to_string(),
            profile_dir: PathBuf::from(DEFAULT_PROFILE_DIR),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables (`APP_ENV`, `LIBRO_API_URL`,
    /// `LIBRO_PROFILE_DIR`, `LIBRO_BIND_ADDR`).
    ///
    /// # Panics
    /// Panics in production when `LIBRO_API_URL` is not set. A production client must never fall
    /// back to a developer's local API.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let api_base_url = match env {
            Env::Production => env::var("LIBRO_API_URL")
                .expect("FATAL: LIBRO_API_URL must be set in production."),
            Env::Local => env::var("LIBRO_API_URL").unwrap_or_else(|_| LOCAL_API_URL.to_string()),
        };

        let profile_dir = env::var("LIBRO_PROFILE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PROFILE_DIR));

        let bind_addr =
            env::var("LIBRO_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Self {
            api_base_url,
            profile_dir,
            bind_addr,
            env,
        }
    }
}
