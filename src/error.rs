use thiserror::Error;

/// SessionError
///
/// The only two failure kinds of the session core. Neither one is ever shown to the user:
/// Session State recovers from both by collapsing to an anonymous session and clearing the
/// stored token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The token's claim segment could not be parsed, or `sub`/`exp` were missing.
    #[error("malformed token: {0}")]
    MalformedToken(String),
    /// The token decoded cleanly but its `exp` instant is not in the future.
    #[error("token expired")]
    ExpiredToken,
}

/// ApiError
///
/// Failures of the outbound REST API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(u16),
}

impl ApiError {
    /// True when the server rejected the supplied credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status(401) | ApiError::Status(403))
    }
}
