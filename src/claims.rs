use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::dangerous::insecure_decode;
use serde::{Deserialize, Serialize};

use crate::{error::SessionError, models::Role};

/// Claims
///
/// The subset of the bearer token's payload the client reads. Everything else the issuer puts
/// in the token is ignored.
///
/// **Trust boundary**: these claims are decoded WITHOUT signature verification. They only decide
/// which UI the visitor is routed to. Every resource request is re-authorized by the API server,
/// which is the only party able to verify the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the username the token was issued to.
    pub sub: String,
    /// Role claim as issued by the server ("ADMIN" / "USER"). Optional in the payload.
    #[serde(default)]
    pub role: Option<String>,
    /// Expiration Time (exp): seconds since the Unix epoch. NumericDate may be fractional.
    pub exp: f64,
}

/// TokenClaims
///
/// The decoded, typed view of a token: who, with which role, until when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl TokenClaims {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// decode_claims
///
/// Splits the token and parses its claim segment into `TokenClaims`.
///
/// Performs no signature, audience or expiry validation, whatever `alg` the issuer signed with.
/// Fails with `SessionError::MalformedToken` when the token does not have the
/// `header.payload.signature` shape, when a segment is not valid base64url JSON, or when
/// `sub`/`exp` are missing. A fractional `exp` is truncated to whole seconds.
pub fn decode_claims(token: &str) -> Result<TokenClaims, SessionError> {
    // Expiry is checked by `validate_claims` so that an expired token is reported as such.
    let token_data = insecure_decode::<Claims>(token)
        .map_err(|e| SessionError::MalformedToken(e.to_string()))?;

    let claims = token_data.claims;
    if claims.sub.is_empty() {
        return Err(SessionError::MalformedToken("empty subject".to_string()));
    }

    let out_of_range = || SessionError::MalformedToken(format!("exp out of range: {}", claims.exp));
    if !claims.exp.is_finite() {
        return Err(out_of_range());
    }
    let expires_at = Utc
        .timestamp_opt(claims.exp.floor() as i64, 0)
        .single()
        .ok_or_else(out_of_range)?;

    tracing::debug!(subject = %claims.sub, exp = claims.exp, "decoded token claims");

    Ok(TokenClaims {
        role: Role::from_claim(claims.role.as_deref()),
        subject: claims.sub,
        expires_at,
    })
}

/// validate_claims
///
/// `decode_claims` followed by the expiry check against `now`.
pub fn validate_claims(token: &str, now: DateTime<Utc>) -> Result<TokenClaims, SessionError> {
    let claims = decode_claims(token)?;
    if claims.is_expired_at(now) {
        return Err(SessionError::ExpiredToken);
    }
    Ok(claims)
}
