//! Identity token decoding.
//!
//! Sign in with Apple returns a JWT: `base64url(header).base64url(claims).base64url(signature)`.
//!
//! The claims we read:
//! - `iss`: issuer (`https://appleid.apple.com`)
//! - `aud`: the app's bundle identifier
//! - `sub`: stable user identifier, the same on every sign-in
//! - `email`: relay or real address (optional)
//! - `iat` / `exp`: issued-at and expiry (seconds since epoch)
//!
//! The signature is not checked here; the token is forwarded to a back end
//! that verifies it against Apple's published keys.

use crate::error::{IdentityError, IdentityResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Issuer of Sign in with Apple tokens.
pub const APPLE_ISSUER: &str = "https://appleid.apple.com";

/// The decoded claims (matches Apple's JSON structure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub iss: String,
    /// Audience. Apple sends a single string.
    pub aud: String,
    /// Stable user identifier.
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiry timestamp (seconds since epoch).
    pub exp: i64,
}

/// A decoded identity token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityToken {
    /// The raw token string.
    raw: String,
    claims: IdentityClaims,
}

impl IdentityToken {
    /// Decodes a token string.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not three dot-separated base64url
    /// segments or the claims segment is not valid claims JSON.
    pub fn parse(token: &str) -> IdentityResult<Self> {
        let token = token.trim();

        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Err(IdentityError::InvalidToken(
                "token must have exactly three parts separated by dots".to_string(),
            ));
        }
        if parts.iter().any(|p| p.is_empty()) {
            return Err(IdentityError::InvalidToken("token has an empty segment".to_string()));
        }

        let claims_json = URL_SAFE_NO_PAD.decode(parts[1]).map_err(|e| {
            IdentityError::InvalidToken(format!("invalid claims base64: {e}"))
        })?;

        let claims: IdentityClaims = serde_json::from_slice(&claims_json).map_err(|e| {
            IdentityError::InvalidClaims(format!("invalid claims JSON: {e}"))
        })?;

        if claims.sub.trim().is_empty() {
            return Err(IdentityError::InvalidClaims("empty subject".to_string()));
        }

        Ok(Self {
            raw: token.to_string(),
            claims,
        })
    }

    /// Returns the raw token string.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn claims(&self) -> &IdentityClaims {
        &self.claims
    }

    /// Returns the stable user identifier.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.claims.sub
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.claims.email.as_deref()
    }

    /// Returns true if the token was issued by Apple.
    #[must_use]
    pub fn is_apple_issued(&self) -> bool {
        self.claims.iss == APPLE_ISSUER
    }

    /// Returns the expiry as a date, if it is representable.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.claims.exp, 0).single()
    }

    /// Returns true if the token has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.claims.exp
    }
}
