//! Error types for the identity module.

use thiserror::Error;

/// Identity-specific errors.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The identity token is not a well-formed JWT.
    #[error("invalid identity token: {0}")]
    InvalidToken(String),

    /// The token's claims are missing or malformed.
    #[error("invalid identity claims: {0}")]
    InvalidClaims(String),

    /// The token's `sub` does not match the credential's user.
    #[error("identity token subject does not match credential user")]
    SubjectMismatch,

    /// The token has expired.
    #[error("identity token expired at {0}")]
    Expired(String),

    /// The user dismissed the sign-in dialog.
    #[error("sign-in was cancelled")]
    Cancelled,

    /// The platform sign-in service failed.
    #[error("sign-in failed: {0}")]
    SignInFailed(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<std::io::Error> for IdentityError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;
