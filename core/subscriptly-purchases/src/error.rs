//! Error types for the purchases layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for purchases operations.
pub type PurchasesResult<T> = Result<T, PurchasesError>;

/// Errors reported by the purchase service or raised while talking to it.
#[derive(Debug, Clone, Error)]
pub enum PurchasesError {
    /// The user dismissed the store's purchase sheet.
    #[error("purchase was cancelled")]
    PurchaseCancelled,

    /// The store refused the payment.
    #[error("purchase not allowed: {0}")]
    PurchaseNotAllowed(String),

    /// The product is not available for purchase in this storefront.
    #[error("product not available: {0}")]
    ProductNotAvailable(String),

    /// A purchase for this product is already being processed by the store.
    #[error("payment pending: {0}")]
    PaymentPending(String),

    /// The configured credential was rejected.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// An SDK call was made before `configure`.
    #[error("purchases not configured")]
    NotConfigured,

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Store error.
    #[error("store error: {0}")]
    Store(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The backend's update channel was closed.
    #[error("listener channel closed")]
    ListenerClosed,
}

impl PurchasesError {
    /// Returns true if this error is the user cancelling the store sheet.
    ///
    /// Cancellation is a normal outcome: it is never recorded as the
    /// provider's last error and never alerted.
    #[must_use]
    pub fn is_user_cancelled(&self) -> bool {
        matches!(self, Self::PurchaseCancelled)
    }
}

impl From<serde_json::Error> for PurchasesError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// The last failure of a provider operation, as exposed to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    /// Human-readable message.
    pub message: String,
    /// True if the failure was the user cancelling.
    pub user_cancelled: bool,
}

impl OperationError {
    /// Creates a genuine (non-cancellation) failure.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            user_cancelled: false,
        }
    }
}

impl From<&PurchasesError> for OperationError {
    fn from(e: &PurchasesError) -> Self {
        Self {
            message: e.to_string(),
            user_cancelled: e.is_user_cancelled(),
        }
    }
}

impl std::fmt::Display for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
