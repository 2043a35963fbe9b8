//! Core type definitions for Subscriptly.
//!
//! This crate defines the session-scoped data the purchases layer mirrors
//! from the external purchase service:
//! - App user and entitlement identifiers
//! - Customer info snapshots (active entitlements with expirations)
//! - Offerings, packages and store products shown on the paywall
//!
//! Nothing here is persisted; the purchase service owns receipts and caches.

mod customer;
mod ids;
mod offering;

pub use customer::{CustomerInfo, EntitlementInfo, PeriodType, Store};
pub use ids::{AppUserId, EntitlementId, ANONYMOUS_ID_PREFIX};
pub use offering::{Offering, Offerings, Package, PackageType, StoreProduct};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}
