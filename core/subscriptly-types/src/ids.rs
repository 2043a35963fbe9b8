//! Identifier types used by the purchases layer.
//!
//! Both identifiers are opaque strings assigned by the purchase service or the
//! app's dashboard configuration, so they wrap `String` rather than a UUID.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Prefix the purchase service uses for app user IDs it generated itself.
pub const ANONYMOUS_ID_PREFIX: &str = "$RCAnonymousID:";

/// Identifier of the user the purchase service keys its ledger on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppUserId(String);

impl AppUserId {
    /// Wraps an existing app user ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is empty or only whitespace.
    pub fn new(id: impl Into<String>) -> crate::Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::InvalidIdentifier("app user id is empty".to_string()));
        }
        Ok(Self(id))
    }

    /// Generates an anonymous ID in the purchase service's format.
    #[must_use]
    pub fn anonymous() -> Self {
        Self(format!("{ANONYMOUS_ID_PREFIX}{}", Uuid::new_v4().simple()))
    }

    /// Returns true if this ID was generated for an anonymous user.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.0.starts_with(ANONYMOUS_ID_PREFIX)
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AppUserId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Identifier of an entitlement configured for the app (e.g. `premium`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntitlementId(String);

impl EntitlementId {
    /// The entitlement that unlocks the premium tier.
    pub const PREMIUM: &'static str = "premium";

    /// Creates an entitlement ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The `premium` entitlement.
    #[must_use]
    pub fn premium() -> Self {
        Self(Self::PREMIUM.to_string())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntitlementId {
    fn default() -> Self {
        Self::premium()
    }
}

impl fmt::Display for EntitlementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntitlementId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
