//! Provider configuration.
//!
//! The credential is selected by the app shell from the running platform and
//! handed to the provider as a plain value; the provider never inspects the
//! platform itself.

use crate::error::{PurchasesError, PurchasesResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use subscriptly_types::EntitlementId;

/// Number of leading characters of an API key kept visible in `Debug` output.
const KEY_PREFIX_VISIBLE: usize = 5;

/// A public SDK API key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key for passing to the SDK.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible: String = self.0.chars().take(KEY_PREFIX_VISIBLE).collect();
        write!(f, "ApiKey({visible}…)")
    }
}

/// The platform the app is running on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    /// Any platform the purchase service has no credential for (web, desktop).
    Other(String),
}

impl Platform {
    /// Parses a platform name as reported by the app shell.
    #[must_use]
    pub fn from_os(os: &str) -> Self {
        match os.to_ascii_lowercase().as_str() {
            "ios" => Self::Ios,
            "android" => Self::Android,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Per-platform API keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCredentials {
    #[serde(default)]
    pub ios: Option<ApiKey>,
    #[serde(default)]
    pub android: Option<ApiKey>,
}

impl PlatformCredentials {
    /// Returns the credential for `platform`.
    ///
    /// Platforms other than iOS and Android have no credential; configuring
    /// the provider on them is a no-op.
    #[must_use]
    pub fn credential_for(&self, platform: &Platform) -> Option<ApiKey> {
        match platform {
            Platform::Ios => self.ios.clone(),
            Platform::Android => self.android.clone(),
            Platform::Other(_) => None,
        }
    }
}

/// Verbosity requested from the purchase SDK's own logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
}

/// Configuration for the entitlement provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasesConfig {
    /// Credential passed to `configure`; `None` skips configuration.
    #[serde(default)]
    pub credential: Option<ApiKey>,
    /// Entitlement that defines "subscribed".
    #[serde(default)]
    pub entitlement_id: EntitlementId,
    /// SDK log level.
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for PurchasesConfig {
    fn default() -> Self {
        Self {
            credential: None,
            entitlement_id: EntitlementId::premium(),
            log_level: LogLevel::Verbose,
        }
    }
}

impl PurchasesConfig {
    /// Builds a config with the credential for `platform`.
    #[must_use]
    pub fn for_platform(credentials: &PlatformCredentials, platform: &Platform) -> Self {
        Self {
            credential: credentials.credential_for(platform),
            ..Default::default()
        }
    }

    /// Parses a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PurchasesError::Serialization`] if the JSON is malformed.
    pub fn from_json_str(json: &str) -> PurchasesResult<Self> {
        serde_json::from_str(json).map_err(PurchasesError::from)
    }
}
