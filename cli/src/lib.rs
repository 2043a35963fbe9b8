//! Shared types for the `subscriptly` binary.
//!
//! A [`Fixture`] describes what the purchase service would answer; the binary
//! builds an [`InMemoryBackend`] from it and runs the real provider on top.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use subscriptly_identity::{AppleCredential, IdentityError, IdentityProvider, IdentityResult};
use subscriptly_purchases::{
    Alert, AlertPresenter, EntitlementProvider, InMemoryBackend, Platform, PlatformCredentials,
    PurchasesConfig, PurchasesError, SubscriptionState,
};
use subscriptly_types::{AppUserId, CustomerInfo, EntitlementId, Offerings};

/// Where iOS users manage App Store subscriptions.
pub const APP_STORE_SUBSCRIPTIONS_URL: &str = "https://apps.apple.com/account/subscriptions";

/// Top-level `subscriptly` subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    #[command(flatten)]
    Store(StoreCommand),
    /// Sign in with a saved Sign in with Apple credential
    SignIn {
        /// Credential JSON file
        #[arg(long)]
        credential: PathBuf,

        /// Profile store; defaults to the platform data directory
        #[arg(long)]
        profile: Option<PathBuf>,
    },
}

/// Subcommands that run against the fixture's purchase service.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    /// Show the subscription status
    Status,
    /// List the packages in the current offering
    Offerings,
    /// Buy a package from the current offering
    Purchase {
        /// Package identifier, e.g. `$rc_monthly`
        package: String,
    },
    /// Restore previous purchases
    Restore,
}

/// A failure the fixture injects into one backend call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureError {
    Cancelled,
    Network(String),
    Store(String),
    InvalidCredentials(String),
    ProductNotAvailable(String),
}

impl From<FixtureError> for PurchasesError {
    fn from(e: FixtureError) -> Self {
        match e {
            FixtureError::Cancelled => Self::PurchaseCancelled,
            FixtureError::Network(m) => Self::Network(m),
            FixtureError::Store(m) => Self::Store(m),
            FixtureError::InvalidCredentials(m) => Self::InvalidCredentials(m),
            FixtureError::ProductNotAvailable(m) => Self::ProductNotAvailable(m),
        }
    }
}

/// Failures injected per call, each consumed once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureFailures {
    #[serde(default)]
    pub configure: Option<FixtureError>,
    #[serde(default)]
    pub customer_info: Option<FixtureError>,
    #[serde(default)]
    pub offerings: Option<FixtureError>,
    #[serde(default)]
    pub purchase: Option<FixtureError>,
    #[serde(default)]
    pub restore: Option<FixtureError>,
}

/// A scripted purchase service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    /// Platform name as the app shell reports it (`ios`, `android`, ...).
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default)]
    pub credentials: PlatformCredentials,
    #[serde(default)]
    pub entitlement_id: EntitlementId,
    #[serde(default)]
    pub app_user_id: Option<AppUserId>,
    /// Ledger at startup; empty if absent.
    #[serde(default)]
    pub customer_info: Option<CustomerInfo>,
    /// What a restore yields; the current ledger if absent.
    #[serde(default)]
    pub restorable: Option<CustomerInfo>,
    #[serde(default)]
    pub offerings: Offerings,
    #[serde(default)]
    pub fail: FixtureFailures,
}

fn default_platform() -> String {
    "ios".to_string()
}

impl Fixture {
    /// Parses a fixture from JSON.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a fixture from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading fixture {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("parsing fixture {}", path.display()))
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        Platform::from_os(&self.platform)
    }

    /// Builds the provider config for the fixture's platform.
    #[must_use]
    pub fn config(&self) -> PurchasesConfig {
        PurchasesConfig {
            entitlement_id: self.entitlement_id.clone(),
            ..PurchasesConfig::for_platform(&self.credentials, &self.platform())
        }
    }

    /// Builds a backend that answers as the fixture describes.
    #[must_use]
    pub fn backend(&self) -> InMemoryBackend {
        let user = self.app_user_id.clone().unwrap_or_else(AppUserId::anonymous);
        let info = self
            .customer_info
            .clone()
            .unwrap_or_else(|| CustomerInfo::empty(user.clone()));
        let backend = InMemoryBackend::new(user)
            .with_customer_info(info)
            .with_offerings(self.offerings.clone())
            .granting(self.entitlement_id.clone());

        if let Some(restorable) = &self.restorable {
            backend.set_restorable(restorable.clone());
        }
        let fail = self.fail.clone();
        if let Some(e) = fail.configure {
            backend.fail_next_configure(e.into());
        }
        if let Some(e) = fail.customer_info {
            backend.fail_next_customer_info(e.into());
        }
        if let Some(e) = fail.offerings {
            backend.fail_next_offerings(e.into());
        }
        if let Some(e) = fail.purchase {
            backend.fail_next_purchase(e.into());
        }
        if let Some(e) = fail.restore {
            backend.fail_next_restore(e.into());
        }
        backend
    }

    /// Builds a provider over a fresh backend.
    pub fn provider(&self, alerts: Arc<dyn AlertPresenter>) -> EntitlementProvider {
        EntitlementProvider::new(self.config(), Arc::new(self.backend()), alerts)
    }
}

/// What the home screen shows about the subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionSummary {
    pub ready: bool,
    pub subscribed: bool,
    /// `Active` or `Inactive`.
    pub status: &'static str,
    /// Long-form expiration date, `None` for lifetime or unsubscribed.
    pub expires: Option<String>,
    pub manage_url: Option<String>,
    pub error: Option<String>,
}

impl SubscriptionSummary {
    #[must_use]
    pub fn from_state(
        state: &SubscriptionState,
        entitlement: &EntitlementId,
        platform: &Platform,
    ) -> Self {
        let expires = state
            .entitlement(entitlement)
            .and_then(|e| e.expiration_date)
            .map(format_expiration);
        let manage_url = state
            .customer_info()
            .and_then(|i| i.management_url.clone())
            .or_else(|| {
                (*platform == Platform::Ios).then(|| APP_STORE_SUBSCRIPTIONS_URL.to_string())
            });

        Self {
            ready: state.is_ready(),
            subscribed: state.is_subscribed(),
            status: if state.is_subscribed() { "Active" } else { "Inactive" },
            expires,
            manage_url,
            error: state.error().map(|e| e.message.clone()),
        }
    }
}

/// Formats a date the way the home screen does, e.g. `February 1, 2026`.
#[must_use]
pub fn format_expiration(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Prints alerts to stdout as a single "title: message" line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleAlerts;

impl AlertPresenter for ConsoleAlerts {
    fn present(&self, alert: Alert) {
        println!("[{}] {}", alert.title, alert.message);
    }
}

/// Sign-in dialog stand-in that returns a credential saved as JSON.
#[derive(Debug, Clone)]
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl IdentityProvider for CredentialFile {
    async fn sign_in(&self) -> IdentityResult<AppleCredential> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            IdentityError::SignInFailed(format!("{}: {e}", self.path.display()))
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
