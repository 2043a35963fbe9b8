//! Purchase service abstraction.
//!
//! Defines the trait the provider uses to talk to the external purchase SDK,
//! so the provider can run against the real SDK bridge, a fixture, or an
//! in-memory test double.

use crate::config::{ApiKey, LogLevel};
use crate::error::PurchasesResult;
use crate::listener::{ListenerId, ListenerRegistration};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use subscriptly_types::{CustomerInfo, Offerings, Package};

/// What the store returns after a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOutcome {
    /// The product that was bought.
    pub product_identifier: String,
    /// The ledger snapshot after the purchase.
    pub customer_info: CustomerInfo,
}

/// The external purchase SDK.
///
/// All async calls must eventually settle. Listeners may receive zero or more
/// pushes after `configure`.
#[async_trait]
pub trait PurchasesBackend: Send + Sync {
    /// Sets the SDK's own log verbosity.
    fn set_log_level(&self, level: LogLevel);

    /// Configures the SDK with a platform credential.
    async fn configure(&self, credential: &ApiKey) -> PurchasesResult<()>;

    /// Pulls the current ledger snapshot.
    async fn customer_info(&self) -> PurchasesResult<CustomerInfo>;

    /// Pulls the offerings catalog.
    async fn offerings(&self) -> PurchasesResult<Offerings>;

    /// Runs the store purchase flow for `package`.
    async fn purchase_package(&self, package: &Package) -> PurchasesResult<PurchaseOutcome>;

    /// Restores prior purchases for the current identity.
    async fn restore_purchases(&self) -> PurchasesResult<CustomerInfo>;

    /// Registers a listener for pushed snapshots.
    fn add_customer_info_listener(&self) -> ListenerRegistration;

    /// Unregisters a listener. Returns false if it was not registered.
    fn remove_customer_info_listener(&self, id: ListenerId) -> bool;
}
