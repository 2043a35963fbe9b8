//! Entitlement synchronization for Subscriptly.
//!
//! Bridges the external purchase service, which both answers pulls and pushes
//! updates on its own, into a locally observable [`SubscriptionState`].
//!
//! # Components
//!
//! - **Backend**: the [`PurchasesBackend`] trait the purchase SDK bridge implements
//! - **Listeners**: push registrations with explicit unsubscribe handles
//! - **Provider**: [`EntitlementProvider`], which owns the state and exposes
//!   `fetch_offerings`, `purchase_package`, `restore_purchases` and
//!   `check_subscription`
//! - **Alerts**: the [`AlertPresenter`] seam for user-facing notifications
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use subscriptly_purchases::{
//!     EntitlementProvider, InMemoryBackend, PurchasesConfig, TracingAlertPresenter,
//! };
//!
//! # tokio_test::block_on(async {
//! let backend = Arc::new(InMemoryBackend::default());
//! let provider = EntitlementProvider::new(
//!     PurchasesConfig::default(),
//!     backend,
//!     Arc::new(TracingAlertPresenter),
//! );
//! provider.start().await;
//! assert!(provider.is_ready());
//! assert!(!provider.is_subscribed());
//! provider.stop().await;
//! # });
//! ```

mod alert;
mod backend;
mod config;
mod error;
pub mod listener;
pub mod memory;
mod outcome;
mod provider;
pub mod state;

pub use alert::{Alert, AlertKind, AlertPresenter, TracingAlertPresenter};
pub use backend::{PurchaseOutcome, PurchasesBackend};
pub use config::{ApiKey, LogLevel, Platform, PlatformCredentials, PurchasesConfig};
pub use error::{OperationError, PurchasesError, PurchasesResult};
pub use listener::{CustomerInfoListeners, ListenerId, ListenerRegistration};
pub use memory::{CallCounts, InMemoryBackend};
pub use outcome::{PurchaseResult, RestoreResult};
pub use provider::EntitlementProvider;
pub use state::SubscriptionState;
