//! In-memory purchase backend.
//!
//! Simulates the purchase service's ledger for one user. Failures are queued
//! per call and consumed in order, so a test can script "the next purchase
//! fails" without touching later calls. Purchases and restores update the
//! ledger but never push; use [`InMemoryBackend::push_customer_info`] to
//! simulate an out-of-band update.

use crate::backend::{PurchaseOutcome, PurchasesBackend};
use crate::config::{ApiKey, LogLevel};
use crate::error::{PurchasesError, PurchasesResult};
use crate::listener::{CustomerInfoListeners, ListenerId, ListenerRegistration};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use subscriptly_types::{
    AppUserId, CustomerInfo, EntitlementId, EntitlementInfo, Offerings, Package, PackageType,
};

/// How many times each backend call was made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub configure: usize,
    pub customer_info: usize,
    pub offerings: usize,
    pub purchase: usize,
    pub restore: usize,
}

#[derive(Debug, Default)]
struct Failures {
    configure: VecDeque<PurchasesError>,
    customer_info: VecDeque<PurchasesError>,
    offerings: VecDeque<PurchasesError>,
    purchase: VecDeque<PurchasesError>,
    restore: VecDeque<PurchasesError>,
}

#[derive(Debug)]
struct Ledger {
    customer_info: CustomerInfo,
    /// Snapshot a restore yields; `None` restores the current ledger unchanged.
    restorable: Option<CustomerInfo>,
    offerings: Offerings,
    granted_entitlement: EntitlementId,
    configured_with: Option<ApiKey>,
    log_level: Option<LogLevel>,
    calls: CallCounts,
    failures: Failures,
}

/// A purchase backend that keeps its ledger in memory.
#[derive(Debug)]
pub struct InMemoryBackend {
    ledger: Mutex<Ledger>,
    listeners: CustomerInfoListeners,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new(AppUserId::anonymous())
    }
}

impl InMemoryBackend {
    /// Creates a backend for `app_user_id` with an empty ledger and no offerings.
    #[must_use]
    pub fn new(app_user_id: AppUserId) -> Self {
        Self {
            ledger: Mutex::new(Ledger {
                customer_info: CustomerInfo::empty(app_user_id),
                restorable: None,
                offerings: Offerings::default(),
                granted_entitlement: EntitlementId::premium(),
                configured_with: None,
                log_level: None,
                calls: CallCounts::default(),
                failures: Failures::default(),
            }),
            listeners: CustomerInfoListeners::new(),
        }
    }

    #[must_use]
    pub fn with_customer_info(self, info: CustomerInfo) -> Self {
        self.lock().customer_info = info;
        self
    }

    #[must_use]
    pub fn with_offerings(self, offerings: Offerings) -> Self {
        self.lock().offerings = offerings;
        self
    }

    /// Sets the entitlement a successful purchase grants.
    #[must_use]
    pub fn granting(self, entitlement: EntitlementId) -> Self {
        self.lock().granted_entitlement = entitlement;
        self
    }

    /// Replaces the ledger without notifying listeners.
    pub fn set_customer_info(&self, info: CustomerInfo) {
        self.lock().customer_info = info;
    }

    pub fn set_offerings(&self, offerings: Offerings) {
        self.lock().offerings = offerings;
    }

    /// Sets what the next restores yield (purchases made on another install).
    pub fn set_restorable(&self, info: CustomerInfo) {
        self.lock().restorable = Some(info);
    }

    /// Replaces the ledger and pushes it to every listener.
    ///
    /// Returns how many listeners received it.
    pub fn push_customer_info(&self, info: CustomerInfo) -> usize {
        self.lock().customer_info = info.clone();
        self.listeners.notify(&info)
    }

    pub fn fail_next_configure(&self, error: PurchasesError) {
        self.lock().failures.configure.push_back(error);
    }

    pub fn fail_next_customer_info(&self, error: PurchasesError) {
        self.lock().failures.customer_info.push_back(error);
    }

    pub fn fail_next_offerings(&self, error: PurchasesError) {
        self.lock().failures.offerings.push_back(error);
    }

    pub fn fail_next_purchase(&self, error: PurchasesError) {
        self.lock().failures.purchase.push_back(error);
    }

    pub fn fail_next_restore(&self, error: PurchasesError) {
        self.lock().failures.restore.push_back(error);
    }

    /// Returns the ledger as the service currently sees it.
    pub fn ledger(&self) -> CustomerInfo {
        self.lock().customer_info.clone()
    }

    pub fn calls(&self) -> CallCounts {
        self.lock().calls
    }

    /// Returns the credential passed to `configure`, if any.
    pub fn configured_with(&self) -> Option<ApiKey> {
        self.lock().configured_with.clone()
    }

    pub fn log_level(&self) -> Option<LogLevel> {
        self.lock().log_level
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PurchasesBackend for InMemoryBackend {
    fn set_log_level(&self, level: LogLevel) {
        self.lock().log_level = Some(level);
    }

    async fn configure(&self, credential: &ApiKey) -> PurchasesResult<()> {
        let mut ledger = self.lock();
        ledger.calls.configure += 1;
        if let Some(e) = ledger.failures.configure.pop_front() {
            return Err(e);
        }
        ledger.configured_with = Some(credential.clone());
        Ok(())
    }

    async fn customer_info(&self) -> PurchasesResult<CustomerInfo> {
        let mut ledger = self.lock();
        ledger.calls.customer_info += 1;
        if let Some(e) = ledger.failures.customer_info.pop_front() {
            return Err(e);
        }
        Ok(ledger.customer_info.clone())
    }

    async fn offerings(&self) -> PurchasesResult<Offerings> {
        let mut ledger = self.lock();
        ledger.calls.offerings += 1;
        if let Some(e) = ledger.failures.offerings.pop_front() {
            return Err(e);
        }
        Ok(ledger.offerings.clone())
    }

    async fn purchase_package(&self, package: &Package) -> PurchasesResult<PurchaseOutcome> {
        let mut ledger = self.lock();
        ledger.calls.purchase += 1;
        if let Some(e) = ledger.failures.purchase.pop_front() {
            return Err(e);
        }

        let now = Utc::now();
        let mut entitlement = EntitlementInfo::active(
            ledger.granted_entitlement.clone(),
            package.product.identifier.clone(),
            expiration_for(package.package_type, now),
        );
        entitlement.latest_purchase_date = Some(now);

        let mut info = ledger.customer_info.clone().with_entitlement(entitlement);
        info.request_date = now;
        ledger.customer_info = info.clone();

        Ok(PurchaseOutcome {
            product_identifier: package.product.identifier.clone(),
            customer_info: info,
        })
    }

    async fn restore_purchases(&self) -> PurchasesResult<CustomerInfo> {
        let mut ledger = self.lock();
        ledger.calls.restore += 1;
        if let Some(e) = ledger.failures.restore.pop_front() {
            return Err(e);
        }
        if let Some(restored) = ledger.restorable.clone() {
            ledger.customer_info = restored;
        }
        Ok(ledger.customer_info.clone())
    }

    fn add_customer_info_listener(&self) -> ListenerRegistration {
        self.listeners.register()
    }

    fn remove_customer_info_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}

/// Expiration of an entitlement bought through a package of `package_type` at `now`.
#[must_use]
pub fn expiration_for(package_type: PackageType, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let days = match package_type {
        PackageType::Lifetime => return None,
        PackageType::Annual => 365,
        PackageType::SixMonth => 182,
        PackageType::ThreeMonth => 91,
        PackageType::TwoMonth => 61,
        PackageType::Weekly => 7,
        PackageType::Monthly | PackageType::Custom | PackageType::Unknown => 30,
    };
    Some(now + Duration::days(days))
}
