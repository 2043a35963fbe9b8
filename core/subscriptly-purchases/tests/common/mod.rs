//! Shared test helpers for provider tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use std::sync::{Arc, Mutex};
use subscriptly_purchases::{
    Alert, AlertKind, AlertPresenter, EntitlementProvider, InMemoryBackend, PurchasesConfig,
    SubscriptionState,
};
use subscriptly_types::{
    AppUserId, CustomerInfo, EntitlementInfo, Offering, Offerings, Package, PackageType,
    StoreProduct,
};

/// Presenter that records every alert it is asked to show.
#[derive(Debug, Default)]
pub struct RecordingAlerts {
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingAlerts {
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<AlertKind> {
        self.alerts().into_iter().map(|a| a.kind).collect()
    }

    pub fn failure_count(&self) -> usize {
        self.alerts().iter().filter(|a| a.kind.is_failure()).count()
    }
}

impl AlertPresenter for RecordingAlerts {
    fn present(&self, alert: Alert) {
        self.alerts.lock().unwrap().push(alert);
    }
}

pub fn user() -> AppUserId {
    AppUserId::new("user-1").unwrap()
}

pub fn empty_info() -> CustomerInfo {
    CustomerInfo::empty(user())
}

pub fn premium_info() -> CustomerInfo {
    CustomerInfo::empty(user()).with_entitlement(EntitlementInfo::active(
        "premium",
        "monthly_sub",
        Some(Utc::now() + Duration::days(30)),
    ))
}

pub fn expired_premium_info() -> CustomerInfo {
    CustomerInfo::empty(user()).with_entitlement(EntitlementInfo::active(
        "premium",
        "monthly_sub",
        Some(Utc::now() - Duration::days(1)),
    ))
}

pub fn package(offering: &str, id: &str, package_type: PackageType, price: &str) -> Package {
    Package {
        identifier: id.to_string(),
        package_type,
        product: StoreProduct {
            identifier: format!("{offering}.{id}"),
            title: "Premium Access".to_string(),
            description: "Unlock all features".to_string(),
            price_string: price.to_string(),
            price: 4.99,
            currency_code: "USD".to_string(),
        },
        offering_identifier: offering.to_string(),
    }
}

pub fn offering(id: &str) -> Offering {
    Offering {
        identifier: id.to_string(),
        server_description: format!("Offering {id}"),
        available_packages: vec![
            package(id, "$rc_monthly", PackageType::Monthly, "$4.99"),
            package(id, "$rc_annual", PackageType::Annual, "$39.99"),
        ],
    }
}

pub fn catalog(id: &str) -> Offerings {
    Offerings::with_current(offering(id))
}

/// Routes provider logs to the test harness output. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn make_provider(
    backend: &Arc<InMemoryBackend>,
    config: PurchasesConfig,
) -> (EntitlementProvider, Arc<RecordingAlerts>) {
    init_tracing();
    let alerts = Arc::new(RecordingAlerts::default());
    let provider = EntitlementProvider::new(config, backend.clone(), alerts.clone());
    (provider, alerts)
}

/// Waits (bounded) until the provider's state satisfies `predicate`.
pub async fn wait_for_state(
    provider: &EntitlementProvider,
    predicate: impl FnMut(&SubscriptionState) -> bool,
) {
    let mut rx = provider.subscribe();
    tokio::time::timeout(std::time::Duration::from_secs(5), rx.wait_for(predicate))
        .await
        .expect("timed out waiting for provider state")
        .expect("state channel closed");
}
