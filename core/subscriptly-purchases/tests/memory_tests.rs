mod common;

use chrono::{Duration, Utc};
use common::{catalog, package, premium_info};
use subscriptly_purchases::memory::expiration_for;
use subscriptly_purchases::{ApiKey, InMemoryBackend, PurchasesBackend, PurchasesError};
use subscriptly_types::{EntitlementId, PackageType};

#[tokio::test]
async fn queued_failures_are_consumed_in_order() {
    let backend = InMemoryBackend::new(common::user());
    backend.fail_next_customer_info(PurchasesError::Network("one".into()));
    backend.fail_next_customer_info(PurchasesError::Network("two".into()));

    assert_eq!(
        backend.customer_info().await.unwrap_err().to_string(),
        "network error: one"
    );
    assert_eq!(
        backend.customer_info().await.unwrap_err().to_string(),
        "network error: two"
    );
    assert!(backend.customer_info().await.is_ok());
    assert_eq!(backend.calls().customer_info, 3);
}

#[tokio::test]
async fn purchase_updates_ledger() {
    let backend = InMemoryBackend::new(common::user()).with_offerings(catalog("default"));
    let pkg = package("default", "$rc_annual", PackageType::Annual, "$39.99");

    let outcome = backend.purchase_package(&pkg).await.unwrap();

    assert_eq!(outcome.product_identifier, "default.$rc_annual");
    assert!(backend
        .ledger()
        .has_active_entitlement(&EntitlementId::premium(), Utc::now()));
    assert_eq!(backend.calls().purchase, 1);
}

#[tokio::test]
async fn restore_without_restorable_returns_ledger() {
    let backend = InMemoryBackend::new(common::user()).with_customer_info(premium_info());
    let restored = backend.restore_purchases().await.unwrap();
    assert_eq!(restored, backend.ledger());
}

#[tokio::test]
async fn configure_records_key() {
    let backend = InMemoryBackend::default();
    backend.configure(&ApiKey::new("k")).await.unwrap();
    assert_eq!(backend.configured_with(), Some(ApiKey::new("k")));
    assert_eq!(backend.calls().configure, 1);
}

#[test]
fn expiration_by_package_type() {
    let now = Utc::now();
    assert_eq!(expiration_for(PackageType::Lifetime, now), None);
    assert_eq!(expiration_for(PackageType::Weekly, now), Some(now + Duration::days(7)));
    assert_eq!(expiration_for(PackageType::Annual, now), Some(now + Duration::days(365)));
    assert_eq!(expiration_for(PackageType::Monthly, now), Some(now + Duration::days(30)));
}
