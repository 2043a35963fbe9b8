use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use subscriptly_types::{AppUserId, CustomerInfo, EntitlementId, EntitlementInfo, PeriodType, Store};

fn user() -> AppUserId {
    AppUserId::new("user-1").unwrap()
}

// ── Entitlement checks ───────────────────────────────────────────

#[test]
fn empty_snapshot_has_no_premium() {
    let info = CustomerInfo::empty(user());
    assert!(info.is_empty());
    assert!(!info.has_active_entitlement(&EntitlementId::premium(), Utc::now()));
}

#[test]
fn unexpired_premium_is_active() {
    let now = Utc::now();
    let info = CustomerInfo::empty(user()).with_entitlement(EntitlementInfo::active(
        "premium",
        "monthly_sub",
        Some(now + Duration::days(30)),
    ));
    assert!(info.has_active_entitlement(&EntitlementId::premium(), now));
}

#[test]
fn expired_premium_is_not_active() {
    let now = Utc::now();
    let info = CustomerInfo::empty(user()).with_entitlement(EntitlementInfo::active(
        "premium",
        "monthly_sub",
        Some(now - Duration::seconds(1)),
    ));
    assert!(!info.has_active_entitlement(&EntitlementId::premium(), now));
}

#[test]
fn lifetime_premium_never_expires() {
    let info = CustomerInfo::empty(user())
        .with_entitlement(EntitlementInfo::active("premium", "lifetime", None));
    let far_future = Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).unwrap();
    assert!(info.has_active_entitlement(&EntitlementId::premium(), far_future));
    assert!(info.entitlement(&EntitlementId::premium()).unwrap().is_lifetime());
}

#[test]
fn inactive_flag_wins_over_expiration() {
    let now = Utc::now();
    let mut ent = EntitlementInfo::active("premium", "monthly_sub", Some(now + Duration::days(3)));
    ent.is_active = false;
    let info = CustomerInfo::empty(user()).with_entitlement(ent);
    assert!(!info.has_active_entitlement(&EntitlementId::premium(), now));
}

#[test]
fn other_entitlement_does_not_grant_premium() {
    let info = CustomerInfo::empty(user())
        .with_entitlement(EntitlementInfo::active("pro", "pro_sub", None));
    assert!(!info.has_active_entitlement(&EntitlementId::premium(), Utc::now()));
    assert!(info.has_active_entitlement(&EntitlementId::new("pro"), Utc::now()));
}

#[test]
fn with_entitlement_records_product() {
    let info = CustomerInfo::empty(user())
        .with_entitlement(EntitlementInfo::active("premium", "annual_sub", None));
    assert!(info.all_purchased_product_ids.contains("annual_sub"));
}

// ── JSON ─────────────────────────────────────────────────────────

#[test]
fn parses_snapshot_json_with_defaults() {
    let json = r#"{
        "original_app_user_id": "user-1",
        "request_date": "2026-01-01T00:00:00Z",
        "active_entitlements": {
            "premium": {
                "identifier": "premium",
                "product_identifier": "monthly_sub",
                "is_active": true,
                "store": "app_store",
                "expiration_date": "2026-02-01T00:00:00Z"
            }
        }
    }"#;
    let info = CustomerInfo::from_json(json).unwrap();
    let ent = info.entitlement(&EntitlementId::premium()).unwrap();
    assert_eq!(ent.store, Store::AppStore);
    assert_eq!(ent.period_type, PeriodType::Normal);
    assert!(!ent.will_renew);
    assert!(info.management_url.is_none());
}

#[test]
fn malformed_snapshot_json_is_error() {
    assert!(CustomerInfo::from_json("{").is_err());
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn premium_check_matches_expiration(offset_secs in -100_000i64..100_000, active in any::<bool>()) {
        let now = Utc::now();
        let mut ent = EntitlementInfo::active("premium", "p", Some(now + Duration::seconds(offset_secs)));
        ent.is_active = active;
        let info = CustomerInfo::empty(user()).with_entitlement(ent);
        let expected = active && offset_secs > 0;
        prop_assert_eq!(info.has_active_entitlement(&EntitlementId::premium(), now), expected);
    }
}
