use subscriptly_purchases::{ApiKey, LogLevel, Platform, PlatformCredentials, PurchasesConfig};
use subscriptly_types::EntitlementId;

fn credentials() -> PlatformCredentials {
    PlatformCredentials {
        ios: Some(ApiKey::new("appl_ios_key")),
        android: Some(ApiKey::new("goog_android_key")),
    }
}

// ── Platform selection ───────────────────────────────────────────

#[test]
fn ios_gets_ios_key() {
    let config = PurchasesConfig::for_platform(&credentials(), &Platform::Ios);
    assert_eq!(config.credential, Some(ApiKey::new("appl_ios_key")));
}

#[test]
fn android_gets_android_key() {
    let config = PurchasesConfig::for_platform(&credentials(), &Platform::Android);
    assert_eq!(config.credential, Some(ApiKey::new("goog_android_key")));
}

#[test]
fn other_platform_has_no_credential() {
    let config = PurchasesConfig::for_platform(&credentials(), &Platform::Other("web".into()));
    assert!(config.credential.is_none());
}

#[test]
fn platform_from_os_name() {
    assert_eq!(Platform::from_os("iOS"), Platform::Ios);
    assert_eq!(Platform::from_os("android"), Platform::Android);
    assert_eq!(Platform::from_os("windows"), Platform::Other("windows".into()));
}

// ── Defaults & parsing ───────────────────────────────────────────

#[test]
fn default_config() {
    let config = PurchasesConfig::default();
    assert!(config.credential.is_none());
    assert_eq!(config.entitlement_id, EntitlementId::premium());
    assert_eq!(config.log_level, LogLevel::Verbose);
}

#[test]
fn parse_config_json() {
    let config = PurchasesConfig::from_json_str(
        r#"{"credential": "appl_abc", "entitlement_id": "pro", "log_level": "warn"}"#,
    )
    .unwrap();
    assert_eq!(config.credential.unwrap().expose(), "appl_abc");
    assert_eq!(config.entitlement_id.as_str(), "pro");
    assert_eq!(config.log_level, LogLevel::Warn);
}

#[test]
fn parse_empty_config_uses_defaults() {
    let config = PurchasesConfig::from_json_str("{}").unwrap();
    assert_eq!(config, PurchasesConfig::default());
}

#[test]
fn malformed_config_is_error() {
    assert!(PurchasesConfig::from_json_str("{credential").is_err());
}

#[test]
fn api_key_debug_is_redacted() {
    let key = ApiKey::new("appl_WHmDaKGwzVlnbtbK");
    let debug = format!("{key:?}");
    assert!(debug.starts_with("ApiKey(appl_"));
    assert!(!debug.contains("WHmDaKG"));
}
