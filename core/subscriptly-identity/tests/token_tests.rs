mod common;

use chrono::{Duration, Utc};
use common::{make_token, token_for};
use subscriptly_identity::{IdentityError, IdentityToken};

#[test]
fn parse_valid_token() {
    let token = IdentityToken::parse(&token_for("001.abc.002", 600)).unwrap();
    assert_eq!(token.subject(), "001.abc.002");
    assert!(token.is_apple_issued());
    assert_eq!(token.claims().aud, "com.subscriptly.app");
    assert!(token.email().is_none());
    assert!(!token.is_expired_at(Utc::now()));
}

#[test]
fn parse_trims_whitespace() {
    let raw = token_for("u", 600);
    let token = IdentityToken::parse(&format!("  {raw}\n")).unwrap();
    assert_eq!(token.raw(), raw);
}

#[test]
fn token_with_email_claim() {
    let raw = make_token(
        r#"{"iss":"https://appleid.apple.com","aud":"a","sub":"u","email":"x@y.z","iat":1,"exp":2}"#,
    );
    let token = IdentityToken::parse(&raw).unwrap();
    assert_eq!(token.email(), Some("x@y.z"));
}

#[test]
fn expired_token_detected() {
    let token = IdentityToken::parse(&token_for("u", -10)).unwrap();
    assert!(token.is_expired_at(Utc::now()));
    assert!(token.expires_at().unwrap() < Utc::now());
}

#[test]
fn expiry_is_exclusive_of_future() {
    let token = IdentityToken::parse(&token_for("u", 600)).unwrap();
    assert!(token.is_expired_at(Utc::now() + Duration::seconds(601)));
}

#[test]
fn wrong_segment_count_rejected() {
    let err = IdentityToken::parse("a.b").unwrap_err();
    assert!(matches!(err, IdentityError::InvalidToken(_)));
    assert!(IdentityToken::parse("a.b.c.d").is_err());
}

#[test]
fn empty_segment_rejected() {
    assert!(matches!(
        IdentityToken::parse("a..c").unwrap_err(),
        IdentityError::InvalidToken(_)
    ));
}

#[test]
fn bad_base64_rejected() {
    assert!(matches!(
        IdentityToken::parse("a.!!!.c").unwrap_err(),
        IdentityError::InvalidToken(_)
    ));
}

#[test]
fn bad_claims_rejected() {
    let raw = make_token(r#"{"sub":"u"}"#);
    assert!(matches!(
        IdentityToken::parse(&raw).unwrap_err(),
        IdentityError::InvalidClaims(_)
    ));
}

#[test]
fn empty_subject_rejected() {
    let raw = make_token(r#"{"iss":"i","aud":"a","sub":" ","iat":1,"exp":2}"#);
    assert!(matches!(
        IdentityToken::parse(&raw).unwrap_err(),
        IdentityError::InvalidClaims(_)
    ));
}

#[test]
fn non_apple_issuer_flagged() {
    let raw = make_token(r#"{"iss":"https://example.com","aud":"a","sub":"u","iat":1,"exp":2}"#);
    assert!(!IdentityToken::parse(&raw).unwrap().is_apple_issued());
}
