//! Shared test helpers for identity tests.

#![allow(dead_code)]

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use std::collections::VecDeque;
use std::sync::Mutex;
use subscriptly_identity::{
    AppleCredential, IdentityError, IdentityProvider, IdentityResult, PersonName,
};

/// Creates a token string `base64url(header).base64url(claims).base64url(sig)`.
pub fn make_token(claims_json: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","kid":"test"}"#);
    let claims = URL_SAFE_NO_PAD.encode(claims_json.as_bytes());
    let sig = URL_SAFE_NO_PAD.encode([7u8; 64]);
    format!("{header}.{claims}.{sig}")
}

/// Creates a token for `sub` that expires `exp_offset` seconds from now.
pub fn token_for(sub: &str, exp_offset: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let exp = now + exp_offset;
    make_token(&format!(
        r#"{{"iss":"https://appleid.apple.com","aud":"com.subscriptly.app","sub":"{sub}","iat":{now},"exp":{exp}}}"#
    ))
}

/// First-authorization credential: carries name and email.
pub fn first_credential(sub: &str) -> AppleCredential {
    AppleCredential {
        user: sub.to_string(),
        identity_token: token_for(sub, 600),
        authorization_code: Some("code".to_string()),
        full_name: Some(PersonName {
            given_name: Some("Ada".to_string()),
            family_name: Some("Lovelace".to_string()),
        }),
        email: Some("ada@privaterelay.appleid.com".to_string()),
    }
}

/// Later-sign-in credential: no name, no email.
pub fn repeat_credential(sub: &str) -> AppleCredential {
    AppleCredential {
        user: sub.to_string(),
        identity_token: token_for(sub, 600),
        authorization_code: None,
        full_name: None,
        email: None,
    }
}

/// Identity provider that returns queued credentials in order.
#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<IdentityResult<AppleCredential>>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<IdentityResult<AppleCredential>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl IdentityProvider for ScriptedProvider {
    async fn sign_in(&self) -> IdentityResult<AppleCredential> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(IdentityError::SignInFailed("no scripted response".into())))
    }
}
