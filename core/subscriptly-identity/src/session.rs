//! Sign-in session.
//!
//! The platform only sends the user's name and email on the first
//! authorization. The session stores them keyed by the token subject and
//! fills them back in on later sign-ins.

use crate::credential::AppleCredential;
use crate::error::{IdentityError, IdentityResult};
use crate::store::KeyValueStore;
use crate::token::IdentityToken;
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name shown when the user never shared one.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// The platform sign-in dialog.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Presents the dialog and returns the credential.
    async fn sign_in(&self) -> IdentityResult<AppleCredential>;
}

/// A signed-in user with whatever profile data is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedInUser {
    /// Stable user identifier (token subject).
    pub user_id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    /// The raw identity token, for forwarding to a back end.
    #[serde(skip)]
    pub identity_token: String,
}

impl SignedInUser {
    #[must_use]
    pub fn display_name_or_default(&self) -> &str {
        self.display_name.as_deref().unwrap_or(DEFAULT_DISPLAY_NAME)
    }
}

fn name_key(user_id: &str) -> String {
    format!("subscriptly.user.{user_id}.name")
}

fn email_key(user_id: &str) -> String {
    format!("subscriptly.user.{user_id}.email")
}

/// Runs sign-in and keeps the once-delivered profile fields.
pub struct IdentitySession {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn KeyValueStore>,
}

impl IdentitySession {
    pub fn new(provider: Arc<dyn IdentityProvider>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { provider, store }
    }

    /// Presents the sign-in dialog and resolves the user's profile.
    ///
    /// # Errors
    ///
    /// Fails if the dialog fails or is cancelled, if the token cannot be
    /// decoded, has expired, or names a different user than the credential.
    pub async fn sign_in(&self) -> IdentityResult<SignedInUser> {
        let credential = self.provider.sign_in().await?;
        self.complete(credential).await
    }

    /// Resolves the profile for a credential obtained elsewhere.
    pub async fn complete(&self, credential: AppleCredential) -> IdentityResult<SignedInUser> {
        let token = IdentityToken::parse(&credential.identity_token)?;
        if token.subject() != credential.user {
            return Err(IdentityError::SubjectMismatch);
        }
        if token.is_expired_at(Utc::now()) {
            let at = token
                .expires_at()
                .map_or_else(|| token.claims().exp.to_string(), |t| t.to_rfc3339());
            return Err(IdentityError::Expired(at));
        }
        if !token.is_apple_issued() {
            warn!("Identity token issued by {}", token.claims().iss);
        }

        let user_id = credential.user.clone();
        let delivered_name = credential.full_name.as_ref().and_then(|n| n.display());
        let delivered_email = credential
            .email
            .clone()
            .or_else(|| token.email().map(str::to_string));

        if let Some(name) = &delivered_name {
            self.store.set(&name_key(&user_id), name).await?;
        }
        if let Some(email) = &delivered_email {
            self.store.set(&email_key(&user_id), email).await?;
        }

        let display_name = match delivered_name {
            Some(name) => Some(name),
            None => self.store.get(&name_key(&user_id)).await?,
        };
        let email = match delivered_email {
            Some(email) => Some(email),
            None => self.store.get(&email_key(&user_id)).await?,
        };

        info!("Signed in {}", user_id);
        debug!(
            "Profile: name known = {}, email known = {}",
            display_name.is_some(),
            email.is_some()
        );

        Ok(SignedInUser {
            user_id,
            display_name,
            email,
            identity_token: credential.identity_token,
        })
    }

    /// Loads the stored profile for `user_id` without signing in.
    pub async fn stored_profile(
        &self,
        user_id: &str,
    ) -> IdentityResult<(Option<String>, Option<String>)> {
        let name = self.store.get(&name_key(user_id)).await?;
        let email = self.store.get(&email_key(user_id)).await?;
        Ok((name, email))
    }

    /// Forgets the stored profile for `user_id`.
    pub async fn forget(&self, user_id: &str) -> IdentityResult<()> {
        self.store.remove(&name_key(user_id)).await?;
        self.store.remove(&email_key(user_id)).await?;
        Ok(())
    }
}
