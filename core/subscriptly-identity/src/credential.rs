//! Credentials returned by the platform sign-in dialog.

use serde::{Deserialize, Serialize};

/// A person's name as the platform delivers it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

impl PersonName {
    /// Joins the non-empty parts with a space. `None` if both are empty.
    #[must_use]
    pub fn display(&self) -> Option<String> {
        let parts: Vec<&str> = [self.given_name.as_deref(), self.family_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// The result of a successful Sign in with Apple authorization.
///
/// `full_name` and `email` are only present the first time the user
/// authorizes the app; later sign-ins omit them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppleCredential {
    /// Stable user identifier; equals the token's `sub`.
    pub user: String,
    /// The JWT identity token.
    pub identity_token: String,
    #[serde(default)]
    pub authorization_code: Option<String>,
    #[serde(default)]
    pub full_name: Option<PersonName>,
    #[serde(default)]
    pub email: Option<String>,
}
