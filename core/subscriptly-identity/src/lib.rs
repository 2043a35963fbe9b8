//! Sign in with Apple session handling for Subscriptly.
//!
//! This module handles:
//! - Decoding the identity token's claims
//! - Resolving the user's display name and email across sign-ins
//! - Local key-value storage for the profile fields the platform sends once
//!
//! # Design Principles
//!
//! - **No verification here**: the token signature is checked by a back end
//! - **Injected collaborators**: the sign-in dialog and storage are traits

mod credential;
mod error;
mod session;
mod store;
mod token;

pub use credential::{AppleCredential, PersonName};
pub use error::{IdentityError, IdentityResult};
pub use session::{IdentityProvider, IdentitySession, SignedInUser, DEFAULT_DISPLAY_NAME};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use token::{IdentityClaims, IdentityToken, APPLE_ISSUER};
