//! Customer info snapshots.
//!
//! A `CustomerInfo` is the purchase service's view of one app user's
//! entitlement ledger at a point in time. Snapshots are immutable values:
//! consumers replace the whole snapshot when a newer one arrives and never
//! patch individual entitlements.

use crate::ids::{AppUserId, EntitlementId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The store a purchase was made through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Store {
    AppStore,
    MacAppStore,
    PlayStore,
    Amazon,
    Stripe,
    Promotional,
    #[default]
    Unknown,
}

/// The billing period the entitlement is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    #[default]
    Normal,
    Intro,
    Trial,
}

/// One entitlement granted to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementInfo {
    /// Entitlement identifier (e.g. `premium`).
    pub identifier: EntitlementId,
    /// Product that unlocked the entitlement.
    pub product_identifier: String,
    /// Whether the purchase service considers the entitlement active.
    pub is_active: bool,
    /// Whether the underlying subscription is set to renew.
    #[serde(default)]
    pub will_renew: bool,
    #[serde(default)]
    pub period_type: PeriodType,
    #[serde(default)]
    pub store: Store,
    #[serde(default)]
    pub latest_purchase_date: Option<DateTime<Utc>>,
    /// Expiration instant; `None` for lifetime access.
    #[serde(default)]
    pub expiration_date: Option<DateTime<Utc>>,
}

impl EntitlementInfo {
    /// Creates an active entitlement for `product_identifier`.
    #[must_use]
    pub fn active(
        identifier: impl Into<EntitlementId>,
        product_identifier: impl Into<String>,
        expiration_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            product_identifier: product_identifier.into(),
            is_active: true,
            will_renew: expiration_date.is_some(),
            period_type: PeriodType::Normal,
            store: Store::Unknown,
            latest_purchase_date: None,
            expiration_date,
        }
    }

    /// Returns true if the entitlement grants access at `now`.
    ///
    /// An entitlement flagged active whose expiration has already passed does
    /// not count; the snapshot may simply be stale.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expiration_date.is_none_or(|expires| expires > now)
    }

    /// Returns true if this entitlement never expires.
    #[must_use]
    pub fn is_lifetime(&self) -> bool {
        self.expiration_date.is_none()
    }
}

/// Snapshot of the purchase service's entitlement ledger for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// The app user ID the ledger was first created under.
    pub original_app_user_id: AppUserId,
    /// Active entitlements keyed by identifier.
    #[serde(default)]
    pub active_entitlements: BTreeMap<EntitlementId, EntitlementInfo>,
    /// Every product identifier the user ever purchased.
    #[serde(default)]
    pub all_purchased_product_ids: BTreeSet<String>,
    /// URL where the user can manage their subscription, if the store has one.
    #[serde(default)]
    pub management_url: Option<String>,
    /// When the purchase service produced this snapshot.
    pub request_date: DateTime<Utc>,
}

impl CustomerInfo {
    /// Creates a snapshot with no entitlements.
    #[must_use]
    pub fn empty(app_user_id: AppUserId) -> Self {
        Self {
            original_app_user_id: app_user_id,
            active_entitlements: BTreeMap::new(),
            all_purchased_product_ids: BTreeSet::new(),
            management_url: None,
            request_date: Utc::now(),
        }
    }

    /// Returns a copy of this snapshot with `entitlement` added.
    #[must_use]
    pub fn with_entitlement(mut self, entitlement: EntitlementInfo) -> Self {
        self.all_purchased_product_ids
            .insert(entitlement.product_identifier.clone());
        self.active_entitlements
            .insert(entitlement.identifier.clone(), entitlement);
        self
    }

    /// Returns the active entitlement entry for `id`, if present.
    #[must_use]
    pub fn entitlement(&self, id: &EntitlementId) -> Option<&EntitlementInfo> {
        self.active_entitlements.get(id)
    }

    /// Returns true if `id` is present, active and unexpired at `now`.
    #[must_use]
    pub fn has_active_entitlement(&self, id: &EntitlementId, now: DateTime<Utc>) -> bool {
        self.entitlement(id).is_some_and(|e| e.is_active_at(now))
    }

    /// Returns true if no entitlements are active in this snapshot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active_entitlements.is_empty()
    }

    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
