//! The provider's observable read model.
//!
//! `is_subscribed` is derived: the only way to change it is
//! [`SubscriptionState::apply_customer_info`], which replaces the snapshot and
//! recomputes the flag in one step.

use crate::error::OperationError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use subscriptly_types::{CustomerInfo, EntitlementId, EntitlementInfo, Offering};

/// Snapshot of everything consumer screens read from the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubscriptionState {
    is_ready: bool,
    is_subscribed: bool,
    customer_info: Option<CustomerInfo>,
    current_offering: Option<Offering>,
    error: Option<OperationError>,
}

impl SubscriptionState {
    /// Creates the state of a provider that has not synced yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the initial sync finished, whether or not it succeeded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.is_ready
    }

    /// True if the latest snapshot grants the configured entitlement.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.is_subscribed
    }

    /// The latest snapshot, `None` before the first sync.
    #[must_use]
    pub fn customer_info(&self) -> Option<&CustomerInfo> {
        self.customer_info.as_ref()
    }

    #[must_use]
    pub fn current_offering(&self) -> Option<&Offering> {
        self.current_offering.as_ref()
    }

    /// The last operation failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&OperationError> {
        self.error.as_ref()
    }

    /// Returns the active entry for `entitlement`, for display.
    #[must_use]
    pub fn entitlement(&self, entitlement: &EntitlementId) -> Option<&EntitlementInfo> {
        self.customer_info.as_ref()?.entitlement(entitlement)
    }

    /// Replaces the snapshot and recomputes `is_subscribed` against `now`.
    ///
    /// Returns the new `is_subscribed` value.
    pub fn apply_customer_info(
        &mut self,
        info: CustomerInfo,
        entitlement: &EntitlementId,
        now: DateTime<Utc>,
    ) -> bool {
        self.is_subscribed = info.has_active_entitlement(entitlement, now);
        self.customer_info = Some(info);
        self.is_subscribed
    }

    /// Replaces the current offering.
    pub fn set_current_offering(&mut self, offering: Offering) {
        self.current_offering = Some(offering);
    }

    pub fn set_error(&mut self, error: OperationError) {
        self.error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn mark_ready(&mut self) {
        self.is_ready = true;
    }
}
