//! Results of the purchase and restore operations.

use crate::error::OperationError;
use subscriptly_types::CustomerInfo;

/// Result of [`EntitlementProvider::purchase_package`](crate::EntitlementProvider::purchase_package).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseResult {
    /// The store completed the purchase; carries the new snapshot.
    Purchased(CustomerInfo),
    /// The user dismissed the store sheet. Not an error.
    Cancelled,
    /// The purchase failed; the error was recorded and alerted.
    Failed(OperationError),
}

impl PurchaseResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Purchased(_))
    }

    #[must_use]
    pub fn customer_info(&self) -> Option<&CustomerInfo> {
        match self {
            Self::Purchased(info) => Some(info),
            Self::Cancelled | Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&OperationError> {
        match self {
            Self::Failed(e) => Some(e),
            Self::Purchased(_) | Self::Cancelled => None,
        }
    }
}

/// Result of [`EntitlementProvider::restore_purchases`](crate::EntitlementProvider::restore_purchases).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreResult {
    /// The restored snapshot grants the entitlement.
    Restored(CustomerInfo),
    /// Restore completed but found no active entitlement.
    NothingToRestore(CustomerInfo),
    /// Restore failed; the error was recorded and alerted.
    Failed(OperationError),
}

impl RestoreResult {
    /// True only when the entitlement was restored.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Restored(_))
    }

    #[must_use]
    pub fn customer_info(&self) -> Option<&CustomerInfo> {
        match self {
            Self::Restored(info) | Self::NothingToRestore(info) => Some(info),
            Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&OperationError> {
        match self {
            Self::Failed(e) => Some(e),
            Self::Restored(_) | Self::NothingToRestore(_) => None,
        }
    }
}
