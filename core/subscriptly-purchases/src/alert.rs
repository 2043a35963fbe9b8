//! User-facing notifications raised by provider operations.
//!
//! The provider decides *when* the user must be told something; how it is
//! shown (native dialog, toast, log line) is up to the [`AlertPresenter`].

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const PURCHASE_FAILED_FALLBACK: &str =
    "An error occurred during the purchase. Please try again.";
const RESTORE_FAILED_FALLBACK: &str =
    "An error occurred while restoring purchases. Please try again.";

/// Which outcome an alert reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    PurchaseFailed,
    RestoreSucceeded,
    NothingToRestore,
    RestoreFailed,
}

impl AlertKind {
    /// Returns true for alerts reporting a genuine failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::PurchaseFailed | Self::RestoreFailed)
    }
}

/// A blocking notification with a single "OK" action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    #[must_use]
    pub fn purchase_failed(message: &str) -> Self {
        Self {
            kind: AlertKind::PurchaseFailed,
            title: "Purchase Failed".to_string(),
            message: non_empty_or(message, PURCHASE_FAILED_FALLBACK),
        }
    }

    #[must_use]
    pub fn restore_succeeded() -> Self {
        Self {
            kind: AlertKind::RestoreSucceeded,
            title: "Success".to_string(),
            message: "Your subscription has been restored!".to_string(),
        }
    }

    #[must_use]
    pub fn nothing_to_restore() -> Self {
        Self {
            kind: AlertKind::NothingToRestore,
            title: "No Subscription Found".to_string(),
            message: "We could not find an active subscription for your account.".to_string(),
        }
    }

    #[must_use]
    pub fn restore_failed(message: &str) -> Self {
        Self {
            kind: AlertKind::RestoreFailed,
            title: "Restore Failed".to_string(),
            message: non_empty_or(message, RESTORE_FAILED_FALLBACK),
        }
    }
}

fn non_empty_or(message: &str, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message.to_string()
    }
}

/// Shows alerts to the user.
pub trait AlertPresenter: Send + Sync {
    fn present(&self, alert: Alert);
}

/// Presenter for headless runs: writes alerts to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAlertPresenter;

impl AlertPresenter for TracingAlertPresenter {
    fn present(&self, alert: Alert) {
        if alert.kind.is_failure() {
            warn!("{}: {}", alert.title, alert.message);
        } else {
            info!("{}: {}", alert.title, alert.message);
        }
    }
}
