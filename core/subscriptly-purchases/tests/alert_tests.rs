use subscriptly_purchases::{Alert, AlertKind, AlertPresenter, TracingAlertPresenter};

// ── Alerts ───────────────────────────────────────────────────────

#[test]
fn purchase_failed_uses_message() {
    let alert = Alert::purchase_failed("card declined");
    assert_eq!(alert.kind, AlertKind::PurchaseFailed);
    assert_eq!(alert.title, "Purchase Failed");
    assert_eq!(alert.message, "card declined");
}

#[test]
fn purchase_failed_falls_back_on_empty_message() {
    let alert = Alert::purchase_failed("  ");
    assert_eq!(
        alert.message,
        "An error occurred during the purchase. Please try again."
    );
}

#[test]
fn restore_failed_falls_back_on_empty_message() {
    let alert = Alert::restore_failed("");
    assert_eq!(alert.title, "Restore Failed");
    assert_eq!(
        alert.message,
        "An error occurred while restoring purchases. Please try again."
    );
}

#[test]
fn restore_outcome_alerts() {
    assert_eq!(Alert::restore_succeeded().title, "Success");
    let nothing = Alert::nothing_to_restore();
    assert_eq!(nothing.title, "No Subscription Found");
    assert!(!nothing.kind.is_failure());
}

#[test]
fn failure_kinds() {
    assert!(AlertKind::PurchaseFailed.is_failure());
    assert!(AlertKind::RestoreFailed.is_failure());
    assert!(!AlertKind::RestoreSucceeded.is_failure());
    assert!(!AlertKind::NothingToRestore.is_failure());
}

#[test]
fn tracing_presenter_accepts_alerts() {
    TracingAlertPresenter.present(Alert::restore_succeeded());
    TracingAlertPresenter.present(Alert::purchase_failed("x"));
}
