//! Entitlement provider: mirrors the purchase service into local state.
//!
//! The provider owns the session's [`SubscriptionState`]. Every mutation of
//! the customer snapshot is a whole replacement, whether it comes from a pull,
//! an operation result, or a pushed update; ordering between them is left to
//! the purchase service, which keeps its own snapshots consistent.

use crate::alert::{Alert, AlertPresenter};
use crate::backend::PurchasesBackend;
use crate::config::PurchasesConfig;
use crate::error::{OperationError, PurchasesResult};
use crate::listener::ListenerId;
use crate::outcome::{PurchaseResult, RestoreResult};
use crate::state::SubscriptionState;
use chrono::Utc;
use std::sync::Arc;
use subscriptly_types::{CustomerInfo, EntitlementId, Offering, Package};
use tokio::sync::{watch, Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// The background task applying pushed snapshots.
struct ListenerTask {
    id: ListenerId,
    shutdown: Arc<Notify>,
    handle: JoinHandle<()>,
}

enum Lifecycle {
    Idle,
    /// Started; the listener is absent if configuration failed before it was registered.
    Running(Option<ListenerTask>),
    Stopped,
}

/// Keeps "am I subscribed" consistent with the purchase service.
pub struct EntitlementProvider {
    config: PurchasesConfig,
    backend: Arc<dyn PurchasesBackend>,
    alerts: Arc<dyn AlertPresenter>,
    state: Arc<watch::Sender<SubscriptionState>>,
    lifecycle: Mutex<Lifecycle>,
}

impl EntitlementProvider {
    /// Creates a provider. Nothing talks to the backend until [`start`](Self::start).
    pub fn new(
        config: PurchasesConfig,
        backend: Arc<dyn PurchasesBackend>,
        alerts: Arc<dyn AlertPresenter>,
    ) -> Self {
        let (state, _) = watch::channel(SubscriptionState::new());
        Self {
            config,
            backend,
            alerts,
            state: Arc::new(state),
            lifecycle: Mutex::new(Lifecycle::Idle),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PurchasesConfig {
        &self.config
    }

    /// Returns the entitlement that defines "subscribed".
    pub fn entitlement_id(&self) -> &EntitlementId {
        &self.config.entitlement_id
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Configures the backend, starts listening for pushes, and performs the
    /// initial sync.
    ///
    /// Runs at most once per provider. Failures are logged and recorded in
    /// [`SubscriptionState::error`]; `is_ready` becomes true either way.
    pub async fn start(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        match *lifecycle {
            Lifecycle::Idle => {}
            Lifecycle::Running(_) => {
                debug!("Entitlement provider already started");
                return;
            }
            Lifecycle::Stopped => {
                debug!("Entitlement provider stopped, not starting");
                return;
            }
        }

        info!("Starting entitlement provider");
        *lifecycle = Lifecycle::Running(None);
        if let Err(e) = self.initialize(&mut lifecycle).await {
            warn!("Purchases init error: {}", e);
            let error = OperationError::from(&e);
            self.state.send_modify(|s| s.set_error(error));
        }
        self.state.send_modify(SubscriptionState::mark_ready);
        info!(
            "Entitlement provider ready (subscribed: {})",
            self.state.borrow().is_subscribed()
        );
    }

    async fn initialize(&self, lifecycle: &mut Lifecycle) -> PurchasesResult<()> {
        self.backend.set_log_level(self.config.log_level);

        match &self.config.credential {
            Some(credential) => self.backend.configure(credential).await?,
            None => debug!("No purchases credential for this platform, skipping configure"),
        }

        *lifecycle = Lifecycle::Running(Some(self.spawn_listener()));

        let info = self.backend.customer_info().await?;
        self.apply_customer_info(info);

        // A catalog failure is recorded by fetch_offerings and does not fail init.
        self.fetch_offerings().await.ok();
        Ok(())
    }

    fn spawn_listener(&self) -> ListenerTask {
        let registration = self.backend.add_customer_info_listener();
        let id = registration.id;
        let mut updates = registration.updates;
        let shutdown = Arc::new(Notify::new());
        let task_shutdown = Arc::clone(&shutdown);
        let state = Arc::clone(&self.state);
        let entitlement = self.config.entitlement_id.clone();

        let handle = tokio::spawn(async move {
            debug!("Customer info {} started", id);
            loop {
                tokio::select! {
                    () = task_shutdown.notified() => break,
                    update = updates.recv() => {
                        let Some(info) = update else {
                            debug!("Customer info {} closed by backend", id);
                            break;
                        };
                        let subscribed = apply_to(&state, info, &entitlement);
                        debug!("Applied pushed customer info (subscribed: {})", subscribed);
                    }
                }
            }
        });

        ListenerTask {
            id,
            shutdown,
            handle,
        }
    }

    /// Unregisters the push listener and waits for its task to finish.
    ///
    /// Stopping is terminal: a later [`start`](Self::start) does nothing.
    /// The state is marked ready so [`wait_until_ready`](Self::wait_until_ready)
    /// never blocks on a provider that will not sync.
    pub async fn stop(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        let previous = std::mem::replace(&mut *lifecycle, Lifecycle::Stopped);
        if let Lifecycle::Running(Some(task)) = previous {
            self.backend.remove_customer_info_listener(task.id);
            task.shutdown.notify_one();
            if let Err(e) = task.handle.await {
                warn!("Customer info listener task failed: {}", e);
            }
        }
        self.state.send_modify(SubscriptionState::mark_ready);
        info!("Entitlement provider stopped");
    }

    // ── Operations ───────────────────────────────────────────────

    /// Pulls the offerings catalog and replaces the current offering if the
    /// catalog has one.
    ///
    /// A failure is recorded but keeps the previously known offering.
    pub async fn fetch_offerings(&self) -> PurchasesResult<Option<Offering>> {
        self.state.send_modify(SubscriptionState::clear_error);
        match self.backend.offerings().await {
            Ok(offerings) => {
                if let Some(current) = &offerings.current {
                    debug!(
                        "Current offering {} with {} packages",
                        current.identifier,
                        current.available_packages.len()
                    );
                    let current = current.clone();
                    self.state.send_modify(|s| s.set_current_offering(current));
                } else {
                    debug!("Offerings catalog has no current offering");
                }
                Ok(offerings.current)
            }
            Err(e) => {
                warn!("Error fetching offerings: {}", e);
                let error = OperationError::from(&e);
                self.state.send_modify(|s| s.set_error(error));
                Err(e)
            }
        }
    }

    /// Buys `package` through the store.
    ///
    /// Cancellation by the user is returned as [`PurchaseResult::Cancelled`]
    /// without recording an error or alerting. Any other failure is recorded
    /// and alerted once.
    pub async fn purchase_package(&self, package: &Package) -> PurchaseResult {
        self.state.send_modify(SubscriptionState::clear_error);
        info!("Purchasing package {}", package.identifier);

        match self.backend.purchase_package(package).await {
            Ok(outcome) => {
                let subscribed = self.apply_customer_info(outcome.customer_info.clone());
                info!(
                    "Purchased {} (subscribed: {})",
                    outcome.product_identifier, subscribed
                );
                PurchaseResult::Purchased(outcome.customer_info)
            }
            Err(e) if e.is_user_cancelled() => {
                debug!("Purchase of {} cancelled by user", package.identifier);
                PurchaseResult::Cancelled
            }
            Err(e) => {
                warn!("Purchase error: {}", e);
                let error = OperationError::from(&e);
                self.record_error(&error);
                self.alerts.present(Alert::purchase_failed(&error.message));
                PurchaseResult::Failed(error)
            }
        }
    }

    /// Restores prior purchases for the current identity.
    ///
    /// The restored snapshot always replaces the current one. The result is
    /// only a success if it grants the entitlement.
    pub async fn restore_purchases(&self) -> RestoreResult {
        self.state.send_modify(SubscriptionState::clear_error);
        info!("Restoring purchases");

        match self.backend.restore_purchases().await {
            Ok(info) => {
                if self.apply_customer_info(info.clone()) {
                    info!("Subscription restored");
                    self.alerts.present(Alert::restore_succeeded());
                    RestoreResult::Restored(info)
                } else {
                    info!("Restore found no active {}", self.config.entitlement_id);
                    self.alerts.present(Alert::nothing_to_restore());
                    RestoreResult::NothingToRestore(info)
                }
            }
            Err(e) => {
                warn!("Restore error: {}", e);
                let error = OperationError::from(&e);
                self.record_error(&error);
                self.alerts.present(Alert::restore_failed(&error.message));
                RestoreResult::Failed(error)
            }
        }
    }

    /// Pulls the current snapshot and returns whether it grants the entitlement.
    ///
    /// A failed pull returns false and leaves state untouched.
    pub async fn check_subscription(&self) -> bool {
        match self.backend.customer_info().await {
            Ok(info) => self.apply_customer_info(info),
            Err(e) => {
                warn!("Check subscription error: {}", e);
                false
            }
        }
    }

    // ── Read model ───────────────────────────────────────────────

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> SubscriptionState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SubscriptionState> {
        self.state.subscribe()
    }

    /// Waits until the initial sync has finished.
    pub async fn wait_until_ready(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so this cannot observe a close.
        let _ = rx.wait_for(SubscriptionState::is_ready).await;
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().is_ready()
    }

    pub fn is_subscribed(&self) -> bool {
        self.state.borrow().is_subscribed()
    }

    pub fn customer_info(&self) -> Option<CustomerInfo> {
        self.state.borrow().customer_info().cloned()
    }

    pub fn current_offering(&self) -> Option<Offering> {
        self.state.borrow().current_offering().cloned()
    }

    pub fn error(&self) -> Option<OperationError> {
        self.state.borrow().error().cloned()
    }

    // ── Internals ────────────────────────────────────────────────

    fn apply_customer_info(&self, info: CustomerInfo) -> bool {
        apply_to(&self.state, info, &self.config.entitlement_id)
    }

    fn record_error(&self, error: &OperationError) {
        let error = error.clone();
        self.state.send_modify(|s| s.set_error(error));
    }
}

impl Drop for EntitlementProvider {
    fn drop(&mut self) {
        if let Lifecycle::Running(Some(task)) =
            std::mem::replace(self.lifecycle.get_mut(), Lifecycle::Stopped)
        {
            self.backend.remove_customer_info_listener(task.id);
            task.handle.abort();
        }
    }
}

fn apply_to(
    state: &watch::Sender<SubscriptionState>,
    info: CustomerInfo,
    entitlement: &EntitlementId,
) -> bool {
    let mut subscribed = false;
    state.send_modify(|s| subscribed = s.apply_customer_info(info, entitlement, Utc::now()));
    subscribed
}
