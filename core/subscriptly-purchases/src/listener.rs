//! Customer info update listeners.
//!
//! The purchase service pushes a fresh snapshot whenever the ledger changes
//! outside an explicit call (renewal, refund, purchase on another device).
//! Each registration is an unbounded channel plus an ID the owner hands back
//! to unsubscribe.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use subscriptly_types::CustomerInfo;
use tokio::sync::mpsc;
use tracing::debug;

type Senders = HashMap<ListenerId, mpsc::UnboundedSender<CustomerInfo>>;

/// Handle identifying one listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// A registered listener: its ID and the stream of pushed snapshots.
#[derive(Debug)]
pub struct ListenerRegistration {
    pub id: ListenerId,
    pub updates: mpsc::UnboundedReceiver<CustomerInfo>,
}

/// Fan-out registry backends use to deliver pushes.
#[derive(Debug, Default)]
pub struct CustomerInfoListeners {
    next_id: AtomicU64,
    senders: Mutex<Senders>,
}

impl CustomerInfoListeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new listener.
    pub fn register(&self) -> ListenerRegistration {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().insert(id, tx);
        debug!("Registered customer info {}", id);
        ListenerRegistration { id, updates: rx }
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let removed = self.lock().remove(&id).is_some();
        if removed {
            debug!("Removed customer info {}", id);
        }
        removed
    }

    /// Delivers `info` to every listener and returns how many received it.
    ///
    /// Listeners whose receiver has been dropped are pruned.
    pub fn notify(&self, info: &CustomerInfo) -> usize {
        let mut senders = self.lock();
        senders.retain(|_, tx| tx.send(info.clone()).is_ok());
        senders.len()
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Senders> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
