//! Synchronous change notification for registry mutations.
//!
//! Listeners are called in subscription order on the thread that performed
//! the mutation. Nothing is caught: a panicking listener unwinds into the
//! caller of the mutation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Callback invoked with the affected locale.
pub type ChangeListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Ordered list of change listeners.
///
/// Subscribing the same callback twice creates two subscriptions, each
/// delivered separately.
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, ChangeListener)>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(ListenerId, ChangeListener)>> {
        // A listener panicking mid-delivery never holds this lock, so the
        // list itself is always consistent.
        self.listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Subscribe `listener`, returning the handle used to unsubscribe.
    pub fn subscribe(&self, listener: ChangeListener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, listener));
        debug!("Change listener {:?} subscribed", id);
        id
    }

    /// Remove a subscription. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        before != listeners.len()
    }

    /// Number of active subscriptions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every subscription.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Deliver `locale` to every subscription in order.
    ///
    /// The list is snapshotted before delivery, so listeners may subscribe,
    /// unsubscribe or trigger further notifications while being called.
    /// Changes made during delivery take effect from the next notification.
    pub fn notify(&self, locale: &str) {
        let snapshot: Vec<ChangeListener> =
            self.lock().iter().map(|(_, listener)| listener.clone()).collect();

        for listener in snapshot {
            listener(locale);
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.len())
            .finish()
    }
}
