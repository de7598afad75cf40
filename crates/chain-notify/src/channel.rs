//! # Broadcast Channel
//!
//! One channel exists per event kind: an ordered list of listener
//! bindings plus a synchronous broadcast operation. Membership is only
//! reachable through the hub's registration API (`pub(crate)` mutators),
//! so arbitrary code cannot bypass the registration discipline.

use crate::listener::ChainNotify;
use chain_types::NotifyError;
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use tracing::{debug, error, warn};

/// Identity used for attach/detach matching: the listener's allocation
/// address, compared thin (without vtable metadata, which is not unique
/// across codegen units).
pub(crate) fn listener_id(listener: &Arc<dyn ChainNotify>) -> usize {
    Arc::as_ptr(listener) as *const () as usize
}

/// One attached-callback entry. The channel holds the listener weakly;
/// ownership stays with the subscriber's creator.
struct Binding {
    id: usize,
    listener: Weak<dyn ChainNotify>,
}

/// The per-event-kind ordered collection of attached subscriber
/// bindings.
///
/// Insertion order is preserved and defines invocation order. The entry
/// list is guarded by a mutex; a broadcast takes a point-in-time
/// snapshot under the lock and then invokes the snapshot without it, so
/// attach/detach from a callback or another thread never invalidates
/// iteration.
pub struct Channel {
    /// Event name, for log context only.
    name: &'static str,
    entries: Mutex<Vec<Binding>>,
}

impl Channel {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Append a binding for `listener` at the end of the list.
    ///
    /// No deduplication: attaching the same listener twice creates two
    /// independent entries, both invoked on broadcast.
    pub(crate) fn attach(&self, listener: &Arc<dyn ChainNotify>) {
        let binding = Binding {
            id: listener_id(listener),
            listener: Arc::downgrade(listener),
        };
        self.entries.lock().push(binding);
        debug!(channel = self.name, "listener attached");
    }

    /// Remove the first binding matching `listener`'s identity. Silent
    /// no-op when no binding matches, including on an empty channel.
    /// Relative order of the remaining bindings is preserved.
    pub(crate) fn detach(&self, listener: &Arc<dyn ChainNotify>) {
        let id = listener_id(listener);
        let mut entries = self.entries.lock();
        if let Some(position) = entries.iter().position(|binding| binding.id == id) {
            entries.remove(position);
            debug!(channel = self.name, "listener detached");
        }
    }

    /// Clear every binding. Shutdown path only.
    pub(crate) fn detach_all(&self) {
        let mut entries = self.entries.lock();
        if !entries.is_empty() {
            debug!(
                channel = self.name,
                detached = entries.len(),
                "all listeners detached"
            );
        }
        entries.clear();
    }

    /// Whether a binding for `listener` is currently attached.
    pub(crate) fn is_attached(&self, listener: &Arc<dyn ChainNotify>) -> bool {
        let id = listener_id(listener);
        self.entries.lock().iter().any(|binding| binding.id == id)
    }

    /// Number of currently attached bindings.
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Invoke `invoke` once per attached binding, in attachment order,
    /// synchronously on the calling thread.
    ///
    /// Iterates a snapshot taken under the lock; bindings whose listener
    /// has already been dropped are pruned and skipped. A panic in one
    /// subscriber is caught and logged, and the remaining subscribers in
    /// the snapshot still run.
    pub(crate) fn broadcast<F>(&self, mut invoke: F)
    where
        F: FnMut(&dyn ChainNotify),
    {
        let snapshot: Vec<Weak<dyn ChainNotify>> = {
            let mut entries = self.entries.lock();
            let before = entries.len();
            entries.retain(|binding| binding.listener.strong_count() > 0);
            let pruned = before - entries.len();
            if pruned > 0 {
                warn!(
                    channel = self.name,
                    pruned,
                    error = %NotifyError::StaleBinding,
                    "pruned stale listener bindings"
                );
            }
            entries.iter().map(|binding| binding.listener.clone()).collect()
        };

        for weak in snapshot {
            // A listener dropped between snapshot and invocation is
            // skipped; it will be pruned by the next broadcast.
            let Some(listener) = weak.upgrade() else {
                continue;
            };
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| invoke(listener.as_ref()))) {
                error!(
                    channel = self.name,
                    reason = panic_message(&payload),
                    "subscriber panicked during broadcast; continuing with remaining subscribers"
                );
            }
        }
    }
}

/// Best-effort extraction of a panic payload message.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Probe {
        calls: AtomicUsize,
    }

    impl ChainNotify for Probe {
        fn inventory_seen(&self, _hash: &chain_types::Hash) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn probe() -> (Arc<Probe>, Arc<dyn ChainNotify>) {
        let probe = Arc::new(Probe::default());
        let listener: Arc<dyn ChainNotify> = probe.clone();
        (probe, listener)
    }

    #[test]
    fn test_broadcast_empty_channel_is_noop() {
        let channel = Channel::new("inventory_seen");
        channel.broadcast(|listener| listener.inventory_seen(&[0u8; 32]));
        assert_eq!(channel.len(), 0);
    }

    #[test]
    fn test_attach_then_broadcast_invokes_once() {
        let channel = Channel::new("inventory_seen");
        let (probe, listener) = probe();
        channel.attach(&listener);
        channel.broadcast(|l| l.inventory_seen(&[0u8; 32]));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_detach_stops_delivery() {
        let channel = Channel::new("inventory_seen");
        let (probe, listener) = probe();
        channel.attach(&listener);
        channel.detach(&listener);
        channel.broadcast(|l| l.inventory_seen(&[0u8; 32]));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_detach_unattached_is_noop() {
        let channel = Channel::new("inventory_seen");
        let (_probe, listener) = probe();
        channel.detach(&listener);
        assert_eq!(channel.len(), 0);
    }

    #[test]
    fn test_duplicate_attach_delivers_twice_and_detach_removes_first() {
        let channel = Channel::new("inventory_seen");
        let (probe, listener) = probe();
        channel.attach(&listener);
        channel.attach(&listener);
        channel.broadcast(|l| l.inventory_seen(&[0u8; 32]));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 2);

        channel.detach(&listener);
        assert_eq!(channel.len(), 1);
        channel.broadcast(|l| l.inventory_seen(&[0u8; 32]));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_detach_all_clears_everything() {
        let channel = Channel::new("inventory_seen");
        let (probe_a, listener_a) = probe();
        let (probe_b, listener_b) = probe();
        channel.attach(&listener_a);
        channel.attach(&listener_b);
        channel.detach_all();
        channel.broadcast(|l| l.inventory_seen(&[0u8; 32]));
        assert_eq!(probe_a.calls.load(Ordering::SeqCst), 0);
        assert_eq!(probe_b.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dropped_listener_is_pruned_not_invoked() {
        let channel = Channel::new("inventory_seen");
        let (probe, listener) = probe();
        channel.attach(&listener);
        drop(listener);
        drop(probe);
        assert_eq!(channel.len(), 1);
        channel.broadcast(|l| l.inventory_seen(&[0u8; 32]));
        assert_eq!(channel.len(), 0);
    }

    #[test]
    fn test_mid_list_removal_preserves_order() {
        let channel = Channel::new("inventory_seen");
        let order = Arc::new(Mutex::new(Vec::new()));

        struct Ordered {
            tag: u8,
            order: Arc<Mutex<Vec<u8>>>,
        }
        impl ChainNotify for Ordered {
            fn inventory_seen(&self, _hash: &chain_types::Hash) {
                self.order.lock().push(self.tag);
            }
        }

        let listeners: Vec<Arc<dyn ChainNotify>> = (0..3)
            .map(|tag| {
                Arc::new(Ordered {
                    tag,
                    order: order.clone(),
                }) as Arc<dyn ChainNotify>
            })
            .collect();
        for listener in &listeners {
            channel.attach(listener);
        }
        channel.detach(&listeners[1]);
        channel.broadcast(|l| l.inventory_seen(&[0u8; 32]));
        assert_eq!(*order.lock(), vec![0, 2]);
    }
}
