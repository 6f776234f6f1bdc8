//! Signal/slot system for Trellis.
//!
//! A type-safe observer mechanism: objects expose [`Signal`]s, interested
//! parties connect closures (slots), and emitting the signal invokes every
//! connected slot with a reference to the payload.
//!
//! Slots always run directly on the emitting thread, in connection order.
//! Trellis serializes all mutations onto one logical thread, so there is no
//! queued dispatch and no re-entrancy protection beyond what the caller
//! arranges.
//!
//! # Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let text_changed = Signal::<String>::new();
//!
//! let id = text_changed.connect(|text| {
//!     println!("text is now {text}");
//! });
//!
//! text_changed.emit("hello".to_string());
//! text_changed.disconnect(id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Returned by [`Signal::connect`]; pass it to [`Signal::disconnect`] to
    /// remove the slot. The ID stays valid until disconnected or until the
    /// signal is dropped.
    pub struct ConnectionId;
}

/// A slot registered on a signal.
struct Connection<Args> {
    slot: Arc<dyn Fn(&Args) + Send + Sync>,
}

/// A type-safe signal with any number of connected slots.
///
/// # Type Parameter
///
/// - `Args`: the payload passed to slots. Use `()` for argument-less
///   signals or a tuple for several values.
///
/// Emission is a no-op while the signal is [blocked](Signal::set_blocked),
/// which is useful to suppress cascades during batch mutations.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    blocked: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot to this signal.
    ///
    /// Returns a [`ConnectionId`] that can be used to disconnect later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Connection {
            slot: Arc::new(slot),
        })
    }

    /// Connect a slot and receive an RAII guard that disconnects on drop.
    pub fn connect_guarded<F>(&self, slot: F) -> ConnectionGuard<'_, Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        ConnectionGuard {
            signal: self,
            id: Some(self.connect(slot)),
        }
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block or unblock signal emission.
    ///
    /// While blocked, calls to [`emit`](Self::emit) do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Whether emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking every connected slot with `&args`.
    ///
    /// Slots registered while an emit is in progress are not invoked for
    /// that emit. Does nothing while the signal is blocked.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        // Snapshot the slots so a handler can connect/disconnect without
        // deadlocking on the registry lock.
        let slots: Vec<_> = self
            .connections
            .lock()
            .iter()
            .map(|(_, conn)| conn.slot.clone())
            .collect();
        tracing::trace!(target: targets::SIGNAL, slot_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}

/// RAII guard for a signal connection.
///
/// Disconnects the slot when dropped. Use [`release`](Self::release) to keep
/// the connection alive past the guard.
pub struct ConnectionGuard<'a, Args> {
    signal: &'a Signal<Args>,
    id: Option<ConnectionId>,
}

impl<Args> ConnectionGuard<'_, Args> {
    /// The connection ID held by this guard.
    pub fn id(&self) -> Option<ConnectionId> {
        self.id
    }

    /// Give up ownership of the connection, leaving it connected.
    pub fn release(mut self) -> Option<ConnectionId> {
        self.id.take()
    }
}

impl<Args> Drop for ConnectionGuard<'_, Args> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.signal.disconnect(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_connect_and_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let recv = received.clone();
        signal.connect(move |n| recv.lock().push(*n));

        signal.emit(1);
        signal.emit(2);

        assert_eq!(*received.lock(), vec![1, 2]);
    }

    #[test]
    fn test_disconnect() {
        let signal = Signal::<()>::new();
        let count = Arc::new(Mutex::new(0));

        let c = count.clone();
        let id = signal.connect(move |_| *c.lock() += 1);

        signal.emit(());
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(());

        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_multiple_slots_in_connection_order() {
        let signal = Signal::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let o1 = order.clone();
        signal.connect(move |_| o1.lock().push("first"));
        let o2 = order.clone();
        signal.connect(move |_| o2.lock().push("second"));

        signal.emit(());
        assert_eq!(*order.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_blocked_signal_does_not_emit() {
        let signal = Signal::<()>::new();
        let count = Arc::new(Mutex::new(0));

        let c = count.clone();
        signal.connect(move |_| *c.lock() += 1);

        signal.set_blocked(true);
        signal.emit(());
        assert_eq!(*count.lock(), 0);

        signal.set_blocked(false);
        signal.emit(());
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_connection_guard_disconnects_on_drop() {
        let signal = Signal::<()>::new();
        let count = Arc::new(Mutex::new(0));

        {
            let c = count.clone();
            let _guard = signal.connect_guarded(move |_| *c.lock() += 1);
            signal.emit(());
        }
        signal.emit(());

        assert_eq!(*count.lock(), 1);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_connection_guard_release() {
        let signal = Signal::<()>::new();
        let count = Arc::new(Mutex::new(0));

        let c = count.clone();
        let guard = signal.connect_guarded(move |_| *c.lock() += 1);
        let id = guard.release().unwrap();

        signal.emit(());
        assert_eq!(*count.lock(), 1);
        assert!(signal.disconnect(id));
    }

    #[test]
    fn test_slot_may_disconnect_during_emit() {
        let signal = Arc::new(Signal::<()>::new());
        let count = Arc::new(Mutex::new(0));

        let sig = signal.clone();
        let c = count.clone();
        let id = Arc::new(Mutex::new(None));
        let id_slot = id.clone();
        let conn = signal.connect(move |_| {
            *c.lock() += 1;
            if let Some(own) = id_slot.lock().take() {
                sig.disconnect(own);
            }
        });
        *id.lock() = Some(conn);

        signal.emit(());
        signal.emit(());
        assert_eq!(*count.lock(), 1);
    }
}
