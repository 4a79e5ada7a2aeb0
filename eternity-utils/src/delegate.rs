//! Multicast delegates: ordered observer lists notified synchronously.
//!
//! A delegate owns a list of handlers. [`MulticastDelegate::broadcast`] calls
//! every handler in registration order on the calling thread before returning.
//!
//! Handlers are snapshotted before dispatch, so a handler may call back into
//! whatever owns the delegate (including broadcasting again) without holding
//! the list lock. Handlers added or removed from inside a handler only affect
//! later broadcasts.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use crate::locks::SyncMutex;

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Identifies a registered handler so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DelegateHandle(u64);

/// An ordered list of handlers invoked with a shared payload.
pub struct MulticastDelegate<T> {
    handlers: SyncMutex<SmallVec<[(DelegateHandle, Handler<T>); 4]>>,
    next_id: AtomicU64,
}

impl<T> MulticastDelegate<T> {
    /// Creates a delegate with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: SyncMutex::new(SmallVec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Registers a handler. It runs after every handler registered before it.
    pub fn add<F>(&self, handler: F) -> DelegateHandle
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let handle = DelegateHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.lock().push((handle, Arc::new(handler)));
        handle
    }

    /// Unregisters a handler. Returns `false` if it was not registered.
    pub fn remove(&self, handle: DelegateHandle) -> bool {
        let mut handlers = self.handlers.lock();
        let before = handlers.len();
        handlers.retain(|(h, _)| *h != handle);
        handlers.len() != before
    }

    /// Removes every handler.
    pub fn clear(&self) {
        self.handlers.lock().clear();
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.lock().len()
    }

    /// Whether no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.lock().is_empty()
    }

    /// Calls every registered handler with `value`, in registration order.
    pub fn broadcast(&self, value: &T) {
        let snapshot: SmallVec<[Handler<T>; 4]> = self
            .handlers
            .lock()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in snapshot {
            handler(value);
        }
    }
}

impl<T> Default for MulticastDelegate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for MulticastDelegate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MulticastDelegate")
            .field("handlers", &self.len())
            .finish()
    }
}
