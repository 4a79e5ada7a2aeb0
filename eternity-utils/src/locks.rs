//! Lock aliases so call sites do not depend on the lock implementation directly.

/// Mutex used for short, non-async critical sections.
pub type SyncMutex<T> = parking_lot::Mutex<T>;
