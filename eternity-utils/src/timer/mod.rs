//! One-shot deferred callbacks.
//!
//! Gameplay code only sees [`TimerScheduler`]; the host decides whether timers
//! are driven by its own tick ([`TickTimerManager`]) or by the tokio clock
//! ([`TokioTimerManager`]). Every scheduled callback gets a [`TimerHandle`]
//! that can cancel it before it fires.

mod tick;
mod tokio_timer;

use std::time::Duration;

use tokio_util::sync::CancellationToken;

pub use tick::TickTimerManager;
pub use tokio_timer::TokioTimerManager;

/// A callback run once when its timer fires.
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Cancellation handle for a scheduled callback.
///
/// Clones share the same timer. Cancelling after the callback already ran is a
/// no-op.
#[derive(Debug, Clone, Default)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    /// Creates a handle for a new, not yet cancelled timer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Prevents the callback from running if it has not run yet.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether [`TimerHandle::cancel`] was called on this timer.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) const fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Runs a callback once after a delay.
pub trait TimerScheduler: Send + Sync {
    /// Schedules `callback` to run once after `delay`.
    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;
}
