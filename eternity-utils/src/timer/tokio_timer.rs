//! Timers driven by the tokio clock.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::sleep;

use super::{TimerCallback, TimerHandle, TimerScheduler};

/// Timer manager that spawns one sleeping task per timer on a tokio runtime.
///
/// The task races the sleep against the handle's cancellation, so a cancelled
/// timer wakes up and exits without running its callback.
#[derive(Debug, Clone)]
pub struct TokioTimerManager {
    runtime: Handle,
}

impl TokioTimerManager {
    /// Creates a manager spawning its timers on `runtime`.
    #[must_use]
    pub const fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Creates a manager bound to the runtime of the calling context.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    #[must_use]
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl TimerScheduler for TokioTimerManager {
    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let handle = TimerHandle::new();
        let token = handle.token().clone();

        self.runtime.spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    log::trace!("Timer cancelled before firing");
                }
                () = sleep(delay) => {
                    callback();
                }
            }
        });

        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_callback(count: &Arc<AtomicUsize>) -> TimerCallback {
        let count = Arc::clone(count);
        Box::new(move || {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let timers = TokioTimerManager::current();
        let count = Arc::new(AtomicUsize::new(0));

        timers.schedule_once(Duration::from_secs(2), counting_callback(&count));

        sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_callback() {
        let timers = TokioTimerManager::current();
        let count = Arc::new(AtomicUsize::new(0));

        let handle = timers.schedule_once(Duration::from_secs(2), counting_callback(&count));
        handle.cancel();
        assert!(handle.is_cancelled());

        sleep(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
