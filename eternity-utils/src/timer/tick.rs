//! Deterministic timers driven by the host's update loop.

use std::time::Duration;

use crate::locks::SyncMutex;

use super::{TimerCallback, TimerHandle, TimerScheduler};

struct PendingTimer {
    deadline: Duration,
    sequence: u64,
    handle: TimerHandle,
    callback: TimerCallback,
}

struct TickState {
    now: Duration,
    next_sequence: u64,
    pending: Vec<PendingTimer>,
}

/// Timer manager whose clock only moves when [`TickTimerManager::advance`] is called.
///
/// Due callbacks fire in deadline order, ties in scheduling order. Callbacks
/// run with no lock held, so they may schedule or cancel other timers. A timer
/// scheduled from inside a callback fires on a later `advance` at the earliest.
pub struct TickTimerManager {
    state: SyncMutex<TickState>,
}

impl TickTimerManager {
    /// Creates a manager with its clock at zero and no pending timers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SyncMutex::new(TickState {
                now: Duration::ZERO,
                next_sequence: 0,
                pending: Vec::new(),
            }),
        }
    }

    /// Time elapsed on this manager's clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Number of timers that are neither fired nor cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state
            .lock()
            .pending
            .iter()
            .filter(|timer| !timer.handle.is_cancelled())
            .count()
    }

    /// Moves the clock forward by `delta` and fires every due timer.
    ///
    /// Returns the number of callbacks that ran.
    pub fn advance(&self, delta: Duration) -> usize {
        let mut due = {
            let mut state = self.state.lock();
            state.now = state.now.saturating_add(delta);
            let now = state.now;

            state.pending.retain(|timer| !timer.handle.is_cancelled());
            let (due, waiting): (Vec<_>, Vec<_>) = state
                .pending
                .drain(..)
                .partition(|timer| timer.deadline <= now);
            state.pending = waiting;
            due
        };

        due.sort_by_key(|timer| (timer.deadline, timer.sequence));

        let mut fired = 0;
        for timer in due {
            // An earlier callback in this batch may have cancelled it.
            if timer.handle.is_cancelled() {
                continue;
            }
            (timer.callback)();
            fired += 1;
        }

        if fired > 0 {
            log::trace!("Tick timers fired {fired} callbacks");
        }
        fired
    }
}

impl Default for TickTimerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerScheduler for TickTimerManager {
    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let handle = TimerHandle::new();
        let mut state = self.state.lock();
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        let deadline = state.now.saturating_add(delay);
        state.pending.push(PendingTimer {
            deadline,
            sequence,
            handle: handle.clone(),
            callback,
        });
        handle
    }
}
