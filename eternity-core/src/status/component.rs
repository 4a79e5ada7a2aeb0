//! Status component: a character's status word plus change notifications.
//!
//! The component holds an 8-bit status word and broadcasts every transition
//! through its delegates. It never fails: invalid input (a zero or multi-bit
//! value where a single flag is required, a non-positive duration) leaves the
//! state untouched and fires nothing.
//!
//! The word lives in an `AtomicU8` and every mutation is a single atomic
//! read-modify-write, so the event decision always uses the exact value the
//! mutation replaced. This also lets the component be shared with the timer
//! callbacks of [`StatusComponent::add_timed_flag`].

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use eternity_utils::{MulticastDelegate, TimerHandle, TimerScheduler};

use super::flags::{StatusFlag, StatusFlags};
use crate::entity::EntityOwner;

/// Tracks the status flags of one character.
pub struct StatusComponent {
    bits: AtomicU8,
    initialized: AtomicBool,
    owner: Option<EntityOwner>,
    scheduler: Option<Arc<dyn TimerScheduler>>,
    /// Fired by [`StatusComponent::initialize`].
    pub on_initialized: MulticastDelegate<()>,
    /// Fired with the added flags whenever flags are set.
    pub on_flag_added: MulticastDelegate<StatusFlags>,
    /// Fired with the removed flags whenever flags are cleared.
    pub on_flag_removed: MulticastDelegate<StatusFlags>,
}

impl StatusComponent {
    /// Creates a component with no flags, no owner and no scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bits: AtomicU8::new(0),
            initialized: AtomicBool::new(false),
            owner: None,
            scheduler: None,
            on_initialized: MulticastDelegate::new(),
            on_flag_added: MulticastDelegate::new(),
            on_flag_removed: MulticastDelegate::new(),
        }
    }

    /// Sets the owning actor. Only used for identification in logs.
    #[must_use]
    pub fn with_owner(mut self, owner: EntityOwner) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Sets the scheduler used to expire timed flags.
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: Arc<dyn TimerScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// The owning actor, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<&EntityOwner> {
        self.owner.as_ref()
    }

    fn owner_label(&self) -> &str {
        self.owner.as_ref().map_or("<unowned>", |owner| owner.name.as_str())
    }

    /// Marks the component ready and fires [`StatusComponent::on_initialized`].
    pub fn initialize(&self) {
        self.initialized.store(true, Ordering::Relaxed);
        match &self.owner {
            Some(owner) => log::debug!("Status component initialized for {owner}"),
            None => log::debug!("Status component initialized without an owner"),
        }
        self.on_initialized.broadcast(&());
    }

    /// Whether [`StatusComponent::initialize`] has been called.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Relaxed)
    }

    /// The raw status word.
    #[must_use]
    pub fn bits(&self) -> u8 {
        self.bits.load(Ordering::Relaxed)
    }

    /// The currently set flags.
    #[must_use]
    pub fn flags(&self) -> StatusFlags {
        StatusFlags::from_bits_retain(self.bits())
    }

    fn notify_added(&self, mask: StatusFlags) {
        log::debug!("{}: added [{}]", self.owner_label(), mask.describe());
        self.on_flag_added.broadcast(&mask);
    }

    fn notify_removed(&self, mask: StatusFlags) {
        log::debug!("{}: removed [{}]", self.owner_label(), mask.describe());
        self.on_flag_removed.broadcast(&mask);
    }

    // Single flag operations

    /// Sets `flag`. Fires `on_flag_added` only if it was not already set.
    pub fn add_flag(&self, flag: StatusFlag) {
        let bit = flag.bits();
        let old = self.bits.fetch_or(bit, Ordering::Relaxed);
        if old & bit == 0 {
            self.notify_added(flag.into());
        }
    }

    /// Clears `flag`. Fires `on_flag_removed` only if it was set.
    pub fn clear_flag(&self, flag: StatusFlag) {
        let bit = flag.bits();
        let old = self.bits.fetch_and(!bit, Ordering::Relaxed);
        if old & bit != 0 {
            self.notify_removed(flag.into());
        }
    }

    /// Whether `flag` is set.
    #[must_use]
    pub fn has_flag(&self, flag: StatusFlag) -> bool {
        self.bits() & flag.bits() != 0
    }

    /// [`StatusComponent::add_flag`] for a raw value. Ignored unless exactly one bit is set.
    pub fn add_flag_bits(&self, bits: u8) {
        match StatusFlag::from_bits(bits) {
            Some(flag) => self.add_flag(flag),
            None => log::debug!("{}: ignoring add of invalid flag {bits:#04x}", self.owner_label()),
        }
    }

    /// [`StatusComponent::clear_flag`] for a raw value. Ignored unless exactly one bit is set.
    pub fn clear_flag_bits(&self, bits: u8) {
        match StatusFlag::from_bits(bits) {
            Some(flag) => self.clear_flag(flag),
            None => log::debug!("{}: ignoring clear of invalid flag {bits:#04x}", self.owner_label()),
        }
    }

    /// [`StatusComponent::has_flag`] for a raw value. False unless exactly one bit is set.
    #[must_use]
    pub fn has_flag_bits(&self, bits: u8) -> bool {
        StatusFlag::from_bits(bits).is_some_and(|flag| self.has_flag(flag))
    }

    // Mask operations

    /// Sets every flag in `mask`. Fires `on_flag_added(mask)` if anything changed.
    pub fn add_flags(&self, mask: StatusFlags) {
        if mask.is_empty() {
            return;
        }
        let old = self.bits.fetch_or(mask.bits(), Ordering::Relaxed);
        if old | mask.bits() != old {
            self.notify_added(mask);
        }
    }

    /// Clears every flag in `mask`. Fires `on_flag_removed(mask)` if anything changed.
    pub fn remove_flags(&self, mask: StatusFlags) {
        if mask.is_empty() {
            return;
        }
        let old = self.bits.fetch_and(!mask.bits(), Ordering::Relaxed);
        if old & !mask.bits() != old {
            self.notify_removed(mask);
        }
    }

    /// Flips every flag in `mask`.
    ///
    /// Fires `on_flag_added` with the flags that became set, then
    /// `on_flag_removed` with the flags that became clear; either is skipped
    /// when empty.
    pub fn toggle_flags(&self, mask: StatusFlags) {
        if mask.is_empty() {
            return;
        }
        let old = self.bits.fetch_xor(mask.bits(), Ordering::Relaxed);
        let new = old ^ mask.bits();

        let added = StatusFlags::from_bits_retain(!old & new);
        let removed = StatusFlags::from_bits_retain(old & !new);
        if !added.is_empty() {
            self.notify_added(added);
        }
        if !removed.is_empty() {
            self.notify_removed(removed);
        }
    }

    /// Sets `to_add` and clears `to_remove` in one assignment.
    ///
    /// A flag in both masks ends up cleared. Both events are judged against
    /// the word before the call: `on_flag_added(to_add)` fires if adding alone
    /// would have changed it, `on_flag_removed(to_remove)` if removing alone
    /// would have. An added event can therefore report a flag that ends the
    /// call cleared.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn modify_flags(&self, to_add: StatusFlags, to_remove: StatusFlags) {
        let add = to_add.bits();
        let remove = to_remove.bits();
        let (Ok(old) | Err(old)) =
            self.bits
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                    Some((bits | add) & !remove)
                });

        if add != 0 && old | add != old {
            self.notify_added(to_add);
        }
        if remove != 0 && old & !remove != old {
            self.notify_removed(to_remove);
        }
    }

    /// Clears every flag. Fires `on_flag_removed` with the previous flags if any were set.
    pub fn clear_all_flags(&self) {
        let old = self.bits.swap(0, Ordering::Relaxed);
        if old != 0 {
            self.notify_removed(StatusFlags::from_bits_retain(old));
        }
    }

    // Queries

    /// Whether every flag in `mask` is set. True for an empty mask.
    #[must_use]
    pub fn has_all_flags(&self, mask: StatusFlags) -> bool {
        self.flags().contains(mask)
    }

    /// Whether any flag in `mask` is set. False for an empty mask.
    #[must_use]
    pub fn has_any_flags(&self, mask: StatusFlags) -> bool {
        self.flags().intersects(mask)
    }

    /// Whether all of `must_have` are set and none of `must_not_have` are.
    #[must_use]
    pub fn can_perform_action(&self, must_have: StatusFlags, must_not_have: StatusFlags) -> bool {
        let flags = self.flags();
        flags.contains(must_have) && !flags.intersects(must_not_have)
    }

    /// Comma separated display names of the set flags, in bit order, or `None`.
    #[must_use]
    pub fn describe_active_flags(&self) -> String {
        self.flags().describe()
    }

    // Timed flags

    /// Sets `flag` and schedules it to be cleared after `duration_secs` seconds.
    ///
    /// Returns the handle of the pending clear, or `None` if nothing happened:
    /// the duration is not a positive finite number, or the component has no
    /// scheduler. The pending clear only holds a weak reference, so dropping
    /// the component before it fires is harmless. Scheduling the same flag
    /// twice leaves two independent clears.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn add_timed_flag(self: &Arc<Self>, flag: StatusFlag, duration_secs: f32) -> Option<TimerHandle> {
        let delay = match Duration::try_from_secs_f32(duration_secs) {
            Ok(delay) if !delay.is_zero() => delay,
            _ => {
                log::debug!(
                    "{}: ignoring timed {flag} with duration {duration_secs}",
                    self.owner_label()
                );
                return None;
            }
        };
        let Some(scheduler) = &self.scheduler else {
            log::warn!(
                "{}: cannot add timed {flag}, no timer scheduler attached",
                self.owner_label()
            );
            return None;
        };

        self.add_flag(flag);

        let component: Weak<Self> = Arc::downgrade(self);
        let handle = scheduler.schedule_once(
            delay,
            Box::new(move || {
                if let Some(component) = component.upgrade() {
                    component.clear_flag(flag);
                } else {
                    log::trace!("Timed {flag} expired after its component was dropped");
                }
            }),
        );
        Some(handle)
    }

    /// [`StatusComponent::add_timed_flag`] for a raw value. Ignored unless exactly one bit is set.
    pub fn add_timed_flag_bits(self: &Arc<Self>, bits: u8, duration_secs: f32) -> Option<TimerHandle> {
        if let Some(flag) = StatusFlag::from_bits(bits) {
            self.add_timed_flag(flag, duration_secs)
        } else {
            log::debug!(
                "{}: ignoring timed add of invalid flag {bits:#04x}",
                self.owner_label()
            );
            None
        }
    }
}

impl Default for StatusComponent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ActorId;
    use eternity_utils::TickTimerManager;
    use eternity_utils::locks::SyncMutex;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Added(StatusFlags),
        Removed(StatusFlags),
    }

    fn recorded(component: &StatusComponent) -> Arc<SyncMutex<Vec<Event>>> {
        let events = Arc::new(SyncMutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        component
            .on_flag_added
            .add(move |mask: &StatusFlags| sink.lock().push(Event::Added(*mask)));
        let sink = Arc::clone(&events);
        component
            .on_flag_removed
            .add(move |mask: &StatusFlags| sink.lock().push(Event::Removed(*mask)));
        events
    }

    #[test]
    fn test_add_then_clear_single_flag() {
        let status = StatusComponent::new();
        for flag in StatusFlag::ALL {
            status.add_flag(flag);
            assert!(status.has_flag(flag));
            status.clear_flag(flag);
            assert!(!status.has_flag(flag));
        }
        assert_eq!(status.bits(), 0);
    }

    #[test]
    fn test_add_flag_is_idempotent() {
        let status = StatusComponent::new();
        let events = recorded(&status);

        status.add_flag(StatusFlag::Dead);
        status.add_flag(StatusFlag::Dead);
        status.clear_flag(StatusFlag::Hiding);

        assert_eq!(*events.lock(), vec![Event::Added(StatusFlags::DEAD)]);
    }

    #[test]
    fn test_invalid_raw_flags_are_ignored() {
        let status = StatusComponent::new();
        let events = recorded(&status);

        status.add_flag_bits(0);
        status.add_flag_bits(0b0000_0110);
        assert_eq!(status.bits(), 0);

        status.add_flags(StatusFlags::all());
        status.clear_flag_bits(0xff);
        assert_eq!(status.bits(), 0xff);
        assert!(!status.has_flag_bits(0x03));
        assert!(status.has_flag_bits(0x02));

        assert_eq!(*events.lock(), vec![Event::Added(StatusFlags::all())]);
    }

    #[test]
    fn test_toggle_reports_both_directions() {
        let status = StatusComponent::new();
        status.add_flag(StatusFlag::Injured);
        let events = recorded(&status);

        status.toggle_flags(StatusFlags::INJURED | StatusFlags::SNEAKING);

        assert_eq!(status.flags(), StatusFlags::SNEAKING);
        assert_eq!(
            *events.lock(),
            vec![
                Event::Added(StatusFlags::SNEAKING),
                Event::Removed(StatusFlags::INJURED),
            ]
        );
    }

    #[test]
    fn test_toggle_is_xor_and_involution() {
        for start in 0..=u8::MAX {
            for mask in [0x00, 0x01, 0x5a, 0x81, 0xff] {
                let status = StatusComponent::new();
                status.add_flags(StatusFlags::from_bits_retain(start));
                let mask = StatusFlags::from_bits_retain(mask);

                status.toggle_flags(mask);
                assert_eq!(status.bits(), start ^ mask.bits());
                status.toggle_flags(mask);
                assert_eq!(status.bits(), start);
            }
        }
    }

    #[test]
    fn test_empty_masks_are_noops() {
        let status = StatusComponent::new();
        status.add_flag(StatusFlag::Action);
        let events = recorded(&status);

        status.add_flags(StatusFlags::empty());
        status.remove_flags(StatusFlags::empty());
        status.toggle_flags(StatusFlags::empty());
        status.modify_flags(StatusFlags::empty(), StatusFlags::empty());

        assert_eq!(status.flags(), StatusFlags::ACTION);
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_add_and_remove_only_fire_on_change() {
        let status = StatusComponent::new();
        status.add_flag(StatusFlag::Breathing);
        let events = recorded(&status);

        status.add_flags(StatusFlags::BREATHING);
        status.remove_flags(StatusFlags::DEAD);
        status.remove_flags(StatusFlags::BREATHING | StatusFlags::DEAD);

        assert_eq!(
            *events.lock(),
            vec![Event::Removed(StatusFlags::BREATHING | StatusFlags::DEAD)]
        );
    }

    #[test]
    fn test_modify_overlap_ends_cleared() {
        let status = StatusComponent::new();
        let events = recorded(&status);

        status.modify_flags(StatusFlags::INJURED, StatusFlags::INJURED);

        assert!(!status.has_flag(StatusFlag::Injured));
        assert_eq!(status.bits(), 0);
        // Judged against the word before the call: adding would have changed it.
        assert_eq!(*events.lock(), vec![Event::Added(StatusFlags::INJURED)]);
    }

    #[test]
    fn test_modify_overlap_from_set_only_removes() {
        let status = StatusComponent::new();
        status.add_flag(StatusFlag::Injured);
        let events = recorded(&status);

        status.modify_flags(StatusFlags::INJURED, StatusFlags::INJURED);

        assert_eq!(status.bits(), 0);
        // Adding a bit that is already set changes nothing, so only the removal fires.
        assert_eq!(*events.lock(), vec![Event::Removed(StatusFlags::INJURED)]);
    }

    #[test]
    fn test_modify_fires_both_events_with_raw_masks() {
        let status = StatusComponent::new();
        status.add_flag(StatusFlag::Dead);
        let events = recorded(&status);

        let add = StatusFlags::INJURED | StatusFlags::PANICKING;
        let remove = StatusFlags::INJURED | StatusFlags::DEAD;
        status.modify_flags(add, remove);

        assert_eq!(status.flags(), StatusFlags::PANICKING);
        assert_eq!(*events.lock(), vec![Event::Added(add), Event::Removed(remove)]);
    }

    #[test]
    fn test_clear_all_flags() {
        let status = StatusComponent::new();
        let events = recorded(&status);

        status.clear_all_flags();
        assert!(events.lock().is_empty());

        status.add_flags(StatusFlags::HIDING | StatusFlags::SNEAKING);
        status.clear_all_flags();
        assert_eq!(status.bits(), 0);
        assert_eq!(
            events.lock().last(),
            Some(&Event::Removed(StatusFlags::HIDING | StatusFlags::SNEAKING))
        );
        assert_eq!(events.lock().len(), 2);
    }

    #[test]
    fn test_empty_mask_queries() {
        let status = StatusComponent::new();
        for bits in [0x00, 0x10, 0xff] {
            status.clear_all_flags();
            status.add_flags(StatusFlags::from_bits_retain(bits));
            assert!(status.has_all_flags(StatusFlags::empty()));
            assert!(!status.has_any_flags(StatusFlags::empty()));
        }
    }

    #[test]
    fn test_can_perform_action() {
        let status = StatusComponent::new();
        status.add_flags(StatusFlags::SNEAKING | StatusFlags::BREATHING);

        assert!(status.can_perform_action(StatusFlags::SNEAKING, StatusFlags::DEAD));
        assert!(!status.can_perform_action(StatusFlags::SNEAKING | StatusFlags::HIDING, StatusFlags::empty()));
        assert!(!status.can_perform_action(StatusFlags::empty(), StatusFlags::BREATHING));
        assert!(status.can_perform_action(StatusFlags::empty(), StatusFlags::empty()));
    }

    #[test]
    fn test_overlapping_action_requirements_never_pass() {
        let shared = StatusFlags::INJURED;
        for bits in 0..=u8::MAX {
            let status = StatusComponent::new();
            status.add_flags(StatusFlags::from_bits_retain(bits));
            assert!(!status.can_perform_action(shared | StatusFlags::ACTION, shared));
        }
    }

    #[test]
    fn test_scenario_add_remove_describe() {
        let status = StatusComponent::new();
        let events = recorded(&status);

        status.add_flags(StatusFlags::INJURED | StatusFlags::PANICKING);
        assert!(status.has_all_flags(StatusFlags::INJURED | StatusFlags::PANICKING));
        status.remove_flags(StatusFlags::INJURED);

        assert_eq!(status.flags(), StatusFlags::PANICKING);
        assert_eq!(status.describe_active_flags(), "Panicking");
        assert_eq!(
            *events.lock(),
            vec![
                Event::Added(StatusFlags::INJURED | StatusFlags::PANICKING),
                Event::Removed(StatusFlags::INJURED),
            ]
        );
    }

    #[test]
    fn test_describe_none() {
        assert_eq!(StatusComponent::new().describe_active_flags(), "None");
    }

    #[test]
    fn test_initialize_broadcasts() {
        let status = StatusComponent::new().with_owner(EntityOwner::new(ActorId(3), "Ayla"));
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        status
            .on_initialized
            .add(move |()| flag.store(true, Ordering::Relaxed));

        assert!(!status.is_initialized());
        status.initialize();
        assert!(status.is_initialized());
        assert!(fired.load(Ordering::Relaxed));
        assert_eq!(status.owner().map(|owner| owner.id), Some(ActorId(3)));
    }

    #[test]
    fn test_timed_flag_expires_once() {
        let timers = Arc::new(TickTimerManager::new());
        let status = Arc::new(StatusComponent::new().with_scheduler(timers.clone()));
        let events = recorded(&status);

        assert!(status.add_timed_flag(StatusFlag::Hiding, 2.0).is_some());
        assert!(status.has_flag(StatusFlag::Hiding));

        timers.advance(Duration::from_millis(1500));
        assert!(status.has_flag(StatusFlag::Hiding));

        timers.advance(Duration::from_millis(500));
        assert!(!status.has_flag(StatusFlag::Hiding));
        timers.advance(Duration::from_secs(10));

        assert_eq!(
            *events.lock(),
            vec![
                Event::Added(StatusFlags::HIDING),
                Event::Removed(StatusFlags::HIDING),
            ]
        );
    }

    #[test]
    fn test_timed_flag_rejects_bad_input() {
        let timers = Arc::new(TickTimerManager::new());
        let status = Arc::new(StatusComponent::new().with_scheduler(timers.clone()));

        assert!(status.add_timed_flag(StatusFlag::Dead, 0.0).is_none());
        assert!(status.add_timed_flag(StatusFlag::Dead, -1.0).is_none());
        assert!(status.add_timed_flag(StatusFlag::Dead, f32::NAN).is_none());
        assert!(status.add_timed_flag(StatusFlag::Dead, f32::INFINITY).is_none());
        assert!(status.add_timed_flag_bits(0x30, 1.0).is_none());
        assert_eq!(status.bits(), 0);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_timed_flag_without_scheduler_does_nothing() {
        let status = Arc::new(StatusComponent::new());
        assert!(status.add_timed_flag(StatusFlag::Hiding, 1.0).is_none());
        assert!(!status.has_flag(StatusFlag::Hiding));
    }

    #[test]
    fn test_cancelled_timed_flag_stays_set() {
        let timers = Arc::new(TickTimerManager::new());
        let status = Arc::new(StatusComponent::new().with_scheduler(timers.clone()));

        let handle = status.add_timed_flag(StatusFlag::InCinematic, 1.0);
        handle.expect("scheduled").cancel();
        timers.advance(Duration::from_secs(2));

        assert!(status.has_flag(StatusFlag::InCinematic));
    }

    #[test]
    fn test_overlapping_timed_flags_clear_once() {
        let timers = Arc::new(TickTimerManager::new());
        let status = Arc::new(StatusComponent::new().with_scheduler(timers.clone()));
        let events = recorded(&status);

        status.add_timed_flag(StatusFlag::Panicking, 1.0);
        status.add_timed_flag(StatusFlag::Panicking, 3.0);
        assert_eq!(timers.pending(), 2);

        timers.advance(Duration::from_secs(1));
        assert!(!status.has_flag(StatusFlag::Panicking));
        timers.advance(Duration::from_secs(2));

        let removed = events
            .lock()
            .iter()
            .filter(|event| matches!(event, Event::Removed(_)))
            .count();
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_timed_flag_after_component_dropped() {
        let timers = Arc::new(TickTimerManager::new());
        let status = Arc::new(StatusComponent::new().with_scheduler(timers.clone()));

        status.add_timed_flag(StatusFlag::Hiding, 1.0);
        drop(status);

        assert_eq!(timers.advance(Duration::from_secs(1)), 1);
    }
}
