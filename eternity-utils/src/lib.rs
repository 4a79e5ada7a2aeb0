//! Host-agnostic plumbing shared by the Eternity gameplay crates.
//!
//! Nothing in here knows about characters or status flags; it provides the
//! observer lists, deferred timers, math types and lock aliases the gameplay
//! code is built on.

pub mod delegate;
pub mod locks;
pub mod math;
pub mod timer;

pub use delegate::{DelegateHandle, MulticastDelegate};
pub use timer::{TickTimerManager, TimerCallback, TimerHandle, TimerScheduler, TokioTimerManager};
