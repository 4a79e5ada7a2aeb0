//! Gameplay layer for Eternity characters.
//!
//! - [`status`] - bitflag status component with change delegates and timed flags
//! - [`hud`] - crosshair overlay drawn through a host supplied surface
//! - [`footstep`] - surface dependent footstep effects from an animation notify
//! - [`config`] - JSON5 configuration shared by the above
//!
//! Everything that needs the host engine (drawing, tracing, audio, timers) is
//! reached through traits, so the logic here runs and tests without one.

pub mod config;
pub mod entity;
pub mod footstep;
pub mod hud;
pub mod status;

pub use config::{ConfigError, ETERNITY_CONFIG, EternityConfig};
pub use status::{StatusComponent, StatusFlag, StatusFlags};
