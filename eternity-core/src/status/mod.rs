//! Character status tracking.
//!
//! - [`StatusFlag`] / [`StatusFlags`] - the single flag and mask types
//! - [`StatusComponent`] - the per-character status word with change delegates
//! - [`StatusError`] - conversion failures for raw values and names

mod component;
mod error;
mod flags;

pub use component::StatusComponent;
pub use error::StatusError;
pub use flags::{StatusFlag, StatusFlags, is_valid_flag};
