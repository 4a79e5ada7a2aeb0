//! Errors produced when converting raw values or names into status flags.

use thiserror::Error;

/// An error that can occur when building a [`super::StatusFlag`] from outside input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    /// The value is zero or has more than one bit set.
    #[error("{0:#04x} is not a single status flag")]
    NotSingleBit(u8),
    /// The name matches neither a variant name nor a display name.
    #[error("Unknown status flag name: {0:?}")]
    UnknownName(String),
}
