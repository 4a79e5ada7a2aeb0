//! Character status flags.
//!
//! [`StatusFlag`] names exactly one bit of the 8-bit status word, while
//! [`StatusFlags`] is any combination of them (including none). Keeping them
//! apart means single-flag operations can rely on the one-bit invariant and
//! mask operations never have to check it.

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use bitflags::bitflags;

use super::error::StatusError;

/// Returns true if `bits` has exactly one bit set.
#[must_use]
pub const fn is_valid_flag(bits: u8) -> bool {
    bits != 0 && bits & (bits - 1) == 0
}

/// A single character state. The status word is a `u8`, so at most eight exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StatusFlag {
    /// The character is busy performing an action.
    Action = 1 << 0,
    /// The character is hidden.
    Hiding = 1 << 1,
    /// The character is injured.
    Injured = 1 << 2,
    /// The character is panicking.
    Panicking = 1 << 3,
    /// The character is locked in a cinematic.
    InCinematic = 1 << 4,
    /// The character is dead.
    Dead = 1 << 5,
    /// The character is breathing heavily.
    Breathing = 1 << 6,
    /// The character is sneaking.
    Sneaking = 1 << 7,
}

impl StatusFlag {
    /// Every flag, in ascending bit order.
    pub const ALL: [Self; 8] = [
        Self::Action,
        Self::Hiding,
        Self::Injured,
        Self::Panicking,
        Self::InCinematic,
        Self::Dead,
        Self::Breathing,
        Self::Sneaking,
    ];

    /// The bit this flag occupies.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Converts a raw value into a flag if it has exactly one bit set.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x01 => Some(Self::Action),
            0x02 => Some(Self::Hiding),
            0x04 => Some(Self::Injured),
            0x08 => Some(Self::Panicking),
            0x10 => Some(Self::InCinematic),
            0x20 => Some(Self::Dead),
            0x40 => Some(Self::Breathing),
            0x80 => Some(Self::Sneaking),
            _ => None,
        }
    }

    /// The variant name, e.g. `InCinematic`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Action => "Action",
            Self::Hiding => "Hiding",
            Self::Injured => "Injured",
            Self::Panicking => "Panicking",
            Self::InCinematic => "InCinematic",
            Self::Dead => "Dead",
            Self::Breathing => "Breathing",
            Self::Sneaking => "Sneaking",
        }
    }

    /// The human readable name, e.g. `In Cinematic`.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Action => "Performing Action",
            Self::Hiding => "Hiding",
            Self::Injured => "Injured",
            Self::Panicking => "Panicking",
            Self::InCinematic => "In Cinematic",
            Self::Dead => "Dead",
            Self::Breathing => "Breathing",
            Self::Sneaking => "Sneaking",
        }
    }
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for StatusFlag {
    type Err = StatusError;

    /// Accepts the variant name or the display name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|flag| {
                flag.name().eq_ignore_ascii_case(name)
                    || flag.display_name().eq_ignore_ascii_case(name)
            })
            .ok_or_else(|| StatusError::UnknownName(s.to_owned()))
    }
}

impl TryFrom<u8> for StatusFlag {
    type Error = StatusError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_bits(value).ok_or(StatusError::NotSingleBit(value))
    }
}

bitflags! {
    /// Any combination of [`StatusFlag`]s.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StatusFlags: u8 {
        /// See [`StatusFlag::Action`].
        const ACTION = StatusFlag::Action.bits();
        /// See [`StatusFlag::Hiding`].
        const HIDING = StatusFlag::Hiding.bits();
        /// See [`StatusFlag::Injured`].
        const INJURED = StatusFlag::Injured.bits();
        /// See [`StatusFlag::Panicking`].
        const PANICKING = StatusFlag::Panicking.bits();
        /// See [`StatusFlag::InCinematic`].
        const IN_CINEMATIC = StatusFlag::InCinematic.bits();
        /// See [`StatusFlag::Dead`].
        const DEAD = StatusFlag::Dead.bits();
        /// See [`StatusFlag::Breathing`].
        const BREATHING = StatusFlag::Breathing.bits();
        /// See [`StatusFlag::Sneaking`].
        const SNEAKING = StatusFlag::Sneaking.bits();
    }
}

impl StatusFlags {
    /// The single flags contained in this mask, in ascending bit order.
    pub fn flags(self) -> impl Iterator<Item = StatusFlag> {
        StatusFlag::ALL
            .into_iter()
            .filter(move |flag| self.contains(StatusFlags::from(*flag)))
    }

    /// Comma separated display names of the contained flags, or `None` if empty.
    #[must_use]
    pub fn describe(self) -> String {
        if self.is_empty() {
            return "None".to_owned();
        }
        self.flags()
            .map(StatusFlag::display_name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<StatusFlag> for StatusFlags {
    fn from(flag: StatusFlag) -> Self {
        Self::from_bits_retain(flag.bits())
    }
}

impl BitOr for StatusFlag {
    type Output = StatusFlags;

    fn bitor(self, rhs: Self) -> StatusFlags {
        StatusFlags::from(self) | StatusFlags::from(rhs)
    }
}

impl BitOr<StatusFlag> for StatusFlags {
    type Output = Self;

    fn bitor(self, rhs: StatusFlag) -> Self {
        self | Self::from(rhs)
    }
}
