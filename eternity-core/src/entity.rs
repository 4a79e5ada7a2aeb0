//! Identity of the actors that own gameplay components.
//!
//! Components only use this for log output and for telling the host which
//! actor to ignore in traces; no behavior depends on it.

use std::fmt;

/// Host-assigned actor identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The actor a component belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityOwner {
    /// The owning actor.
    pub id: ActorId,
    /// Display name of the owning actor.
    pub name: String,
}

impl EntityOwner {
    /// Creates an owner description.
    #[must_use]
    pub fn new(id: ActorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for EntityOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
