//! Opaque entity identifiers.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque entity identifier.
///
/// An entity has no record of its own: it exists only as the set of
/// components that stores hold for its id. Ids carry no structure and
/// no uniqueness is enforced here; a store refuses a second live
/// component for the same id.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityId(u64);

impl EntityId {
    /// Sentinel value representing "no entity".
    pub const NULL: EntityId = EntityId(u64::MAX);

    /// Creates an entity ID from its raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value of this ID.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns true if this is the null sentinel value.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl From<u64> for EntityId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "EntityId(null)")
        } else {
            write!(f, "EntityId({})", self.0)
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({})", self.0)
        }
    }
}
