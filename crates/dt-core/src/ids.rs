//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Persons, nodes, links and facilities
//! are stored in dense `Vec`s, so the inner integer doubles as an index via
//! `.index()`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) = $prefix:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a person in the population.
    pub struct AgentId(u32) = "agent#";
}

typed_id! {
    /// Index of a road-network node.
    pub struct NodeId(u32) = "node#";
}

typed_id! {
    /// Index of a directed road-network link.
    pub struct EdgeId(u32) = "link#";
}

typed_id! {
    /// Index of an activity facility (a location offering activities).
    pub struct FacilityId(u32) = "facility#";
}

typed_id! {
    /// Index of a vehicle in the optional vehicles container.
    pub struct VehicleId(u32) = "vehicle#";
}

typed_id! {
    /// Index of a household in the optional households container.
    pub struct HouseholdId(u32) = "household#";
}

typed_id! {
    /// Index of a stop facility in the transit schedule.
    pub struct TransitStopId(u32) = "stop#";
}

typed_id! {
    /// Index of a line in the transit schedule.
    pub struct TransitLineId(u32) = "line#";
}
