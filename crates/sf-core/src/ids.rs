//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Each ID carries a short display
//! prefix (`R7`, `N3`, `node12`, `E4`) which is also the form written to the
//! telemetry corpus; parsing accepts the prefixed or the bare integer form.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) = $prefix:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// All-ones sentinel; never assigned to a real entity.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Display prefix used by `Display` and accepted by `FromStr`.
            pub const PREFIX: &'static str = $prefix;

            /// Position in the owning `Vec`.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// `INVALID`.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let digits = s.strip_prefix($prefix).unwrap_or(s);
                digits.parse::<$inner>().map($name).map_err(|_| {
                    CoreError::Parse(format!(
                        "invalid {} {s:?}: expected an integer, optionally prefixed with {:?}",
                        stringify!($name),
                        $prefix,
                    ))
                })
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
    /// Stable identifier of a road segment, assigned in generation order.
    pub struct RoadId(u32) = "R";
}

typed_id! {
    /// Identifier of a residential neighborhood (routing origin).
    pub struct NeighborhoodId(u16) = "N";
}

typed_id! {
    /// Index of a node in a per-request weighted routing graph.
    pub struct NodeId(u32) = "node";
}

typed_id! {
    /// Index of a directed edge in a weighted routing graph.
    pub struct EdgeId(u32) = "E";
}
