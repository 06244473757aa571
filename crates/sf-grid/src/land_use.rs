//! Land-use tags of lattice cells.

use std::fmt;

/// The closed set of land uses a cell can carry.  Every cell has exactly one.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum LandUse {
    #[default]
    Empty,
    Road,
    House,
    School,
    Park,
    Grocery,
    Store,
    Library,
    OpenLand,
}

impl LandUse {
    pub const ALL: [LandUse; 9] = [
        LandUse::Empty,
        LandUse::Road,
        LandUse::House,
        LandUse::School,
        LandUse::Park,
        LandUse::Grocery,
        LandUse::Store,
        LandUse::Library,
        LandUse::OpenLand,
    ];

    /// Roads, the school campus and parks are reserved zones.
    #[inline]
    pub fn is_reserved(self) -> bool {
        matches!(self, LandUse::Road | LandUse::School | LandUse::Park)
    }

    /// One-character symbol used by the text map dump.
    pub fn symbol(self) -> char {
        match self {
            LandUse::Empty    => '.',
            LandUse::Road     => '#',
            LandUse::House    => 'H',
            LandUse::School   => 'S',
            LandUse::Park     => 'P',
            LandUse::Grocery  => 'G',
            LandUse::Store    => 'T',
            LandUse::Library  => 'L',
            LandUse::OpenLand => ',',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LandUse::Empty    => "empty",
            LandUse::Road     => "road",
            LandUse::House    => "house",
            LandUse::School   => "school",
            LandUse::Park     => "park",
            LandUse::Grocery  => "grocery",
            LandUse::Store    => "store",
            LandUse::Library  => "library",
            LandUse::OpenLand => "open_land",
        }
    }
}

impl fmt::Display for LandUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
