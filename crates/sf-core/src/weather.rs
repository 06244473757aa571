//! Weather conditions and their derived signals.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Categorical weather condition of a time window.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Fog,
}

/// Coarse visibility level derived from [`Weather`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Visibility {
    High,
    Low,
}

impl Weather {
    pub const ALL: [Weather; 3] = [Weather::Clear, Weather::Rain, Weather::Fog];

    /// Only rain counts as precipitation.
    #[inline]
    pub fn precipitation(self) -> bool {
        matches!(self, Weather::Rain)
    }

    #[inline]
    pub fn visibility(self) -> Visibility {
        match self {
            Weather::Clear => Visibility::High,
            Weather::Rain | Weather::Fog => Visibility::Low,
        }
    }

    /// Lower-case label, the categorical value used in the corpus.
    pub fn as_str(self) -> &'static str {
        match self {
            Weather::Clear => "clear",
            Weather::Rain  => "rain",
            Weather::Fog   => "fog",
        }
    }
}

impl Visibility {
    pub const ALL: [Visibility; 2] = [Visibility::High, Visibility::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::High => "high",
            Visibility::Low  => "low",
        }
    }
}

impl FromStr for Weather {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" => Ok(Weather::Clear),
            "rain"  => Ok(Weather::Rain),
            "fog"   => Ok(Weather::Fog),
            other => Err(CoreError::Parse(format!(
                "invalid weather {other:?}: expected \"clear\", \"rain\", or \"fog\""
            ))),
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
