//! Three-bucket labels derived from telemetry.
//!
//! Both enums are ordered `Low < Medium < High`, so monotonicity properties
//! can be asserted with plain comparisons.

use std::fmt;

/// Coarse classification of traffic volume.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum CongestionLevel {
    Low,
    Medium,
    High,
}

/// Coarse classification of accident risk.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl CongestionLevel {
    pub const ALL: [CongestionLevel; 3] =
        [CongestionLevel::Low, CongestionLevel::Medium, CongestionLevel::High];

    /// Contribution of congestion to the accident-risk score.
    #[inline]
    pub fn risk_weight(self) -> i32 {
        match self {
            CongestionLevel::Low    => 1,
            CongestionLevel::Medium => 2,
            CongestionLevel::High   => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CongestionLevel::Low    => "LOW",
            CongestionLevel::Medium => "MEDIUM",
            CongestionLevel::High   => "HIGH",
        }
    }
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low    => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High   => "HIGH",
        }
    }
}

impl fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
