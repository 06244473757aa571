//! School-day calendar model.
//!
//! # Design
//!
//! A simulated week is `days` school days, each split into equal time
//! windows (48 half-hour windows by default).  The hour of a window is
//!
//!   hour = index * 24 / windows_per_day
//!
//! which for half-hour windows is `index / 2`.  All peak predicates are
//! defined on the hour, so they are independent of window resolution:
//!
//! | Period          | Hours (inclusive) |
//! |-----------------|-------------------|
//! | arrival peak    | 7 – 9             |
//! | dismissal peak  | 14 – 16           |
//! | daytime         | 6 – 19            |
//!
//! A crossing guard is on duty exactly during the arrival and dismissal
//! peaks.

use std::fmt;

use crate::CoreError;

pub const HOURS_PER_DAY: u8 = 24;

// ── HourOfDay ─────────────────────────────────────────────────────────────────

/// An hour of the day, guaranteed to be in `0..24`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct HourOfDay(u8);

impl HourOfDay {
    /// Returns `None` for values outside `0..24`.
    pub const fn new(hour: u8) -> Option<Self> {
        if hour < HOURS_PER_DAY { Some(Self(hour)) } else { None }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_arrival_peak(self) -> bool {
        (7..=9).contains(&self.0)
    }

    #[inline]
    pub fn is_dismissal_peak(self) -> bool {
        (14..=16).contains(&self.0)
    }

    #[inline]
    pub fn is_daytime(self) -> bool {
        (6..=19).contains(&self.0)
    }

    /// Crossing guards are present during either school peak.
    #[inline]
    pub fn crossing_guard_on_duty(self) -> bool {
        self.is_arrival_peak() || self.is_dismissal_peak()
    }
}

impl TryFrom<u8> for HourOfDay {
    type Error = CoreError;

    fn try_from(hour: u8) -> Result<Self, Self::Error> {
        HourOfDay::new(hour)
            .ok_or_else(|| CoreError::Parse(format!("hour {hour} outside 0..24")))
    }
}

impl From<HourOfDay> for u8 {
    fn from(h: HourOfDay) -> u8 {
        h.0
    }
}

impl fmt::Display for HourOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

// ── TimeWindow ────────────────────────────────────────────────────────────────

/// One (day, window) slot of the simulated school week.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    /// Day index from the start of the week (0 = Monday).
    pub day: u8,
    /// Window index within the day, `0..per_day`.
    pub index: u8,
    /// Windows per day (48 = half-hour resolution).
    pub per_day: u8,
}

impl TimeWindow {
    pub fn new(day: u8, index: u8, per_day: u8) -> Self {
        debug_assert!(per_day > 0 && index < per_day);
        Self { day, index, per_day }
    }

    /// Hour of day this window starts in.
    #[inline]
    pub fn hour(self) -> HourOfDay {
        let h = self.index as u32 * HOURS_PER_DAY as u32 / self.per_day as u32;
        HourOfDay(h.min(HOURS_PER_DAY as u32 - 1) as u8)
    }

    /// Position of this window in the whole week, counting from 0.  Used as a
    /// stable task key for per-window random streams.
    #[inline]
    pub fn ordinal(self) -> u64 {
        self.day as u64 * self.per_day as u64 + self.index as u64
    }

    /// All windows of a `days`-day week, in chronological order.
    pub fn week(days: u8, per_day: u8) -> impl Iterator<Item = TimeWindow> {
        (0..days).flat_map(move |d| (0..per_day).map(move |w| TimeWindow::new(d, w, per_day)))
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day {} window {} ({})", self.day, self.index, self.hour())
    }
}
