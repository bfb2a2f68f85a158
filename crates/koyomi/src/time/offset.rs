//! Fixed UTC offsets (RFC 5545 UTC-OFFSET value type).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Seconds of the legal offset range: UTC-12:00.
const MIN_OFFSET_SECONDS: i32 = -43_200;
/// Seconds of the legal offset range: UTC+14:00.
const MAX_OFFSET_SECONDS: i32 = 50_400;
/// Wrap period between the two range ends, with one hour in between.
const WRAP_SECONDS: i32 = 97_200;

/// A signed fixed offset from UTC, in whole hours and minutes.
///
/// The sign is carried separately in `factor` so that `-00:30` and `+00:30`
/// are representable; `hours` and `minutes` are non-negative magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtcOffset {
    /// Offset sign: `1` for east of UTC, `-1` for west.
    pub factor: i32,
    /// Hour magnitude of the offset.
    pub hours: i32,
    /// Minute magnitude of the offset.
    pub minutes: i32,
}

impl UtcOffset {
    /// Builds an offset from components, normalized into the legal range.
    #[must_use]
    pub fn new(factor: i32, hours: i32, minutes: i32) -> Self {
        Self {
            factor,
            hours,
            minutes,
        }
        .normalized()
    }

    /// Builds an offset from a seconds value, wrapped into the legal range.
    ///
    /// Offsets wrap when the world ends: the hour after UTC+14:00 is
    /// UTC-12:00. The value is truncated to whole minutes.
    #[must_use]
    pub fn from_seconds(seconds: i32) -> Self {
        let mut secs = seconds;
        while secs < MIN_OFFSET_SECONDS {
            secs += WRAP_SECONDS;
        }
        while secs > MAX_OFFSET_SECONDS {
            secs -= WRAP_SECONDS;
        }

        let factor = if seconds < 0 { -1 } else { 1 };
        Self::split(secs, factor)
    }

    /// The offset as a signed number of seconds.
    #[must_use]
    pub const fn to_seconds(self) -> i32 {
        self.factor * (60 * self.minutes + 3600 * self.hours)
    }

    /// Compares two offsets by their seconds value.
    #[must_use]
    pub fn compare(self, other: Self) -> Ordering {
        self.to_seconds().cmp(&other.to_seconds())
    }

    fn normalized(self) -> Self {
        let secs = self.to_seconds();
        let normalized = Self::from_seconds(secs);
        if secs == 0 {
            // An offset of exactly zero keeps whichever sign it arrived with.
            Self {
                factor: self.factor,
                ..normalized
            }
        } else {
            normalized
        }
    }

    fn split(secs: i32, fallback_factor: i32) -> Self {
        let magnitude = secs.abs();
        let factor = match secs.cmp(&0) {
            Ordering::Less => -1,
            Ordering::Greater => 1,
            Ordering::Equal => fallback_factor,
        };
        let hours = magnitude / 3600;
        let minutes = (magnitude - hours * 3600) / 60;
        Self {
            factor,
            hours,
            minutes,
        }
    }
}

impl Default for UtcOffset {
    fn default() -> Self {
        Self {
            factor: 1,
            hours: 0,
            minutes: 0,
        }
    }
}

impl std::fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.factor == 1 { '+' } else { '-' };
        write!(f, "{sign}{:02}:{:02}", self.hours, self.minutes)
    }
}
