//! Signed calendar durations (RFC 5545 DURATION value type).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;

/// A signed span of weeks, days, hours, minutes and seconds.
///
/// All component fields are non-negative by convention; the sign lives in
/// `is_negative`. `from_seconds` and `to_seconds` are exact inverses modulo
/// the weeks/days split: a flat multiple of seven days is folded into weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Duration {
    /// Weeks in this duration.
    pub weeks: i64,
    /// Days in this duration.
    pub days: i64,
    /// Hours in this duration.
    pub hours: i64,
    /// Minutes in this duration.
    pub minutes: i64,
    /// Seconds in this duration.
    pub seconds: i64,
    /// Whether the span points into the past.
    pub is_negative: bool,
}

impl Duration {
    /// The zero duration, `PT0S`.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Builds a duration from a signed seconds value.
    #[must_use]
    pub fn from_seconds(seconds: i64) -> Self {
        let mut secs = seconds.abs();
        let mut out = Self {
            is_negative: seconds < 0,
            ..Self::default()
        };

        out.days = secs / SECONDS_PER_DAY;
        if out.days % 7 == 0 {
            out.weeks = out.days / 7;
            out.days = 0;
        }
        secs -= (out.days + 7 * out.weeks) * SECONDS_PER_DAY;

        out.hours = secs / 3600;
        secs -= out.hours * 3600;

        out.minutes = secs / 60;
        out.seconds = secs - out.minutes * 60;
        out
    }

    /// The duration as a signed number of seconds.
    #[must_use]
    pub const fn to_seconds(self) -> i64 {
        let seconds = self.seconds
            + 60 * self.minutes
            + 3600 * self.hours
            + SECONDS_PER_DAY * self.days
            + SECONDS_PER_WEEK * self.weeks;
        if self.is_negative { -seconds } else { seconds }
    }

    /// Re-expresses the duration in canonical components, e.g. 61 seconds
    /// becomes one minute and one second.
    pub fn normalize(&mut self) {
        *self = Self::from_seconds(self.to_seconds());
    }

    /// Compares two durations by their seconds value.
    #[must_use]
    pub fn compare(self, other: Self) -> Ordering {
        self.to_seconds().cmp(&other.to_seconds())
    }
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.to_seconds() == 0 {
            return write!(f, "PT0S");
        }
        if self.is_negative {
            write!(f, "-")?;
        }
        write!(f, "P")?;
        if self.weeks != 0 {
            write!(f, "{}W", self.weeks)?;
        }
        if self.days != 0 {
            write!(f, "{}D", self.days)?;
        }
        if self.hours != 0 || self.minutes != 0 || self.seconds != 0 {
            write!(f, "T")?;
            if self.hours != 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes != 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.seconds != 0 {
                write!(f, "{}S", self.seconds)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_seconds_folds_weeks() {
        let dur = Duration::from_seconds(14 * SECONDS_PER_DAY);
        assert_eq!(dur.weeks, 2);
        assert_eq!(dur.days, 0);
        assert_eq!(dur.to_seconds(), 14 * SECONDS_PER_DAY);
    }

    #[test]
    fn from_seconds_keeps_partial_weeks_as_days() {
        let dur = Duration::from_seconds(10 * SECONDS_PER_DAY + 3600);
        assert_eq!(dur.weeks, 0);
        assert_eq!(dur.days, 10);
        assert_eq!(dur.hours, 1);
    }

    #[test]
    fn negative_round_trip() {
        let dur = Duration::from_seconds(-3723);
        assert!(dur.is_negative);
        assert_eq!(dur.hours, 1);
        assert_eq!(dur.minutes, 2);
        assert_eq!(dur.seconds, 3);
        assert_eq!(dur.to_seconds(), -3723);
    }

    #[test]
    fn normalize_carries_components() {
        let mut dur = Duration {
            seconds: 61,
            ..Duration::default()
        };
        dur.normalize();
        assert_eq!(dur.minutes, 1);
        assert_eq!(dur.seconds, 1);
    }

    #[test]
    fn display_iso_forms() {
        assert_eq!(Duration::zero().to_string(), "PT0S");
        assert_eq!(Duration::from_seconds(SECONDS_PER_WEEK * 2).to_string(), "P2W");
        let mut dur = Duration::from_seconds(-(15 * 60));
        assert_eq!(dur.to_string(), "-PT15M");
        dur = Duration::from_seconds(SECONDS_PER_DAY + 2 * 3600 + 30 * 60);
        assert_eq!(dur.to_string(), "P1DT2H30M");
    }

    #[test]
    fn compare_is_total_by_seconds() {
        let shorter = Duration::from_seconds(10);
        let longer = Duration::from_seconds(20);
        assert_eq!(shorter.compare(longer), Ordering::Less);
        assert_eq!(longer.compare(shorter), Ordering::Greater);
    }
}
