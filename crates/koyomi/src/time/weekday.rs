//! Weekday names and week-relative numbering.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A day of the week, numbered 1 (Sunday) through 7 (Saturday).
///
/// The absolute numbering matters: Zeller's congruence and the BYDAY
/// machinery both work in terms of these values, re-based against a
/// configurable week start where needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

/// The default week start for WKST, per RFC 5545.
pub const DEFAULT_WEEK_START: Weekday = Weekday::Monday;

impl Weekday {
    /// The absolute day number, 1 (Sunday) through 7 (Saturday).
    #[must_use]
    pub const fn number(self) -> i32 {
        self as i32
    }

    /// Builds a weekday from an absolute day number; values outside 1..=7
    /// wrap around the week.
    #[must_use]
    pub const fn from_number(number: i32) -> Self {
        match ((number - 1) % 7 + 7) % 7 + 1 {
            1 => Self::Sunday,
            2 => Self::Monday,
            3 => Self::Tuesday,
            4 => Self::Wednesday,
            5 => Self::Thursday,
            6 => Self::Friday,
            _ => Self::Saturday,
        }
    }

    /// Parses an iCalendar day name (SU, MO, ...), case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SU" => Some(Self::Sunday),
            "MO" => Some(Self::Monday),
            "TU" => Some(Self::Tuesday),
            "WE" => Some(Self::Wednesday),
            "TH" => Some(Self::Thursday),
            "FR" => Some(Self::Friday),
            "SA" => Some(Self::Saturday),
            _ => None,
        }
    }

    /// The iCalendar day name for this weekday.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "SU",
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
        }
    }

    /// The day number relative to the given week start, 1..=7, where 1 is
    /// the week start itself.
    #[must_use]
    pub const fn week_position(self, week_start: Self) -> i32 {
        ((self.number() - week_start.number()) % 7 + 7) % 7 + 1
    }

    /// Builds a weekday from a week-relative day number, the inverse of
    /// [`Weekday::week_position`].
    #[must_use]
    pub const fn from_week_position(position: i32, week_start: Self) -> Self {
        Self::from_number(position + week_start.number() - 1)
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| D::Error::custom(format!("invalid weekday: {s}")))
    }
}
