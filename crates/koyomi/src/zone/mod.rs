//! Timezone references and UTC offset resolution.

mod registry;
mod timezone;

use std::rc::Rc;

pub use registry::TimezoneRegistry;
pub use timezone::{EXTRA_COVERAGE, MAX_YEAR, Observance, ObservanceKind, Timezone, ZoneChange};

use crate::time::CalendarTime;

/// A timezone reference carried by a [`CalendarTime`].
///
/// `Utc` and `Floating` are fixed zones with a zero offset; `Tz` points at a
/// shared [`Timezone`] whose offset changes are resolved lazily. Sharing is
/// by reference count: cloning a time clones the reference, not the zone.
#[derive(Debug, Clone)]
pub enum Zone {
    /// Coordinated universal time.
    Utc,
    /// A local time without any timezone attachment.
    Floating,
    /// A named timezone with observance-derived offsets.
    Tz(Rc<Timezone>),
}

impl Zone {
    /// The timezone identifier for this reference.
    #[must_use]
    pub fn tzid(&self) -> &str {
        match self {
            Self::Utc => "UTC",
            Self::Floating => "floating",
            Self::Tz(tz) => tz.tzid(),
        }
    }

    /// The UTC offset the given time would have in this zone, in seconds.
    /// The fixed zones answer zero without consulting any cache.
    #[must_use]
    pub fn utc_offset(&self, time: &CalendarTime) -> i32 {
        match self {
            Self::Utc | Self::Floating => 0,
            Self::Tz(tz) => tz.utc_offset(time),
        }
    }

    #[must_use]
    pub const fn is_utc(&self) -> bool {
        matches!(self, Self::Utc)
    }

    #[must_use]
    pub const fn is_floating(&self) -> bool {
        matches!(self, Self::Floating)
    }
}

impl Default for Zone {
    fn default() -> Self {
        Self::Floating
    }
}

impl PartialEq for Zone {
    fn eq(&self, other: &Self) -> bool {
        self.tzid() == other.tzid()
    }
}

impl Eq for Zone {}
