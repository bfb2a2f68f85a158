//! Registry of named timezones.

use std::collections::HashMap;
use std::rc::Rc;

use crate::zone::{Timezone, Zone};

/// Maps timezone identifiers to shared [`Timezone`] instances.
///
/// The fixed UTC and floating zones resolve without registration. Snapshot
/// restoration goes through [`TimezoneRegistry::resolve`] to reattach zone
/// references that were flattened to identifiers during serialization.
#[derive(Debug, Default)]
pub struct TimezoneRegistry {
    zones: HashMap<String, Rc<Timezone>>,
}

impl TimezoneRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a timezone under its identifier and returns the zone
    /// reference for it. A later registration with the same identifier
    /// replaces the earlier one.
    pub fn register(&mut self, timezone: Timezone) -> Zone {
        let tz = Rc::new(timezone);
        self.zones.insert(tz.tzid().to_string(), Rc::clone(&tz));
        Zone::Tz(tz)
    }

    /// Looks up a registered timezone by identifier.
    #[must_use]
    pub fn get(&self, tzid: &str) -> Option<Zone> {
        self.zones.get(tzid).map(|tz| Zone::Tz(Rc::clone(tz)))
    }

    /// Checks whether an identifier has a registered timezone.
    #[must_use]
    pub fn has(&self, tzid: &str) -> bool {
        self.zones.contains_key(tzid)
    }

    /// Resolves an identifier to a zone reference.
    ///
    /// `UTC`/`Z` and `floating` resolve to the fixed zones; anything else is
    /// looked up in the registry and falls back to the floating zone with a
    /// warning when unknown, so stored snapshots stay loadable.
    #[must_use]
    pub fn resolve(&self, tzid: &str) -> Zone {
        match tzid {
            "UTC" | "Z" => Zone::Utc,
            "" | "floating" => Zone::Floating,
            other => self.get(other).unwrap_or_else(|| {
                tracing::warn!(tzid = other, "unknown timezone, falling back to floating");
                Zone::Floating
            }),
        }
    }
}
