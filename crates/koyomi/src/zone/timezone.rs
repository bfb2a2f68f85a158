//! Observance-based timezones with a lazily grown offset-change cache.

use std::cell::RefCell;
use std::cmp::Ordering;

use crate::recur::{RecurrenceIterator, RecurrenceRule};
use crate::time::{CalendarTime, UtcOffset};
use crate::zone::Zone;

/// No offset change is computed past this year.
pub const MAX_YEAR: i32 = 2035;

/// Extra years of change coverage expanded beyond a requested year.
pub const EXTRA_COVERAGE: i32 = 5;

/// Whether an observance describes standard or daylight time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservanceKind {
    Standard,
    Daylight,
}

/// One STANDARD/DAYLIGHT sub-rule of a timezone definition.
///
/// An observance either fires once (no rule, no rdates), on a list of
/// explicit dates, on an embedded recurrence rule, or on both.
#[derive(Debug, Clone)]
pub struct Observance {
    pub kind: ObservanceKind,
    /// First onset of this observance, in the zone's local time.
    pub dtstart: CalendarTime,
    /// Offset in effect before each onset.
    pub offset_from: UtcOffset,
    /// Offset in effect after each onset.
    pub offset_to: UtcOffset,
    /// Recurrence of further onsets, if any.
    pub rrule: Option<RecurrenceRule>,
    /// Explicit further onsets, if any.
    pub rdates: Vec<CalendarTime>,
}

/// One resolved offset transition, in pseudo-UTC field values.
#[derive(Debug, Clone, Copy)]
pub struct ZoneChange {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    /// Offset in effect from this change on, in seconds.
    pub utc_offset: i32,
    /// Offset in effect before this change, in seconds.
    pub prev_utc_offset: i32,
    pub is_daylight: bool,
}

impl ZoneChange {
    fn from_time(time: &CalendarTime, utc_offset: i32, prev_utc_offset: i32, is_daylight: bool) -> Self {
        Self {
            year: time.year,
            month: time.month,
            day: time.day,
            hour: time.hour,
            minute: time.minute,
            second: time.second,
            utc_offset,
            prev_utc_offset,
            is_daylight,
        }
    }

    /// Shifts the change's date/time fields by a number of seconds, with the
    /// same carry behavior as [`CalendarTime::adjust`].
    fn adjust_seconds(&mut self, seconds: i64) {
        let mut t = CalendarTime::date_time(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        );
        t.adjust(0, 0, 0, seconds);
        self.year = t.year;
        self.month = t.month;
        self.day = t.day;
        self.hour = t.hour;
        self.minute = t.minute;
        self.second = t.second;
    }
}

fn compare_changes(a: &ZoneChange, b: &ZoneChange) -> Ordering {
    (a.year, a.month, a.day, a.hour, a.minute, a.second)
        .cmp(&(b.year, b.month, b.day, b.hour, b.minute, b.second))
}

#[derive(Debug, Default)]
struct ChangeCache {
    changes: Vec<ZoneChange>,
    /// Year through which `changes` is known complete. Grows forward only.
    expanded_until_year: i32,
}

/// A named timezone resolving times to UTC offsets through its observances.
///
/// The change cache grows append-only: widening coverage recomputes the
/// full list with a pure expansion pass and swaps it in; entries already
/// observed never reorder or disappear, and expansion never proceeds past
/// [`MAX_YEAR`].
#[derive(Debug)]
pub struct Timezone {
    tzid: String,
    observances: Vec<Observance>,
    cache: RefCell<ChangeCache>,
}

impl Timezone {
    /// Creates a timezone from its identifier and observance sub-rules.
    #[must_use]
    pub fn new(tzid: impl Into<String>, observances: Vec<Observance>) -> Self {
        Self {
            tzid: tzid.into(),
            observances,
            cache: RefCell::new(ChangeCache::default()),
        }
    }

    /// The timezone identifier.
    #[must_use]
    pub fn tzid(&self) -> &str {
        &self.tzid
    }

    /// Finds the UTC offset the given time would have in this timezone, in
    /// seconds.
    ///
    /// Ensures the change cache covers the time's year plus the extra
    /// coverage margin, then picks the nearest preceding change. When a
    /// spring-forward gap makes two interpretations possible, the change
    /// whose daylight flag matches the pre-transition side wins.
    #[must_use]
    pub fn utc_offset(&self, time: &CalendarTime) -> i32 {
        self.ensure_coverage(time.year);

        let cache = self.cache.borrow();
        let changes = &cache.changes;
        if changes.is_empty() {
            return 0;
        }

        let probe = ZoneChange::from_time(time, 0, 0, false);

        let mut change_num = Self::find_nearby_change(changes, &probe);
        let mut change_to_use: Option<usize> = None;
        let mut step_back = false;

        loop {
            let mut change = changes[change_num];
            if change.utc_offset < change.prev_utc_offset {
                change.adjust_seconds(i64::from(change.utc_offset));
            } else {
                change.adjust_seconds(i64::from(change.prev_utc_offset));
            }

            if compare_changes(&probe, &change) == Ordering::Less {
                step_back = true;
            } else {
                change_to_use = Some(change_num);
            }

            if step_back {
                match change_to_use {
                    Some(_) => break,
                    None => {
                        if change_num == 0 {
                            return 0;
                        }
                        change_num -= 1;
                    }
                }
            } else {
                change_num += 1;
                if change_num >= changes.len() {
                    break;
                }
            }
        }

        let Some(index) = change_to_use else {
            return 0;
        };
        let mut zone_change = changes[index];
        let offset_change = zone_change.utc_offset - zone_change.prev_utc_offset;

        if offset_change < 0 && index > 0 {
            let mut shifted = zone_change;
            shifted.adjust_seconds(i64::from(shifted.prev_utc_offset));

            if compare_changes(&probe, &shifted) == Ordering::Less {
                let prev_change = changes[index - 1];
                if zone_change.is_daylight && !prev_change.is_daylight {
                    zone_change = prev_change;
                }
            }
        }

        zone_change.utc_offset
    }

    fn find_nearby_change(changes: &[ZoneChange], probe: &ZoneChange) -> usize {
        let idx = changes.partition_point(|c| compare_changes(c, probe) == Ordering::Less);
        if idx >= changes.len() {
            changes.len() - 1
        } else {
            idx
        }
    }

    fn ensure_coverage(&self, year: i32) {
        let covered = self.cache.borrow().expanded_until_year;
        if covered >= year && covered != 0 {
            return;
        }

        let end_year = (year + EXTRA_COVERAGE).min(MAX_YEAR);

        // Mark coverage before expanding; observance data referencing this
        // zone must not re-enter the expansion.
        self.cache.borrow_mut().expanded_until_year = end_year;

        let mut changes = Vec::new();
        for observance in &self.observances {
            expand_observance(&self.tzid, observance, end_year, &mut changes);
        }
        changes.sort_by(compare_changes);

        self.cache.borrow_mut().changes = changes;
    }

    /// Converts a time from one zone to another in place. Date-only values,
    /// identical zones, and floating endpoints are left untouched.
    pub fn convert_time(time: &mut CalendarTime, from_zone: &Zone, to_zone: &Zone) {
        if time.is_date
            || from_zone.tzid() == to_zone.tzid()
            || from_zone.is_floating()
            || to_zone.is_floating()
        {
            time.zone = to_zone.clone();
            return;
        }

        let offset = from_zone.utc_offset(time);
        time.adjust(0, 0, 0, -i64::from(offset));
        let offset = to_zone.utc_offset(time);
        time.adjust(0, 0, 0, i64::from(offset));
        time.zone = to_zone.clone();
    }
}

/// Expands one observance into change entries up to `end_year`.
///
/// All produced entries are shifted into pseudo-UTC by subtracting the
/// pre-transition offset, so that lookups can compare them against a probe
/// adjusted the same way.
fn expand_observance(
    tzid: &str,
    observance: &Observance,
    end_year: i32,
    changes: &mut Vec<ZoneChange>,
) {
    let prev_offset = observance.offset_from.to_seconds();
    let next_offset = observance.offset_to.to_seconds();
    let is_daylight = observance.kind == ObservanceKind::Daylight;

    if observance.rrule.is_none() && observance.rdates.is_empty() {
        let mut change =
            ZoneChange::from_time(&observance.dtstart, next_offset, prev_offset, is_daylight);
        change.adjust_seconds(-i64::from(prev_offset));
        changes.push(change);
        return;
    }

    for rdate in &observance.rdates {
        let mut change = ZoneChange::from_time(rdate, next_offset, prev_offset, is_daylight);
        if rdate.is_date {
            change.hour = observance.dtstart.hour;
            change.minute = observance.dtstart.minute;
            change.second = observance.dtstart.second;
            if !observance.dtstart.zone.is_utc() {
                change.adjust_seconds(-i64::from(prev_offset));
            }
        } else if !rdate.zone.is_utc() {
            change.adjust_seconds(-i64::from(prev_offset));
        }
        changes.push(change);
    }

    if let Some(rule) = &observance.rrule {
        let mut rule = rule.clone();
        if let Some(until) = rule.until.as_mut() {
            if until.zone.is_utc() {
                until.adjust(0, 0, 0, i64::from(prev_offset));
                until.zone = Zone::Floating;
            }
        }

        let mut iter = match RecurrenceIterator::new(rule, observance.dtstart.clone()) {
            Ok(iter) => iter,
            Err(error) => {
                tracing::warn!(tzid, %error, "skipping unsatisfiable observance rule");
                return;
            }
        };

        loop {
            match iter.next() {
                Ok(Some(occurrence)) => {
                    if occurrence.year > end_year {
                        break;
                    }
                    let mut change = ZoneChange::from_time(
                        &occurrence,
                        next_offset,
                        prev_offset,
                        is_daylight,
                    );
                    change.adjust_seconds(-i64::from(prev_offset));
                    changes.push(change);
                }
                Ok(None) => break,
                Err(error) => {
                    tracing::warn!(tzid, %error, "truncating observance expansion");
                    break;
                }
            }
        }
    }
}
