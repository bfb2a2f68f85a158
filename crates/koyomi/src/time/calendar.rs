//! Calendar date/time values with carry-propagating normalization.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{Duration, Weekday};
use crate::zone::Zone;

/// Cumulative days in the year before each month; index 0 is January.
/// First row for common years, second for leap years.
const DAYS_IN_YEAR_PASSED_MONTH: [[i32; 13]; 2] = [
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365],
    [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335, 366],
];

const SECONDS_PER_DAY: i64 = 86_400;

/// A calendar moment: date, optional time of day, and a timezone reference.
///
/// Fields are plain integers so that intermediate arithmetic may leave them
/// out of range; every mutating operation in this module ends in
/// [`CalendarTime::normalize`], and callers that write fields directly must
/// call it themselves before reading derived values. `is_date` marks a
/// date-only value whose time fields are logically absent (and treated as
/// midnight by comparisons).
#[derive(Debug, Clone)]
pub struct CalendarTime {
    pub year: i32,
    /// Month of year, 1..=12 once normalized.
    pub month: i32,
    /// Day of month, 1..=31 once normalized.
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    /// Date-only marker; preserved across operations unless explicitly reset.
    pub is_date: bool,
    pub zone: Zone,
}

/// Serialized form of a [`CalendarTime`], with the timezone flattened to its
/// identifier. Restoring a named zone requires a
/// [`TimezoneRegistry`](crate::zone::TimezoneRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSnapshot {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    #[serde(rename = "isDate")]
    pub is_date: bool,
    pub timezone: String,
}

impl Default for CalendarTime {
    fn default() -> Self {
        Self {
            year: 0,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            is_date: false,
            zone: Zone::Floating,
        }
    }
}

impl CalendarTime {
    /// A floating value at the field defaults (year 0, January 1st).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A floating date-only value.
    #[must_use]
    pub fn date(year: i32, month: i32, day: i32) -> Self {
        Self {
            year,
            month,
            day,
            is_date: true,
            ..Self::default()
        }
    }

    /// A floating date-time value.
    #[must_use]
    pub fn date_time(year: i32, month: i32, day: i32, hour: i32, minute: i32, second: i32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            ..Self::default()
        }
    }

    /// Replaces the timezone reference, leaving the field values untouched.
    #[must_use]
    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    /// The UTC epoch, 1970-01-01T00:00:00Z.
    #[must_use]
    pub fn epoch() -> Self {
        Self::date_time(1970, 1, 1, 0, 0, 0).with_zone(Zone::Utc)
    }

    /// Builds a UTC value from seconds since the epoch.
    #[must_use]
    pub fn from_unix_time(seconds: i64) -> Self {
        let mut t = Self::epoch();
        t.adjust(0, 0, 0, seconds);
        t
    }

    /// Checks whether the year is a leap year. Years up to and including
    /// 1752 follow the Julian rule, later years the Gregorian rule.
    #[must_use]
    pub const fn is_leap_year(year: i32) -> bool {
        if year <= 1752 {
            year % 4 == 0
        } else {
            (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
        }
    }

    /// Days in the given month of the given year; out-of-range months
    /// answer 30.
    #[must_use]
    pub const fn days_in_month(month: i32, year: i32) -> i32 {
        const DAYS: [i32; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        if month < 1 || month > 12 {
            return 30;
        }
        let mut days = DAYS[month as usize];
        if month == 2 && Self::is_leap_year(year) {
            days += 1;
        }
        days
    }

    const fn days_in_year(year: i32) -> i32 {
        if Self::is_leap_year(year) { 366 } else { 365 }
    }

    /// Brings all fields back into their legal ranges, carrying overflow
    /// into the next coarser field. A date-only value gets its time fields
    /// pinned to zero first.
    pub fn normalize(&mut self) {
        if self.is_date {
            self.hour = 0;
            self.minute = 0;
            self.second = 0;
        }
        self.adjust(0, 0, 0, 0);
    }

    /// Adds signed deltas to the value and renormalizes it.
    ///
    /// Day overflow and underflow walk month boundaries one month at a time
    /// using the actual day count for each (month, year) pair, including
    /// leap Februaries; borrowing from a non-positive day re-enters the
    /// previous month. On a date-only value the time deltas are ignored.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "field values are reduced modulo their unit before narrowing"
    )]
    pub fn adjust(&mut self, extra_days: i64, extra_hours: i64, extra_minutes: i64, extra_seconds: i64) {
        let mut days_overflow: i64 = 0;

        if !self.is_date {
            let second = i64::from(self.second) + extra_seconds;
            self.second = (second % 60) as i32;
            let mut minutes_overflow = second / 60;
            if self.second < 0 {
                self.second += 60;
                minutes_overflow -= 1;
            }

            let minute = i64::from(self.minute) + extra_minutes + minutes_overflow;
            self.minute = (minute % 60) as i32;
            let mut hours_overflow = minute / 60;
            if self.minute < 0 {
                self.minute += 60;
                hours_overflow -= 1;
            }

            let hour = i64::from(self.hour) + extra_hours + hours_overflow;
            self.hour = (hour % 24) as i32;
            days_overflow = hour / 24;
            if self.hour < 0 {
                self.hour += 24;
                days_overflow -= 1;
            }
        }

        // Months and years first; the day walk below needs to know which
        // month the day count applies to.
        if self.month > 12 {
            let years_overflow = (self.month - 1) / 12;
            self.year += years_overflow;
            self.month -= 12 * years_overflow;
        } else if self.month < 1 {
            let years_overflow = self.month / 12 - 1;
            self.year += years_overflow;
            self.month -= 12 * years_overflow;
        }

        let mut day = i64::from(self.day) + extra_days + days_overflow;
        if day > 0 {
            loop {
                let days_in_month = i64::from(Self::days_in_month(self.month, self.year));
                if day <= days_in_month {
                    break;
                }
                self.month += 1;
                if self.month > 12 {
                    self.year += 1;
                    self.month = 1;
                }
                day -= days_in_month;
            }
        } else {
            while day <= 0 {
                if self.month == 1 {
                    self.year -= 1;
                    self.month = 12;
                } else {
                    self.month -= 1;
                }
                day += i64::from(Self::days_in_month(self.month, self.year));
            }
        }
        self.day = day as i32;
    }

    /// Applies a [`Duration`] to the value in place, honoring its sign.
    pub fn add_duration(&mut self, duration: &Duration) {
        let mult: i64 = if duration.is_negative { -1 } else { 1 };
        self.adjust(
            mult * (duration.days + 7 * duration.weeks),
            mult * duration.hours,
            mult * duration.minutes,
            mult * duration.seconds,
        );
    }

    /// The difference to another value excluding timezone offsets, as a
    /// duration between the two local clock readings.
    #[must_use]
    pub fn subtract_date(&self, other: &Self) -> Duration {
        let a = self.to_unix_time() + i64::from(self.utc_offset());
        let b = other.to_unix_time() + i64::from(other.utc_offset());
        Duration::from_seconds(a - b)
    }

    /// The difference to another value as elapsed absolute time.
    #[must_use]
    pub fn subtract_date_tz(&self, other: &Self) -> Duration {
        Duration::from_seconds(self.to_unix_time() - other.to_unix_time())
    }

    /// Total order by underlying instant; date-only values compare as
    /// midnight.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.to_unix_time().cmp(&other.to_unix_time())
    }

    /// The day of the week as 1..=7 relative to the given week start
    /// (`week_start` itself is 1). Computed with Zeller's congruence.
    #[must_use]
    pub fn day_of_week(&self, week_start: Weekday) -> i32 {
        let first_dow = week_start.number();
        let q = self.day;
        let m = self.month + if self.month < 3 { 12 } else { 0 };
        let y = self.year - if self.month < 3 { 1 } else { 0 };

        let mut h = q + y + ((m + 1) * 26) / 10 + y / 4;
        h += (y / 100) * 6 + y / 400;

        (h + 7 - first_dow) % 7 + 1
    }

    /// The absolute weekday of this date.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        Weekday::from_number(self.day_of_week(Weekday::Sunday))
    }

    /// The day of the year, 1..=366.
    #[must_use]
    pub fn day_of_year(&self) -> i32 {
        let leap = usize::from(Self::is_leap_year(self.year));
        let month_index = usize::try_from(self.month.clamp(1, 12)).unwrap_or(1) - 1;
        DAYS_IN_YEAR_PASSED_MONTH[leap][month_index] + self.day
    }

    /// Builds a floating date from a day-of-year index; values outside the
    /// year spill into the neighboring years.
    #[must_use]
    pub fn from_day_of_year(day_of_year: i32, year: i32) -> Self {
        let mut year = year;
        let mut doy = day_of_year;

        loop {
            if doy < 1 {
                year -= 1;
                doy += Self::days_in_year(year);
            } else if doy > Self::days_in_year(year) {
                doy -= Self::days_in_year(year);
                year += 1;
            } else {
                break;
            }
        }

        let leap = usize::from(Self::is_leap_year(year));
        let mut t = Self::date(year, 1, 1);
        for month in (0..12).rev() {
            if doy > DAYS_IN_YEAR_PASSED_MONTH[leap][month] {
                t.month = i32::try_from(month).unwrap_or(0) + 1;
                t.day = doy - DAYS_IN_YEAR_PASSED_MONTH[leap][month];
                break;
            }
        }
        t
    }

    /// The day of year on which this date's week starts; zero or negative
    /// when the week begins in the previous year.
    #[must_use]
    pub fn start_doy_week(&self, week_start: Weekday) -> i32 {
        let mut delta = self.day_of_week(Weekday::Sunday) - week_start.number();
        if delta < 0 {
            delta += 7;
        }
        self.day_of_year() - delta
    }

    /// The date on which week number one of the given year starts.
    #[must_use]
    pub fn week_one_starts(year: i32, week_start: Weekday) -> Self {
        let mut t = Self::date(year, 1, 1);
        let dow = t.day_of_week(Weekday::Sunday);
        let wkst = week_start.number();
        if dow > Weekday::Thursday.number() {
            t.day += 7;
        }
        if wkst > Weekday::Thursday.number() {
            t.day -= 7;
        }
        t.day -= dow - wkst;
        t.normalize();
        t
    }

    /// The ISO-8601-style week number relative to a configurable week
    /// start. Late-December dates may belong to week 1 of the following ISO
    /// year and early-January dates to week 52/53 of the previous one.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "a year holds at most 54 weeks"
    )]
    pub fn week_number(&self, week_start: Weekday) -> i32 {
        let mut dt = self.clone();
        dt.is_date = true;
        dt.normalize();

        let isoyear = self.year;
        let week1 = if dt.month == 12 && dt.day > 25 {
            let next = Self::week_one_starts(isoyear + 1, week_start);
            if dt.compare(&next) == Ordering::Less {
                Self::week_one_starts(isoyear, week_start)
            } else {
                next
            }
        } else {
            let this = Self::week_one_starts(isoyear, week_start);
            if dt.compare(&this) == Ordering::Less {
                Self::week_one_starts(isoyear - 1, week_start)
            } else {
                this
            }
        };

        let days_between = dt.subtract_date(&week1).to_seconds() / SECONDS_PER_DAY;
        (days_between / 7) as i32 + 1
    }

    /// The day-of-month offset of the `pos`-th occurrence of the given
    /// absolute weekday within this value's month. `pos` 0 and 1 both mean
    /// the first occurrence; negative `pos` counts from the month's end. The
    /// result may fall outside 1..=days-in-month, signalling a day in an
    /// adjacent month.
    #[must_use]
    pub fn nth_week_day(&self, day_of_week: i32, pos: i32) -> i32 {
        let days_in_month = Self::days_in_month(self.month, self.year);
        let mut pos = pos;
        let mut start = 0;
        let mut other = self.clone();
        let weekday;

        if pos >= 0 {
            other.day = 1;
            // 0 means no position given; 1 and 0 are the same day.
            if pos != 0 {
                pos -= 1;
            }
            start = other.day;

            let start_dow = other.day_of_week(Weekday::Sunday);
            let mut offset = day_of_week - start_dow;
            if offset < 0 {
                offset += 7;
            }
            start += offset;
            start -= day_of_week;
            weekday = day_of_week;
        } else {
            other.day = days_in_month;
            let end_dow = other.day_of_week(Weekday::Sunday);
            pos += 1;

            let mut back = end_dow - day_of_week;
            if back < 0 {
                back += 7;
            }
            weekday = days_in_month - back;
        }

        start + weekday + pos * 7
    }

    /// Checks whether this value is the `pos`-th occurrence of the given
    /// absolute weekday in its month. Always false when the position
    /// resolves outside the current month.
    #[must_use]
    pub fn is_nth_week_day(&self, day_of_week: i32, pos: i32) -> bool {
        let dow = self.day_of_week(Weekday::Sunday);
        if pos == 0 && dow == day_of_week {
            return true;
        }
        self.nth_week_day(day_of_week, pos) == self.day
    }

    /// The UTC offset of this value in its own timezone, in seconds.
    #[must_use]
    pub fn utc_offset(&self) -> i32 {
        self.zone.utc_offset(self)
    }

    /// Seconds since the epoch, corrected by the value's timezone offset.
    #[must_use]
    pub fn to_unix_time(&self) -> i64 {
        let offset = i64::from(self.utc_offset());

        let mut days: i64 = 0;
        if self.year >= 1970 {
            for year in 1970..self.year {
                days += i64::from(Self::days_in_year(year));
            }
        } else {
            for year in self.year..1970 {
                days -= i64::from(Self::days_in_year(year));
            }
        }
        days += i64::from(self.day_of_year() - 1);

        let (hour, minute, second) = if self.is_date {
            (0, 0, 0)
        } else {
            (self.hour, self.minute, self.second)
        };

        days * SECONDS_PER_DAY
            + i64::from(hour) * 3600
            + i64::from(minute) * 60
            + i64::from(second)
            - offset
    }

    /// Converts the value into another timezone, returning a copy.
    ///
    /// Date-only values, identical zones, and floating endpoints keep their
    /// field values and only swap the zone reference.
    #[must_use]
    pub fn convert_to_zone(&self, zone: &Zone) -> Self {
        let mut copy = self.clone();
        let zone_equals = self.zone.tzid() == zone.tzid();

        if !self.is_date && !zone_equals && !self.zone.is_floating() && !zone.is_floating() {
            let from_offset = self.zone.utc_offset(&copy);
            copy.adjust(0, 0, 0, -i64::from(from_offset));
            let to_offset = zone.utc_offset(&copy);
            copy.adjust(0, 0, 0, i64::from(to_offset));
        }

        copy.zone = zone.clone();
        copy
    }

    /// The serializable form of this value.
    #[must_use]
    pub fn to_snapshot(&self) -> TimeSnapshot {
        TimeSnapshot {
            year: self.year,
            month: self.month,
            day: self.day,
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            is_date: self.is_date,
            timezone: self.zone.tzid().to_string(),
        }
    }

    /// Rebuilds a value from its serialized form, resolving the timezone
    /// identifier through the given registry.
    #[must_use]
    pub fn from_snapshot(snapshot: &TimeSnapshot, registry: &crate::zone::TimezoneRegistry) -> Self {
        let mut t = Self {
            year: snapshot.year,
            month: snapshot.month,
            day: snapshot.day,
            hour: snapshot.hour,
            minute: snapshot.minute,
            second: snapshot.second,
            is_date: snapshot.is_date,
            zone: registry.resolve(&snapshot.timezone),
        };
        t.normalize();
        t
    }
}

impl PartialEq for CalendarTime {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for CalendarTime {}

impl PartialOrd for CalendarTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Ord for CalendarTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl std::fmt::Display for CalendarTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;
        if !self.is_date {
            write!(f, "T{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
            if self.zone.is_utc() {
                write!(f, "Z")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_year_rules() {
        // Gregorian rule after 1752
        assert!(!CalendarTime::is_leap_year(1900));
        assert!(!CalendarTime::is_leap_year(1800));
        assert!(CalendarTime::is_leap_year(2000));
        assert!(CalendarTime::is_leap_year(1904));
        // Julian rule up to 1752: plain divisibility by four
        assert!(CalendarTime::is_leap_year(1752));
        assert!(CalendarTime::is_leap_year(1700));
        assert!(!CalendarTime::is_leap_year(1750));
    }

    #[test]
    fn days_in_month_february() {
        assert_eq!(CalendarTime::days_in_month(2, 2020), 29);
        assert_eq!(CalendarTime::days_in_month(2, 1900), 28);
        assert_eq!(CalendarTime::days_in_month(1, 2020), 31);
        for year in 1600..2100 {
            assert_eq!(
                CalendarTime::days_in_month(2, year) == 29,
                CalendarTime::is_leap_year(year)
            );
        }
    }

    #[test]
    fn adjust_carries_seconds_to_days() {
        let mut t = CalendarTime::date_time(2020, 12, 31, 23, 59, 59);
        t.adjust(0, 0, 0, 1);
        assert_eq!(t.to_string(), "2021-01-01T00:00:00");
    }

    #[test]
    fn adjust_walks_leap_february() {
        let mut t = CalendarTime::date(2020, 1, 30);
        t.adjust(30, 0, 0, 0);
        assert_eq!(t.to_string(), "2020-02-29");

        let mut t = CalendarTime::date(2019, 1, 30);
        t.adjust(30, 0, 0, 0);
        assert_eq!(t.to_string(), "2019-03-01");
    }

    #[test]
    fn adjust_borrows_into_previous_year() {
        let mut t = CalendarTime::date(2021, 1, 1);
        t.adjust(-1, 0, 0, 0);
        assert_eq!(t.to_string(), "2020-12-31");

        let mut t = CalendarTime::date(2021, 3, 1);
        t.adjust(-1, 0, 0, 0);
        assert_eq!(t.to_string(), "2021-02-28");
    }

    #[test]
    fn adjust_ignores_time_deltas_on_dates() {
        let mut t = CalendarTime::date(2021, 6, 15);
        t.adjust(0, 5, 30, 10);
        assert_eq!(t.to_string(), "2021-06-15");
    }

    #[test]
    fn normalize_resolves_pending_overflow() {
        let mut t = CalendarTime::date(2021, 1, 1);
        t.day = 33;
        t.normalize();
        assert_eq!(t.to_string(), "2021-02-02");

        let mut t = CalendarTime::date(2021, 3, 10);
        t.day = -1;
        t.normalize();
        assert_eq!(t.to_string(), "2021-02-27");
    }

    #[test]
    fn add_duration_honors_sign() {
        let mut t = CalendarTime::date_time(2021, 1, 1, 12, 0, 0);
        t.add_duration(&Duration::from_seconds(-3600));
        assert_eq!(t.to_string(), "2021-01-01T11:00:00");

        let mut t = CalendarTime::date(2021, 1, 1);
        t.add_duration(&Duration {
            weeks: 2,
            ..Duration::default()
        });
        assert_eq!(t.to_string(), "2021-01-15");
    }

    #[test]
    fn day_of_week_known_dates() {
        // 2021-01-01 was a Friday, 2021-01-04 a Monday.
        assert_eq!(CalendarTime::date(2021, 1, 1).weekday(), Weekday::Friday);
        assert_eq!(CalendarTime::date(2021, 1, 4).weekday(), Weekday::Monday);
        assert_eq!(CalendarTime::date(1970, 1, 1).weekday(), Weekday::Thursday);
        // Relative numbering: Friday is day 5 of a Monday-started week.
        assert_eq!(CalendarTime::date(2021, 1, 1).day_of_week(Weekday::Monday), 5);
    }

    #[test]
    fn day_of_year_round_trip() {
        let t = CalendarTime::date(2020, 3, 1);
        assert_eq!(t.day_of_year(), 61);
        let back = CalendarTime::from_day_of_year(61, 2020);
        assert_eq!(back.month, 3);
        assert_eq!(back.day, 1);
    }

    #[test]
    fn from_day_of_year_spills_across_years() {
        let prev = CalendarTime::from_day_of_year(0, 2021);
        assert_eq!(prev.to_string(), "2020-12-31");
        let next = CalendarTime::from_day_of_year(366, 2021);
        assert_eq!(next.to_string(), "2022-01-01");
    }

    #[test]
    fn week_number_year_boundaries() {
        // 2021-01-01 (Friday) belongs to week 53 of ISO year 2020.
        assert_eq!(CalendarTime::date(2021, 1, 1).week_number(Weekday::Monday), 53);
        // 2019-12-30 (Monday) belongs to week 1 of ISO year 2020.
        assert_eq!(CalendarTime::date(2019, 12, 30).week_number(Weekday::Monday), 1);
        // A mid-year date for sanity.
        assert_eq!(CalendarTime::date(2021, 7, 7).week_number(Weekday::Monday), 27);
    }

    #[test]
    fn nth_week_day_positions() {
        // January 2021: Fridays on 1, 8, 15, 22, 29.
        let t = CalendarTime::date(2021, 1, 10);
        let friday = Weekday::Friday.number();
        assert_eq!(t.nth_week_day(friday, 1), 1);
        assert_eq!(t.nth_week_day(friday, 0), 1);
        assert_eq!(t.nth_week_day(friday, 2), 8);
        assert_eq!(t.nth_week_day(friday, -1), 29);
        // The fifth Monday does not exist: the offset lands past the month.
        assert!(t.nth_week_day(Weekday::Monday.number(), 5) > 31);
    }

    #[test]
    fn is_nth_week_day_matches() {
        let t = CalendarTime::date(2021, 1, 4);
        let monday = Weekday::Monday.number();
        assert!(t.is_nth_week_day(monday, 1));
        assert!(t.is_nth_week_day(monday, 0));
        assert!(!t.is_nth_week_day(monday, 2));
    }

    #[test]
    fn unix_time_round_trip() {
        let t = CalendarTime::date_time(2021, 6, 15, 12, 30, 45).with_zone(Zone::Utc);
        let unix = t.to_unix_time();
        let back = CalendarTime::from_unix_time(unix);
        assert_eq!(back.to_string(), "2021-06-15T12:30:45Z");
        assert_eq!(back.to_unix_time(), unix);
    }

    #[test]
    fn unix_time_epoch() {
        assert_eq!(CalendarTime::epoch().to_unix_time(), 0);
        assert_eq!(CalendarTime::from_unix_time(0).to_string(), "1970-01-01T00:00:00Z");
        // Before the epoch.
        assert_eq!(CalendarTime::from_unix_time(-1).to_string(), "1969-12-31T23:59:59Z");
    }

    #[test]
    fn compare_dates_as_midnight() {
        let date = CalendarTime::date(2021, 6, 15);
        let midnight = CalendarTime::date_time(2021, 6, 15, 0, 0, 0);
        let later = CalendarTime::date_time(2021, 6, 15, 0, 0, 1);
        assert_eq!(date.compare(&midnight), Ordering::Equal);
        assert_eq!(date.compare(&later), Ordering::Less);
    }

    #[test]
    fn subtract_date_gives_field_difference() {
        let a = CalendarTime::date_time(2021, 1, 2, 0, 0, 0);
        let b = CalendarTime::date_time(2021, 1, 1, 0, 0, 0);
        assert_eq!(a.subtract_date(&b).to_seconds(), 86_400);
    }
}
