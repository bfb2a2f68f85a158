//! Validated recurrence rules (RFC 5545 RECUR value type).

use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::time::{CalendarTime, DEFAULT_WEEK_START, Weekday};
use crate::zone::Zone;

/// Recurrence frequency (the FREQ rule part).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Parses a FREQ token, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SECONDLY" => Some(Self::Secondly),
            "MINUTELY" => Some(Self::Minutely),
            "HOURLY" => Some(Self::Hourly),
            "DAILY" => Some(Self::Daily),
            "WEEKLY" => Some(Self::Weekly),
            "MONTHLY" => Some(Self::Monthly),
            "YEARLY" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// The FREQ token for this frequency.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Secondly => "SECONDLY",
            Self::Minutely => "MINUTELY",
            Self::Hourly => "HOURLY",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of BY-part keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByPart {
    Second,
    Minute,
    Hour,
    Day,
    MonthDay,
    YearDay,
    WeekNo,
    Month,
    SetPos,
}

impl ByPart {
    /// The RFC 5545 rule-part name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Second => "BYSECOND",
            Self::Minute => "BYMINUTE",
            Self::Hour => "BYHOUR",
            Self::Day => "BYDAY",
            Self::MonthDay => "BYMONTHDAY",
            Self::YearDay => "BYYEARDAY",
            Self::WeekNo => "BYWEEKNO",
            Self::Month => "BYMONTH",
            Self::SetPos => "BYSETPOS",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// An ordinal weekday from a BYDAY part, e.g. `MO`, `2MO` or `-1FR`.
///
/// `pos` 0 means no ordinal was given (every such weekday).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayNum {
    pub pos: i32,
    pub weekday: Weekday,
}

impl WeekdayNum {
    /// The weekday number relative to the given week start, 1..=7.
    #[must_use]
    pub const fn week_position(self, week_start: Weekday) -> i32 {
        self.weekday.week_position(week_start)
    }
}

impl std::fmt::Display for WeekdayNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.pos != 0 {
            write!(f, "{}", self.pos)?;
        }
        f.write_str(self.weekday.as_str())
    }
}

impl FromStr for WeekdayNum {
    type Err = Error;

    /// Parses the `[+-]?N?{SU..SA}` grammar with N in 1..=53.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() < 2 {
            return Err(Error::MalformedRule(format!("invalid BYDAY value \"{s}\"")));
        }

        let (ordinal_str, weekday_str) = s.split_at(s.len() - 2);
        let weekday = Weekday::parse(weekday_str)
            .ok_or_else(|| Error::MalformedRule(format!("invalid BYDAY value \"{s}\"")))?;

        let pos = if ordinal_str.is_empty() {
            0
        } else {
            let pos: i32 = ordinal_str
                .parse()
                .map_err(|_| Error::MalformedRule(format!("invalid BYDAY value \"{s}\"")))?;
            if pos == 0 || pos.abs() > 53 {
                return Err(Error::MalformedRule(format!("invalid BYDAY value \"{s}\"")));
            }
            pos
        };

        Ok(Self { pos, weekday })
    }
}

impl Serialize for WeekdayNum {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for WeekdayNum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// A validated recurrence rule: FREQ, INTERVAL, WKST, at most one of
/// COUNT/UNTIL, and the BY-part value lists.
///
/// Fields are public for construction; [`RecurrenceRule::validate`] enforces
/// the range and combination legality table and runs before any iterator is
/// created from the rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceRule {
    pub freq: Frequency,
    /// Period multiplier, at least 1.
    pub interval: u32,
    /// Week start for week-based calculations.
    pub wkst: Weekday,
    pub count: Option<u32>,
    pub until: Option<CalendarTime>,
    pub by_second: Option<Vec<i32>>,
    pub by_minute: Option<Vec<i32>>,
    pub by_hour: Option<Vec<i32>>,
    pub by_day: Option<Vec<WeekdayNum>>,
    pub by_month_day: Option<Vec<i32>>,
    pub by_year_day: Option<Vec<i32>>,
    pub by_week_no: Option<Vec<i32>>,
    pub by_month: Option<Vec<i32>>,
    pub by_set_pos: Option<Vec<i32>>,
}

impl RecurrenceRule {
    /// A rule with the given frequency and all defaults.
    #[must_use]
    pub fn new(freq: Frequency) -> Self {
        Self {
            freq,
            interval: 1,
            wkst: DEFAULT_WEEK_START,
            count: None,
            until: None,
            by_second: None,
            by_minute: None,
            by_hour: None,
            by_day: None,
            by_month_day: None,
            by_year_day: None,
            by_week_no: None,
            by_month: None,
            by_set_pos: None,
        }
    }

    /// True when COUNT or UNTIL bounds the rule.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.count.is_some() || self.until.is_some()
    }

    /// True when the rule is bounded by COUNT and not by UNTIL.
    #[must_use]
    pub const fn is_by_count(&self) -> bool {
        self.count.is_some() && self.until.is_none()
    }

    /// Whether the rule carries the given BY-part.
    #[must_use]
    pub fn has(&self, part: ByPart) -> bool {
        match part {
            ByPart::Second => self.by_second.is_some(),
            ByPart::Minute => self.by_minute.is_some(),
            ByPart::Hour => self.by_hour.is_some(),
            ByPart::Day => self.by_day.is_some(),
            ByPart::MonthDay => self.by_month_day.is_some(),
            ByPart::YearDay => self.by_year_day.is_some(),
            ByPart::WeekNo => self.by_week_no.is_some(),
            ByPart::Month => self.by_month.is_some(),
            ByPart::SetPos => self.by_set_pos.is_some(),
        }
    }

    /// Checks the legality table. Violations are fatal; a rule that fails
    /// here must not be iterated.
    ///
    /// ## Errors
    /// Returns [`Error::MalformedRule`] on any range violation, empty value
    /// list, or illegal BY-part combination for the rule's frequency.
    pub fn validate(&self) -> Result<()> {
        if self.count.is_some() && self.until.is_some() {
            return Err(Error::MalformedRule(
                "COUNT and UNTIL may not both be present".into(),
            ));
        }

        check_range("BYSECOND", self.by_second.as_deref(), 0, 60)?;
        check_range("BYMINUTE", self.by_minute.as_deref(), 0, 59)?;
        check_range("BYHOUR", self.by_hour.as_deref(), 0, 23)?;
        check_signed("BYMONTHDAY", self.by_month_day.as_deref(), 31)?;
        check_signed("BYYEARDAY", self.by_year_day.as_deref(), 366)?;
        check_signed("BYWEEKNO", self.by_week_no.as_deref(), 53)?;
        check_range("BYMONTH", self.by_month.as_deref(), 0, 12)?;
        check_signed("BYSETPOS", self.by_set_pos.as_deref(), 366)?;

        if let Some(by_day) = &self.by_day {
            if by_day.is_empty() {
                return Err(Error::MalformedRule("empty BYDAY value list".into()));
            }
            for day in by_day {
                if day.pos.abs() > 53 {
                    return Err(Error::MalformedRule(format!(
                        "invalid BYDAY value \"{day}\""
                    )));
                }
            }
        }

        // If BYYEARDAY appears, no other date rule part may appear.
        if self.has(ByPart::YearDay) {
            if self.has(ByPart::Month)
                || self.has(ByPart::WeekNo)
                || self.has(ByPart::MonthDay)
                || self.has(ByPart::Day)
            {
                return Err(Error::MalformedRule("invalid BYYEARDAY rule".into()));
            }
            if self.freq != Frequency::Yearly {
                return Err(Error::MalformedRule(
                    "BYYEARDAY may only appear in YEARLY rules".into(),
                ));
            }
        }

        if self.has(ByPart::WeekNo) && self.has(ByPart::MonthDay) {
            return Err(Error::MalformedRule(
                "BYWEEKNO does not fit to BYMONTHDAY".into(),
            ));
        }

        if self.freq == Frequency::Monthly
            && (self.has(ByPart::YearDay) || self.has(ByPart::WeekNo))
        {
            return Err(Error::MalformedRule(
                "for MONTHLY recurrences neither BYYEARDAY nor BYWEEKNO may appear".into(),
            ));
        }

        if self.freq == Frequency::Weekly
            && (self.has(ByPart::YearDay) || self.has(ByPart::MonthDay))
        {
            return Err(Error::MalformedRule(
                "for WEEKLY recurrences neither BYMONTHDAY nor BYYEARDAY may appear".into(),
            ));
        }

        Ok(())
    }
}

fn check_range(name: &str, values: Option<&[i32]>, min: i32, max: i32) -> Result<()> {
    let Some(values) = values else {
        return Ok(());
    };
    if values.is_empty() {
        return Err(Error::MalformedRule(format!("empty {name} value list")));
    }
    for &value in values {
        if value < min || value > max {
            return Err(Error::MalformedRule(format!(
                "{name}: invalid value \"{value}\", expected {min}..={max}"
            )));
        }
    }
    Ok(())
}

fn check_signed(name: &str, values: Option<&[i32]>, limit: i32) -> Result<()> {
    let Some(values) = values else {
        return Ok(());
    };
    if values.is_empty() {
        return Err(Error::MalformedRule(format!("empty {name} value list")));
    }
    for &value in values {
        if value == 0 || value.abs() > limit {
            return Err(Error::MalformedRule(format!(
                "{name}: invalid value \"{value}\", expected ±1..={limit}"
            )));
        }
    }
    Ok(())
}

/// Parses an UNTIL value in the iCalendar basic format,
/// `YYYYMMDD` or `YYYYMMDD"T"HHMMSS[Z]`.
fn parse_until(value: &str) -> Result<CalendarTime> {
    let invalid = || Error::MalformedRule(format!("invalid UNTIL value \"{value}\""));

    let digits = |s: &str| -> Result<i32> { s.parse().map_err(|_| invalid()) };

    if value.len() < 8 || !value.is_ascii() {
        return Err(invalid());
    }
    let year = digits(&value[0..4])?;
    let month = digits(&value[4..6])?;
    let day = digits(&value[6..8])?;

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(invalid());
    }

    if value.len() == 8 {
        return Ok(CalendarTime::date(year, month, day));
    }

    let rest = &value[8..];
    let (time_str, is_utc) = match rest.strip_suffix('Z') {
        Some(stripped) => (stripped, true),
        None => (rest, false),
    };
    if time_str.len() != 7 || !time_str.starts_with('T') {
        return Err(invalid());
    }

    let hour = digits(&time_str[1..3])?;
    let minute = digits(&time_str[3..5])?;
    let second = digits(&time_str[5..7])?;
    if hour > 23 || minute > 59 || second > 60 {
        return Err(invalid());
    }

    let mut until = CalendarTime::date_time(year, month, day, hour, minute, second);
    if is_utc {
        until.zone = Zone::Utc;
    }
    Ok(until)
}

fn parse_number_list(name: &str, value: &str) -> Result<Vec<i32>> {
    value
        .split(',')
        .map(|v| {
            v.trim()
                .parse()
                .map_err(|_| Error::MalformedRule(format!("{name}: invalid value \"{v}\"")))
        })
        .collect()
}

impl FromStr for RecurrenceRule {
    type Err = Error;

    /// Parses a `FREQ=...;...` rule string. Parts may appear in any order;
    /// unknown parts are ignored. The result is validated.
    #[tracing::instrument(level = "debug", skip(s), fields(len = s.len()))]
    fn from_str(s: &str) -> Result<Self> {
        let mut freq = None;
        let mut rule = Self::new(Frequency::Daily);

        for part in s.split(';') {
            let Some((key, value)) = part.split_once('=') else {
                return Err(Error::MalformedRule(format!(
                    "missing \"=\" in rule part \"{part}\""
                )));
            };

            match key.to_ascii_uppercase().as_str() {
                "FREQ" => {
                    freq = Some(Frequency::parse(value).ok_or_else(|| {
                        Error::MalformedRule(format!("invalid frequency \"{value}\""))
                    })?);
                }
                "INTERVAL" => {
                    let interval: i64 = value.parse().map_err(|_| {
                        Error::MalformedRule(format!("invalid INTERVAL value \"{value}\""))
                    })?;
                    // Zero and negative intervals are tolerated as 1; some
                    // producers emit them.
                    rule.interval = u32::try_from(interval).unwrap_or(0).max(1);
                }
                "COUNT" => {
                    rule.count = Some(value.parse().map_err(|_| {
                        Error::MalformedRule(format!("invalid COUNT value \"{value}\""))
                    })?);
                }
                "UNTIL" => rule.until = Some(parse_until(value)?),
                "WKST" => {
                    rule.wkst = Weekday::parse(value).ok_or_else(|| {
                        Error::MalformedRule(format!("invalid WKST value \"{value}\""))
                    })?;
                }
                "BYSECOND" => rule.by_second = Some(parse_number_list("BYSECOND", value)?),
                "BYMINUTE" => rule.by_minute = Some(parse_number_list("BYMINUTE", value)?),
                "BYHOUR" => rule.by_hour = Some(parse_number_list("BYHOUR", value)?),
                "BYDAY" => {
                    rule.by_day = Some(
                        value
                            .split(',')
                            .map(str::parse)
                            .collect::<Result<Vec<WeekdayNum>>>()?,
                    );
                }
                "BYMONTHDAY" => rule.by_month_day = Some(parse_number_list("BYMONTHDAY", value)?),
                "BYYEARDAY" => rule.by_year_day = Some(parse_number_list("BYYEARDAY", value)?),
                "BYWEEKNO" => rule.by_week_no = Some(parse_number_list("BYWEEKNO", value)?),
                "BYMONTH" => rule.by_month = Some(parse_number_list("BYMONTH", value)?),
                "BYSETPOS" => rule.by_set_pos = Some(parse_number_list("BYSETPOS", value)?),
                _ => {}
            }
        }

        rule.freq =
            freq.ok_or_else(|| Error::MalformedRule("missing FREQ rule part".into()))?;
        rule.validate()?;
        Ok(rule)
    }
}

fn write_number_list(
    f: &mut std::fmt::Formatter<'_>,
    name: &str,
    values: Option<&Vec<i32>>,
) -> std::fmt::Result {
    if let Some(values) = values {
        write!(f, ";{name}=")?;
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{value}")?;
        }
    }
    Ok(())
}

impl std::fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FREQ={}", self.freq)?;
        if let Some(count) = self.count {
            write!(f, ";COUNT={count}")?;
        }
        if self.interval > 1 {
            write!(f, ";INTERVAL={}", self.interval)?;
        }
        write_number_list(f, "BYSECOND", self.by_second.as_ref())?;
        write_number_list(f, "BYMINUTE", self.by_minute.as_ref())?;
        write_number_list(f, "BYHOUR", self.by_hour.as_ref())?;
        if let Some(by_day) = &self.by_day {
            write!(f, ";BYDAY=")?;
            for (i, day) in by_day.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{day}")?;
            }
        }
        write_number_list(f, "BYMONTHDAY", self.by_month_day.as_ref())?;
        write_number_list(f, "BYYEARDAY", self.by_year_day.as_ref())?;
        write_number_list(f, "BYWEEKNO", self.by_week_no.as_ref())?;
        write_number_list(f, "BYMONTH", self.by_month.as_ref())?;
        write_number_list(f, "BYSETPOS", self.by_set_pos.as_ref())?;
        if let Some(until) = &self.until {
            if until.is_date {
                write!(
                    f,
                    ";UNTIL={:04}{:02}{:02}",
                    until.year, until.month, until.day
                )?;
            } else {
                write!(
                    f,
                    ";UNTIL={:04}{:02}{:02}T{:02}{:02}{:02}",
                    until.year, until.month, until.day, until.hour, until.minute, until.second
                )?;
                if until.zone.is_utc() {
                    write!(f, "Z")?;
                }
            }
        }
        if self.wkst != DEFAULT_WEEK_START {
            write!(f, ";WKST={}", self.wkst)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic() {
        let rule: RecurrenceRule = "FREQ=DAILY;COUNT=10".parse().expect("valid rule");
        assert_eq!(rule.freq, Frequency::Daily);
        assert_eq!(rule.count, Some(10));
        assert_eq!(rule.interval, 1);
        assert_eq!(rule.wkst, Weekday::Monday);
    }

    #[test]
    fn parse_weekly_byday() {
        let rule: RecurrenceRule = "FREQ=WEEKLY;BYDAY=MO,WE,FR".parse().expect("valid rule");
        let by_day = rule.by_day.expect("byday present");
        assert_eq!(by_day.len(), 3);
        assert_eq!(by_day[0].pos, 0);
        assert_eq!(by_day[0].weekday, Weekday::Monday);
    }

    #[test]
    fn parse_ordinal_byday() {
        let rule: RecurrenceRule = "FREQ=MONTHLY;BYDAY=-1FR".parse().expect("valid rule");
        let by_day = rule.by_day.expect("byday present");
        assert_eq!(by_day[0].pos, -1);
        assert_eq!(by_day[0].weekday, Weekday::Friday);
    }

    #[test]
    fn parse_until_forms() {
        let rule: RecurrenceRule = "FREQ=DAILY;UNTIL=20210131".parse().expect("valid rule");
        let until = rule.until.expect("until present");
        assert!(until.is_date);
        assert_eq!(until.to_string(), "2021-01-31");

        let rule: RecurrenceRule = "FREQ=DAILY;UNTIL=20210131T120000Z"
            .parse()
            .expect("valid rule");
        let until = rule.until.expect("until present");
        assert_eq!(until.to_string(), "2021-01-31T12:00:00Z");
    }

    #[test]
    fn interval_is_coerced_to_one() {
        let rule: RecurrenceRule = "FREQ=DAILY;INTERVAL=0".parse().expect("valid rule");
        assert_eq!(rule.interval, 1);
        let rule: RecurrenceRule = "FREQ=DAILY;INTERVAL=-2".parse().expect("valid rule");
        assert_eq!(rule.interval, 1);
    }

    #[test]
    fn count_until_conflict_is_rejected() {
        assert!("FREQ=DAILY;COUNT=3;UNTIL=20210131".parse::<RecurrenceRule>().is_err());
    }

    #[test]
    fn invalid_frequency_is_rejected() {
        assert!("FREQ=FORTNIGHTLY".parse::<RecurrenceRule>().is_err());
        assert!("COUNT=3".parse::<RecurrenceRule>().is_err());
    }

    #[test]
    fn range_violations_are_rejected() {
        assert!("FREQ=DAILY;BYSECOND=61".parse::<RecurrenceRule>().is_err());
        assert!("FREQ=DAILY;BYHOUR=24".parse::<RecurrenceRule>().is_err());
        assert!("FREQ=MONTHLY;BYMONTHDAY=0".parse::<RecurrenceRule>().is_err());
        assert!("FREQ=MONTHLY;BYMONTHDAY=32".parse::<RecurrenceRule>().is_err());
        assert!("FREQ=YEARLY;BYYEARDAY=367".parse::<RecurrenceRule>().is_err());
        assert!("FREQ=YEARLY;BYWEEKNO=54".parse::<RecurrenceRule>().is_err());
        assert!("FREQ=MONTHLY;BYDAY=54MO".parse::<RecurrenceRule>().is_err());
        assert!("FREQ=WEEKLY;BYDAY=XX".parse::<RecurrenceRule>().is_err());
    }

    #[test]
    fn combination_legality() {
        // BYYEARDAY excludes the other date parts and is YEARLY-only.
        assert!("FREQ=YEARLY;BYYEARDAY=100;BYMONTH=3".parse::<RecurrenceRule>().is_err());
        assert!("FREQ=YEARLY;BYYEARDAY=100;BYDAY=MO".parse::<RecurrenceRule>().is_err());
        assert!("FREQ=DAILY;BYYEARDAY=100".parse::<RecurrenceRule>().is_err());
        // BYWEEKNO excludes BYMONTHDAY.
        assert!("FREQ=YEARLY;BYWEEKNO=10;BYMONTHDAY=5".parse::<RecurrenceRule>().is_err());
        // MONTHLY excludes BYYEARDAY and BYWEEKNO.
        assert!("FREQ=MONTHLY;BYWEEKNO=10".parse::<RecurrenceRule>().is_err());
        // WEEKLY excludes BYMONTHDAY and BYYEARDAY.
        assert!("FREQ=WEEKLY;BYMONTHDAY=5".parse::<RecurrenceRule>().is_err());
        // Legal combinations pass.
        assert!("FREQ=YEARLY;BYYEARDAY=100".parse::<RecurrenceRule>().is_ok());
        assert!("FREQ=YEARLY;BYMONTH=3;BYDAY=2SU".parse::<RecurrenceRule>().is_ok());
    }

    #[test]
    fn display_round_trip() {
        let text = "FREQ=MONTHLY;COUNT=5;INTERVAL=2;BYDAY=1MO,-1FR;BYMONTH=3,6";
        let rule: RecurrenceRule = text.parse().expect("valid rule");
        assert_eq!(rule.to_string(), text);
        let reparsed: RecurrenceRule = rule.to_string().parse().expect("round trip");
        assert_eq!(rule, reparsed);
    }

    #[test]
    fn parse_is_field_order_independent() {
        let a: RecurrenceRule = "FREQ=WEEKLY;BYDAY=MO,FR;COUNT=4".parse().expect("valid");
        let b: RecurrenceRule = "COUNT=4;BYDAY=MO,FR;FREQ=WEEKLY".parse().expect("valid");
        assert_eq!(a, b);
    }

    #[test]
    fn wkst_round_trip() {
        let rule: RecurrenceRule = "FREQ=WEEKLY;WKST=SU".parse().expect("valid rule");
        assert_eq!(rule.wkst, Weekday::Sunday);
        assert!(rule.to_string().ends_with(";WKST=SU"));
        // The default week start is not written back out.
        let rule: RecurrenceRule = "FREQ=WEEKLY;WKST=MO".parse().expect("valid rule");
        assert!(!rule.to_string().contains("WKST"));
    }

    #[test]
    fn is_finite_flags() {
        let counted: RecurrenceRule = "FREQ=DAILY;COUNT=3".parse().expect("valid");
        assert!(counted.is_finite());
        assert!(counted.is_by_count());
        let unbounded: RecurrenceRule = "FREQ=DAILY".parse().expect("valid");
        assert!(!unbounded.is_finite());
    }
}
