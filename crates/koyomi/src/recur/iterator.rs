//! Expansion of a single recurrence rule into successive occurrences.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::recur::classify::{Classification, classify};
use crate::recur::rule::{ByPart, Frequency, RecurrenceRule, WeekdayNum};
use crate::time::{CalendarTime, Weekday};
use crate::zone::MAX_YEAR;

/// Months scanned for a BYDAY/BYMONTHDAY intersection before the rule is
/// declared unsatisfiable; four years spans any leap-year alignment.
const MONTHS_RETRY_BUDGET: i32 = 48;

/// Working per-part value lists for one iterator.
///
/// Starts as a copy of the rule's BY-parts; initialization fills in
/// frequency-dependent defaults derived from the start date, which is why
/// this is separate state from the rule and part of the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ByData {
    #[serde(rename = "BYSECOND", skip_serializing_if = "Option::is_none", default)]
    pub second: Option<Vec<i32>>,
    #[serde(rename = "BYMINUTE", skip_serializing_if = "Option::is_none", default)]
    pub minute: Option<Vec<i32>>,
    #[serde(rename = "BYHOUR", skip_serializing_if = "Option::is_none", default)]
    pub hour: Option<Vec<i32>>,
    #[serde(rename = "BYDAY", skip_serializing_if = "Option::is_none", default)]
    pub day: Option<Vec<WeekdayNum>>,
    #[serde(rename = "BYMONTHDAY", skip_serializing_if = "Option::is_none", default)]
    pub month_day: Option<Vec<i32>>,
    #[serde(rename = "BYYEARDAY", skip_serializing_if = "Option::is_none", default)]
    pub year_day: Option<Vec<i32>>,
    #[serde(rename = "BYWEEKNO", skip_serializing_if = "Option::is_none", default)]
    pub week_no: Option<Vec<i32>>,
    #[serde(rename = "BYMONTH", skip_serializing_if = "Option::is_none", default)]
    pub month: Option<Vec<i32>>,
    #[serde(rename = "BYSETPOS", skip_serializing_if = "Option::is_none", default)]
    pub set_pos: Option<Vec<i32>>,
}

impl ByData {
    fn from_rule(rule: &RecurrenceRule) -> Self {
        Self {
            second: rule.by_second.clone(),
            minute: rule.by_minute.clone(),
            hour: rule.by_hour.clone(),
            day: rule.by_day.clone(),
            month_day: rule.by_month_day.clone(),
            year_day: rule.by_year_day.clone(),
            week_no: rule.by_week_no.clone(),
            month: rule.by_month.clone(),
            set_pos: rule.by_set_pos.clone(),
        }
    }

    fn numeric(&self, part: ByPart) -> Option<&Vec<i32>> {
        match part {
            ByPart::Second => self.second.as_ref(),
            ByPart::Minute => self.minute.as_ref(),
            ByPart::Hour => self.hour.as_ref(),
            ByPart::MonthDay => self.month_day.as_ref(),
            ByPart::YearDay => self.year_day.as_ref(),
            ByPart::WeekNo => self.week_no.as_ref(),
            ByPart::Month => self.month.as_ref(),
            ByPart::SetPos => self.set_pos.as_ref(),
            ByPart::Day => None,
        }
    }

    fn set_numeric(&mut self, part: ByPart, values: Vec<i32>) {
        match part {
            ByPart::Second => self.second = Some(values),
            ByPart::Minute => self.minute = Some(values),
            ByPart::Hour => self.hour = Some(values),
            ByPart::MonthDay => self.month_day = Some(values),
            ByPart::YearDay => self.year_day = Some(values),
            ByPart::WeekNo => self.week_no = Some(values),
            ByPart::Month => self.month = Some(values),
            ByPart::SetPos => self.set_pos = Some(values),
            ByPart::Day => {}
        }
    }
}

/// Cursor positions into the [`ByData`] value lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByIndices {
    #[serde(rename = "BYSECOND")]
    pub second: usize,
    #[serde(rename = "BYMINUTE")]
    pub minute: usize,
    #[serde(rename = "BYHOUR")]
    pub hour: usize,
    #[serde(rename = "BYDAY")]
    pub day: usize,
    #[serde(rename = "BYMONTH")]
    pub month: usize,
    #[serde(rename = "BYWEEKNO")]
    pub week_no: usize,
    #[serde(rename = "BYMONTHDAY")]
    pub month_day: usize,
}

/// A stateful cursor expanding one recurrence rule from a start date.
///
/// Advance with [`RecurrenceIterator::next`]; once COUNT or UNTIL is
/// reached the iterator completes and stays completed. The iterator owns
/// its times; nothing is shared mutably with other iterators.
#[derive(Debug, Clone)]
pub struct RecurrenceIterator {
    pub(crate) rule: RecurrenceRule,
    pub(crate) dtstart: CalendarTime,
    pub(crate) completed: bool,
    pub(crate) last: CalendarTime,
    pub(crate) occurrence_number: u64,
    pub(crate) by_indices: ByIndices,
    pub(crate) initialized: bool,
    pub(crate) by_data: ByData,
    /// Day-of-year offsets for the current year; YEARLY frequency only.
    pub(crate) days: Vec<i32>,
    pub(crate) days_index: usize,
}

impl RecurrenceIterator {
    /// Creates and initializes an iterator for the rule anchored at the
    /// given start date.
    ///
    /// ## Errors
    /// Returns [`Error::MalformedRule`] when the rule fails validation or
    /// an unsupported combination is requested, and
    /// [`Error::UnsatisfiableRule`] when yearly pre-expansion hits the
    /// maximum-year cap without producing a day.
    pub fn new(rule: RecurrenceRule, dtstart: CalendarTime) -> Result<Self> {
        rule.validate()?;
        let mut iter = Self {
            last: dtstart.clone(),
            by_data: ByData::from_rule(&rule),
            rule,
            dtstart,
            completed: false,
            occurrence_number: 0,
            by_indices: ByIndices::default(),
            initialized: false,
            days: Vec::new(),
            days_index: 0,
        };
        iter.init()?;
        Ok(iter)
    }

    /// The rule being iterated.
    #[must_use]
    pub fn rule(&self) -> &RecurrenceRule {
        &self.rule
    }

    /// The anchor start date.
    #[must_use]
    pub fn dtstart(&self) -> &CalendarTime {
        &self.dtstart
    }

    /// The most recently produced occurrence (the initialized first
    /// occurrence before any `next` call).
    #[must_use]
    pub fn last(&self) -> &CalendarTime {
        &self.last
    }

    /// True once iteration has finished; further `next` calls return
    /// `Ok(None)` without side effects.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }

    /// How many occurrences have been produced so far.
    #[must_use]
    pub const fn occurrence_number(&self) -> u64 {
        self.occurrence_number
    }

    fn interval(&self) -> i64 {
        i64::from(self.rule.interval.max(1))
    }

    /// `(pos, dow)` of a BYDAY entry; `dow` is 1..=7 relative to the given
    /// week start (absolute when none is given).
    fn rule_day_of_week(coded: WeekdayNum, week_start: Option<Weekday>) -> (i32, i32) {
        let wkst = week_start.unwrap_or(Weekday::Sunday);
        (coded.pos, coded.week_position(wkst))
    }

    #[expect(
        clippy::too_many_lines,
        reason = "initialization mirrors the per-frequency setup steps in order"
    )]
    pub(crate) fn init(&mut self) -> Result<()> {
        self.initialized = true;
        self.last = self.dtstart.clone();

        if let Some(by_day) = self.by_data.day.as_mut() {
            // The rule keeps its original order; the working copy is sorted
            // by week-start-relative weekday for the weekly scan.
            let wkst = self.rule.wkst;
            by_day.sort_by_key(|day| day.week_position(wkst));
        }

        self.last.second = self.setup_defaults(ByPart::Second, Frequency::Secondly, self.dtstart.second);
        self.last.minute = self.setup_defaults(ByPart::Minute, Frequency::Minutely, self.dtstart.minute);
        self.last.hour = self.setup_defaults(ByPart::Hour, Frequency::Hourly, self.dtstart.hour);
        self.last.day = self.setup_defaults(ByPart::MonthDay, Frequency::Daily, self.dtstart.day);
        self.last.month = self.setup_defaults(ByPart::Month, Frequency::Monthly, self.dtstart.month);

        if self.rule.freq == Frequency::Weekly {
            if let Some(by_day) = self.by_data.day.clone() {
                let (_, dow) = Self::rule_day_of_week(by_day[0], Some(self.rule.wkst));
                let last_dow = self.last.day_of_week(self.rule.wkst);
                let wkdy = dow - last_dow;
                if (last_dow < dow && wkdy >= 0) || wkdy < 0 {
                    // The start lands after the week's first BYDAY entry.
                    self.last.day += wkdy;
                    self.last.normalize();
                }
            } else {
                let day_name = WeekdayNum {
                    pos: 0,
                    weekday: self.dtstart.weekday(),
                };
                self.by_data.day = Some(vec![day_name]);
            }
        }

        if self.rule.freq == Frequency::Yearly {
            self.last.normalize();
            loop {
                self.expand_year_days(self.last.year)?;
                if !self.days.is_empty() {
                    break;
                }
                self.increment_year(self.interval());
                if self.last.year > MAX_YEAR {
                    return Err(Error::UnsatisfiableRule(
                        "yearly expansion found no occurrence before the maximum year".into(),
                    ));
                }
            }
            self.next_by_year_day();
        }

        if self.rule.freq == Frequency::Monthly && self.rule.has(ByPart::Day) {
            self.last.normalize();
            let init_last = self.last.clone();
            let mut days_in_month = CalendarTime::days_in_month(self.last.month, self.last.year);
            let by_day = self.by_data.day.clone().unwrap_or_default();
            let mut temp_last: Option<CalendarTime> = None;

            // Resolve every BYDAY entry to a concrete day and keep the
            // earliest; entries with pos = ±5 may only exist in a later
            // month.
            for coded in by_day {
                self.last = init_last.clone();
                let (pos, dow) = Self::rule_day_of_week(coded, None);
                let mut day_of_month = self.last.nth_week_day(dow, pos);

                if pos >= 6 || pos <= -6 {
                    return Err(Error::MalformedRule(
                        "malformed values in BYDAY part".into(),
                    ));
                }

                if day_of_month > days_in_month || day_of_month <= 0 {
                    if temp_last
                        .as_ref()
                        .is_some_and(|t| t.month == init_last.month)
                    {
                        continue;
                    }
                    while day_of_month > days_in_month || day_of_month <= 0 {
                        self.increment_month();
                        days_in_month =
                            CalendarTime::days_in_month(self.last.month, self.last.year);
                        day_of_month = self.last.nth_week_day(dow, pos);
                    }
                }

                self.last.day = day_of_month;
                if temp_last
                    .as_ref()
                    .is_none_or(|t| self.last.compare(t) == Ordering::Less)
                {
                    temp_last = Some(self.last.clone());
                }
            }

            self.last = temp_last.ok_or_else(|| {
                Error::MalformedRule("malformed values in BYDAY part".into())
            })?;

            // The BYMONTHDAY intersection has to be seeded here so that a
            // start date already matching both parts is not skipped.
            if self.rule.has(ByPart::MonthDay) {
                self.by_day_and_month_day(true)?;
            }

            if self.last.day > days_in_month || self.last.day == 0 {
                return Err(Error::MalformedRule(
                    "malformed values in BYDAY part".into(),
                ));
            }
        } else if self.rule.has(ByPart::MonthDay) {
            // A leading negative BYMONTHDAY is resolved against the start
            // month before iteration begins.
            if self.last.day < 0 {
                let days_in_month =
                    CalendarTime::days_in_month(self.last.month, self.last.year);
                self.last.day = days_in_month + self.last.day + 1;
            }
        }

        self.last.normalize();
        Ok(())
    }

    /// Retrieves the next occurrence.
    ///
    /// Returns `Ok(None)` once COUNT or UNTIL is exhausted; the call is
    /// then idempotent and side-effect-free.
    ///
    /// ## Errors
    /// Returns [`Error::UnsatisfiableRule`] when the duplicate-occurrence
    /// guard trips or the BYDAY/BYMONTHDAY month budget runs out.
    pub fn next(&mut self) -> Result<Option<CalendarTime>> {
        if self.completed {
            return Ok(None);
        }

        let before = self.last.clone();

        if self
            .rule
            .count
            .is_some_and(|count| self.occurrence_number >= u64::from(count))
            || self
                .rule
                .until
                .as_ref()
                .is_some_and(|until| self.last.compare(until) == Ordering::Greater)
        {
            self.completed = true;
            return Ok(None);
        }

        if self.occurrence_number == 0 && self.last.compare(&self.dtstart) != Ordering::Less {
            // The initialized instance is the first occurrence.
            self.occurrence_number += 1;
            return Ok(Some(self.last.clone()));
        }

        loop {
            let mut valid = true;
            match self.rule.freq {
                Frequency::Secondly => {
                    self.next_second();
                }
                Frequency::Minutely => {
                    self.next_minute();
                }
                Frequency::Hourly => {
                    self.next_hour();
                }
                Frequency::Daily => {
                    self.next_day();
                }
                Frequency::Weekly => {
                    self.next_week();
                }
                Frequency::Monthly => valid = self.next_month()?,
                Frequency::Yearly => {
                    self.next_year()?;
                }
            }

            if valid
                && self.check_contracting_rules()
                && self.last.compare(&self.dtstart) != Ordering::Less
            {
                break;
            }
        }

        if self.last.compare(&before) == Ordering::Equal {
            return Err(Error::UnsatisfiableRule(
                "same occurrence produced twice; the rule cannot make progress".into(),
            ));
        }

        if self
            .rule
            .until
            .as_ref()
            .is_some_and(|until| self.last.compare(until) == Ordering::Greater)
        {
            self.completed = true;
            return Ok(None);
        }

        self.occurrence_number += 1;
        Ok(Some(self.last.clone()))
    }

    fn setup_defaults(&mut self, part: ByPart, freq_equiv: Frequency, default: i32) -> i32 {
        if classify(self.rule.freq, part) != Classification::Contract {
            if self.by_data.numeric(part).is_none() {
                self.by_data.set_numeric(part, vec![default]);
            }
            if self.rule.freq != freq_equiv {
                if let Some(values) = self.by_data.numeric(part) {
                    return values[0];
                }
            }
        }
        default
    }

    // Per-frequency step functions. Each returns whether its unit wrapped
    // around its value list (end of data), which tells the next coarser
    // unit to advance.

    fn next_second(&mut self) -> bool {
        let this_freq = self.rule.freq == Frequency::Secondly;
        let mut end_of_data = false;

        if let Some(list) = self.by_data.second.clone() {
            self.by_indices.second += 1;
            if self.by_indices.second == list.len() {
                self.by_indices.second = 0;
                end_of_data = true;
            }
            self.last.second = list[self.by_indices.second];
            if end_of_data && this_freq {
                self.increment_minute(1);
            }
        } else if this_freq {
            self.increment_second(self.interval());
        }

        end_of_data
    }

    fn next_minute(&mut self) -> bool {
        if !self.next_second() {
            return false;
        }

        let this_freq = self.rule.freq == Frequency::Minutely;
        let mut end_of_data = false;

        if let Some(list) = self.by_data.minute.clone() {
            self.by_indices.minute += 1;
            if self.by_indices.minute == list.len() {
                self.by_indices.minute = 0;
                end_of_data = true;
            }
            self.last.minute = list[self.by_indices.minute];
            if end_of_data && this_freq {
                self.increment_hour(1);
            }
        } else if this_freq {
            self.increment_minute(self.interval());
        }

        end_of_data
    }

    fn next_hour(&mut self) -> bool {
        if !self.next_minute() {
            return false;
        }

        let this_freq = self.rule.freq == Frequency::Hourly;
        let mut end_of_data = false;

        if let Some(list) = self.by_data.hour.clone() {
            self.by_indices.hour += 1;
            if self.by_indices.hour == list.len() {
                self.by_indices.hour = 0;
                end_of_data = true;
            }
            self.last.hour = list[self.by_indices.hour];
            if end_of_data && this_freq {
                self.increment_monthday(1);
            }
        } else if this_freq {
            self.increment_hour(self.interval());
        }

        end_of_data
    }

    fn next_day(&mut self) {
        if !self.next_hour() {
            return;
        }

        if self.rule.freq == Frequency::Daily {
            self.increment_monthday(self.interval());
        } else {
            self.increment_monthday(1);
        }
    }

    fn next_week(&mut self) -> bool {
        let mut end_of_data = false;

        if !self.next_weekday_by_week() {
            return end_of_data;
        }

        if let Some(week_nos) = self.by_data.week_no.clone() {
            self.by_indices.week_no += 1;
            if self.by_indices.week_no == week_nos.len() {
                self.by_indices.week_no = 0;
                end_of_data = true;
            }

            self.last.month = 1;
            self.last.day = 1;
            let week_no = week_nos[self.by_indices.week_no];
            self.last.day += 7 * week_no;
            self.last.normalize();

            if end_of_data {
                self.increment_year(1);
            }
        } else {
            self.increment_monthday(7 * self.interval());
        }

        end_of_data
    }

    fn next_weekday_by_week(&mut self) -> bool {
        if !self.next_hour() {
            return false;
        }

        if !self.rule.has(ByPart::Day) {
            return true;
        }

        let by_day = self.by_data.day.clone().unwrap_or_default();
        let mut end_of_data = false;

        loop {
            self.by_indices.day += 1;
            if self.by_indices.day == by_day.len() {
                self.by_indices.day = 0;
                end_of_data = true;
            }

            let coded = by_day[self.by_indices.day];
            let (_, dow_abs) = Self::rule_day_of_week(coded, None);
            let mut dow = dow_abs - self.rule.wkst.number();
            if dow < 0 {
                dow += 7;
            }

            let probe =
                CalendarTime::date(self.last.year, self.last.month, self.last.day);
            let start_of_week = probe.start_doy_week(self.rule.wkst);

            if dow + start_of_week < 1 && !end_of_data {
                // The selected date is in the previous year.
                continue;
            }

            let next = CalendarTime::from_day_of_year(start_of_week + dow, self.last.year);
            self.last.year = next.year;
            self.last.month = next.month;
            self.last.day = next.day;
            return end_of_data;
        }
    }

    #[expect(
        clippy::too_many_lines,
        reason = "the monthly step keeps its four BY-part branches together"
    )]
    fn next_month(&mut self) -> Result<bool> {
        if !self.next_hour() {
            return Ok(true);
        }

        let mut data_valid = true;

        if self.rule.has(ByPart::Day) && self.rule.has(ByPart::MonthDay) {
            data_valid = self.by_day_and_month_day(false)?;
        } else if self.rule.has(ByPart::Day) {
            let by_day = self.by_data.day.clone().unwrap_or_default();
            let days_in_month = CalendarTime::days_in_month(self.last.month, self.last.year);
            let mut setpos = 0;
            let mut setpos_total = 0;

            if self.rule.has(ByPart::SetPos) {
                let last_day = self.last.day;
                for day in 1..=days_in_month {
                    self.last.day = day;
                    if Self::day_matches_by_day(&by_day, &self.last) {
                        setpos_total += 1;
                        if day <= last_day {
                            setpos += 1;
                        }
                    }
                }
                self.last.day = last_day;
            }

            data_valid = false;
            let mut found = false;
            let first = self.last.day + 1;
            for day in first..=days_in_month {
                self.last.day = day;
                if Self::day_matches_by_day(&by_day, &self.last) {
                    let mut matched = !self.rule.has(ByPart::SetPos);
                    if !matched {
                        setpos += 1;
                        matched = self.check_set_position(setpos)
                            || self.check_set_position(setpos - setpos_total - 1);
                    }
                    if matched {
                        data_valid = true;
                        found = true;
                        break;
                    }
                }
            }

            if !found {
                self.last.day = 1;
                self.increment_month();
                if Self::day_matches_by_day(&by_day, &self.last) {
                    if !self.rule.has(ByPart::SetPos) || self.check_set_position(1) {
                        data_valid = true;
                    }
                } else {
                    data_valid = false;
                }
            }
        } else if self.rule.has(ByPart::MonthDay) {
            let month_days = self.by_data.month_day.clone().unwrap_or_default();
            self.by_indices.month_day += 1;
            if self.by_indices.month_day >= month_days.len() {
                self.by_indices.month_day = 0;
                self.increment_month();
            }

            let days_in_month = CalendarTime::days_in_month(self.last.month, self.last.year);
            let mut day = month_days[self.by_indices.month_day];
            if day < 0 {
                day = days_in_month + day + 1;
            }

            if day > days_in_month {
                self.last.day = 1;
                let by_day = self.by_data.day.clone().unwrap_or_default();
                data_valid = Self::day_matches_by_day(&by_day, &self.last);
            } else {
                self.last.day = day;
            }
        } else {
            self.increment_month();
            let days_in_month = CalendarTime::days_in_month(self.last.month, self.last.year);
            let day = self
                .by_data
                .month_day
                .as_ref()
                .and_then(|days| days.first().copied())
                .unwrap_or(self.dtstart.day);
            if day > days_in_month {
                data_valid = false;
            } else {
                self.last.day = day;
            }
        }

        Ok(data_valid)
    }

    fn next_year(&mut self) -> Result<()> {
        if !self.next_hour() {
            return Ok(());
        }

        self.days_index += 1;
        if self.days_index == self.days.len() {
            self.days_index = 0;
            loop {
                self.increment_year(self.interval());
                if self.last.year > MAX_YEAR {
                    return Err(Error::UnsatisfiableRule(
                        "yearly expansion found no occurrence before the maximum year".into(),
                    ));
                }
                self.expand_year_days(self.last.year)?;
                if !self.days.is_empty() {
                    break;
                }
            }
        }

        self.next_by_year_day();
        Ok(())
    }

    fn next_by_year_day(&mut self) {
        let mut doy = self.days[self.days_index];
        let mut year = self.last.year;
        if doy < 1 {
            // Negative BYYEARDAY entries index from the end of the year,
            // unlike the day-of-year constructor which is start-relative.
            doy += 1;
            year += 1;
        }
        let next = CalendarTime::from_day_of_year(doy, year);
        self.last.day = next.day;
        self.last.month = next.month;
    }

    /// Advances to the next day matching both the BYDAY and BYMONTHDAY
    /// lists, scanning month by month within the retry budget. With
    /// `is_init` the current day itself may satisfy the intersection.
    fn by_day_and_month_day(&mut self, is_init: bool) -> Result<bool> {
        let by_day = self.by_data.day.clone().unwrap_or_default();
        let month_day_rules = self.by_data.month_day.clone().unwrap_or_default();

        let mut last_day = self.last.day;
        let mut date_idx: usize = 0;
        let mut data_is_valid = false;

        let mut days_in_month = CalendarTime::days_in_month(self.last.month, self.last.year);
        let mut by_month_day =
            Self::normalize_by_month_day_rules(self.last.year, self.last.month, &month_day_rules);

        // Start searching after the last found date, or at it when
        // initializing.
        while date_idx + 1 < by_month_day.len()
            && by_month_day[date_idx] <= last_day
            && !(is_init && by_month_day[date_idx] == last_day)
        {
            date_idx += 1;
        }

        if is_init {
            last_day -= 1;
        }

        let mut months_counter = MONTHS_RETRY_BUDGET;

        while !data_is_valid && months_counter > 0 {
            months_counter -= 1;

            // The day advances before every check so a stuck candidate
            // cannot loop forever.
            let date = last_day + 1;

            if date > days_in_month {
                last_day = 0;
                self.increment_month();
                date_idx = 0;
                days_in_month = CalendarTime::days_in_month(self.last.month, self.last.year);
                by_month_day = Self::normalize_by_month_day_rules(
                    self.last.year,
                    self.last.month,
                    &month_day_rules,
                );
                continue;
            }

            let next = by_month_day.get(date_idx).copied();
            date_idx += 1;

            match next {
                Some(next) if next >= date => last_day = next,
                _ => {
                    // The month's candidates are exhausted.
                    last_day = 0;
                    self.increment_month();
                    date_idx = 0;
                    days_in_month = CalendarTime::days_in_month(self.last.month, self.last.year);
                    by_month_day = Self::normalize_by_month_day_rules(
                        self.last.year,
                        self.last.month,
                        &month_day_rules,
                    );
                    continue;
                }
            }

            for coded in &by_day {
                let (pos, dow) = Self::rule_day_of_week(*coded, None);
                self.last.day = last_day;
                if self.last.is_nth_week_day(dow, pos) {
                    data_is_valid = true;
                    break;
                }
            }

            if !data_is_valid && date_idx == by_month_day.len() {
                last_day = 0;
                self.increment_month();
                date_idx = 0;
                days_in_month = CalendarTime::days_in_month(self.last.month, self.last.year);
                by_month_day = Self::normalize_by_month_day_rules(
                    self.last.year,
                    self.last.month,
                    &month_day_rules,
                );
            }
        }

        if months_counter <= 0 {
            return Err(Error::UnsatisfiableRule(
                "no day satisfies BYDAY combined with BYMONTHDAY within the month budget".into(),
            ));
        }

        Ok(data_is_valid)
    }

    /// Resolves BYMONTHDAY entries against a concrete month: negative
    /// values count from the month's end, out-of-range and zero values are
    /// discarded, duplicates removed, result sorted.
    fn normalize_by_month_day_rules(year: i32, month: i32, rules: &[i32]) -> Vec<i32> {
        let days_in_month = CalendarTime::days_in_month(month, year);
        let mut resolved: Vec<i32> = Vec::with_capacity(rules.len());

        for &rule in rules {
            if rule.abs() > days_in_month || rule == 0 {
                continue;
            }
            let day = if rule < 0 { days_in_month + rule + 1 } else { rule };
            if !resolved.contains(&day) {
                resolved.push(day);
            }
        }

        resolved.sort_unstable();
        resolved
    }

    fn increment_second(&mut self, inc: i64) {
        let value = i64::from(self.last.second) + inc;
        self.last.second = i32::try_from(value % 60).unwrap_or(0);
        let carry = value / 60;
        if carry != 0 {
            self.increment_minute(carry);
        }
    }

    fn increment_minute(&mut self, inc: i64) {
        let value = i64::from(self.last.minute) + inc;
        self.last.minute = i32::try_from(value % 60).unwrap_or(0);
        let carry = value / 60;
        if carry != 0 {
            self.increment_hour(carry);
        }
    }

    fn increment_hour(&mut self, inc: i64) {
        let value = i64::from(self.last.hour) + inc;
        self.last.hour = i32::try_from(value % 24).unwrap_or(0);
        let carry = value / 24;
        if carry != 0 {
            self.increment_monthday(carry);
        }
    }

    fn increment_monthday(&mut self, inc: i64) {
        for _ in 0..inc {
            let days_in_month = CalendarTime::days_in_month(self.last.month, self.last.year);
            self.last.day += 1;
            if self.last.day > days_in_month {
                self.last.day -= days_in_month;
                self.increment_month();
            }
        }
    }

    fn increment_month(&mut self) {
        self.last.day = 1;
        if self.rule.has(ByPart::Month) {
            let months = self.by_data.month.clone().unwrap_or_default();
            self.by_indices.month += 1;
            if self.by_indices.month == months.len() {
                self.by_indices.month = 0;
                self.increment_year(1);
            }
            self.last.month = months[self.by_indices.month];
        } else {
            let step = if self.rule.freq == Frequency::Monthly {
                self.interval()
            } else {
                1
            };
            let month = i64::from(self.last.month) + step - 1;
            let years = month / 12;
            self.last.month = i32::try_from(month % 12).unwrap_or(0) + 1;
            if years != 0 {
                self.increment_year(years);
            }
        }
    }

    fn increment_year(&mut self, inc: i64) {
        self.last.year += i32::try_from(inc).unwrap_or(0);
    }

    /// Computes the day-of-year list for the target year from the rule's
    /// date-level BY-parts. Every supported combination case produces an
    /// ordered list; BYWEEKNO combinations beyond the BYMONTH pre-check are
    /// rejected as unsupported.
    #[expect(
        clippy::too_many_lines,
        reason = "one arm per supported BY-part combination case"
    )]
    fn expand_year_days(&mut self, year: i32) -> Result<()> {
        self.days.clear();

        let has_day = self.rule.has(ByPart::Day);
        let mut has_week_no = self.rule.has(ByPart::WeekNo);
        let has_month_day = self.rule.has(ByPart::MonthDay);
        let mut has_month = self.rule.has(ByPart::Month);
        let has_year_day = self.rule.has(ByPart::YearDay);

        let by_month = self.by_data.month.clone().unwrap_or_default();
        let by_month_day = self.by_data.month_day.clone().unwrap_or_default();
        let by_day = self.by_data.day.clone().unwrap_or_default();
        let by_year_day = self.by_data.year_day.clone().unwrap_or_default();
        let by_week_no = self.by_data.week_no.clone().unwrap_or_default();

        if has_month && has_week_no {
            // Keep BYWEEKNO only when every requested week falls inside the
            // requested months; otherwise the months drive the expansion.
            let mut valid_weeks = std::collections::BTreeSet::new();
            let mut t = CalendarTime::date(year, 1, 1);
            for &month in &by_month {
                t.month = month;
                t.day = 1;
                t.normalize();
                let first_week = t.week_number(self.rule.wkst);
                t.day = CalendarTime::days_in_month(month, year);
                t.normalize();
                let last_week = t.week_number(self.rule.wkst);
                for week in first_week..last_week {
                    valid_weeks.insert(week);
                }
            }

            let valid = by_week_no
                .iter()
                .all(|&week| week < 52 && valid_weeks.contains(&week));
            if valid {
                has_month = false;
            } else {
                has_week_no = false;
            }
        }

        let part_count = usize::from(has_day)
            + usize::from(has_week_no)
            + usize::from(has_month_day)
            + usize::from(has_month)
            + usize::from(has_year_day);

        if part_count == 0 {
            let mut t = self.dtstart.clone();
            t.year = self.last.year;
            t.normalize();
            self.days.push(t.day_of_year());
        } else if part_count == 1 && has_month {
            for &month in &by_month {
                let mut t = self.dtstart.clone();
                t.year = year;
                t.month = month;
                t.is_date = true;
                t.normalize();
                self.days.push(t.day_of_year());
            }
        } else if part_count == 1 && has_month_day {
            for &month_day in &by_month_day {
                let mut t = self.dtstart.clone();
                let days_in_month = CalendarTime::days_in_month(t.month, year);
                let day = if month_day < 0 {
                    month_day + days_in_month + 1
                } else {
                    month_day
                };
                if day > days_in_month || day < 1 {
                    continue;
                }
                t.day = day;
                t.year = year;
                t.is_date = true;
                t.normalize();
                self.days.push(t.day_of_year());
            }
        } else if part_count == 2 && has_month_day && has_month {
            for &month in &by_month {
                let days_in_month = CalendarTime::days_in_month(month, year);
                for &month_day in &by_month_day {
                    let day = if month_day < 0 {
                        month_day + days_in_month + 1
                    } else {
                        month_day
                    };
                    if day > days_in_month || day < 1 {
                        continue;
                    }
                    let t = CalendarTime::date(year, month, day);
                    self.days.push(t.day_of_year());
                }
            }
        } else if has_week_no {
            // Expansion of the remaining BYWEEKNO combinations has no
            // defined behavior; refusing beats guessing.
            return Err(Error::MalformedRule(
                "yearly BYWEEKNO expansion is not supported beyond the BYMONTH pre-check".into(),
            ));
        } else if part_count == 1 && has_day {
            let expanded = self.expand_by_day(year);
            self.days.extend(expanded);
        } else if part_count == 2 && has_day && has_month {
            for &month in &by_month {
                let days_in_month = CalendarTime::days_in_month(month, year);
                let mut t = CalendarTime::date(year, month, 1);
                let first_dow = t.day_of_week(Weekday::Sunday);
                let doy_offset = t.day_of_year() - 1;
                t.day = days_in_month;
                let last_dow = t.day_of_week(Weekday::Sunday);

                if self.rule.has(ByPart::SetPos) {
                    let mut month_days = Vec::new();
                    for day in 1..=days_in_month {
                        t.day = day;
                        if Self::day_matches_by_day(&by_day, &t) {
                            month_days.push(day);
                        }
                    }
                    let total = i32::try_from(month_days.len()).unwrap_or(i32::MAX);
                    for (index, &day) in month_days.iter().enumerate() {
                        let nth = i32::try_from(index).unwrap_or(i32::MAX) + 1;
                        if self.check_set_position(nth)
                            || self.check_set_position(nth - 1 - total)
                        {
                            self.days.push(doy_offset + day);
                        }
                    }
                } else {
                    for coded in &by_day {
                        let (pos, dow) = Self::rule_day_of_week(*coded, None);
                        let first_matching_day = ((dow + 7 - first_dow) % 7) + 1;
                        let last_matching_day = days_in_month - ((last_dow + 7 - dow) % 7);

                        if pos == 0 {
                            let mut day = first_matching_day;
                            while day <= days_in_month {
                                self.days.push(doy_offset + day);
                                day += 7;
                            }
                        } else if pos > 0 {
                            let month_day = first_matching_day + (pos - 1) * 7;
                            if month_day <= days_in_month {
                                self.days.push(doy_offset + month_day);
                            }
                        } else {
                            let month_day = last_matching_day + (pos + 1) * 7;
                            if month_day > 0 {
                                self.days.push(doy_offset + month_day);
                            }
                        }
                    }
                }
            }
            // Dates in order of occurrence instead of grouped by weekday.
            self.days.sort_unstable();
        } else if part_count == 2 && has_day && has_month_day {
            for day in self.expand_by_day(year) {
                let t = CalendarTime::from_day_of_year(day, year);
                if by_month_day.contains(&t.day) {
                    self.days.push(day);
                }
            }
        } else if part_count == 3 && has_day && has_month_day && has_month {
            for day in self.expand_by_day(year) {
                let t = CalendarTime::from_day_of_year(day, year);
                if by_month.contains(&t.month) && by_month_day.contains(&t.day) {
                    self.days.push(day);
                }
            }
        } else if part_count == 1 && has_year_day {
            self.days.extend_from_slice(&by_year_day);
        }

        Ok(())
    }

    /// Expands BYDAY entries over a whole year into day-of-year offsets.
    fn expand_by_day(&self, year: i32) -> Vec<i32> {
        let mut days_list = Vec::new();
        let by_day = self.by_data.day.clone().unwrap_or_default();

        let start = CalendarTime::date(year, 1, 1);
        let start_dow = start.day_of_week(Weekday::Sunday);

        let end = CalendarTime::date(year, 12, 31);
        let end_dow = end.day_of_week(Weekday::Sunday);
        let end_year_day = end.day_of_year();

        for coded in by_day {
            let (pos, dow) = Self::rule_day_of_week(coded, None);

            if pos == 0 {
                let mut doy = ((dow + 7 - start_dow) % 7) + 1;
                while doy <= end_year_day {
                    days_list.push(doy);
                    doy += 7;
                }
            } else if pos > 0 {
                let first = if dow >= start_dow {
                    dow - start_dow + 1
                } else {
                    dow - start_dow + 8
                };
                days_list.push(first + (pos - 1) * 7);
            } else {
                let pos = -pos;
                let last = if dow <= end_dow {
                    end_year_day - end_dow + dow
                } else {
                    end_year_day - end_dow + dow - 7
                };
                days_list.push(last - (pos - 1) * 7);
            }
        }

        days_list
    }

    fn day_matches_by_day(rules: &[WeekdayNum], t: &CalendarTime) -> bool {
        let this_dow = t.day_of_week(Weekday::Sunday);
        rules.iter().any(|coded| {
            let (pos, dow) = Self::rule_day_of_week(*coded, None);
            (pos == 0 && dow == this_dow) || t.nth_week_day(dow, pos) == t.day
        })
    }

    fn check_set_position(&self, pos: i32) -> bool {
        self.by_data
            .set_pos
            .as_ref()
            .is_some_and(|positions| positions.contains(&pos))
    }

    fn check_contract_numeric(&self, part: ByPart, value: i32) -> bool {
        if classify(self.rule.freq, part) == Classification::Contract {
            if let Some(values) = self.by_data.numeric(part) {
                return values.contains(&value);
            }
        }
        true
    }

    fn check_contract_day(&self) -> bool {
        if classify(self.rule.freq, ByPart::Day) == Classification::Contract {
            if let Some(by_day) = &self.by_data.day {
                let dow = self.last.weekday();
                // Only unpositioned entries name a plain weekday; ordinal
                // entries never match a contracting check.
                return by_day.iter().any(|day| day.pos == 0 && day.weekday == dow);
            }
        }
        true
    }

    /// Verifies every contract-classified BY-part against the candidate.
    fn check_contracting_rules(&self) -> bool {
        self.check_contract_numeric(ByPart::Second, self.last.second)
            && self.check_contract_numeric(ByPart::Minute, self.last.minute)
            && self.check_contract_numeric(ByPart::Hour, self.last.hour)
            && self.check_contract_day()
            && self.check_contract_numeric(ByPart::WeekNo, self.last.week_number(self.rule.wkst))
            && self.check_contract_numeric(ByPart::MonthDay, self.last.day)
            && self.check_contract_numeric(ByPart::Month, self.last.month)
            && self.check_contract_numeric(ByPart::YearDay, self.last.day_of_year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(rule: &str, dtstart: CalendarTime, n: usize) -> Vec<String> {
        let rule: RecurrenceRule = rule.parse().expect("valid rule");
        let mut iter = RecurrenceIterator::new(rule, dtstart).expect("valid iterator");
        let mut out = Vec::new();
        while out.len() < n {
            match iter.next().expect("no guard trips") {
                Some(occurrence) => out.push(occurrence.to_string()),
                None => break,
            }
        }
        out
    }

    #[test]
    fn daily_count() {
        let occurrences = collect("FREQ=DAILY;COUNT=3", CalendarTime::date(2020, 1, 30), 10);
        assert_eq!(occurrences, ["2020-01-30", "2020-01-31", "2020-02-01"]);
    }

    #[test]
    fn daily_interval() {
        let occurrences = collect(
            "FREQ=DAILY;INTERVAL=10;COUNT=3",
            CalendarTime::date(2021, 12, 25),
            10,
        );
        assert_eq!(occurrences, ["2021-12-25", "2022-01-04", "2022-01-14"]);
    }

    #[test]
    fn weekly_byday() {
        let occurrences = collect(
            "FREQ=WEEKLY;BYDAY=MO,WE,FR;COUNT=5",
            CalendarTime::date(2021, 1, 5),
            10,
        );
        // Start is a Tuesday; the first match is Wednesday.
        assert_eq!(
            occurrences,
            ["2021-01-06", "2021-01-08", "2021-01-11", "2021-01-13", "2021-01-15"]
        );
    }

    #[test]
    fn monthly_first_monday() {
        let occurrences = collect(
            "FREQ=MONTHLY;BYDAY=1MO",
            CalendarTime::date(2021, 1, 1),
            3,
        );
        assert_eq!(occurrences, ["2021-01-04", "2021-02-01", "2021-03-01"]);
    }

    #[test]
    fn monthly_last_friday() {
        let occurrences = collect(
            "FREQ=MONTHLY;BYDAY=-1FR",
            CalendarTime::date(2021, 1, 1),
            3,
        );
        assert_eq!(occurrences, ["2021-01-29", "2021-02-26", "2021-03-26"]);
    }

    #[test]
    fn monthly_negative_monthday() {
        let occurrences = collect(
            "FREQ=MONTHLY;BYMONTHDAY=-1",
            CalendarTime::date(2021, 1, 10),
            3,
        );
        assert_eq!(occurrences, ["2021-01-31", "2021-02-28", "2021-03-31"]);
    }

    #[test]
    fn monthly_day_31_skips_short_months() {
        let occurrences = collect(
            "FREQ=MONTHLY;BYMONTHDAY=31",
            CalendarTime::date(2021, 1, 31),
            4,
        );
        assert_eq!(
            occurrences,
            ["2021-01-31", "2021-03-31", "2021-05-31", "2021-07-31"]
        );
    }

    #[test]
    fn yearly_leap_day_skips_common_years() {
        let occurrences = collect(
            "FREQ=YEARLY;BYMONTH=2;BYMONTHDAY=29",
            CalendarTime::date(1900, 2, 1),
            2,
        );
        assert_eq!(occurrences, ["1904-02-29", "1908-02-29"]);
    }

    #[test]
    fn yearly_plain_anniversary() {
        let occurrences = collect("FREQ=YEARLY;COUNT=3", CalendarTime::date(2020, 6, 15), 10);
        assert_eq!(occurrences, ["2020-06-15", "2021-06-15", "2022-06-15"]);
    }

    #[test]
    fn yearly_byyearday() {
        let occurrences = collect(
            "FREQ=YEARLY;BYYEARDAY=100;COUNT=2",
            CalendarTime::date(2021, 1, 1),
            10,
        );
        assert_eq!(occurrences, ["2021-04-10", "2022-04-10"]);
    }

    #[test]
    fn until_bounds_iteration() {
        let occurrences = collect(
            "FREQ=DAILY;UNTIL=20210103",
            CalendarTime::date(2021, 1, 1),
            10,
        );
        assert_eq!(occurrences, ["2021-01-01", "2021-01-02", "2021-01-03"]);
    }

    #[test]
    fn next_after_completed_is_idempotent() {
        let rule: RecurrenceRule = "FREQ=DAILY;COUNT=1".parse().expect("valid rule");
        let mut iter =
            RecurrenceIterator::new(rule, CalendarTime::date(2021, 1, 1)).expect("valid iterator");
        assert!(iter.next().expect("ok").is_some());
        assert!(iter.next().expect("ok").is_none());
        assert!(iter.completed());
        let last_before = iter.last().clone();
        assert!(iter.next().expect("ok").is_none());
        assert_eq!(iter.last(), &last_before);
    }

    #[test]
    fn occurrences_are_monotonic_and_after_dtstart() {
        let dtstart = CalendarTime::date_time(2021, 3, 10, 9, 30, 0);
        let rule: RecurrenceRule = "FREQ=MONTHLY;BYDAY=2TU,-1SU;COUNT=12"
            .parse()
            .expect("valid rule");
        let mut iter = RecurrenceIterator::new(rule, dtstart.clone()).expect("valid iterator");
        let mut previous: Option<CalendarTime> = None;
        while let Some(occurrence) = iter.next().expect("no guard trips") {
            assert!(occurrence.compare(&dtstart) != Ordering::Less);
            if let Some(previous) = &previous {
                assert!(occurrence.compare(previous) == Ordering::Greater);
            }
            previous = Some(occurrence);
        }
    }

    #[test]
    fn hourly_with_interval() {
        let occurrences = collect(
            "FREQ=HOURLY;INTERVAL=6;COUNT=5",
            CalendarTime::date_time(2021, 1, 1, 20, 0, 0),
            10,
        );
        assert_eq!(
            occurrences,
            [
                "2021-01-01T20:00:00",
                "2021-01-02T02:00:00",
                "2021-01-02T08:00:00",
                "2021-01-02T14:00:00",
                "2021-01-02T20:00:00"
            ]
        );
    }

    #[test]
    fn daily_byhour_expands_within_day() {
        let occurrences = collect(
            "FREQ=DAILY;BYHOUR=9,17;COUNT=4",
            CalendarTime::date_time(2021, 1, 1, 9, 0, 0),
            10,
        );
        assert_eq!(
            occurrences,
            [
                "2021-01-01T09:00:00",
                "2021-01-01T17:00:00",
                "2021-01-02T09:00:00",
                "2021-01-02T17:00:00"
            ]
        );
    }

    #[test]
    fn monthly_bysetpos_last_weekday() {
        // Last weekday of the month. Initialization resolves the plain
        // BYDAY match for the start month, so the start date itself leads.
        let occurrences = collect(
            "FREQ=MONTHLY;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-1",
            CalendarTime::date(2021, 1, 1),
            4,
        );
        assert_eq!(
            occurrences,
            ["2021-01-01", "2021-01-29", "2021-02-26", "2021-03-31"]
        );
    }

    #[test]
    fn yearly_bymonth_byday_with_setpos() {
        // Second weekday of March each year.
        let occurrences = collect(
            "FREQ=YEARLY;BYMONTH=3;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=2",
            CalendarTime::date(2021, 1, 1),
            2,
        );
        assert_eq!(occurrences, ["2021-03-02", "2022-03-02"]);
    }

    #[test]
    fn byday_and_monthday_intersection() {
        // Friday the 13th.
        let occurrences = collect(
            "FREQ=MONTHLY;BYDAY=FR;BYMONTHDAY=13",
            CalendarTime::date(2021, 1, 1),
            3,
        );
        assert_eq!(occurrences, ["2021-08-13", "2022-05-13", "2023-01-13"]);
    }

    #[test]
    fn unsupported_weekno_combination_is_rejected() {
        let rule: RecurrenceRule = "FREQ=YEARLY;BYWEEKNO=20;BYDAY=MO".parse().expect("parses");
        assert!(RecurrenceIterator::new(rule, CalendarTime::date(2021, 1, 1)).is_err());
    }

    #[test]
    fn weekly_wkst_changes_week_grouping() {
        // From RFC 5545: WKST changes which weeks an every-other-week rule
        // selects.
        let mo = collect(
            "FREQ=WEEKLY;INTERVAL=2;COUNT=4;BYDAY=TU,SU;WKST=MO",
            CalendarTime::date(1997, 8, 5),
            10,
        );
        assert_eq!(mo, ["1997-08-05", "1997-08-10", "1997-08-19", "1997-08-24"]);

        let su = collect(
            "FREQ=WEEKLY;INTERVAL=2;COUNT=4;BYDAY=TU,SU;WKST=SU",
            CalendarTime::date(1997, 8, 5),
            10,
        );
        assert_eq!(su, ["1997-08-05", "1997-08-17", "1997-08-19", "1997-08-31"]);
    }
}
