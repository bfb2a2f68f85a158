//! Resumable serialized snapshots of iterators and expansions.
//!
//! Snapshot shapes are explicit structs so the wire format is stable:
//! iterator snapshots carry `initialized`, `rule`, `dtstart`, `by_data`,
//! `days`, `last`, `by_indices` and `occurrence_number`; expansion
//! snapshots carry `ruleIterators`, `ruleDates`, `exDates`, `ruleDateInc`,
//! `exDateInc`, `last`, `dtstart` and `complete`. Timezone references are
//! flattened to identifiers and are resolved again on restore through a
//! [`TimezoneRegistry`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::recur::iterator::{ByData, ByIndices, RecurrenceIterator};
use crate::recur::rule::{Frequency, RecurrenceRule, WeekdayNum};
use crate::recur::RecurrenceExpansion;
use crate::time::{CalendarTime, DEFAULT_WEEK_START, TimeSnapshot, Weekday};
use crate::zone::TimezoneRegistry;

fn default_interval() -> u32 {
    1
}

fn is_default_interval(interval: &u32) -> bool {
    *interval == 1
}

fn default_wkst() -> Weekday {
    DEFAULT_WEEK_START
}

fn is_default_wkst(wkst: &Weekday) -> bool {
    *wkst == DEFAULT_WEEK_START
}

/// Serialized form of a [`RecurrenceRule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSnapshot {
    pub freq: Frequency,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "is_default_interval", default = "default_interval")]
    pub interval: u32,
    #[serde(skip_serializing_if = "is_default_wkst", default = "default_wkst")]
    pub wkst: Weekday,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub until: Option<TimeSnapshot>,
    #[serde(rename = "bysecond", skip_serializing_if = "Option::is_none", default)]
    pub by_second: Option<Vec<i32>>,
    #[serde(rename = "byminute", skip_serializing_if = "Option::is_none", default)]
    pub by_minute: Option<Vec<i32>>,
    #[serde(rename = "byhour", skip_serializing_if = "Option::is_none", default)]
    pub by_hour: Option<Vec<i32>>,
    #[serde(rename = "byday", skip_serializing_if = "Option::is_none", default)]
    pub by_day: Option<Vec<WeekdayNum>>,
    #[serde(rename = "bymonthday", skip_serializing_if = "Option::is_none", default)]
    pub by_month_day: Option<Vec<i32>>,
    #[serde(rename = "byyearday", skip_serializing_if = "Option::is_none", default)]
    pub by_year_day: Option<Vec<i32>>,
    #[serde(rename = "byweekno", skip_serializing_if = "Option::is_none", default)]
    pub by_week_no: Option<Vec<i32>>,
    #[serde(rename = "bymonth", skip_serializing_if = "Option::is_none", default)]
    pub by_month: Option<Vec<i32>>,
    #[serde(rename = "bysetpos", skip_serializing_if = "Option::is_none", default)]
    pub by_set_pos: Option<Vec<i32>>,
}

impl RuleSnapshot {
    /// Captures a rule's serialized form.
    #[must_use]
    pub fn from_rule(rule: &RecurrenceRule) -> Self {
        Self {
            freq: rule.freq,
            count: rule.count,
            interval: rule.interval,
            wkst: rule.wkst,
            until: rule.until.as_ref().map(CalendarTime::to_snapshot),
            by_second: rule.by_second.clone(),
            by_minute: rule.by_minute.clone(),
            by_hour: rule.by_hour.clone(),
            by_day: rule.by_day.clone(),
            by_month_day: rule.by_month_day.clone(),
            by_year_day: rule.by_year_day.clone(),
            by_week_no: rule.by_week_no.clone(),
            by_month: rule.by_month.clone(),
            by_set_pos: rule.by_set_pos.clone(),
        }
    }

    /// Rebuilds and revalidates the rule.
    ///
    /// ## Errors
    /// Returns [`Error::MalformedRule`] when the stored rule fails the
    /// legality table.
    pub fn to_rule(&self, registry: &TimezoneRegistry) -> Result<RecurrenceRule> {
        let rule = RecurrenceRule {
            freq: self.freq,
            interval: self.interval.max(1),
            wkst: self.wkst,
            count: self.count,
            until: self
                .until
                .as_ref()
                .map(|until| CalendarTime::from_snapshot(until, registry)),
            by_second: self.by_second.clone(),
            by_minute: self.by_minute.clone(),
            by_hour: self.by_hour.clone(),
            by_day: self.by_day.clone(),
            by_month_day: self.by_month_day.clone(),
            by_year_day: self.by_year_day.clone(),
            by_week_no: self.by_week_no.clone(),
            by_month: self.by_month.clone(),
            by_set_pos: self.by_set_pos.clone(),
        };
        rule.validate()?;
        Ok(rule)
    }
}

/// Serialized state of a [`RecurrenceIterator`]; restoring and continuing
/// is indistinguishable from never having paused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IteratorSnapshot {
    pub initialized: bool,
    pub rule: RuleSnapshot,
    pub dtstart: TimeSnapshot,
    pub by_data: ByData,
    pub days: Vec<i32>,
    pub last: TimeSnapshot,
    pub by_indices: ByIndices,
    pub occurrence_number: u64,
}

impl RecurrenceIterator {
    /// Captures the iterator's resumable state.
    #[must_use]
    pub fn snapshot(&self) -> IteratorSnapshot {
        IteratorSnapshot {
            initialized: self.initialized,
            rule: RuleSnapshot::from_rule(&self.rule),
            dtstart: self.dtstart.to_snapshot(),
            by_data: self.by_data.clone(),
            days: self.days.clone(),
            last: self.last.to_snapshot(),
            by_indices: self.by_indices,
            occurrence_number: self.occurrence_number,
        }
    }

    /// Reconstructs an iterator from a snapshot, resolving timezone
    /// identifiers through the registry.
    ///
    /// ## Errors
    /// Returns [`Error::MalformedRule`] when the stored rule or cursor
    /// state is invalid.
    pub fn from_snapshot(
        snapshot: &IteratorSnapshot,
        registry: &TimezoneRegistry,
    ) -> Result<Self> {
        let rule = snapshot.rule.to_rule(registry)?;
        let dtstart = CalendarTime::from_snapshot(&snapshot.dtstart, registry);
        let last = CalendarTime::from_snapshot(&snapshot.last, registry);

        check_index("BYSECOND", snapshot.by_indices.second, snapshot.by_data.second.as_ref())?;
        check_index("BYMINUTE", snapshot.by_indices.minute, snapshot.by_data.minute.as_ref())?;
        check_index("BYHOUR", snapshot.by_indices.hour, snapshot.by_data.hour.as_ref())?;
        check_index("BYDAY", snapshot.by_indices.day, snapshot.by_data.day.as_ref())?;
        check_index("BYMONTH", snapshot.by_indices.month, snapshot.by_data.month.as_ref())?;
        check_index("BYWEEKNO", snapshot.by_indices.week_no, snapshot.by_data.week_no.as_ref())?;
        check_index(
            "BYMONTHDAY",
            snapshot.by_indices.month_day,
            snapshot.by_data.month_day.as_ref(),
        )?;

        if snapshot.initialized && rule.freq == Frequency::Yearly && snapshot.days.is_empty() {
            return Err(Error::MalformedRule(
                "snapshot of a yearly iterator carries no expanded days".into(),
            ));
        }

        // The snapshot does not carry the day-list cursor; recover it from
        // the last occurrence so resumed yearly iteration continues in
        // place.
        let days_index = derive_days_index(&snapshot.days, &last);

        let mut iter = Self {
            rule,
            dtstart,
            completed: false,
            last,
            occurrence_number: snapshot.occurrence_number,
            by_indices: snapshot.by_indices,
            initialized: snapshot.initialized,
            by_data: snapshot.by_data.clone(),
            days: snapshot.days.clone(),
            days_index,
        };

        if !iter.initialized {
            iter.init()?;
        }

        Ok(iter)
    }
}

fn check_index<T>(name: &str, index: usize, values: Option<&Vec<T>>) -> Result<()> {
    let len = values.map_or(0, Vec::len);
    if index != 0 && index >= len {
        return Err(Error::MalformedRule(format!(
            "snapshot {name} cursor {index} is out of range"
        )));
    }
    Ok(())
}

fn derive_days_index(days: &[i32], last: &CalendarTime) -> usize {
    days.iter()
        .position(|&doy| {
            let (mut doy, mut year) = (doy, last.year);
            if doy < 1 {
                doy += 1;
                year += 1;
            }
            let resolved = CalendarTime::from_day_of_year(doy, year);
            resolved.month == last.month && resolved.day == last.day
        })
        .unwrap_or(0)
}

/// Serialized state of a [`RecurrenceExpansion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionSnapshot {
    #[serde(rename = "ruleIterators")]
    pub rule_iterators: Vec<IteratorSnapshot>,
    #[serde(rename = "ruleDates")]
    pub rule_dates: Vec<TimeSnapshot>,
    #[serde(rename = "exDates")]
    pub ex_dates: Vec<TimeSnapshot>,
    #[serde(rename = "ruleDateInc")]
    pub rule_date_inc: usize,
    #[serde(rename = "exDateInc")]
    pub ex_date_inc: usize,
    pub last: TimeSnapshot,
    pub dtstart: TimeSnapshot,
    pub complete: bool,
}

impl RecurrenceExpansion {
    /// Captures the expansion's resumable state.
    #[must_use]
    pub fn snapshot(&self) -> ExpansionSnapshot {
        ExpansionSnapshot {
            rule_iterators: self
                .rule_iterators
                .iter()
                .map(RecurrenceIterator::snapshot)
                .collect(),
            rule_dates: self.rule_dates.iter().map(CalendarTime::to_snapshot).collect(),
            ex_dates: self.ex_dates.iter().map(CalendarTime::to_snapshot).collect(),
            rule_date_inc: self.rule_date_inc,
            ex_date_inc: self.ex_date_inc,
            last: self.last.to_snapshot(),
            dtstart: self.dtstart.to_snapshot(),
            complete: self.complete,
        }
    }

    /// Reconstructs an expansion from a snapshot, resolving timezone
    /// identifiers through the registry.
    ///
    /// ## Errors
    /// Returns [`Error::MalformedRule`] when any embedded iterator snapshot
    /// is invalid.
    pub fn from_snapshot(
        snapshot: &ExpansionSnapshot,
        registry: &TimezoneRegistry,
    ) -> Result<Self> {
        let rule_iterators = snapshot
            .rule_iterators
            .iter()
            .map(|iter| RecurrenceIterator::from_snapshot(iter, registry))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            complete: snapshot.complete,
            rule_iterators,
            rule_dates: snapshot
                .rule_dates
                .iter()
                .map(|t| CalendarTime::from_snapshot(t, registry))
                .collect(),
            ex_dates: snapshot
                .ex_dates
                .iter()
                .map(|t| CalendarTime::from_snapshot(t, registry))
                .collect(),
            rule_date_inc: snapshot.rule_date_inc,
            ex_date_inc: snapshot.ex_date_inc,
            dtstart: CalendarTime::from_snapshot(&snapshot.dtstart, registry),
            last: CalendarTime::from_snapshot(&snapshot.last, registry),
        })
    }
}
