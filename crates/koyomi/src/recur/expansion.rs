//! Merged expansion of recurrence rules, RDATE and EXDATE lists.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::recur::iterator::RecurrenceIterator;
use crate::recur::rule::RecurrenceRule;
use crate::time::CalendarTime;

/// Attempts per `next` call before an expansion is declared stalled; guards
/// against EXDATE sets that would otherwise block forward progress.
const MAX_TRIES: usize = 500;

/// Insertion index keeping `list` sorted by instant.
fn binsearch_insert(list: &[CalendarTime], value: &CalendarTime) -> usize {
    list.partition_point(|t| t.compare(value) == Ordering::Less)
}

/// Merges any number of recurrence rules with explicit RDATE instants into
/// one ordered, deduplicated occurrence stream, dropping instants named by
/// EXDATE.
///
/// The expansion owns its iterators; it is serializable and resumable via
/// [`ExpansionSnapshot`](crate::recur::ExpansionSnapshot).
#[derive(Debug, Clone)]
pub struct RecurrenceExpansion {
    pub(crate) complete: bool,
    pub(crate) rule_iterators: Vec<RecurrenceIterator>,
    pub(crate) rule_dates: Vec<CalendarTime>,
    pub(crate) ex_dates: Vec<CalendarTime>,
    pub(crate) rule_date_inc: usize,
    pub(crate) ex_date_inc: usize,
    pub(crate) dtstart: CalendarTime,
    pub(crate) last: CalendarTime,
}

impl RecurrenceExpansion {
    /// Creates an expansion from a start date and the recurrence data of a
    /// component.
    ///
    /// With no rules and no rdates the stream consists of the start date
    /// alone. An rdate earlier than the start date moves the stream's
    /// beginning back to it.
    ///
    /// ## Errors
    /// Propagates iterator construction failures for invalid rules.
    pub fn new(
        dtstart: CalendarTime,
        rules: &[RecurrenceRule],
        rdates: &[CalendarTime],
        exdates: &[CalendarTime],
    ) -> Result<Self> {
        let mut expansion = Self {
            complete: false,
            rule_iterators: Vec::new(),
            rule_dates: Vec::new(),
            ex_dates: Vec::new(),
            rule_date_inc: 0,
            ex_date_inc: 0,
            last: dtstart.clone(),
            dtstart,
        };

        if rules.is_empty() && rdates.is_empty() {
            // Non-recurring input still yields the start date once.
            expansion.rule_dates = vec![expansion.dtstart.clone()];
            return Ok(expansion);
        }

        if !rdates.is_empty() {
            expansion.rule_dates = rdates.to_vec();
            expansion.rule_dates.sort();

            let first_is_earlier = expansion
                .rule_dates
                .first()
                .is_some_and(|first| first.compare(&expansion.dtstart) == Ordering::Less);
            if first_is_earlier {
                // An rdate before the start date rewinds the stream to it.
                expansion.rule_date_inc = 0;
                expansion.last = expansion.rule_dates[0].clone();
            } else {
                expansion.rule_date_inc =
                    binsearch_insert(&expansion.rule_dates, &expansion.last);
            }
        }

        for rule in rules {
            let mut iter = RecurrenceIterator::new(rule.clone(), expansion.dtstart.clone())?;
            // Move each iterator onto its first occurrence so the merge can
            // read `last` uniformly.
            iter.next()?;
            expansion.rule_iterators.push(iter);
        }

        if !exdates.is_empty() {
            expansion.ex_dates = exdates.to_vec();
            expansion.ex_dates.sort();
            expansion.ex_date_inc = binsearch_insert(&expansion.ex_dates, &expansion.last);
        }

        Ok(expansion)
    }

    /// The anchor start date.
    #[must_use]
    pub fn dtstart(&self) -> &CalendarTime {
        &self.dtstart
    }

    /// The most recently produced occurrence.
    #[must_use]
    pub fn last(&self) -> &CalendarTime {
        &self.last
    }

    /// True once every source is drained; further `next` calls return
    /// `Ok(None)` without side effects.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// Retrieves the next occurrence across all sources.
    ///
    /// The earliest pending candidate wins; candidates equal to a pending
    /// EXDATE instant are discarded and the merge retries.
    ///
    /// ## Errors
    /// Returns [`Error::UnsatisfiableRule`] when the retry ceiling is
    /// exhausted, and propagates iterator guard failures.
    pub fn next(&mut self) -> Result<Option<CalendarTime>> {
        if self.complete {
            return Ok(None);
        }

        let mut current_try = 0;

        loop {
            current_try += 1;
            if current_try > MAX_TRIES {
                return Err(Error::UnsatisfiableRule(
                    "expansion exceeded its retry ceiling; the rule set may be impossible to fulfill"
                        .into(),
                ));
            }

            let rule_date = self.rule_dates.get(self.rule_date_inc).cloned();
            let iter_last = self
                .next_recurrence_iter()
                .map(|index| self.rule_iterators[index].last().clone());

            let next = match (rule_date, iter_last) {
                (None, None) => {
                    // Every source is drained.
                    self.complete = true;
                    return Ok(None);
                }
                (Some(rule_date), None) => rule_date,
                (None, Some(iter_last)) => iter_last,
                (Some(rule_date), Some(iter_last)) => {
                    if rule_date.compare(&iter_last) == Ordering::Greater {
                        iter_last
                    } else {
                        rule_date
                    }
                }
            };

            self.last = next;

            // Consume the chosen instant from every source so the same
            // occurrence is never produced twice.
            while self
                .rule_dates
                .get(self.rule_date_inc)
                .is_some_and(|rd| rd.compare(&self.last) == Ordering::Equal)
            {
                self.rule_date_inc += 1;
            }
            for index in 0..self.rule_iterators.len() {
                while !self.rule_iterators[index].completed()
                    && self.rule_iterators[index].last().compare(&self.last) == Ordering::Equal
                {
                    self.rule_iterators[index].next()?;
                }
            }

            // Exclusion check by exact instant equality.
            while self
                .ex_dates
                .get(self.ex_date_inc)
                .is_some_and(|ex| ex.compare(&self.last) == Ordering::Less)
            {
                self.ex_date_inc += 1;
            }
            if self
                .ex_dates
                .get(self.ex_date_inc)
                .is_some_and(|ex| ex.compare(&self.last) == Ordering::Equal)
            {
                self.ex_date_inc += 1;
                continue;
            }

            return Ok(Some(self.last.clone()));
        }
    }

    /// Drops completed iterators and returns the index of the one holding
    /// the earliest pending occurrence.
    fn next_recurrence_iter(&mut self) -> Option<usize> {
        self.rule_iterators.retain(|iter| !iter.completed());

        let mut chosen: Option<usize> = None;
        for (index, iter) in self.rule_iterators.iter().enumerate() {
            let earlier = chosen.is_none_or(|c| {
                self.rule_iterators[c].last().compare(iter.last()) == Ordering::Greater
            });
            if earlier {
                chosen = Some(index);
            }
        }
        chosen
    }
}
