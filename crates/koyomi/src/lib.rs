//! Calendar recurrence-rule engine.
//!
//! Expands RFC 5545-style recurrence data — a structured rule
//! (FREQ/INTERVAL/BYxxx/COUNT/UNTIL), a start date, and explicit
//! RDATE/EXDATE instants — into an ordered, exclusion-aware, potentially
//! infinite sequence of concrete occurrences, with timezone-aware offset
//! resolution from VTIMEZONE-style observance data.
//!
//! The engine consumes already-structured values and produces structured
//! times; parsing and encoding of iCalendar documents live elsewhere. All
//! iteration is synchronous, pull-based and deterministic: identical
//! inputs always produce the identical sequence, and both
//! [`RecurrenceIterator`] and [`RecurrenceExpansion`] serialize to
//! snapshots from which iteration resumes exactly where it left off.
//!
//! ```
//! use koyomi::{CalendarTime, RecurrenceIterator, RecurrenceRule};
//!
//! let rule: RecurrenceRule = "FREQ=DAILY;COUNT=3".parse()?;
//! let mut iter = RecurrenceIterator::new(rule, CalendarTime::date(2020, 1, 30))?;
//! let mut occurrences = Vec::new();
//! while let Some(next) = iter.next()? {
//!     occurrences.push(next.to_string());
//! }
//! assert_eq!(occurrences, ["2020-01-30", "2020-01-31", "2020-02-01"]);
//! # Ok::<(), koyomi::Error>(())
//! ```

pub mod error;
pub mod recur;
pub mod time;
pub mod zone;

pub use error::{Error, Result};
pub use recur::{
    ByPart, Classification, ExpansionSnapshot, Frequency, IteratorSnapshot, RecurrenceExpansion,
    RecurrenceIterator, RecurrenceRule, RuleSnapshot, WeekdayNum,
};
pub use time::{CalendarTime, Duration, TimeSnapshot, UtcOffset, Weekday};
pub use zone::{Observance, ObservanceKind, Timezone, TimezoneRegistry, Zone};
