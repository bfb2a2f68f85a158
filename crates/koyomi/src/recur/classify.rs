//! Frequency × BY-part classification.
//!
//! Whether a BY-part multiplies occurrences within a period (expand) or
//! merely filters the single generated candidate (contract) depends on the
//! rule frequency. The matrix below is indexed by [`Frequency`] and
//! [`ByPart`] and must be reproduced exactly; the per-frequency step
//! functions and the contracting checks both key off it.

use super::rule::{ByPart, Frequency};

/// How a BY-part behaves under a given frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No defined behavior; treated as a pass-through.
    Unknown,
    /// The part filters an already generated candidate.
    Contract,
    /// The part multiplies candidates within the frequency period.
    Expand,
    /// The combination is rejected at rule validation.
    Illegal,
}

use Classification::{Contract as C, Expand as E, Illegal as I, Unknown as U};

/// Rows are frequencies from SECONDLY to YEARLY; columns are BY-parts from
/// BYSECOND to BYSETPOS.
static EXPAND_MAP: [[Classification; 9]; 7] = [
    // SECONDLY
    [C, C, C, C, C, C, C, C, U],
    // MINUTELY
    [E, C, C, C, C, C, C, C, U],
    // HOURLY
    [E, E, C, C, C, C, C, C, U],
    // DAILY
    [E, E, E, C, C, C, C, C, U],
    // WEEKLY
    [E, E, E, E, I, I, C, C, U],
    // MONTHLY
    [E, E, E, E, E, I, I, C, U],
    // YEARLY
    [E, E, E, E, E, E, E, E, U],
];

/// Looks up the classification for a frequency and BY-part.
#[must_use]
pub fn classify(freq: Frequency, part: ByPart) -> Classification {
    EXPAND_MAP[freq.index()][part.index()]
}
