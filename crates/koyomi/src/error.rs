use thiserror::Error;

/// Recurrence engine errors.
///
/// Both variants are fatal: a rule that fails construction must not be
/// iterated, and an iterator or expansion that tripped a safety guard must
/// not be advanced further. Normal exhaustion (COUNT reached, UNTIL passed,
/// all sources drained) is *not* an error; it is signalled by `Ok(None)`
/// from `next()` together with a sticky completion flag.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid BY-part value or grammar, illegal BY-part combination for the
    /// given FREQ, or an invalid FREQ/WKST/UNTIL encoding. Raised at rule
    /// construction or iterator initialization.
    #[error("Malformed rule: {0}")]
    MalformedRule(String),

    /// A bounded-retry safety guard tripped: the same occurrence was
    /// produced twice, the MONTHLY BYDAY+BYMONTHDAY month budget ran out,
    /// the expansion EXDATE retry ceiling was exhausted, or yearly expansion
    /// hit the maximum-year cap without producing a single day.
    #[error("Unsatisfiable rule: {0}")]
    UnsatisfiableRule(String),
}

pub type Result<T> = std::result::Result<T, Error>;
