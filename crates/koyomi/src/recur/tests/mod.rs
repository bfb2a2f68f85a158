//! Cross-module recurrence tests: end-to-end scenarios and resumability.

mod scenarios;
