use chrono::NaiveDate;
use thiserror::Error;

/// Errors the data pipeline can report.
///
/// Once a store is loaded, filtering and graph rebuilds are total and never
/// return these; they only arise at load time, on rejected range edits, and
/// on aggregates over empty data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("duplicate day-stat entry for {0}")]
    DuplicateDate(NaiveDate),

    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("no recorded days for \"{0}\" in the active range")]
    NoData(String),
}
