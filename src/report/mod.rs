// src/report/mod.rs
//! Multi-day history exports: the nutrition report and the weight log.

pub mod assemble;
pub mod weights;

use chrono::NaiveDate;

pub use assemble::{ReportAssembler, ReportPage, ReportRow, RowKind, classify_page};
pub use weights::{WeightRecord, parse_weight};

/// Days from `start` (inclusive) up to `end` (exclusive).
///
/// `start` itself is the first day fetched, so a history run from a given date
/// includes that date. `end` (normally today) is never included.
pub fn day_series(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d < end)
}
