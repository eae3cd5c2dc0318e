// src/nutrition/mod.rs
//! Field- and entity-level normalization of food data.
//!
//! Everything the remote services return about a food ends up here before the
//! rest of the program looks at it:
//! - `units` / `amount`: resolved-amount strings (`"3tbsp"`, `"100g"`) into
//!   canonical numbers and units.
//! - `vector`: positional header/value rows into a `NutritionVector`, with `-1`
//!   standing for "unknown".
//! - `record`: one `Food` contract over search results, logged diary entries
//!   and the day's totals row.
//! - `metrics`: derived energy figures computed at formatting time.
//!
//! No I/O happens in this module.

pub mod amount;
pub mod metrics;
pub mod record;
pub mod units;
pub mod vector;

pub use amount::{Amount, AmountUnit, ParsedAmount, UnitPolicy, initial_digits, parse_amount};
pub use record::{Food, FoodRecord, HistoryEntry, Identity, SearchResult, ServingOption, Totals};
pub use vector::NutritionVector;
