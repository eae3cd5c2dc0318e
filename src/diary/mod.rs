// src/diary/mod.rs
//! Day grid reads and the add/delete mutations against it.
//!
//! Each mutation re-fetches the grid right before planning. The save request
//! is the last step, after every check has passed.

pub mod grid;
pub mod reconcile;

use chrono::NaiveDate;
use tracing::info;

use crate::core::Transport;
use crate::error::Result;
use crate::nutrition::{Amount, Food, Identity, SearchResult, UnitPolicy};
use crate::specs::mynetdiary;

pub use grid::DayGrid;
pub use reconcile::{SavePayload, allocate_entry_number, next_free_entry_number, plan_add, plan_delete};

/// Log `amount` of `food` on `date`. Returns the payload that was sent.
pub fn add_entry(
    t: &dyn Transport,
    date: NaiveDate,
    food: &SearchResult,
    amount: &Amount,
    policy: UnitPolicy,
) -> Result<SavePayload> {
    let grid = mynetdiary::fetch_day_grid(t, date, policy)?;
    let payload = plan_add(&grid, food, amount)?;
    mynetdiary::save_entry(t, &payload)?;
    info!(
        food = food.food_name(),
        entry = payload.bean_entry_no,
        %date,
        "added {}",
        payload.amount_input_string.as_deref().unwrap_or_default()
    );
    Ok(payload)
}

/// Clear the logged entry `target` on `date`. Returns the payload that was sent.
pub fn delete_entry(t: &dyn Transport, date: NaiveDate, target: Identity, policy: UnitPolicy) -> Result<SavePayload> {
    let grid = mynetdiary::fetch_day_grid(t, date, policy)?;
    let payload = plan_delete(&grid, target)?;
    mynetdiary::save_entry(t, &payload)?;
    info!(food = %payload.bean_input_string, entry = payload.bean_entry_no, %date, "deleted");
    Ok(payload)
}
