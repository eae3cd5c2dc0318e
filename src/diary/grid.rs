// src/diary/grid.rs
use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde_json::Value;

use crate::core::json::{array, id_field, text};
use crate::error::Result;
use crate::nutrition::record::entry_number;
use crate::nutrition::vector::normalize_header;
use crate::nutrition::{HistoryEntry, UnitPolicy};

/// One day's logged food grid, as embedded in the daily page.
///
/// Built fresh from every fetch. `occupied` holds the entry numbers of every
/// slot that carries a food, which is what new entries must not collide with.
#[derive(Clone, Debug)]
pub struct DayGrid {
    pub date: NaiveDate,
    /// `parentBeanId`: the day container every save is addressed to.
    pub parent_id: i64,
    pub headers: Vec<String>,
    pub entries: Vec<HistoryEntry>,
    pub occupied: BTreeSet<u32>,
    pub raw: Value,
}

impl DayGrid {
    pub fn from_json(date: NaiveDate, raw: Value, policy: UnitPolicy) -> Result<Self> {
        let ctx = "day grid";
        let parent_id = id_field(&raw, "parentBeanId", ctx)?;
        let headers: Vec<String> = array(&raw, "nutrColumnHeaders", ctx)?
            .iter()
            .map(|h| normalize_header(&text(h)))
            .collect();

        let mut entries = Vec::new();
        let mut occupied = BTreeSet::new();
        for slot in array(&raw, "beanEntries", ctx)? {
            // empty slots carry no `bean` and are not entries
            if slot.get("bean").is_none_or(Value::is_null) {
                continue;
            }
            occupied.insert(entry_number(slot)?);
            entries.push(HistoryEntry::from_json(&headers, slot.clone(), policy)?);
        }

        Ok(Self { date, parent_id, headers, entries, occupied, raw })
    }

    pub fn find_entry(&self, entry_number: u32) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.entry_number_id() == entry_number)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::Food;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 6, 1).unwrap()
    }

    #[test]
    fn only_slots_with_food_are_entries() {
        let g = DayGrid::from_json(day(), fixtures::grid_json(), UnitPolicy::Strict).unwrap();
        assert_eq!(g.parent_id, 139410013);
        assert_eq!(g.headers, vec!["Cals", "Protein", "Fiber"]);
        assert_eq!(g.entries.len(), 2);
        assert_eq!(g.occupied.iter().copied().collect::<Vec<_>>(), vec![101, 104]);
        assert_eq!(g.find_entry(104).unwrap().food_name(), "Peanut butter");
        assert_eq!(g.find_entry(104).unwrap().nutrition().get("Cals"), Some(1188.0));
        assert!(g.find_entry(102).is_none());
    }

    #[test]
    fn missing_parent_id_is_malformed() {
        let mut raw = fixtures::grid_json();
        raw.as_object_mut().unwrap().remove("parentBeanId");
        let err = DayGrid::from_json(day(), raw, UnitPolicy::Lenient).unwrap_err();
        assert!(err.to_string().contains("parentBeanId"));
    }
}
