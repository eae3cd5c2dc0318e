// src/diary/reconcile.rs
//! Pure planning of day-grid mutations.
//!
//! Nothing here touches the network: a plan is built from a freshly fetched
//! [`DayGrid`] and handed to the save call afterwards, so every rule below can
//! be exercised offline.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::grid::DayGrid;
use crate::config::consts::{ENTRY_BAND_PREFIX, ENTRY_SEQ_FIRST, ENTRY_SEQ_LAST, MEAL_TYPE_ID};
use crate::error::{FoodError, Result};
use crate::nutrition::{Amount, AmountUnit, Food, Identity, SearchResult, ServingOption};

/// Field set of one `dailyFoodSave.do` request.
///
/// `amountId` is left out entirely when absent; `amountResolved` only appears
/// (as an explicit null) on deletes.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub meal_type_id: u32,
    pub bean_input_string: String,
    pub bean_id: Option<i64>,
    pub bean_entry_no: u32,
    pub parent_bean_id: i64,
    pub amount_input_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_id: Option<String>,
    pub calculate_amount: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_resolved: Option<Value>,
}

impl SavePayload {
    pub fn to_body(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_delete(&self) -> bool {
        self.amount_resolved.is_some()
    }
}

/// Lowest free id in the reserved band (`1` followed by a two-digit sequence).
pub fn next_free_entry_number(occupied: &BTreeSet<u32>) -> Option<u32> {
    (ENTRY_SEQ_FIRST..=ENTRY_SEQ_LAST)
        .map(|seq| ENTRY_BAND_PREFIX + seq)
        .find(|candidate| !occupied.contains(candidate))
}

pub fn allocate_entry_number(grid: &DayGrid) -> Result<u32> {
    next_free_entry_number(&grid.occupied).ok_or(FoodError::AllocationExhausted {
        date: grid.date,
        parent_id: grid.parent_id,
        first: ENTRY_BAND_PREFIX + ENTRY_SEQ_FIRST,
        last: ENTRY_BAND_PREFIX + ENTRY_SEQ_LAST,
    })
}

/// Plan logging `amount` of `food` on `grid`'s day.
///
/// Gram amounts go out as the bare number with no amount id; serving
/// metadata is not consulted. Serving amounts go out as `"<n> <desc>"` with
/// the matched serving's id.
pub fn plan_add(grid: &DayGrid, food: &SearchResult, amount: &Amount) -> Result<SavePayload> {
    let (amount_input, amount_id) = match amount.unit() {
        AmountUnit::Grams => {
            if food.is_gramless() {
                warn!(food = food.food_name(), "logging grams of a food without a gram weight");
            }
            (amount.number_string(), None)
        }
        AmountUnit::Serving(name) => {
            let serving = pick_serving(food, name.as_deref())?;
            (format!("{} {}", amount.number_string(), serving.desc), Some(serving.id.clone()))
        }
    };

    let entry_no = allocate_entry_number(grid)?;
    debug!(entry_no, date = %grid.date, "allocated entry number");

    Ok(SavePayload {
        meal_type_id: MEAL_TYPE_ID,
        bean_input_string: s!(food.food_name()),
        bean_id: Some(food.bean_id()),
        bean_entry_no: entry_no,
        parent_bean_id: grid.parent_id,
        amount_input_string: Some(amount_input),
        amount_id,
        calculate_amount: true,
        amount_resolved: None,
    })
}

/// Plan clearing the slot `target` names on `grid`'s day.
///
/// The slot must still hold the same food it held when `target` was read;
/// a slot that changed in between is left alone.
pub fn plan_delete(grid: &DayGrid, target: Identity) -> Result<SavePayload> {
    let Identity::Entry { entry_number, bean_id } = target else {
        return Err(FoodError::validation("only logged diary entries can be deleted from a day"));
    };
    let entry = grid.find_entry(entry_number).ok_or_else(|| {
        FoodError::validation(format!("no logged entry {entry_number} on {}", grid.date))
    })?;
    if entry.identity() != target {
        return Err(FoodError::validation(format!(
            "entry {entry_number} on {} now holds {:?} (bean {}), expected bean {bean_id}",
            grid.date,
            entry.food_name(),
            entry.bean_id()
        )));
    }
    debug!(entry_number, bean_id, date = %grid.date, "planning delete");

    Ok(SavePayload {
        meal_type_id: MEAL_TYPE_ID,
        bean_input_string: s!(entry.food_name()),
        bean_id: None,
        bean_entry_no: entry_number,
        parent_bean_id: grid.parent_id,
        amount_input_string: None,
        amount_id: None,
        calculate_amount: true,
        amount_resolved: Some(Value::Null),
    })
}

fn pick_serving<'a>(food: &'a SearchResult, name: Option<&str>) -> Result<&'a ServingOption> {
    let found = match name {
        None => food.default_serving(),
        Some(n) => food.find_serving(n),
    };
    found.ok_or_else(|| {
        let known: Vec<&str> = food.serving_options().iter().map(|s| s.desc.as_str()).collect();
        FoodError::validation(format!(
            "{:?} has no serving {} (servings: {})",
            food.food_name(),
            name.map(|n| format!("{n:?}")).unwrap_or_else(|| s!("by default")),
            if known.is_empty() { s!("none") } else { known.join(", ") }
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary::grid::fixtures::grid_json;
    use crate::nutrition::UnitPolicy;
    use chrono::NaiveDate;
    use serde_json::json;

    fn grid() -> DayGrid {
        DayGrid::from_json(NaiveDate::from_ymd_opt(2017, 6, 1).unwrap(), grid_json(), UnitPolicy::Lenient).unwrap()
    }

    fn tonic() -> SearchResult {
        SearchResult::from_json(json!({
            "beanId": 2156966,
            "descForUi": "Fever tree tonic",
            "dfSrv": {"id": "1", "desc": "bottle", "am": 1, "gmWgt": 200},
            "details": []
        }))
        .unwrap()
    }

    #[test]
    fn lowest_gap_in_band_is_taken() {
        let occupied: BTreeSet<u32> = [101, 102, 104].into();
        assert_eq!(next_free_entry_number(&occupied), Some(103));
        assert_eq!(next_free_entry_number(&BTreeSet::new()), Some(101));
    }

    #[test]
    fn saturated_band_is_exhausted() {
        let mut g = grid();
        g.occupied = (101..=200).collect();
        let err = allocate_entry_number(&g).unwrap_err();
        assert!(matches!(
            err,
            FoodError::AllocationExhausted { parent_id: 139410013, first: 101, last: 199, .. }
        ));
    }

    #[test]
    fn gram_add_has_no_amount_id() {
        let p = plan_add(&grid(), &tonic(), &Amount::grams(150.0).unwrap()).unwrap();
        assert_eq!(p.bean_entry_no, 102);
        assert_eq!(p.amount_input_string.as_deref(), Some("150"));
        assert_eq!(p.amount_id, None);
        let body: Value = serde_json::from_str(&p.to_body().unwrap()).unwrap();
        assert!(body.get("amountId").is_none());
        assert!(body.get("amountResolved").is_none());
        assert_eq!(body["parentBeanId"], 139410013);
        assert_eq!(body["beanId"], 2156966);
        assert_eq!(body["calculateAmount"], true);
    }

    #[test]
    fn gram_add_ignores_missing_servings() {
        let food = SearchResult::from_json(json!({"beanId": 5, "descForUi": "Salt"})).unwrap();
        assert!(plan_add(&grid(), &food, &Amount::grams(2.0).unwrap()).is_ok());
    }

    #[test]
    fn serving_add_carries_serving_id() {
        let p = plan_add(&grid(), &tonic(), &Amount::servings(2.0, None).unwrap()).unwrap();
        assert_eq!(p.amount_input_string.as_deref(), Some("2 bottle"));
        assert_eq!(p.amount_id.as_deref(), Some("1"));

        let named = plan_add(&grid(), &tonic(), &Amount::servings(1.0, Some(s!("Bottle"))).unwrap()).unwrap();
        assert_eq!(named.amount_id.as_deref(), Some("1"));
    }

    #[test]
    fn unknown_serving_fails_validation() {
        let err = plan_add(&grid(), &tonic(), &Amount::servings(1.0, Some(s!("can"))).unwrap()).unwrap_err();
        assert!(matches!(err, FoodError::Validation(ref m) if m.contains("bottle")));
    }

    #[test]
    fn delete_sends_explicit_null_amount() {
        let target = grid().find_entry(104).unwrap().identity();
        let p = plan_delete(&grid(), target).unwrap();
        assert!(p.is_delete());
        let body: Value = serde_json::from_str(&p.to_body().unwrap()).unwrap();
        assert_eq!(body["beanEntryNo"], 104);
        assert_eq!(body["beanInputString"], "Peanut butter");
        assert!(body["beanId"].is_null());
        assert!(body["amountInputString"].is_null());
        assert!(body.as_object().unwrap().contains_key("amountResolved"));
        assert!(body["amountResolved"].is_null());
    }

    #[test]
    fn delete_of_empty_slot_is_rejected() {
        let target = Identity::Entry { entry_number: 102, bean_id: 77 };
        assert!(matches!(plan_delete(&grid(), target), Err(FoodError::Validation(_))));
    }

    #[test]
    fn delete_of_refilled_slot_is_rejected() {
        let stale = Identity::Entry { entry_number: 104, bean_id: 5 };
        let err = plan_delete(&grid(), stale).unwrap_err();
        assert!(matches!(err, FoodError::Validation(ref m) if m.contains("Peanut butter")));
    }

    #[test]
    fn search_identity_cannot_be_deleted_from_a_day() {
        let err = plan_delete(&grid(), Identity::Bean { bean_id: 77 }).unwrap_err();
        assert!(matches!(err, FoodError::Validation(_)));
    }
}
