// tests/grid_mutation.rs
//
// add/delete against a fake transport: the grid is fetched first, the save goes last.
//
mod common;

use chrono::NaiveDate;
use common::{FakeTransport, daily_page, grid_json, oats_search_entry};
use foodcli::diary;
use foodcli::error::FoodError;
use foodcli::nutrition::{Amount, Identity, SearchResult, UnitPolicy};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 6, 1).unwrap()
}

fn oats() -> SearchResult {
    SearchResult::from_json(oats_search_entry()).unwrap()
}

fn transport() -> FakeTransport {
    FakeTransport::new()
        .route("/daily.do", daily_page(&grid_json()))
        .route("/dailyFoodSave.do", "OK")
}

#[test]
fn add_grams_fetches_grid_then_saves_lowest_free_slot() {
    let t = transport();
    let sent = diary::add_entry(&t, day(), &oats(), &Amount::grams(150.0).unwrap(), UnitPolicy::Lenient).unwrap();
    assert_eq!(sent.bean_entry_no, 102);

    let reqs = t.requests();
    assert_eq!(reqs.len(), 2);
    assert_eq!(reqs[0].method, "GET");
    assert!(reqs[0].url.ends_with("/daily.do?date=20170601"));
    assert!(reqs[1].url.ends_with("/dailyFoodSave.do"));

    let body = reqs[1].json();
    assert_eq!(body["beanEntryNo"], 102);
    assert_eq!(body["parentBeanId"], 139410013);
    assert_eq!(body["beanId"], 42);
    assert_eq!(body["beanInputString"], "Oats, rolled");
    assert_eq!(body["amountInputString"], "150");
    assert_eq!(body["mealTypeId"], 1);
    assert_eq!(body["calculateAmount"], true);
    assert!(body.get("amountId").is_none());
    assert!(body.get("amountResolved").is_none());
}

#[test]
fn add_default_serving_sends_serving_id() {
    let t = transport();
    diary::add_entry(&t, day(), &oats(), &Amount::servings(2.0, None).unwrap(), UnitPolicy::Lenient).unwrap();
    let body = t.requests()[1].json();
    assert_eq!(body["amountInputString"], "2 cup");
    assert_eq!(body["amountId"], "3");
}

#[test]
fn unknown_serving_never_saves() {
    let t = transport();
    let err = diary::add_entry(
        &t,
        day(),
        &oats(),
        &Amount::servings(1.0, Some("slice".into())).unwrap(),
        UnitPolicy::Lenient,
    )
    .unwrap_err();
    assert!(matches!(err, FoodError::Validation(_)));
    assert!(t.requests().iter().all(|r| !r.url.contains("dailyFoodSave")));
}

#[test]
fn full_band_is_reported_not_overwritten() {
    let mut grid = grid_json();
    let entries: Vec<_> = (101..=199)
        .map(|n| {
            serde_json::json!({
                "beanEntryKey": {"beanEntryNo": n},
                "bean": {"beanId": n, "beanDesc": "Apple"},
                "amountResolved": "100g",
                "nutrValues": ["52", "0.3", "2.4"]
            })
        })
        .collect();
    grid["beanEntries"] = serde_json::Value::Array(entries);

    let t = FakeTransport::new().route("/daily.do", daily_page(&grid)).route("/dailyFoodSave.do", "OK");
    let err = diary::add_entry(&t, day(), &oats(), &Amount::grams(10.0).unwrap(), UnitPolicy::Lenient).unwrap_err();
    assert!(matches!(err, FoodError::AllocationExhausted { first: 101, last: 199, .. }));
    assert_eq!(t.requests().len(), 1);
}

#[test]
fn delete_clears_the_slot() {
    let t = transport();
    let sent = diary::delete_entry(&t, day(), Identity::Entry { entry_number: 104, bean_id: 77 }, UnitPolicy::Lenient).unwrap();
    assert!(sent.is_delete());

    let body = t.requests()[1].json();
    assert_eq!(body["beanEntryNo"], 104);
    assert_eq!(body["beanInputString"], "Peanut butter");
    assert_eq!(body["parentBeanId"], 139410013);
    assert!(body["beanId"].is_null());
    assert!(body["amountInputString"].is_null());
    assert!(body["amountResolved"].is_null());
    assert!(body.as_object().unwrap().contains_key("amountResolved"));
}

#[test]
fn deleting_an_empty_slot_is_rejected_before_saving() {
    let t = transport();
    let err = diary::delete_entry(&t, day(), Identity::Entry { entry_number: 102, bean_id: 77 }, UnitPolicy::Lenient).unwrap_err();
    assert!(matches!(err, FoodError::Validation(_)));
    assert_eq!(t.requests().len(), 1);
}

#[test]
fn slot_refilled_since_listing_is_not_deleted() {
    let t = transport();
    let stale = Identity::Entry { entry_number: 101, bean_id: 42 };
    let err = diary::delete_entry(&t, day(), stale, UnitPolicy::Lenient).unwrap_err();
    assert!(matches!(err, FoodError::Validation(ref m) if m.contains("Fever tree tonic")));
    assert_eq!(t.requests().len(), 1);
}
