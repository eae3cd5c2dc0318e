// src/report/weights.rs
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::consts::{WEIGHT_MEASUREMENT_ID, WEIGHT_SUFFIX};
use crate::core::json::{as_id, text};
use crate::error::{FoodError, Result};

/// Body weight logged on one day, as the site prints it minus the unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightRecord {
    pub date: NaiveDate,
    pub value: String,
}

impl WeightRecord {
    pub fn to_cells(&self) -> Vec<String> {
        vec![self.date.format("%Y-%m-%d").to_string(), self.value.clone()]
    }
}

/// Pick the weight out of a day's `measurementsPM` array.
///
/// `Ok(None)` when the day has no weight measurement or it was left blank.
pub fn parse_weight(measurements: &Value, date: NaiveDate) -> Result<Option<WeightRecord>> {
    let list = measurements
        .as_array()
        .ok_or_else(|| FoodError::malformed(format!("measurements for {date} are not an array")))?;

    let weight = list
        .iter()
        .find(|m| m.get("measurementId").and_then(as_id) == Some(WEIGHT_MEASUREMENT_ID));

    let Some(current) = weight.and_then(|m| m.get("currentValue")).filter(|v| !v.is_null()) else {
        return Ok(None);
    };

    let raw = text(current);
    let value = raw.strip_suffix(WEIGHT_SUFFIX).unwrap_or(&raw).trim().to_string();
    if value.is_empty() {
        return Ok(None);
    }
    Ok(Some(WeightRecord { date, value }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 3, 9).unwrap()
    }

    #[test]
    fn weight_suffix_is_removed() {
        let m = json!([{"measurementId": 40, "currentValue": "71.3kg"}]);
        let w = parse_weight(&m, day()).unwrap().unwrap();
        assert_eq!(w.to_cells(), vec!["2016-03-09", "71.3"]);
    }

    #[test]
    fn weight_need_not_come_first() {
        let m = json!([
            {"measurementId": 12, "currentValue": "8000"},
            {"measurementId": "40", "currentValue": "70kg"}
        ]);
        assert_eq!(parse_weight(&m, day()).unwrap().unwrap().value, "70");
    }

    #[test]
    fn blank_or_absent_weight_is_none() {
        assert_eq!(parse_weight(&json!([{"measurementId": 40, "currentValue": null}]), day()).unwrap(), None);
        assert_eq!(parse_weight(&json!([{"measurementId": 7}]), day()).unwrap(), None);
        assert_eq!(parse_weight(&json!([]), day()).unwrap(), None);
    }

    #[test]
    fn non_array_is_malformed() {
        assert!(parse_weight(&json!({"a": 1}), day()).is_err());
    }
}
