// src/nutrition/record.rs
use serde_json::{Map, Value};

use super::amount::{LENIENT_UNIT, ParsedAmount, UnitPolicy, initial_digits, parse_amount};
use super::vector::NutritionVector;
use crate::core::json::{array, field, id_field, opt_f64, opt_text, str_field, text};
use crate::core::sanitize::html_to_text;
use crate::error::{FoodError, Result};

/// Uniform view over every shape of "a food" the program handles.
///
/// `nutrition()` is always expressed per `amount_value()` of `amount_unit_name()`,
/// so `calories / amount_value` is a valid energy density for every implementor.
pub trait Food {
    fn food_name(&self) -> &str;
    fn amount_value(&self) -> f64;
    fn amount_unit_name(&self) -> &str;
    fn nutrition(&self) -> &NutritionVector;
    /// Untouched source payload, for diagnostics and `--raw` output.
    fn dump(&self) -> &Value;

    fn amount_display(&self) -> String {
        format!("{:.1} {}", self.amount_value(), self.amount_unit_name())
    }
}

/// What the remote service needs to address a record again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Identity {
    /// A food in the database (search result).
    Bean { bean_id: i64 },
    /// A logged slot on a day grid.
    Entry { entry_number: u32, bean_id: i64 },
}

/* ---------- search results ---------- */

/// A named serving size offered for a food (`dfSrv` in search payloads).
#[derive(Clone, Debug, PartialEq)]
pub struct ServingOption {
    /// Remote amount id sent back as `amountId`.
    pub id: String,
    pub desc: String,
    pub amount: Option<f64>,
    pub gram_weight: Option<f64>,
}

impl ServingOption {
    fn from_json(v: &Value) -> Result<Self> {
        let ctx = "serving";
        let id = text(field(v, "id", ctx)?);
        if id.is_empty() {
            return Err(FoodError::malformed("serving: empty `id`"));
        }
        Ok(Self {
            id,
            desc: str_field(v, "desc", ctx)?,
            amount: opt_f64(v, "am"),
            gram_weight: opt_f64(v, "gmWgt"),
        })
    }
}

/// One entry of a food search page. Nutrition is per 100 g, or per the
/// gramless measure for foods without a gram weight.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    name: String,
    bean_id: i64,
    gramless_measure: Option<String>,
    serving_options: Vec<ServingOption>,
    nutrition: NutritionVector,
    nutrient_units: Vec<String>,
    amount_value: f64,
    amount_unit: String,
    raw: Value,
}

impl SearchResult {
    pub fn from_json(raw: Value) -> Result<Self> {
        let ctx = "search result";
        let name = html_to_text(&str_field(&raw, "descForUi", ctx)?);
        let bean_id = id_field(&raw, "beanId", ctx)?;

        let gramless = raw.get("isGramless").and_then(Value::as_bool).unwrap_or(false);
        let gramless_measure = if gramless {
            Some(opt_text(&raw, "gramlessAmountMeasure").unwrap_or_else(|| s!("serving")))
        } else {
            None
        };

        let serving_options = match raw.get("dfSrv") {
            Some(v) if v.is_object() => vec![ServingOption::from_json(v)?],
            _ => Vec::new(),
        };

        let details: &[Value] = match raw.get("details") {
            Some(Value::Array(d)) => d,
            _ => &[],
        };
        let labels: Vec<String> = details.iter().map(|d| text(&d["nutrDesc"])).collect();
        let values: Vec<String> = details.iter().map(|d| text(&d["nutrValue"])).collect();
        let nutrient_units = details.iter().map(|d| text(&d["units"])).collect();
        let nutrition = NutritionVector::build(&labels, &values)?;

        let (amount_value, amount_unit) = match &gramless_measure {
            Some(m) => (1.0, m.clone()),
            None => (100.0, s!("g")),
        };

        Ok(Self {
            name,
            bean_id,
            gramless_measure,
            serving_options,
            nutrition,
            nutrient_units,
            amount_value,
            amount_unit,
            raw,
        })
    }

    pub fn bean_id(&self) -> i64 {
        self.bean_id
    }

    pub fn is_gramless(&self) -> bool {
        self.gramless_measure.is_some()
    }

    pub fn serving_options(&self) -> &[ServingOption] {
        &self.serving_options
    }

    pub fn default_serving(&self) -> Option<&ServingOption> {
        self.serving_options.first()
    }

    /// Case-insensitive match on the serving description.
    pub fn find_serving(&self, desc: &str) -> Option<&ServingOption> {
        let want = desc.trim();
        self.serving_options
            .iter()
            .find(|s| s.desc.trim().eq_ignore_ascii_case(want))
    }

    /// `(label, value, unit)` per nutrient as the search page lists them.
    pub fn nutrient_details(&self) -> impl Iterator<Item = (&str, f64, &str)> {
        self.nutrition
            .iter()
            .zip(&self.nutrient_units)
            .map(|((l, v), u)| (l, v, u.as_str()))
    }
}

impl Food for SearchResult {
    fn food_name(&self) -> &str {
        &self.name
    }
    fn amount_value(&self) -> f64 {
        self.amount_value
    }
    fn amount_unit_name(&self) -> &str {
        &self.amount_unit
    }
    fn nutrition(&self) -> &NutritionVector {
        &self.nutrition
    }
    fn dump(&self) -> &Value {
        &self.raw
    }
}

/* ---------- diary entries ---------- */

/// A food already logged on a day grid.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    entry_number_id: u32,
    bean_id: i64,
    name: String,
    resolved_amount: String,
    amount: ParsedAmount,
    nutrition: NutritionVector,
    raw: Value,
}

impl HistoryEntry {
    /// `headers` are the grid's normalized nutrient column headers.
    pub fn from_json(headers: &[String], raw: Value, policy: UnitPolicy) -> Result<Self> {
        let ctx = "diary entry";
        let bean = field(&raw, "bean", ctx)?;
        let bean_id = id_field(bean, "beanId", ctx)?;
        let name = str_field(bean, "beanDesc", ctx)?;
        let entry_number_id = entry_number(&raw)?;

        let resolved_amount = str_field(&raw, "amountResolved", ctx)?;
        let amount = parse_amount(&resolved_amount, policy)?;

        let values: Vec<String> = array(&raw, "nutrValues", ctx)?.iter().map(text).collect();
        let nutrition = NutritionVector::build(headers, &values)?;

        Ok(Self { entry_number_id, bean_id, name, resolved_amount, amount, nutrition, raw })
    }

    pub fn entry_number_id(&self) -> u32 {
        self.entry_number_id
    }

    pub fn bean_id(&self) -> i64 {
        self.bean_id
    }

    /// Raw resolved amount, e.g. `"3tbsp"`.
    pub fn resolved_amount(&self) -> &str {
        &self.resolved_amount
    }

    /// Unit suffix of the resolved amount as the site wrote it (`"3tbsp"` → `"tbsp"`).
    pub fn amount_name(&self) -> &str {
        let digits = initial_digits(&self.resolved_amount);
        self.resolved_amount[digits.len()..].trim()
    }

    pub fn identity(&self) -> Identity {
        Identity::Entry { entry_number: self.entry_number_id, bean_id: self.bean_id }
    }
}

/// `beanEntryKey.beanEntryNo` of a grid entry.
pub fn entry_number(raw: &Value) -> Result<u32> {
    let key = field(raw, "beanEntryKey", "diary entry")?;
    let n = id_field(key, "beanEntryNo", "diary entry")?;
    u32::try_from(n).map_err(|_| FoodError::malformed(format!("diary entry: entry number {n} out of range")))
}

impl Food for HistoryEntry {
    fn food_name(&self) -> &str {
        &self.name
    }
    fn amount_value(&self) -> f64 {
        self.amount.value
    }
    fn amount_unit_name(&self) -> &str {
        &self.amount.unit
    }
    fn nutrition(&self) -> &NutritionVector {
        &self.nutrition
    }
    fn dump(&self) -> &Value {
        &self.raw
    }
    /// Converted amount; a unit the table does not know keeps the site's own name.
    fn amount_display(&self) -> String {
        if self.amount.unit == LENIENT_UNIT && !self.amount_name().is_empty() {
            format!("{:.1} {}", self.amount.value, self.amount_name())
        } else {
            self.amount.display.clone()
        }
    }
}

/* ---------- totals ---------- */

/// Aggregate row of a day. Amount is fixed at 1 so that per-amount figures
/// read as plain totals. Not addressable remotely.
#[derive(Clone, Debug, PartialEq)]
pub struct Totals {
    nutrition: NutritionVector,
    raw: Value,
}

pub const TOTALS_NAME: &str = "Total";

impl Totals {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a HistoryEntry>) -> Self {
        let nutrition = NutritionVector::sum(entries.into_iter().map(|e| &e.nutrition));
        let raw = Value::Object(
            nutrition
                .iter()
                .map(|(l, v)| (s!(l), serde_json::json!(v)))
                .collect::<Map<String, Value>>(),
        );
        Self { nutrition, raw }
    }
}

impl Food for Totals {
    fn food_name(&self) -> &str {
        TOTALS_NAME
    }
    fn amount_value(&self) -> f64 {
        1.0
    }
    fn amount_unit_name(&self) -> &str {
        ""
    }
    fn nutrition(&self) -> &NutritionVector {
        &self.nutrition
    }
    fn dump(&self) -> &Value {
        &self.raw
    }
    fn amount_display(&self) -> String {
        s!()
    }
}

/* ---------- the closed set ---------- */

#[derive(Clone, Debug, PartialEq)]
pub enum FoodRecord {
    Search(SearchResult),
    History(HistoryEntry),
    Totals(Totals),
}

impl FoodRecord {
    fn inner(&self) -> &dyn Food {
        match self {
            FoodRecord::Search(r) => r,
            FoodRecord::History(r) => r,
            FoodRecord::Totals(r) => r,
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        match self {
            FoodRecord::Search(r) => Some(Identity::Bean { bean_id: r.bean_id }),
            FoodRecord::History(r) => Some(r.identity()),
            FoodRecord::Totals(_) => None,
        }
    }
}

impl Food for FoodRecord {
    fn food_name(&self) -> &str {
        self.inner().food_name()
    }
    fn amount_value(&self) -> f64 {
        self.inner().amount_value()
    }
    fn amount_unit_name(&self) -> &str {
        self.inner().amount_unit_name()
    }
    fn nutrition(&self) -> &NutritionVector {
        self.inner().nutrition()
    }
    fn dump(&self) -> &Value {
        self.inner().dump()
    }
    fn amount_display(&self) -> String {
        self.inner().amount_display()
    }
}
