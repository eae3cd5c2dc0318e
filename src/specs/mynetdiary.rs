// src/specs/mynetdiary.rs
//! MyNetDiary endpoints: log-on, day grid, saves, food search, custom foods,
//! the per-day nutrition report and the daily weight.
//!
//! Fetchers take a `&dyn Transport`; the matching `parse_*` functions are pure
//! and work on captured page text.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use super::custom_food::CustomFood;
use crate::config::consts::*;
use crate::config::credentials::Credentials;
use crate::core::embedded::extract_embedded_json;
use crate::core::html::{attr_value, blocks, find_block_with_attr, inner, next_block, open_tag};
use crate::core::net::{FORM_CONTENT_TYPE, Transport};
use crate::core::sanitize::cell_text;
use crate::diary::{DayGrid, SavePayload};
use crate::error::{FoodError, Result};
use crate::nutrition::{SearchResult, UnitPolicy};
use crate::report::{ReportPage, WeightRecord, parse_weight};

pub fn url(path: &str) -> String {
    join!(BASE_URL, path)
}

fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn logon(t: &dyn Transport, creds: &Credentials) -> Result<()> {
    debug!(user = %creds.username, "logging on");
    t.post_form(
        &url(LOGON_PATH),
        &[("logonName", creds.username.clone()), ("password", creds.password.clone())],
    )?;
    Ok(())
}

/* ---------- day grid ---------- */

pub fn fetch_day_grid(t: &dyn Transport, date: NaiveDate, policy: UnitPolicy) -> Result<DayGrid> {
    debug!(%date, "fetching day grid");
    let page = t.get(&format!("{}?date={}", url(DAILY_PATH), compact_date(date)))?;
    parse_day_grid(&page, date, policy)
}

pub fn parse_day_grid(page: &str, date: NaiveDate, policy: UnitPolicy) -> Result<DayGrid> {
    let raw = extract_embedded_json(page, FOOD_GRID_VAR)?;
    DayGrid::from_json(date, raw, policy)
}

/// Submit a planned add or delete. The body is JSON even though the
/// endpoint insists on a form content type.
pub fn save_entry(t: &dyn Transport, payload: &SavePayload) -> Result<()> {
    let body = payload.to_body()?;
    debug!(%body, "saving entry");
    t.post_body(&url(FOOD_SAVE_PATH), body, FORM_CONTENT_TYPE)?;
    Ok(())
}

/* ---------- search ---------- */

/// One page of `findFoods.do` results.
#[derive(Clone, Debug)]
pub struct SearchPage {
    pub number: u32,
    pub entries: Vec<Value>,
    pub raw: Value,
}

impl SearchPage {
    pub fn results(&self) -> impl Iterator<Item = Result<SearchResult>> + '_ {
        self.entries.iter().cloned().map(SearchResult::from_json)
    }
}

/// Strip the `OK` marker the endpoint puts in front of its JSON.
pub fn parse_search_response(text: &str, number: u32) -> Result<SearchPage> {
    if !text.starts_with(SEARCH_OK_MARKER) {
        let head: String = text.chars().take(40).collect();
        return Err(FoodError::malformed(format!("search page {number} does not start with OK: {head:?}")));
    }
    let json = text
        .get(SEARCH_PREFIX_LEN..)
        .ok_or_else(|| FoodError::malformed(format!("search page {number} is truncated")))?;
    let raw: Value = serde_json::from_str(json)
        .map_err(|e| FoodError::malformed(format!("search page {number} is not JSON: {e}")))?;
    let entries = match raw.get("entries") {
        Some(Value::Array(a)) => a.clone(),
        None | Some(Value::Null) => Vec::new(),
        Some(other) => {
            return Err(FoodError::malformed(format!("search page {number}: `entries` is {other}")));
        }
    };
    Ok(SearchPage { number, entries, raw })
}

/// Forward-only pages of a food search, fetched on demand.
///
/// Ends before the first page without entries, and after the first error.
pub struct SearchPages<'a> {
    t: &'a dyn Transport,
    query: String,
    next_page: u32,
    done: bool,
}

impl<'a> SearchPages<'a> {
    pub fn new(t: &'a dyn Transport, query: impl Into<String>) -> Self {
        Self { t, query: query.into(), next_page: 1, done: false }
    }

    fn fetch(&self, number: u32) -> Result<SearchPage> {
        debug!(query = %self.query, page = number, "searching foods");
        let text = self.t.post_form(
            &url(FIND_FOODS_PATH),
            &[
                ("beanInputString", self.query.clone()),
                ("pageNumber", number.to_string()),
                ("pageSize", SEARCH_PAGE_SIZE.to_string()),
                ("highlightedTermClassName", s!("sughtrm")),
                ("detailsExpected", s!("true")),
            ],
        )?;
        parse_search_response(&text, number)
    }
}

impl Iterator for SearchPages<'_> {
    type Item = Result<SearchPage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let number = self.next_page;
        self.next_page += 1;
        match self.fetch(number) {
            Ok(page) if page.entries.is_empty() => {
                self.done = true;
                None
            }
            Ok(page) => Some(Ok(page)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/* ---------- custom foods ---------- */

pub fn create_food(t: &dyn Transport, food: &CustomFood) -> Result<()> {
    food.validate()?;
    let form = food.to_form()?;
    let pairs: Vec<(&str, String)> = form.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
    debug!(name = %food.custom_food_name, "creating custom food");
    t.post_form(&url(CUSTOM_FOOD_PATH), &pairs)?;
    Ok(())
}

pub fn retire_food(t: &dyn Transport, bean_id: i64) -> Result<()> {
    debug!(bean_id, "retiring food");
    t.post_form(&url(RETIRE_FOOD_PATH), &[("value", bean_id.to_string())])?;
    Ok(())
}

/* ---------- nutrition report ---------- */

pub fn fetch_report_page(t: &dyn Transport, date: NaiveDate) -> Result<ReportPage> {
    debug!(%date, "fetching nutrition report");
    let day = iso_date(date);
    let html = t.post_form(
        &url(REPORT_PATH),
        &[
            ("personUserId", s!()),
            ("period", s!("periodCustom")),
            ("periodFake", s!("period7d")),
            ("details", s!("allFoods")),
            ("nutrients", s!("allNutrients")),
            ("navigation", s!("blah")),
            ("startDate", day.clone()),
            ("endDate", day),
        ],
    )?;
    parse_report_page(&html, date)
}

/// Read `<table class="report">`: nutrient headers from the `title` of each
/// `thead` cell (minus the `" column"` suffix), one row per body `tr`.
pub fn parse_report_page(html: &str, date: NaiveDate) -> Result<ReportPage> {
    let table = find_block_with_attr(html, "table", "class", "report")
        .ok_or_else(|| FoodError::malformed(format!("no report table for {date}")))?;
    let body_markup = inner(table);

    let mut headers: Vec<String> = REPORT_FIXED_HEADERS.iter().map(|h| s!(*h)).collect();
    let body = match next_block(body_markup, "thead", 0) {
        Some((b, e)) => {
            headers.extend(
                blocks(&body_markup[b..e], "td")
                    .into_iter()
                    .filter_map(|td| attr_value(open_tag(td), "title"))
                    .map(|title| title.replace(" column", "")),
            );
            &body_markup[e..]
        }
        None => {
            return Err(FoodError::malformed(format!("report table for {date} has no header row")));
        }
    };

    let rows = blocks(body, "tr")
        .into_iter()
        .map(|tr| blocks(tr, "td").into_iter().map(|td| cell_text(inner(td))).collect())
        .collect();

    Ok(ReportPage { date, headers, rows })
}

/* ---------- weight ---------- */

pub fn fetch_weight(t: &dyn Transport, date: NaiveDate) -> Result<Option<WeightRecord>> {
    debug!(%date, "fetching weight");
    let page = t.get(&format!("{}?date={}", url(DAILY_DETAILS_PATH), compact_date(date)))?;
    parse_weight_page(&page, date)
}

pub fn parse_weight_page(page: &str, date: NaiveDate) -> Result<Option<WeightRecord>> {
    let measurements = extract_embedded_json(page, MEASUREMENTS_VAR)?;
    let weight = parse_weight(&measurements, date)?;
    if weight.is_none() {
        debug!(%date, "no weight logged");
    }
    Ok(weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 6, 1).unwrap()
    }

    const REPORT: &str = r#"<html><body>
<table class="report">
  <thead><tr><td>Food</td><td title="Calories column">Cals</td><td title="Fat column">Fat</td></tr></thead>
  <tbody>
    <tr><td>Breakfast</td></tr>
    <tr><td>Oats&nbsp;</td><td>1 cup</td><td>81g</td><td>307</td><td>5</td></tr>
    <tr><td>Averages over the period</td><td>307</td><td>5</td></tr>
  </tbody>
</table></body></html>"#;

    #[test]
    fn report_headers_and_rows() {
        let page = parse_report_page(REPORT, day()).unwrap();
        assert_eq!(page.headers, vec!["date", "food", "serving", "amount", "Calories", "Fat"]);
        assert_eq!(page.rows.len(), 3);
        assert_eq!(page.rows[1], vec!["Oats", "1 cup", "81g", "307", "5"]);
    }

    #[test]
    fn missing_report_table_is_malformed() {
        let err = parse_report_page("<table class=\"other\"></table>", day()).unwrap_err();
        assert!(matches!(err, FoodError::MalformedResponse(_)));
    }

    #[test]
    fn search_response_needs_ok_marker() {
        let page = parse_search_response("OK `+`json {\"entries\": [{\"beanId\": 1}]}", 1).unwrap();
        assert_eq!(page.entries.len(), 1);
        assert!(parse_search_response("<html>login</html>", 1).is_err());
    }

    #[test]
    fn search_page_without_entries_is_empty() {
        let page = parse_search_response("OK `+`json {}", 3).unwrap();
        assert!(page.entries.is_empty());
    }

    #[test]
    fn weight_from_details_page() {
        let html = "<script>var measurementsPM = [{\"measurementId\":40,\"currentValue\":\"80.1kg\"}];</script>";
        let w = parse_weight_page(html, day()).unwrap().unwrap();
        assert_eq!(w.value, "80.1");
    }

    #[test]
    fn day_without_weight_is_not_an_error() {
        let html = "<script>var measurementsPM = [{\"measurementId\":12,\"currentValue\":\"7h\"}];</script>";
        assert!(parse_weight_page(html, day()).unwrap().is_none());
    }

    #[test]
    fn urls_join_base() {
        assert_eq!(url(DAILY_PATH), "https://www.mynetdiary.com/daily.do");
    }
}
