// src/specs/tesco.rs
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::external::ExternalFood;
use crate::core::Transport;
use crate::core::html::{attr_value, blocks, first_inner, inner, nested_blocks, open_tag};
use crate::core::sanitize::{cell_text, html_to_text};
use crate::error::{FoodError, Result};
use crate::nutrition::initial_digits;

/// Tesco lists nutrition per 100 g in the first value column.
const PER_GRAMS: f64 = 100.0;

static KCAL: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\(([0-9.]+)kcal\)").ok());

pub fn fetch_product(t: &dyn Transport, url: &str) -> Result<ExternalFood> {
    debug!(url, "fetching tesco product");
    let html = t.get(url)?;
    let mut food = parse_product_page(&html)?;
    food.url = Some(s!(url));
    Ok(food)
}

pub fn parse_product_page(html: &str) -> Result<ExternalFood> {
    let title = nested_blocks(html, "span")
        .into_iter()
        .find(|s| attr_value(open_tag(s), "data-title").as_deref() == Some("true"))
        .map(|s| html_to_text(inner(s)))
        .ok_or_else(|| FoodError::malformed("tesco page has no product title"))?;

    // "Tesco Houmous 200G" → name + pack size
    let (name, amount) = match title.rsplit_once(' ') {
        Some((n, a)) => (s!(n), initial_digits(a).parse().ok()),
        None => (title.clone(), None),
    };

    let table = blocks(html, "table")
        .into_iter()
        .find(|t| first_inner(t, "caption").map(html_to_text).as_deref() == Some("Nutrition"))
        .ok_or_else(|| FoodError::malformed("tesco page has no Nutrition table"))?;

    let rows = blocks(table, "tr");
    if rows.len() < 2 {
        return Err(FoodError::malformed("tesco Nutrition table has no body rows"));
    }

    let kcal = KCAL.as_ref().ok_or_else(|| FoodError::malformed("kcal pattern failed to compile"))?;
    let mut nutrients = Vec::new();
    // first row is the column header, last the reference intake
    for row in &rows[1..rows.len() - 1] {
        let Some(label) = first_inner(row, "th").map(cell_text) else { continue };
        let Some(per_100) = first_inner(row, "td").map(cell_text) else { continue };

        let value = if label == "Energy" {
            kcal.captures(&per_100).and_then(|c| c.get(1)).map(|m| s!(m.as_str())).unwrap_or(per_100)
        } else if per_100.starts_with('<') {
            s!("0")
        } else {
            per_100
        };
        match initial_digits(value.trim()).parse::<f64>() {
            Ok(v) => nutrients.push((label, v)),
            Err(_) => debug!(%label, %value, "no numeric value"),
        }
    }

    Ok(ExternalFood { name: Some(name), amount, per_grams: Some(PER_GRAMS), nutrients, url: None })
}
