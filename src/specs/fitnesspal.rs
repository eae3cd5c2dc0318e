// src/specs/fitnesspal.rs
use tracing::debug;

use super::external::{ExternalFood, ExternalHit, ExternalSource};
use crate::config::consts::{MFP_BASE_URL, MFP_SEARCH_PATH};
use crate::core::Transport;
use crate::core::html::{attr_value, blocks, find_block_with_attr, inner, nested_blocks, open_tag};
use crate::core::sanitize::{cell_text, html_to_text};
use crate::error::{FoodError, Result};
use crate::nutrition::initial_digits;

pub fn search(t: &dyn Transport, name: &str) -> Result<Vec<ExternalHit>> {
    debug!(name, "searching myfitnesspal");
    let html = t.post_form(
        &join!(MFP_BASE_URL, MFP_SEARCH_PATH),
        &[("search", s!(name)), ("commit", s!("Search"))],
    )?;
    parse_search_page(&html)
}

/// Each `div.food_description` holds the food link first and the brand link second.
pub fn parse_search_page(html: &str) -> Result<Vec<ExternalHit>> {
    let mut hits = Vec::new();
    for desc in divs_with_class(html, "food_description") {
        let links = blocks(desc, "a");
        let Some(link) = links.first() else {
            return Err(FoodError::malformed("food_description without a link"));
        };
        let href = attr_value(open_tag(link), "href")
            .ok_or_else(|| FoodError::malformed("food link without href"))?;
        let name = html_to_text(inner(link));
        let name = match links.get(1) {
            Some(brand) => format!("{name}:{}", html_to_text(inner(brand))),
            None => name,
        };
        let url = if href.starts_with("http") { href } else { join!(MFP_BASE_URL, &href) };
        hits.push(ExternalHit { name, url, source: ExternalSource::Mfp });
    }
    Ok(hits)
}

/// Every `<div class="...">` block, nested ones included. A block ends at the
/// first `</div>`, so only leaf divs come back whole.
fn divs_with_class<'a>(html: &'a str, class: &str) -> Vec<&'a str> {
    nested_blocks(html, "div")
        .into_iter()
        .filter(|block| attr_value(open_tag(block), "class").as_deref() == Some(class))
        .collect()
}

pub fn fetch_detail(t: &dyn Transport, url: &str) -> Result<ExternalFood> {
    debug!(url, "fetching myfitnesspal detail");
    let html = t.get(url)?;
    parse_detail_page(&html, url)
}

/// `table#nutrition-facts` lays label/value pairs side by side, two per row.
pub fn parse_detail_page(html: &str, url: &str) -> Result<ExternalFood> {
    let table = find_block_with_attr(html, "table", "id", "nutrition-facts")
        .ok_or_else(|| FoodError::malformed(format!("no nutrition facts table at {url}")))?;

    let mut nutrients = Vec::new();
    for tr in blocks(table, "tr") {
        let cells: Vec<String> = blocks(tr, "td").into_iter().map(|td| cell_text(inner(td))).collect();
        for pair in cells.chunks_exact(2) {
            let (label, value) = (pair[0].trim(), pair[1].replace(',', ""));
            if label.is_empty() {
                continue;
            }
            match initial_digits(value.trim()).parse::<f64>() {
                Ok(v) => nutrients.push((s!(label), v)),
                Err(_) => debug!(%label, %value, "no numeric value"),
            }
        }
    }

    Ok(ExternalFood { nutrients, url: Some(s!(url)), ..ExternalFood::default() })
}
