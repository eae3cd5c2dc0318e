// src/nutrition/vector.rs
use crate::error::{FoodError, Result};

/// Sentinel recorded for a missing or empty value. Means "unknown", never zero.
pub const UNKNOWN: f64 = -1.0;

/// Nutrient label → value, in the column order the page declared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NutritionVector {
    entries: Vec<(String, f64)>,
}

impl NutritionVector {
    /// Zip `headers` against `raw_values` positionally.
    ///
    /// The two sequences must have the same length; anything else is a
    /// `SchemaDrift` error (no truncation, no padding). Empty values become
    /// [`UNKNOWN`]; thousands separators are stripped before parsing.
    pub fn build<H, V>(headers: &[H], raw_values: &[V]) -> Result<Self>
    where
        H: AsRef<str>,
        V: AsRef<str>,
    {
        if headers.len() != raw_values.len() {
            return Err(FoodError::SchemaDrift(format!(
                "{} nutrient headers but {} values",
                headers.len(),
                raw_values.len()
            )));
        }

        let entries = headers
            .iter()
            .zip(raw_values)
            .map(|(h, raw)| Ok((s!(h.as_ref()), parse_grouped(raw.as_ref())?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    /// Raw value for `label`, sentinel included. `None` when the column does not exist.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries.iter().find(|(l, _)| l == label).map(|(_, v)| *v)
    }

    /// Value for `label` only when it exists and is known.
    pub fn known(&self, label: &str) -> Option<f64> {
        self.get(label).filter(|v| !is_unknown(*v))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Column-wise sum of known values. A label with no known value in any
    /// vector stays [`UNKNOWN`]. Label order follows first appearance.
    pub fn sum<'a>(vectors: impl IntoIterator<Item = &'a NutritionVector>) -> NutritionVector {
        let mut out: Vec<(String, Option<f64>)> = Vec::new();
        for v in vectors {
            for (label, value) in v.iter() {
                let idx = match out.iter().position(|(l, _)| l == label) {
                    Some(i) => i,
                    None => {
                        out.push((s!(label), None));
                        out.len() - 1
                    }
                };
                let slot = &mut out[idx].1;
                if !is_unknown(value) {
                    *slot = Some(slot.unwrap_or(0.0) + value);
                }
            }
        }
        NutritionVector {
            entries: out.into_iter().map(|(l, v)| (l, v.unwrap_or(UNKNOWN))).collect(),
        }
    }
}

impl FromIterator<(String, f64)> for NutritionVector {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

pub fn is_unknown(v: f64) -> bool {
    v == UNKNOWN
}

/// `"1,234.5"` → 1234.5; `""` → -1.
pub fn parse_grouped(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    let text = if trimmed.is_empty() { "-1" } else { trimmed };
    text.replace(',', "")
        .parse()
        .map_err(|_| FoodError::malformed(format!("nutrient value {raw:?} is not a number")))
}

/// Header cells may carry markup such as `"Cals<br/>kcal"`; keep the text before the first line break.
pub fn normalize_header(header: &str) -> String {
    let cut = crate::core::html::to_lower(header)
        .find("<br")
        .unwrap_or(header.len());
    header[..cut].trim().to_string()
}
