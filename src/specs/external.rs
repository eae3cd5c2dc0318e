// src/specs/external.rs
//! Food data from sites other than the diary: MyFitnessPal search/detail and
//! Tesco product pages, plus conversion into a custom food.

use tracing::debug;

use super::custom_food::CustomFood;
use super::{fitnesspal, tesco};
use crate::core::Transport;
use crate::error::{FoodError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ExternalSource {
    Mfp,
    Tesco,
}

/// What a lookup asks for, once the source/url combination has been checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExternalQuery {
    Search { source: ExternalSource, name: String },
    Url { source: ExternalSource, url: String },
}

/// MyFitnessPal only searches by name; Tesco only reads product urls.
pub fn resolve_query(source: ExternalSource, name: &[String], url: Option<&str>) -> Result<ExternalQuery> {
    match (source, url) {
        (ExternalSource::Mfp, Some(_)) => Err(FoodError::Unsupported(s!("mfp lookups by url"))),
        (ExternalSource::Tesco, None) => Err(FoodError::Unsupported(s!("tesco lookups without --url"))),
        (ExternalSource::Tesco, Some(u)) => Ok(ExternalQuery::Url { source, url: s!(u) }),
        (ExternalSource::Mfp, None) => {
            let name = name.join(" ");
            if name.trim().is_empty() {
                return Err(FoodError::validation("a food name is needed to search mfp"));
            }
            Ok(ExternalQuery::Search { source, name })
        }
    }
}

/// A search hit: display name and the page that holds its details.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalHit {
    pub name: String,
    pub url: String,
    pub source: ExternalSource,
}

/// Nutrition read from an external page, in the order the page lists it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExternalFood {
    pub name: Option<String>,
    pub amount: Option<f64>,
    /// Grams the nutrient values refer to, when the page says (Tesco: 100 g).
    pub per_grams: Option<f64>,
    pub nutrients: Vec<(String, f64)>,
    pub url: Option<String>,
}

impl ExternalFood {
    /// `(key, value)` pairs for display.
    pub fn fields(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Some(n) = &self.name {
            out.push((s!("name"), n.clone()));
        }
        if let Some(a) = self.amount {
            out.push((s!("amount"), a.to_string()));
        }
        out.extend(self.nutrients.iter().map(|(k, v)| (k.clone(), v.to_string())));
        if let Some(u) = &self.url {
            out.push((s!("url"), u.clone()));
        }
        out
    }

    pub fn to_custom_food(&self) -> Result<CustomFood> {
        let name = self
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| FoodError::validation("external food has no name to create it under"))?;

        let mut food = CustomFood::named(name.trim());
        match self.per_grams {
            Some(g) => {
                food.serving1_name = Some(format!("{g} g"));
                food.serving1_weight = Some(g);
            }
            None => food.serving1_name = Some(s!("serving")),
        }

        for (label, value) in &self.nutrients {
            let Some((slot, factor)) = custom_slot(&mut food, label) else {
                debug!(label, "no custom food field for nutrient");
                continue;
            };
            *slot = Some(value * factor);
        }
        food.validate()?;
        Ok(food)
    }
}

/// Form field (and unit factor) a site's nutrient label maps to.
fn custom_slot<'a>(food: &'a mut CustomFood, label: &str) -> Option<(&'a mut Option<f64>, f64)> {
    let l = label.trim().to_lowercase();
    let slot = if l.contains("saturat") && !l.contains("unsat") {
        &mut food.sat_fat_g
    } else if l.contains("polyunsat") {
        &mut food.poly_unsat_fat_g
    } else if l.contains("monounsat") {
        &mut food.mono_unsat_fat_g
    } else if l.contains("trans") {
        &mut food.trans_fat_g
    } else if l.contains("fat") {
        &mut food.total_fat_g
    } else if l.contains("sugar") {
        &mut food.sugars_g
    } else if l.contains("carb") {
        &mut food.total_carbs_g
    } else if l.contains("fibre") || l.contains("fiber") {
        &mut food.dietary_fiber_g
    } else if l.contains("protein") {
        &mut food.protein_g
    } else if l.contains("salt") {
        return Some((&mut food.sodium_mg, 400.0));
    } else if l.contains("sodium") {
        &mut food.sodium_mg
    } else if l.contains("cholesterol") {
        &mut food.chol_mg
    } else if l.contains("potassium") {
        &mut food.potassium_mg
    } else if l == "energy" || l.contains("calorie") {
        &mut food.calories
    } else {
        return None;
    };
    Some((slot, 1.0))
}

pub fn search(t: &dyn Transport, source: ExternalSource, name: &str) -> Result<Vec<ExternalHit>> {
    match source {
        ExternalSource::Mfp => fitnesspal::search(t, name),
        ExternalSource::Tesco => Err(FoodError::Unsupported(s!("tesco search"))),
    }
}

pub fn fetch_detail(t: &dyn Transport, hit: &ExternalHit) -> Result<ExternalFood> {
    let mut food = match hit.source {
        ExternalSource::Mfp => fitnesspal::fetch_detail(t, &hit.url)?,
        ExternalSource::Tesco => tesco::fetch_product(t, &hit.url)?,
    };
    if food.name.is_none() {
        food.name = Some(hit.name.clone());
    }
    Ok(food)
}

pub fn food_from_url(t: &dyn Transport, source: ExternalSource, url: &str) -> Result<ExternalFood> {
    match source {
        ExternalSource::Tesco => tesco::fetch_product(t, url),
        ExternalSource::Mfp => Err(FoodError::Unsupported(s!("mfp lookups by url"))),
    }
}
