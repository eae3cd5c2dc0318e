// src/specs/custom_food.rs
//! The custom food form (`customFoodUpdate.do`) as a typed schema.
//!
//! Field names on the wire are the form's own, typos included
//! (`cooperPercent`, `sorceFoodId`). Unknown keys and a missing name are
//! rejected while deserializing, so nothing invalid reaches the network.

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

use crate::core::json::text;
use crate::error::{FoodError, Result};

/// Sodium milligrams per gram of salt.
const SODIUM_MG_PER_G_SALT: f64 = 400.0;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomFood {
    pub custom_food_name: String,
    #[serde(default)]
    pub serving1_name: Option<String>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub serving1_weight: Option<f64>,
    #[serde(default, deserialize_with = "id_or_str")]
    pub food_group_id: Option<String>,

    #[serde(default, deserialize_with = "num_or_str")]
    pub calories: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub total_fat_g: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub sat_fat_g: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub poly_unsat_fat_g: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub mono_unsat_fat_g: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub trans_fat_g: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub chol_mg: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub sodium_mg: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub total_carbs_g: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub dietary_fiber_g: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub sugars_g: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub sugar_alcohol_g: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub protein_g: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub caffeine_mg: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub water_g: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub alcohol_ethyl_g: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub starch_g: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub potassium_mg: Option<f64>,

    #[serde(default, deserialize_with = "num_or_str")]
    pub vitamin_a_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub vitamin_c_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub vitamin_d_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub vitamin_b6_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub vitamin_b12_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub vitamin_e_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub vitamin_k_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub calcium_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub iron_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub thiamin_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub riboflavin_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub niacin_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub folate_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub panthothenic_acid_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub phosphorus_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub magnesium_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub zinc_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub selenium_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub cooper_percent: Option<f64>,
    #[serde(default, deserialize_with = "num_or_str")]
    pub manganese_percent: Option<f64>,

    #[serde(default, deserialize_with = "id_or_str")]
    pub custom_food_id: Option<String>,
    #[serde(default)]
    pub contributed: Option<bool>,
    #[serde(default, deserialize_with = "id_or_str")]
    pub sorce_food_id: Option<String>,
}

impl CustomFood {
    pub fn named(name: impl Into<String>) -> Self {
        Self { custom_food_name: name.into(), ..Self::default() }
    }

    /// Validate a payload that already uses the form's key names.
    pub fn from_value(v: Value) -> Result<Self> {
        let food: CustomFood =
            serde_json::from_value(v).map_err(|e| FoodError::validation(format!("custom food: {e}")))?;
        food.validate()?;
        Ok(food)
    }

    /// Read the short file format (`name`, `weight` + `unit`, `fat`, `carb`,
    /// `sugar`, `protein`, `sat`, `salt`, `per`). Form key names are accepted too.
    ///
    /// `salt` is grams of salt and becomes sodium milligrams. With `per`, every
    /// nutrient is taken as given per `per` grams and rescaled to the serving weight.
    pub fn from_file_value(v: Value) -> Result<Self> {
        let Value::Object(mut m) = v else {
            return Err(FoodError::validation("custom food file must hold a JSON object"));
        };

        rename(&mut m, "name", "customFoodName");
        rename(&mut m, "weight", "serving1Weight");
        rename(&mut m, "unit", "serving1Name");
        rename(&mut m, "fat", "totalFatG");
        rename(&mut m, "carb", "totalCarbsG");
        rename(&mut m, "sugar", "sugarsG");
        rename(&mut m, "protein", "proteinG");
        rename(&mut m, "sat", "satFatG");

        if let Some(salt) = m.remove("salt") {
            let grams = number(&salt, "salt")?;
            m.insert(s!("sodiumMg"), Value::from(grams * SODIUM_MG_PER_G_SALT));
        }
        let per = m.remove("per").map(|p| number(&p, "per")).transpose()?;

        let mut food = Self::from_value(Value::Object(m))?;
        if let Some(per) = per {
            let weight = food
                .serving1_weight
                .ok_or_else(|| FoodError::validation("`per` needs a serving weight (`weight`)"))?;
            if per <= 0.0 {
                return Err(FoodError::validation(format!("`per` must be positive, got {per}")));
            }
            food.scale_nutrients(weight / per);
        }
        Ok(food)
    }

    pub fn validate(&self) -> Result<()> {
        if self.custom_food_name.trim().is_empty() {
            return Err(FoodError::validation("custom food needs a non-empty `customFoodName`"));
        }
        if let Some(w) = self.serving1_weight {
            if !(w.is_finite() && w > 0.0) {
                return Err(FoodError::validation(format!("serving weight must be positive, got {w}")));
            }
        }
        Ok(())
    }

    pub fn scale_nutrients(&mut self, factor: f64) {
        for v in self.nutrients_mut().into_iter().flatten() {
            *v *= factor;
        }
    }

    fn nutrients_mut(&mut self) -> [&mut Option<f64>; 38] {
        [
            &mut self.calories,
            &mut self.total_fat_g,
            &mut self.sat_fat_g,
            &mut self.poly_unsat_fat_g,
            &mut self.mono_unsat_fat_g,
            &mut self.trans_fat_g,
            &mut self.chol_mg,
            &mut self.sodium_mg,
            &mut self.total_carbs_g,
            &mut self.dietary_fiber_g,
            &mut self.sugars_g,
            &mut self.sugar_alcohol_g,
            &mut self.protein_g,
            &mut self.caffeine_mg,
            &mut self.water_g,
            &mut self.alcohol_ethyl_g,
            &mut self.starch_g,
            &mut self.potassium_mg,
            &mut self.vitamin_a_percent,
            &mut self.vitamin_c_percent,
            &mut self.vitamin_d_percent,
            &mut self.vitamin_b6_percent,
            &mut self.vitamin_b12_percent,
            &mut self.vitamin_e_percent,
            &mut self.vitamin_k_percent,
            &mut self.calcium_percent,
            &mut self.iron_percent,
            &mut self.thiamin_percent,
            &mut self.riboflavin_percent,
            &mut self.niacin_percent,
            &mut self.folate_percent,
            &mut self.panthothenic_acid_percent,
            &mut self.phosphorus_percent,
            &mut self.magnesium_percent,
            &mut self.zinc_percent,
            &mut self.selenium_percent,
            &mut self.cooper_percent,
            &mut self.manganese_percent,
        ]
    }

    /// Every form key, absent values sent as empty strings.
    pub fn to_form(&self) -> Result<Vec<(String, String)>> {
        let Value::Object(m) = serde_json::to_value(self)? else {
            return Err(FoodError::malformed("custom food did not serialize to an object"));
        };
        Ok(m.into_iter().map(|(k, v)| (k, text(&v))).collect())
    }
}

fn rename(m: &mut Map<String, Value>, from: &str, to: &str) {
    if let Some(v) = m.remove(from) {
        m.insert(s!(to), v);
    }
}

fn number(v: &Value, key: &str) -> Result<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| FoodError::validation(format!("`{key}` must be a number, got {v}")))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Num(f64),
    Str(String),
}

fn num_or_str<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<f64>, D::Error> {
    match Option::<NumOrStr>::deserialize(d)? {
        None => Ok(None),
        Some(NumOrStr::Num(n)) => Ok(Some(n)),
        Some(NumOrStr::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(NumOrStr::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected a number, got {s:?}"))),
    }
}

fn id_or_str<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.map(|v| text(&v)).filter(|s| !s.is_empty()))
}
