// src/nutrition/metrics.rs
use super::vector::NutritionVector;
use crate::config::consts::{FIBER_KCAL_PER_G, LABEL_CALORIES, LABEL_FIBER, LABEL_PROTEIN, PROTEIN_KCAL_PER_G};

/// Calories not coming from protein or fiber.
pub fn non_protein_calories(calories: f64, protein_g: f64, fiber_g: f64) -> f64 {
    calories - protein_g * PROTEIN_KCAL_PER_G - fiber_g * FIBER_KCAL_PER_G
}

/// Energy per unit of amount. `None` for a zero or negative amount.
pub fn density(energy: f64, amount: f64) -> Option<f64> {
    (amount > 0.0).then(|| energy / amount)
}

/// Non-protein calories of a vector; `None` if any of the three inputs is missing or unknown.
pub fn vector_non_protein_calories(n: &NutritionVector) -> Option<f64> {
    Some(non_protein_calories(
        n.known(LABEL_CALORIES)?,
        n.known(LABEL_PROTEIN)?,
        n.known(LABEL_FIBER)?,
    ))
}
