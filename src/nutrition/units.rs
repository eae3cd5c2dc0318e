// src/nutrition/units.rs

/// How to turn one unit of a source unit into the canonical unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Conversion {
    pub multiplier: f64,
    pub canonical: &'static str,
}

/// Source unit suffix as the diary renders it → conversion.
pub const CONVERSIONS: &[(&str, Conversion)] = &[
    ("tbsp", Conversion { multiplier: 14.7868, canonical: "ml" }),
    ("g", Conversion { multiplier: 1.0, canonical: "g" }),
];

/// Look up `unit`. Unknown units yield `None`; the caller picks the policy.
pub fn convert(unit: &str) -> Option<Conversion> {
    CONVERSIONS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, c)| *c)
}
