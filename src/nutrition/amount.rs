// src/nutrition/amount.rs
use tracing::warn;

use super::units::{self, Conversion};
use crate::error::{FoodError, Result};

/// What to do with a unit suffix missing from the conversion table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnitPolicy {
    /// Unknown suffix is an error. For contexts that must not misread a new unit.
    Strict,
    /// Unknown suffix reads as multiplier 1 and label `"unit"`, with a warning.
    #[default]
    Lenient,
}

/// Label given to a suffix the table does not know, under [`UnitPolicy::Lenient`].
pub const LENIENT_UNIT: &str = "unit";

const LENIENT_FALLBACK: Conversion = Conversion { multiplier: 1.0, canonical: LENIENT_UNIT };

/// A resolved-amount string after unit conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedAmount {
    /// Quantity in `unit`.
    pub value: f64,
    /// Canonical unit (`"ml"`, `"g"`, or `"unit"` under the lenient fallback).
    pub unit: String,
    /// Suffix exactly as it appeared after the number (`"tbsp"`).
    pub suffix: String,
    /// `"{value:.1} {unit}"`.
    pub display: String,
}

/// Parse `"14.7868tbsp"`-style strings: a numeric literal (digits, at most one `.`)
/// immediately followed by a unit suffix.
pub fn parse_amount(resolved: &str, policy: UnitPolicy) -> Result<ParsedAmount> {
    let number = numeric_prefix(resolved);
    let quantity: f64 = number.parse().map_err(|_| {
        FoodError::malformed(format!("no numeric quantity at the start of amount {resolved:?}"))
    })?;
    let suffix = resolved[number.len()..].trim();

    let conv = match (units::convert(suffix), policy) {
        (Some(c), _) => c,
        (None, UnitPolicy::Strict) => {
            return Err(FoodError::UnknownUnit { unit: s!(suffix), amount: s!(resolved) });
        }
        (None, UnitPolicy::Lenient) => {
            warn!(unit = suffix, amount = resolved, "unknown unit, reading it as 1:1 \"unit\"");
            LENIENT_FALLBACK
        }
    };

    let value = quantity * conv.multiplier;
    Ok(ParsedAmount {
        value,
        unit: s!(conv.canonical),
        suffix: s!(suffix),
        display: format!("{value:.1} {}", conv.canonical),
    })
}

/// Leading run of digits and dots (`"240kcal"` → `"240"`). Never fails;
/// an empty result means "no numeric value present".
pub fn initial_digits(s: &str) -> String {
    s.chars().take_while(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// Leading numeric literal: digits with at most one `.`.
fn numeric_prefix(s: &str) -> &str {
    let mut seen_dot = false;
    let end = s
        .char_indices()
        .find(|&(_, c)| match c {
            '0'..='9' => false,
            '.' if !seen_dot => {
                seen_dot = true;
                false
            }
            _ => true,
        })
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    &s[..end]
}

/// Unit side of a caller-supplied amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AmountUnit {
    Grams,
    /// A named serving of the food; `None` picks the food's default serving.
    Serving(Option<String>),
}

/// Quantity the user wants to log. `number` is finite and non-negative.
#[derive(Clone, Debug, PartialEq)]
pub struct Amount {
    number: f64,
    unit: AmountUnit,
}

impl Amount {
    pub fn new(number: f64, unit: AmountUnit) -> Result<Self> {
        if !number.is_finite() || number < 0.0 {
            return Err(FoodError::validation(format!("amount must be a non-negative number, got {number}")));
        }
        Ok(Self { number, unit })
    }

    pub fn grams(number: f64) -> Result<Self> {
        Self::new(number, AmountUnit::Grams)
    }

    pub fn servings(number: f64, serving: Option<String>) -> Result<Self> {
        Self::new(number, AmountUnit::Serving(serving))
    }

    pub fn number(&self) -> f64 {
        self.number
    }

    pub fn unit(&self) -> &AmountUnit {
        &self.unit
    }

    pub fn is_grams(&self) -> bool {
        self.unit == AmountUnit::Grams
    }

    /// The bare number as the remote form expects it (`150`, `12.5`).
    pub fn number_string(&self) -> String {
        format_number(self.number)
    }
}

pub fn format_number(n: f64) -> String {
    format!("{n}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::units::CONVERSIONS;

    #[test]
    fn tablespoons_become_millilitres() {
        let a = parse_amount("3tbsp", UnitPolicy::Strict).unwrap();
        assert!((a.value - 3.0 * 14.7868).abs() < 1e-9);
        assert_eq!(a.unit, "ml");
        assert_eq!(a.suffix, "tbsp");
        assert_eq!(a.display, "44.4 ml");
    }

    #[test]
    fn every_table_unit_round_trips() {
        for (name, conv) in CONVERSIONS {
            for n in [0.0, 1.0, 2.5, 14.7868, 100.0] {
                let parsed = parse_amount(&format!("{n}{name}"), UnitPolicy::Strict).unwrap();
                assert!((parsed.value - n * conv.multiplier).abs() < 1e-9, "{n}{name}");
                assert_eq!(parsed.unit, conv.canonical);
            }
        }
    }

    #[test]
    fn strict_rejects_unknown_units() {
        let err = parse_amount("2slice", UnitPolicy::Strict).unwrap_err();
        assert!(matches!(err, FoodError::UnknownUnit { ref unit, .. } if unit == "slice"));
    }

    #[test]
    fn lenient_defaults_unknown_units() {
        let a = parse_amount("2slice", UnitPolicy::Lenient).unwrap();
        assert_eq!(a.value, 2.0);
        assert_eq!(a.unit, "unit");
        assert_eq!(a.display, "2.0 unit");
    }

    #[test]
    fn number_stops_at_second_dot() {
        let a = parse_amount("1.5.g", UnitPolicy::Lenient).unwrap();
        assert_eq!(a.value, 1.5);
        assert_eq!(a.suffix, ".g");
    }

    #[test]
    fn missing_number_is_malformed() {
        assert!(matches!(parse_amount("tbsp", UnitPolicy::Lenient), Err(FoodError::MalformedResponse(_))));
    }

    #[test]
    fn initial_digits_cases() {
        assert_eq!(initial_digits("240kcal"), "240");
        assert_eq!(initial_digits("12.5g"), "12.5");
        assert_eq!(initial_digits("abc"), "");
        assert_eq!(initial_digits(""), "");
    }

    #[test]
    fn amounts_must_be_non_negative() {
        assert!(Amount::grams(-1.0).is_err());
        assert!(Amount::grams(f64::NAN).is_err());
        let a = Amount::grams(150.0).unwrap();
        assert!(a.is_grams());
        assert_eq!(a.number_string(), "150");
        assert!(!Amount::servings(2.0, None).unwrap().is_grams());
    }
}
