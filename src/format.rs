// src/format.rs
//! Human-readable output for the `items`, `food` and `ext-food` commands.

use crate::config::consts::{LABEL_CALORIES, LABEL_CARBS, LABEL_FAT, LABEL_FIBER, LABEL_PROTEIN};
use crate::csv::row_to_line;
use crate::nutrition::amount::format_number;
use crate::nutrition::metrics::{density, vector_non_protein_calories};
use crate::nutrition::vector::is_unknown;
use crate::nutrition::{Food, SearchResult};
use crate::specs::external::ExternalFood;

const COLUMN_SEP: char = ':';
const UNKNOWN: &str = "?";

const COLUMNS: [&str; 10] = [
    "name",
    "amount",
    "calories",
    "non-protein calories",
    "energy_calorie_density",
    "carbs",
    "fat",
    "protein",
    "fiber",
    "density",
];

/// Colon-separated diary listing. The header line comes out with the first row only.
pub struct EntryFormatter {
    name_width: usize,
    amount_width: usize,
    header_done: bool,
}

impl EntryFormatter {
    /// Column widths are fitted to `entries`.
    pub fn new<F: Food>(entries: &[F]) -> Self {
        Self {
            name_width: entries.iter().map(|e| e.food_name().chars().count()).max().unwrap_or(0),
            amount_width: entries.iter().map(|e| e.amount_display().chars().count()).max().unwrap_or(0),
            header_done: false,
        }
    }

    pub fn format_row(&mut self, entry: &dyn Food) -> String {
        let n = entry.nutrition();
        let amount = entry.amount_value();
        let calories = n.known(LABEL_CALORIES);
        let non_protein = vector_non_protein_calories(n);

        let cells = [
            format!("{:<w$}", entry.food_name(), w = self.name_width),
            format!("{:<w$}", entry.amount_display(), w = self.amount_width),
            cell(calories, 8, 0),
            cell(non_protein, 5, 1),
            cell(non_protein.and_then(|e| density(e, amount)), 5, 1),
            cell(n.known(LABEL_CARBS), 5, 1),
            cell(n.known(LABEL_FAT), 5, 1),
            cell(n.known(LABEL_PROTEIN), 5, 1),
            cell(n.known(LABEL_FIBER), 5, 1),
            cell(calories.and_then(|c| density(c, amount)), 5, 1),
        ];

        let row = row_to_line(&cells, COLUMN_SEP);
        if self.header_done {
            row
        } else {
            self.header_done = true;
            format!("{}\n{row}", row_to_line(&COLUMNS, COLUMN_SEP))
        }
    }
}

fn cell(v: Option<f64>, width: usize, precision: usize) -> String {
    match v {
        Some(v) => format!("{v:>width$.precision$}"),
        None => format!("{UNKNOWN:>width$}"),
    }
}

/// `<name> (per 100 grams) (serving cup: 81g)`, plus calories with `detail`
/// or every nutrient (largest first) with `all`.
pub fn format_search_result(r: &SearchResult, detail: bool, all: bool) -> String {
    let per = if r.is_gramless() { s!(r.amount_unit_name()) } else { s!("100 grams") };
    let serving = match r.default_serving() {
        Some(s) if !r.is_gramless() => match s.gram_weight {
            Some(g) => format!("{}: {}g", s.desc, format_number(g)),
            None => s.desc.clone(),
        },
        Some(s) => s.desc.clone(),
        None => s!(),
    };

    let mut lines = vec![format!("{} (per {per}) (serving {serving})", r.food_name())];
    if all {
        let mut details: Vec<_> = r.nutrient_details().collect();
        details.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (desc, value, units) in details {
            lines.push(format!("    {desc} {}{units}", value_text(value)));
        }
    } else if detail {
        if let Some(c) = r.nutrition().get("Calories") {
            lines.push(format!("    Calories: {}", value_text(c)));
        }
    }
    lines.join("\n")
}

fn value_text(v: f64) -> String {
    if is_unknown(v) { s!(UNKNOWN) } else { format_number(v) }
}

pub fn format_external(food: &ExternalFood) -> String {
    food.fields()
        .into_iter()
        .map(|(k, v)| format!("    {k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}
