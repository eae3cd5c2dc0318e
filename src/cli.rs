// src/cli.rs
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::config::options::{AppOptions, HistoryOptions, default_config_dir};
use crate::error::{FoodError, Result};
use crate::nutrition::UnitPolicy;
use crate::progress::LogProgress;
use crate::runner::{self, AppContext, ExtFoodArgs, FoodArgs, ItemsArgs};
use crate::specs::custom_food::CustomFood;
use crate::specs::external::ExternalSource;

#[derive(Parser, Debug)]
#[command(name = "foodcli", version, about = "Search, log and export food diary data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print debug output (HTTP requests included)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration directory holding credentials.yaml
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Fail on amount units missing from the conversion table
    #[arg(long, global = true)]
    pub strict_units: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export weight and nutrition history to CSV
    History {
        /// Fetch information from this date
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        weights_out: Option<PathBuf>,
        #[arg(long)]
        nutrition_out: Option<PathBuf>,
    },

    /// Show what you have eaten on a day
    Items {
        /// Show items for this day (default today)
        #[arg(long)]
        day: Option<NaiveDate>,
        /// Show raw data
        #[arg(long)]
        raw: bool,
        /// Select this index
        #[arg(long)]
        index: Option<usize>,
        /// Delete the selected item
        #[arg(long, requires = "index")]
        delete: bool,
    },

    /// Search foods and add them
    Food {
        /// Substring of the food you want to search
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
        /// Output raw json
        #[arg(long)]
        raw: bool,
        /// Only show this item
        #[arg(long)]
        index: Option<usize>,
        /// Output information about foods
        #[arg(long)]
        detail: bool,
        /// Output all nutritional information
        #[arg(long)]
        all: bool,
        /// Add this many grams (or servings, with --serving) of the selected food
        #[arg(long, requires = "index")]
        add: Option<f64>,
        /// Count --add in servings; without a name the default serving is used
        #[arg(long, num_args = 0..=1, requires = "add")]
        serving: Option<Option<String>>,
        /// Day to add to (default today)
        #[arg(long)]
        day: Option<NaiveDate>,
        /// Retire the selected food
        #[arg(long, requires = "index", conflicts_with = "add")]
        delete: bool,
    },

    /// Look up foods from another source
    ExtFood {
        /// Source of food information
        #[arg(value_enum)]
        source: ExternalSource,
        /// Name of the food
        name: Vec<String>,
        /// Only show item with this index
        #[arg(long)]
        index: Option<usize>,
        /// Show details about food
        #[arg(long)]
        detail: bool,
        /// Get the food for this url
        #[arg(long)]
        url: Option<String>,
        /// Create a new food from this item
        #[arg(long)]
        create: bool,
    },

    /// Create a new food
    New(NewFood),
}

#[derive(Args, Debug, Default)]
pub struct NewFood {
    /// Read food information from this JSON file
    #[arg(long, conflicts_with = "name")]
    pub file: Option<PathBuf>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub serving_name: Option<String>,
    /// Grams in one serving
    #[arg(long)]
    pub serving_weight: Option<f64>,
    #[arg(long)]
    pub calories: Option<f64>,
    /// Grams of fat
    #[arg(long)]
    pub fat: Option<f64>,
    /// Grams of saturated fat
    #[arg(long)]
    pub saturates: Option<f64>,
    /// Grams of polyunsaturated fat
    #[arg(long = "poly-un")]
    pub poly_un: Option<f64>,
    /// Grams of monounsaturated fat
    #[arg(long = "mono-un")]
    pub mono_un: Option<f64>,
    /// Grams of trans fats
    #[arg(long)]
    pub trans: Option<f64>,
    /// Milligrams of cholesterol
    #[arg(long)]
    pub chol: Option<f64>,
    /// Milligrams of sodium
    #[arg(long)]
    pub sodium: Option<f64>,
    /// Grams of carbohydrate
    #[arg(long)]
    pub carbs: Option<f64>,
    /// Grams of fibre
    #[arg(long)]
    pub fibre: Option<f64>,
    /// Grams of sugar
    #[arg(long)]
    pub sugar: Option<f64>,
    /// Grams of alcohol
    #[arg(long)]
    pub alcohol: Option<f64>,
    /// Grams of protein
    #[arg(long)]
    pub protein: Option<f64>,
    /// Grams of starch
    #[arg(long)]
    pub starch: Option<f64>,
    /// Milligrams of caffeine
    #[arg(long)]
    pub caffeine: Option<f64>,
    /// Milligrams of potassium
    #[arg(long)]
    pub potassium: Option<f64>,

    #[command(flatten)]
    pub percent: PercentRda,
}

/// Vitamins and minerals as a percentage of the recommended daily amount.
#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Percentage RDA")]
pub struct PercentRda {
    #[arg(long = "percent-a", alias = "percent-A")]
    pub vitamin_a: Option<f64>,
    #[arg(long = "percent-b6", alias = "percent-B6")]
    pub vitamin_b6: Option<f64>,
    #[arg(long = "percent-b12", alias = "percent-B12")]
    pub vitamin_b12: Option<f64>,
    #[arg(long = "percent-c", alias = "percent-C")]
    pub vitamin_c: Option<f64>,
    #[arg(long = "percent-d", alias = "percent-D")]
    pub vitamin_d: Option<f64>,
    #[arg(long = "percent-e", alias = "percent-E")]
    pub vitamin_e: Option<f64>,
    #[arg(long = "percent-k", alias = "percent-K")]
    pub vitamin_k: Option<f64>,
    #[arg(long = "percent-calcium")]
    pub calcium: Option<f64>,
    #[arg(long = "percent-iron")]
    pub iron: Option<f64>,
    #[arg(long = "percent-thiamin")]
    pub thiamin: Option<f64>,
    #[arg(long = "percent-riboflavin")]
    pub riboflavin: Option<f64>,
    #[arg(long = "percent-niacin")]
    pub niacin: Option<f64>,
    #[arg(long = "percent-folate")]
    pub folate: Option<f64>,
    /// Pantothenic acid
    #[arg(long = "percent-pan")]
    pub pantothenic_acid: Option<f64>,
    #[arg(long = "percent-phosphorus")]
    pub phosphorus: Option<f64>,
    #[arg(long = "percent-magnesium", alias = "percent-magneisium")]
    pub magnesium: Option<f64>,
    #[arg(long = "percent-zinc")]
    pub zinc: Option<f64>,
    #[arg(long = "percent-selenium")]
    pub selenium: Option<f64>,
    #[arg(long = "percent-copper")]
    pub copper: Option<f64>,
    #[arg(long = "percent-manganese")]
    pub manganese: Option<f64>,
}

impl NewFood {
    pub fn into_custom_food(self) -> Result<CustomFood> {
        if let Some(path) = &self.file {
            return runner::load_custom_food(path);
        }
        let name = self.name.ok_or_else(|| FoodError::validation("new food needs --name or --file"))?;
        let pct = self.percent;
        let food = CustomFood {
            serving1_name: self.serving_name,
            serving1_weight: self.serving_weight,
            calories: self.calories,
            total_fat_g: self.fat,
            sat_fat_g: self.saturates,
            poly_unsat_fat_g: self.poly_un,
            mono_unsat_fat_g: self.mono_un,
            trans_fat_g: self.trans,
            chol_mg: self.chol,
            sodium_mg: self.sodium,
            total_carbs_g: self.carbs,
            dietary_fiber_g: self.fibre,
            sugars_g: self.sugar,
            alcohol_ethyl_g: self.alcohol,
            protein_g: self.protein,
            starch_g: self.starch,
            caffeine_mg: self.caffeine,
            potassium_mg: self.potassium,
            vitamin_a_percent: pct.vitamin_a,
            vitamin_b6_percent: pct.vitamin_b6,
            vitamin_b12_percent: pct.vitamin_b12,
            vitamin_c_percent: pct.vitamin_c,
            vitamin_d_percent: pct.vitamin_d,
            vitamin_e_percent: pct.vitamin_e,
            vitamin_k_percent: pct.vitamin_k,
            calcium_percent: pct.calcium,
            iron_percent: pct.iron,
            thiamin_percent: pct.thiamin,
            riboflavin_percent: pct.riboflavin,
            niacin_percent: pct.niacin,
            folate_percent: pct.folate,
            panthothenic_acid_percent: pct.pantothenic_acid,
            phosphorus_percent: pct.phosphorus,
            magnesium_percent: pct.magnesium,
            zinc_percent: pct.zinc,
            selenium_percent: pct.selenium,
            cooper_percent: pct.copper,
            manganese_percent: pct.manganese,
            ..CustomFood::named(name)
        };
        food.validate()?;
        Ok(food)
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::log::init(cli.debug);

    let options = AppOptions {
        config_dir: cli.config_dir.clone().unwrap_or_else(default_config_dir),
        debug: cli.debug,
        unit_policy: if cli.strict_units { UnitPolicy::Strict } else { UnitPolicy::Lenient },
    };
    let ctx = AppContext::new(options)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match dispatch(&ctx, cli.command, &mut out).and_then(|_| out.flush().map_err(FoodError::from)) {
        // stdout closed early (e.g. piped into `head`)
        Err(e) if e.is_broken_pipe() => Ok(()),
        other => other,
    }
}

pub fn dispatch(ctx: &AppContext, command: Command, out: &mut dyn Write) -> Result<()> {
    let today = ctx.today;
    match command {
        Command::History { start_date, weights_out, nutrition_out } => {
            let defaults = HistoryOptions::default();
            let opts = HistoryOptions {
                start: start_date.unwrap_or(defaults.start),
                weights_out: weights_out.unwrap_or(defaults.weights_out),
                nutrition_out: nutrition_out.unwrap_or(defaults.nutrition_out),
            };
            let summary = runner::history(ctx, &opts, &mut LogProgress::new(30))?;
            for path in &summary.files_written {
                eprintln!("wrote {}", path.display());
            }
            Ok(())
        }
        Command::Items { day, raw, index, delete } => {
            let args = ItemsArgs { day: day.unwrap_or(today), raw, index, delete };
            runner::items(ctx, &args, out)
        }
        Command::Food { name, raw, index, detail, all, add, serving, day, delete } => {
            let args = FoodArgs {
                name: name.join(" "),
                raw,
                index,
                detail,
                all,
                add,
                serving,
                day: day.unwrap_or(today),
                delete,
            };
            runner::food(ctx, &args, out)
        }
        Command::ExtFood { source, name, index, detail, url, create } => {
            let args = ExtFoodArgs { source, name, index, detail, url, create };
            runner::ext_food(ctx, &args, out)
        }
        Command::New(new) => {
            let food = new.into_custom_food()?;
            runner::new_food(ctx, &food)
        }
    }
}
