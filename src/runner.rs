// src/runner.rs
//! Command implementations. The CLI parses arguments into the `*Args`
//! structs below and calls one function per subcommand; output goes to the
//! writer it is handed so tests can capture it.

use std::io::Write;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use serde_json::Value;
use tracing::info;

use crate::config::credentials;
use crate::config::options::{AppOptions, HistoryOptions};
use crate::core::{Session, Transport};
use crate::diary;
use crate::error::{FoodError, Result};
use crate::file::AtomicCsv;
use crate::format::{EntryFormatter, format_external, format_search_result};
use crate::nutrition::{Amount, Food, FoodRecord, Identity, Totals};
use crate::progress::Progress;
use crate::report::{ReportAssembler, day_series};
use crate::specs::custom_food::CustomFood;
use crate::specs::external::{self, ExternalFood, ExternalQuery, ExternalSource};
use crate::specs::mynetdiary::{self, SearchPages};

/// Everything a command needs, built once per invocation.
pub struct AppContext {
    pub options: AppOptions,
    pub transport: Box<dyn Transport>,
    pub today: NaiveDate,
}

impl AppContext {
    pub fn new(options: AppOptions) -> Result<Self> {
        Ok(Self::with_transport(options, Box::new(Session::new()?), Local::now().date_naive()))
    }

    pub fn with_transport(options: AppOptions, transport: Box<dyn Transport>, today: NaiveDate) -> Self {
        Self { options, transport, today }
    }

    pub fn t(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Read the credentials file and log on to the diary.
    pub fn logon(&self) -> Result<()> {
        let creds = credentials::load(&self.options.credentials_path())?;
        mynetdiary::logon(self.t(), &creds)
    }
}

/* ---------------- history ---------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistorySummary {
    pub days: usize,
    pub weights: usize,
    pub days_without_weight: usize,
    pub report_rows: usize,
    pub files_written: Vec<PathBuf>,
}

/// Export the weight log and the nutrition report for every day from
/// `opts.start` up to yesterday. Each file is written completely or not at all.
pub fn history(ctx: &AppContext, opts: &HistoryOptions, progress: &mut dyn Progress) -> Result<HistorySummary> {
    ctx.logon()?;
    let days: Vec<NaiveDate> = day_series(opts.start, ctx.today).collect();
    let mut summary = HistorySummary { days: days.len(), ..HistorySummary::default() };

    progress.log(&format!("weights since {}", opts.start));
    progress.begin(days.len());
    let mut weights = AtomicCsv::create(&opts.weights_out)?;
    for &day in &days {
        match mynetdiary::fetch_weight(ctx.t(), day)? {
            Some(w) => weights.write_row(&w.to_cells())?,
            None => summary.days_without_weight += 1,
        }
        progress.day_done(day);
    }
    summary.weights = weights.rows();
    summary.files_written.push(weights.commit()?);
    progress.finish();
    info!("{}/{} pages contained no weight", summary.days_without_weight, summary.days);

    progress.log("nutrition report");
    progress.begin(days.len());
    summary.report_rows = export_report(ctx.t(), &days, opts, progress)?;
    summary.files_written.push(opts.nutrition_out.clone());
    progress.finish();

    Ok(summary)
}

fn export_report(
    t: &dyn Transport,
    days: &[NaiveDate],
    opts: &HistoryOptions,
    progress: &mut dyn Progress,
) -> Result<usize> {
    let mut out = AtomicCsv::create(&opts.nutrition_out)?;
    let mut rows = 0usize;
    {
        let pages = days.iter().map(|&day| {
            let page = mynetdiary::fetch_report_page(t, day);
            progress.day_done(day);
            page
        });
        let mut asm = ReportAssembler::new(pages);
        let mut header_done = false;
        while let Some(row) = asm.next() {
            let row = row?;
            if !header_done {
                if let Some(h) = asm.headers() {
                    out.write_row(h)?;
                }
                header_done = true;
            }
            out.write_row(&row.to_cells())?;
            rows += 1;
        }
        if !header_done {
            if let Some(h) = asm.headers() {
                out.write_row(h)?;
            }
        }
    }
    out.commit()?;
    Ok(rows)
}

/* ---------------- items ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemsArgs {
    pub day: NaiveDate,
    pub raw: bool,
    pub index: Option<usize>,
    pub delete: bool,
}

/// List what was logged on a day, optionally deleting the entry at `index`.
pub fn items(ctx: &AppContext, args: &ItemsArgs, out: &mut dyn Write) -> Result<()> {
    if args.delete && args.index.is_none() {
        return Err(FoodError::validation("--delete needs --index"));
    }
    ctx.logon()?;
    let policy = ctx.options.unit_policy;
    let grid = mynetdiary::fetch_day_grid(ctx.t(), args.day, policy)?;

    if args.raw {
        writeln!(out, "{}", serde_json::to_string_pretty(&grid.raw)?)?;
        return Ok(());
    }
    if grid.entries.is_empty() {
        info!(day = %args.day, "nothing logged");
        return Ok(());
    }
    if let Some(i) = args.index {
        if i >= grid.entries.len() {
            return Err(FoodError::validation(format!(
                "index {i} out of range, {} entries on {}",
                grid.entries.len(),
                args.day
            )));
        }
    }

    let totals = Totals::from_entries(&grid.entries);
    let mut records: Vec<FoodRecord> = grid.entries.iter().cloned().map(FoodRecord::History).collect();
    records.push(FoodRecord::Totals(totals));
    let mut formatter = EntryFormatter::new(&records);

    for (i, record) in records.iter().enumerate() {
        let Some(identity @ Identity::Entry { .. }) = record.identity() else { continue };
        if args.index.is_some_and(|want| want != i) {
            continue;
        }
        if args.delete {
            diary::delete_entry(ctx.t(), args.day, identity, policy)?;
        }
        writeln!(out, "{}", formatter.format_row(record))?;
    }
    if args.index.is_none() {
        if let Some(totals) = records.last() {
            writeln!(out, "{}", formatter.format_row(totals))?;
        }
    }
    Ok(())
}

/* ---------------- food ---------------- */

#[derive(Clone, Debug, PartialEq)]
pub struct FoodArgs {
    pub name: String,
    pub raw: bool,
    pub index: Option<usize>,
    pub detail: bool,
    pub all: bool,
    /// Quantity to log: grams, or servings when `serving` is set.
    pub add: Option<f64>,
    /// `Some(None)` is the food's default serving.
    pub serving: Option<Option<String>>,
    pub day: NaiveDate,
    pub delete: bool,
}

impl FoodArgs {
    fn amount(&self) -> Result<Option<Amount>> {
        self.add
            .map(|n| match &self.serving {
                None => Amount::grams(n),
                Some(name) => Amount::servings(n, name.clone()),
            })
            .transpose()
    }
}

/// Search foods; show, add or retire the one at `index`.
pub fn food(ctx: &AppContext, args: &FoodArgs, out: &mut dyn Write) -> Result<()> {
    let amount = args.amount()?;
    if (amount.is_some() || args.delete) && args.index.is_none() {
        return Err(FoodError::validation("--add and --delete need --index"));
    }
    if amount.is_some() && args.delete {
        return Err(FoodError::validation("--add and --delete cannot be combined"));
    }
    if args.serving.is_some() && amount.is_none() {
        return Err(FoodError::validation("--serving only makes sense with --add"));
    }
    ctx.logon()?;

    let mut pages = SearchPages::new(ctx.t(), args.name.clone());
    if args.raw && args.index.is_none() {
        if let Some(page) = pages.next() {
            writeln!(out, "{}", serde_json::to_string_pretty(&page?.raw)?)?;
        }
        return Ok(());
    }

    let mut index = 0usize;
    for page in pages {
        let page = page?;
        let first = index;
        index += page.entries.len();
        let Some(skip) = page_offset(first, index, args.index) else { continue };
        let take = if args.index.is_some() { 1 } else { usize::MAX };

        if args.raw {
            for raw in page.entries.iter().skip(skip).take(take) {
                writeln!(out, "{}", serde_json::to_string_pretty(raw)?)?;
            }
        } else {
            for result in page.results().skip(skip).take(take) {
                let result = result?;
                if args.delete {
                    mynetdiary::retire_food(ctx.t(), result.bean_id())?;
                    writeln!(out, "retired {}", result.food_name())?;
                } else if let Some(amount) = &amount {
                    let sent = diary::add_entry(ctx.t(), args.day, &result, amount, ctx.options.unit_policy)?;
                    writeln!(
                        out,
                        "added {} of {} as entry {}",
                        sent.amount_input_string.as_deref().unwrap_or_default(),
                        sent.bean_input_string,
                        sent.bean_entry_no
                    )?;
                } else {
                    writeln!(out, "{}", format_search_result(&result, args.detail, args.all))?;
                }
            }
        }
        if args.index.is_some() {
            return Ok(());
        }
    }

    if let Some(want) = args.index {
        if index <= want {
            return Err(FoodError::validation(format!("index {want} out of range, {index} results")));
        }
    }
    Ok(())
}

/// Where in a page holding results `first..end` to start, given the wanted index.
/// `None` when the page holds nothing wanted.
fn page_offset(first: usize, end: usize, want: Option<usize>) -> Option<usize> {
    match want {
        None => Some(0),
        Some(w) if (first..end).contains(&w) => Some(w - first),
        Some(_) => None,
    }
}

/* ---------------- ext-food ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtFoodArgs {
    pub source: ExternalSource,
    pub name: Vec<String>,
    pub index: Option<usize>,
    pub detail: bool,
    pub url: Option<String>,
    pub create: bool,
}

/// Look up a food on another site; with `create`, copy it into the diary as a custom food.
pub fn ext_food(ctx: &AppContext, args: &ExtFoodArgs, out: &mut dyn Write) -> Result<()> {
    let query = external::resolve_query(args.source, &args.name, args.url.as_deref())?;

    let chosen: Option<ExternalFood> = match query {
        ExternalQuery::Url { source, url } => {
            let food = external::food_from_url(ctx.t(), source, &url)?;
            writeln!(out, "{}", format_external(&food))?;
            Some(food)
        }
        ExternalQuery::Search { source, name } => {
            let mut hits = external::search(ctx.t(), source, &name)?;
            if let Some(i) = args.index {
                if i >= hits.len() {
                    return Err(FoodError::validation(format!("index {i} out of range, {} results", hits.len())));
                }
                hits = vec![hits.swap_remove(i)];
            }
            if args.create && hits.len() != 1 {
                return Err(FoodError::validation("--create needs exactly one food; pick one with --index"));
            }

            let mut last = None;
            for hit in &hits {
                writeln!(out, "{}", hit.name)?;
                if args.detail || args.create {
                    let food = external::fetch_detail(ctx.t(), hit)?;
                    if args.detail {
                        writeln!(out, "{}", format_external(&food))?;
                    }
                    last = Some(food);
                }
            }
            last
        }
    };

    if args.create {
        let food = chosen.ok_or_else(|| FoodError::validation("nothing to create"))?;
        let custom = food.to_custom_food()?;
        new_food(ctx, &custom)?;
        writeln!(out, "created {}", custom.custom_food_name)?;
    }
    Ok(())
}

/* ---------------- new ---------------- */

/// Create a custom food. The schema is checked before logging on.
pub fn new_food(ctx: &AppContext, food: &CustomFood) -> Result<()> {
    food.validate()?;
    ctx.logon()?;
    mynetdiary::create_food(ctx.t(), food)?;
    info!(name = %food.custom_food_name, "custom food created");
    Ok(())
}

/// Load a custom food from a JSON file in the short format.
pub fn load_custom_food(path: &std::path::Path) -> Result<CustomFood> {
    let text = std::fs::read_to_string(path)?;
    let v: Value = serde_json::from_str(&text)
        .map_err(|e| FoodError::validation(format!("{}: {e}", path.display())))?;
    CustomFood::from_file_value(v)
}
