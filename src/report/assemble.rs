// src/report/assemble.rs
use std::collections::VecDeque;

use chrono::NaiveDate;

use crate::config::consts::{REPORT_FIXED_HEADERS, REPORT_PERCENT_LABEL, REPORT_SUM_LABEL};
use crate::error::{FoodError, Result};

/// One day's report table as scraped: full header list (fixed columns first)
/// and the raw cells of every body row.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportPage {
    pub date: NaiveDate,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Food,
    DailySum,
    DailyPercent,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReportRow {
    pub date: NaiveDate,
    pub kind: RowKind,
    pub food: String,
    pub serving: String,
    pub amount: String,
    pub nutrients: Vec<(String, String)>,
}

impl ReportRow {
    /// CSV cells in header order, date first.
    pub fn to_cells(&self) -> Vec<String> {
        let mut cells = Vec::with_capacity(REPORT_FIXED_HEADERS.len() + self.nutrients.len());
        cells.push(self.date.format("%Y-%m-%d").to_string());
        cells.push(self.food.clone());
        cells.push(self.serving.clone());
        cells.push(self.amount.clone());
        cells.extend(self.nutrients.iter().map(|(_, v)| v.clone()));
        cells
    }
}

/// Turn every raw row of `page` into a [`ReportRow`].
///
/// Rows of one or two cells (and empty ones) are spacers and get dropped. A row
/// one label plus one value per nutrient wide is a summary row, classified by its
/// label. Anything else is an error, and no row of the page is returned.
pub fn classify_page(page: &ReportPage) -> Result<Vec<ReportRow>> {
    let fixed = REPORT_FIXED_HEADERS.len();
    if page.headers.len() < fixed {
        return Err(FoodError::SchemaDrift(format!(
            "report for {} has {} columns, expected at least {fixed}",
            page.date,
            page.headers.len()
        )));
    }
    let labels = &page.headers[fixed..];
    let food_width = page.headers.len() - 1;
    let summary_width = page.headers.len() - 3;

    let mut out = Vec::with_capacity(page.rows.len());
    for cells in &page.rows {
        let n = cells.len();
        if n <= 2 {
            continue;
        }

        let (kind, food, serving, amount, values) = if n == summary_width {
            let label = &cells[0];
            let kind = if label.contains("over") && label.contains("period") {
                RowKind::DailySum
            } else if label.contains("percentage") {
                RowKind::DailyPercent
            } else {
                return Err(FoodError::malformed(format!(
                    "report for {}: unrecognised summary row {label:?}",
                    page.date
                )));
            };
            let tag = if kind == RowKind::DailySum { REPORT_SUM_LABEL } else { REPORT_PERCENT_LABEL };
            (kind, s!(tag), s!(), s!(), &cells[1..])
        } else if n == food_width {
            (RowKind::Food, cells[0].clone(), cells[1].clone(), cells[2].clone(), &cells[3..])
        } else {
            return Err(FoodError::SchemaDrift(format!(
                "report for {}: row has {n} cells, headers expect {food_width} (first cell {:?})",
                page.date, cells[0]
            )));
        };

        out.push(ReportRow {
            date: page.date,
            kind,
            food,
            serving,
            amount,
            nutrients: labels.iter().cloned().zip(values.iter().cloned()).collect(),
        });
    }
    Ok(out)
}

/// Lazily merges report pages into one row stream.
///
/// The first page fixes the header list; a later page with a different list
/// ends the stream with `SchemaDrift` before any of its rows are produced.
/// After the first error the assembler yields nothing more.
pub struct ReportAssembler<I> {
    pages: I,
    headers: Option<Vec<String>>,
    pending: VecDeque<ReportRow>,
    failed: bool,
}

impl<I> ReportAssembler<I>
where
    I: Iterator<Item = Result<ReportPage>>,
{
    pub fn new(pages: I) -> Self {
        Self { pages, headers: None, pending: VecDeque::new(), failed: false }
    }

    /// Header row of the export, once the first page has been read.
    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    fn accept(&mut self, page: ReportPage) -> Result<()> {
        match &self.headers {
            None => self.headers = Some(page.headers.clone()),
            Some(h) if *h != page.headers => {
                return Err(FoodError::SchemaDrift(describe_drift(h, &page.headers, page.date)));
            }
            Some(_) => {}
        }
        let rows = classify_page(&page)?;
        self.pending.extend(rows);
        Ok(())
    }
}

impl<I> Iterator for ReportAssembler<I>
where
    I: Iterator<Item = Result<ReportPage>>,
{
    type Item = Result<ReportRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }
            if let Some(row) = self.pending.pop_front() {
                return Some(Ok(row));
            }
            let step = match self.pages.next()? {
                Ok(page) => self.accept(page),
                Err(e) => Err(e),
            };
            if let Err(e) = step {
                self.failed = true;
                return Some(Err(e));
            }
        }
    }
}

fn describe_drift(expected: &[String], got: &[String], date: NaiveDate) -> String {
    let at = expected
        .iter()
        .zip(got)
        .position(|(a, b)| a != b)
        .unwrap_or(expected.len().min(got.len()));
    format!(
        "report headers changed on {date}: {} columns before, {} now; first difference at column {at} ({:?} vs {:?})",
        expected.len(),
        got.len(),
        expected.get(at),
        got.get(at)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        ["date", "food", "serving", "amount", "Calories", "Fat", "Protein"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn cells(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 6, d).unwrap()
    }

    #[test]
    fn food_and_summary_rows() {
        let page = ReportPage {
            date: day(1),
            headers: headers(),
            rows: vec![
                cells(&["Breakfast"]),
                cells(&["Oats", "1 cup", "81g", "307", "5", "11"]),
                cells(&["Averages over the period", "2250", "54", "111"]),
                cells(&["Calories percentage", "", "22%", "20%"]),
                cells(&["", ""]),
            ],
        };
        let rows = classify_page(&page).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].to_cells(), cells(&["2017-06-01", "Oats", "1 cup", "81g", "307", "5", "11"]));
        assert_eq!(rows[1].kind, RowKind::DailySum);
        assert_eq!(rows[1].to_cells(), cells(&["2017-06-01", "DAILY_SUM", "", "", "2250", "54", "111"]));
        assert_eq!(rows[2].kind, RowKind::DailyPercent);
        assert_eq!(rows[2].nutrients[1], (s!("Fat"), s!("22%")));
    }

    #[test]
    fn unknown_summary_label_fails() {
        let page = ReportPage { date: day(1), headers: headers(), rows: vec![cells(&["Totals", "1", "2", "3"])] };
        assert!(matches!(classify_page(&page), Err(FoodError::MalformedResponse(_))));
    }

    fn headers_with(nutrients: usize) -> Vec<String> {
        let mut h = cells(&REPORT_FIXED_HEADERS);
        h.extend((0..nutrients).map(|i| format!("N{i}")));
        h
    }

    #[test]
    fn short_rows_dropped_at_every_width() {
        // 4 + 1 nutrient: the summary width is 2 and the spacer rule wins
        for width in 4..=10 {
            let page = ReportPage {
                date: day(1),
                headers: headers_with(width - REPORT_FIXED_HEADERS.len()),
                rows: vec![
                    cells(&[]),
                    cells(&["Lunch"]),
                    cells(&["Averages over the period", "2250"]),
                    cells(&["", ""]),
                ],
            };
            let rows = classify_page(&page).unwrap_or_else(|e| panic!("width {width}: {e}"));
            assert!(rows.is_empty(), "width {width} kept {rows:?}");
        }
    }

    #[test]
    fn unknown_summary_label_fails_at_every_width() {
        for width in [6, 7, 9, 12] {
            let headers = headers_with(width - REPORT_FIXED_HEADERS.len());
            let mut row = cells(&["Weekly totals"]);
            row.extend((0..width - 4).map(|i| i.to_string()));
            assert_eq!(row.len(), width - 3);
            let page = ReportPage { date: day(1), headers, rows: vec![row] };
            assert!(
                matches!(classify_page(&page), Err(FoodError::MalformedResponse(_))),
                "width {width}"
            );
        }
    }

    #[test]
    fn summary_rows_recognised_at_every_width() {
        for width in [6, 8, 11] {
            let mut sum = cells(&["Totals over the period"]);
            sum.extend((0..width - 4).map(|_| s!("1")));
            let mut pct = cells(&["Daily percentage"]);
            pct.extend((0..width - 4).map(|_| s!("5%")));
            let page = ReportPage { date: day(1), headers: headers_with(width - 4), rows: vec![sum, pct] };
            let kinds: Vec<RowKind> = classify_page(&page).unwrap().into_iter().map(|r| r.kind).collect();
            assert_eq!(kinds, vec![RowKind::DailySum, RowKind::DailyPercent], "width {width}");
        }
    }

    #[test]
    fn odd_width_row_fails() {
        let page = ReportPage { date: day(1), headers: headers(), rows: vec![cells(&["Oats", "1", "2", "3", "4"])] };
        assert!(matches!(classify_page(&page), Err(FoodError::SchemaDrift(_))));
    }

    #[test]
    fn assembler_stops_after_error() {
        let pages = vec![
            Err(FoodError::malformed("no table")),
            Ok(ReportPage { date: day(2), headers: headers(), rows: vec![cells(&["Oats", "1 cup", "81g", "1", "2", "3"])] }),
        ];
        let mut asm = ReportAssembler::new(pages.into_iter());
        assert!(matches!(asm.next(), Some(Err(FoodError::MalformedResponse(_)))));
        assert!(asm.next().is_none());
        assert!(asm.headers().is_none());
    }
}
