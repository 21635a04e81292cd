//! Fiscal-year row detection

use once_cell::sync::Lazy;
use regex::Regex;
use valsheet_core::CellValue;

use crate::options::ExtractOptions;

/// A 4-digit run starting with "20", as in "FY2025" or "2025E"
static YEAR_IN_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"20\d{2}").unwrap());

/// A grid column holding one fiscal year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YearColumn {
    /// 0-based column index
    pub column: usize,
    /// Fiscal year
    pub year: i32,
}

/// The row of a sheet that carries the fiscal years
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YearRow {
    /// 0-based row index
    pub row: usize,
    /// Year columns, left to right
    pub columns: Vec<YearColumn>,
}

impl YearRow {
    /// The years, in column order
    pub fn years(&self) -> Vec<i32> {
        self.columns.iter().map(|c| c.year).collect()
    }
}

/// Find the row holding the fiscal years.
///
/// First looks for a row with at least `min_year_candidates` cells (past the
/// label column) that are whole numbers in the year range. When no row has
/// them, falls back to year-looking text such as "FY2025" anywhere in the
/// first rows. Year columns need not be adjacent.
pub fn detect_years(rows: &[Vec<CellValue>], options: &ExtractOptions) -> Option<YearRow> {
    let found = scan(rows, options.year_scan_rows, 1, options, numeric_year)
        .or_else(|| scan(rows, options.fallback_scan_rows, 0, options, caption_year));

    match &found {
        Some(year_row) => tracing::debug!(
            row = year_row.row,
            years = ?year_row.years(),
            "detected year row"
        ),
        None => tracing::debug!("no year row"),
    }
    found
}

/// First row among the leading `max_rows` with enough year candidates
fn scan(
    rows: &[Vec<CellValue>],
    max_rows: usize,
    first_column: usize,
    options: &ExtractOptions,
    candidate: fn(&CellValue, &ExtractOptions) -> Option<i32>,
) -> Option<YearRow> {
    rows.iter().take(max_rows).enumerate().find_map(|(row, cells)| {
        let columns: Vec<YearColumn> = cells
            .iter()
            .enumerate()
            .skip(first_column)
            .filter_map(|(column, cell)| {
                candidate(cell, options).map(|year| YearColumn { column, year })
            })
            .collect();

        (columns.len() >= options.min_year_candidates).then(|| YearRow { row, columns })
    })
}

fn numeric_year(cell: &CellValue, options: &ExtractOptions) -> Option<i32> {
    let year = i32::try_from(cell.coerce_integer()?).ok()?;
    options.year_range.contains(&year).then_some(year)
}

fn caption_year(cell: &CellValue, options: &ExtractOptions) -> Option<i32> {
    let text = cell.to_string();
    YEAR_IN_TEXT
        .find_iter(&text)
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .find(|year| options.year_range.contains(year))
}
