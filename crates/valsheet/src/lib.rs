//! # valsheet
//!
//! Pulls a DCF-style financial model out of an unstructured spreadsheet grid.
//!
//! Model spreadsheets put captions in the first column and one column per
//! fiscal year, but that is about all they agree on. Extraction works
//! heuristically:
//!
//! - Find the row of fiscal years near the top of each sheet
//! - Map row captions ("Total Revenue", "EBITDA Margin %", "PV of TV") to a
//!   closed set of [`MetricKey`]s
//! - Read each recognised row as a per-year series or a single scalar
//! - Keep the sheet with the richest result
//! - Fill in what the sheet left out (gross profit, margins, the EV split)
//!
//! The completed model feeds an IRR estimate, a WACC x terminal-growth
//! sensitivity grid and a [`Summary`] of headline figures.
//!
//! ## Example
//!
//! ```rust
//! use valsheet::prelude::*;
//!
//! let sheet = Worksheet::from_rows(
//!     "Model",
//!     vec![
//!         vec!["($m)".into(), "FY2024".into(), "FY2025".into(), "FY2026".into()],
//!         vec!["Revenue".into(), 100.0.into(), 110.0.into(), 121.0.into()],
//!         vec!["COGS".into(), 60.0.into(), 65.0.into(), 70.0.into()],
//!         vec!["Free Cash Flow".into(), 20.0.into(), 22.0.into(), 24.0.into()],
//!         vec!["WACC".into(), CellValue::Empty, CellValue::Empty, CellValue::Empty, 0.09.into()],
//!         vec!["Enterprise Value".into(), CellValue::Empty, CellValue::Empty, CellValue::Empty, 300.0.into()],
//!     ],
//! );
//! let workbook = Workbook::from_worksheets(vec![sheet]).unwrap();
//!
//! let model = workbook.extract_model().unwrap();
//! assert_eq!(model.years, vec![2024, 2025, 2026]);
//! assert_eq!(model.scalar(MetricKey::Wacc), Some(9.0));
//! assert_eq!(model.latest(MetricKey::GrossProfit), Some(51.0));
//! ```

pub mod analytics;
pub mod derive;
pub mod error;
pub mod extract;
pub mod labels;
pub mod model;
pub mod options;
pub mod prelude;
pub mod rows;
pub mod select;
pub mod summary;
pub mod years;

pub use analytics::{estimate_irr, irr, npv, sensitivity_grid, SensitivityGrid, SensitivityInput};
pub use derive::derive;
pub use error::{Error, Result};
pub use extract::{extract_sheet, LabelConflict, SheetExtraction, ValueKind};
pub use labels::{normalize_label, LabelEntry, LabelMatcher, DEFAULT_REGISTRY};
pub use model::{ExtractedModel, MetricKey, Series};
pub use options::{ExtractOptions, IrrOptions, SensitivityOptions, DEFAULT_SHEET_KEYWORDS};
pub use rows::{extract_row, RowValues};
pub use select::{
    extract_best, extract_named, rank_sheets, select_sheet, SheetOutcome, SheetScore,
    WorkbookExtractExt,
};
pub use summary::Summary;
pub use years::{detect_years, YearColumn, YearRow};

// Re-export the cell grid
pub use valsheet_core::{CellError, CellValue, Workbook, Worksheet};
pub use valsheet_csv::{CsvError, CsvReadOptions, CsvReader};

use std::path::Path;

/// Extension trait for Workbook to load delimited text files
pub trait WorkbookExt {
    /// Open a `.csv` or `.tsv` file as a one-sheet workbook
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook>;

    /// Open with custom reader options. `.tsv` files always split on tabs.
    fn open_with_options<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> Result<Workbook>;

    /// Open several files into one workbook, one sheet per file in the order
    /// given, each named after its file stem. Stems that are not valid sheet
    /// names are cleaned up and shortened, and repeats get a ` (2)` suffix.
    fn open_many<I, P>(paths: I, options: &CsvReadOptions) -> Result<Workbook>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>;
}

fn read_sheet(path: &Path, options: &CsvReadOptions) -> Result<Worksheet> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("csv") | Some("txt") => Ok(CsvReader::read_file(path, options)?),
        Some("tsv") => {
            let options = CsvReadOptions {
                delimiter: b'\t',
                ..options.clone()
            };
            Ok(CsvReader::read_file(path, &options)?)
        }
        _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
    }
}

impl WorkbookExt for Workbook {
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook> {
        Self::open_with_options(path, &CsvReadOptions::default())
    }

    fn open_with_options<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> Result<Workbook> {
        Self::open_many([path], options)
    }

    fn open_many<I, P>(paths: I, options: &CsvReadOptions) -> Result<Workbook>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut workbook = Workbook::empty();
        for path in paths {
            let path = path.as_ref();
            let mut worksheet = read_sheet(path, options)?;
            worksheet.set_name(workbook.unique_sheet_name(worksheet.name()));
            tracing::debug!(
                path = %path.display(),
                sheet = worksheet.name(),
                rows = worksheet.row_count(),
                columns = worksheet.column_count(),
                "loaded sheet"
            );
            workbook.add_existing_worksheet(worksheet)?;
        }
        Ok(workbook)
    }
}
