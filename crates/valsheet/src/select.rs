//! Choosing the sheet that holds the model
//!
//! A workbook usually has one sheet with the valuation on it and several
//! with raw inputs, notes or charts. Sheets whose names look like the model
//! are tried first, then the rest in workbook order; every sheet is scored
//! and the best one wins.
//!
//! # Example
//!
//! ```rust
//! use valsheet::prelude::*;
//!
//! let sheet = Worksheet::from_rows(
//!     "DCF",
//!     vec![
//!         vec![CellValue::Empty, 2024.into(), 2025.into()],
//!         vec!["Revenue".into(), 100.0.into(), 110.0.into()],
//!         vec!["EBITDA".into(), 20.0.into(), 24.0.into()],
//!         vec!["WACC".into(), CellValue::Empty, CellValue::Empty, "9%".into()],
//!     ],
//! );
//! let workbook = Workbook::from_worksheets(vec![sheet]).unwrap();
//!
//! let model = workbook.extract_model().unwrap();
//! assert_eq!(model.years, vec![2024, 2025]);
//! assert_eq!(model.scalar(MetricKey::Wacc), Some(9.0));
//! ```

use valsheet_core::{Error as CoreError, Workbook, Worksheet};

use crate::derive::derive;
use crate::error::Result;
use crate::extract::{extract_sheet, SheetExtraction};
use crate::labels::{normalize_label, LabelMatcher};
use crate::model::ExtractedModel;
use crate::options::ExtractOptions;

/// How a candidate sheet fared
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SheetOutcome {
    /// Fewer rows than `min_sheet_rows`
    TooFewRows(usize),
    /// Neither a year row nor a recognised caption
    Declined,
    /// Extracted with this score
    Scored(usize),
}

/// Score report for one candidate sheet
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetScore {
    pub sheet: String,
    pub outcome: SheetOutcome,
}

/// Pick the sheet most likely to hold the model.
///
/// The first configured keyword found in a normalized sheet name decides;
/// keywords are tried in order, sheets in workbook order for each keyword.
/// Without a keyword hit the sheet with the most rows is taken (first one on
/// ties). Returns `None` only for an empty workbook.
pub fn select_sheet<'a>(workbook: &'a Workbook, options: &ExtractOptions) -> Option<&'a str> {
    let names: Vec<(&str, String)> = workbook
        .sheet_names()
        .map(|name| (name, normalize_label(name)))
        .collect();

    for keyword in &options.sheet_keywords {
        if let Some(&(name, _)) = names.iter().find(|(_, norm)| norm.contains(keyword.as_str())) {
            return Some(name);
        }
    }

    let mut largest: Option<&Worksheet> = None;
    for ws in workbook.worksheets() {
        if largest.map_or(true, |best| ws.row_count() > best.row_count()) {
            largest = Some(ws);
        }
    }
    largest.map(Worksheet::name)
}

/// Sheets in the order they are tried: the selected sheet, then the rest
fn candidates<'a>(workbook: &'a Workbook, options: &ExtractOptions) -> Vec<&'a Worksheet> {
    let mut order: Vec<&Worksheet> = Vec::with_capacity(workbook.sheet_count());
    if let Some(ws) = select_sheet(workbook, options).and_then(|n| workbook.worksheet_by_name(n)) {
        order.push(ws);
    }
    for ws in workbook.worksheets() {
        if !order.iter().any(|seen| seen.name() == ws.name()) {
            order.push(ws);
        }
    }
    order
}

fn evaluate(
    sheet: &Worksheet,
    matcher: &LabelMatcher,
    options: &ExtractOptions,
) -> (SheetOutcome, Option<SheetExtraction>) {
    if sheet.row_count() < options.min_sheet_rows {
        return (SheetOutcome::TooFewRows(sheet.row_count()), None);
    }
    match extract_sheet(sheet, matcher, options) {
        Some(extraction) => (SheetOutcome::Scored(extraction.score()), Some(extraction)),
        None => (SheetOutcome::Declined, None),
    }
}

/// Extract every candidate sheet and keep the best-scoring raw model.
///
/// Ties go to the sheet tried first. Returns `None` when no sheet reaches
/// `min_score`.
pub fn extract_best(workbook: &Workbook, options: &ExtractOptions) -> Option<SheetExtraction> {
    let matcher = LabelMatcher::new();
    let mut best: Option<SheetExtraction> = None;

    for sheet in candidates(workbook, options) {
        let (outcome, extraction) = evaluate(sheet, &matcher, options);
        tracing::debug!(sheet = sheet.name(), ?outcome, "candidate sheet");

        if let Some(extraction) = extraction {
            if best.as_ref().map_or(true, |b| extraction.score() > b.score()) {
                best = Some(extraction);
            }
        }
    }

    match best {
        Some(best) if best.score() >= options.min_score => {
            tracing::info!(sheet = %best.sheet, score = best.score(), "selected model sheet");
            Some(best)
        }
        Some(best) => {
            tracing::debug!(
                sheet = %best.sheet,
                score = best.score(),
                min_score = options.min_score,
                "best sheet below minimum score"
            );
            None
        }
        None => None,
    }
}

/// Score every candidate sheet, in the order they are tried
pub fn rank_sheets(workbook: &Workbook, options: &ExtractOptions) -> Vec<SheetScore> {
    let matcher = LabelMatcher::new();
    candidates(workbook, options)
        .into_iter()
        .map(|sheet| SheetScore {
            sheet: sheet.name().to_string(),
            outcome: evaluate(sheet, &matcher, options).0,
        })
        .collect()
}

/// Extract a raw model from one named sheet, bypassing selection and the
/// minimum score. `Ok(None)` when the sheet declines.
pub fn extract_named(
    workbook: &Workbook,
    name: &str,
    options: &ExtractOptions,
) -> Result<Option<SheetExtraction>> {
    let sheet = workbook
        .worksheet_by_name(name)
        .ok_or_else(|| CoreError::SheetNotFound(name.to_string()))?;
    Ok(extract_sheet(sheet, &LabelMatcher::new(), options))
}

/// Extension trait for Workbook to add model extraction
pub trait WorkbookExtractExt {
    /// Extract and derive the model with default options
    fn extract_model(&self) -> Option<ExtractedModel>;

    /// Extract and derive the model with custom options
    fn extract_model_with_options(&self, options: &ExtractOptions) -> Option<ExtractedModel>;
}

impl WorkbookExtractExt for Workbook {
    fn extract_model(&self) -> Option<ExtractedModel> {
        self.extract_model_with_options(&ExtractOptions::default())
    }

    fn extract_model_with_options(&self, options: &ExtractOptions) -> Option<ExtractedModel> {
        extract_best(self, options).map(|best| derive(&best.model))
    }
}
