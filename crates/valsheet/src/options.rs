//! Tunables for extraction and analytics

use std::ops::RangeInclusive;

/// Sheet-name keywords that mark a sheet as the likely model, most telling first
pub const DEFAULT_SHEET_KEYWORDS: [&str; 6] =
    ["dcf", "model", "valuation", "output", "summary", "forecast"];

/// Options for extracting a model from a workbook
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Rows searched for numeric years (default: 20)
    pub year_scan_rows: usize,
    /// Rows searched for year captions like "FY2025" (default: 10)
    pub fallback_scan_rows: usize,
    /// Year cells a row needs to count as the year row (default: 2)
    pub min_year_candidates: usize,
    /// Plausible fiscal years (default: 2000..=2050)
    pub year_range: RangeInclusive<i32>,
    /// Sheets with fewer rows are not considered (default: 2)
    pub min_sheet_rows: usize,
    /// Best score below this means no model was found (default: 4)
    pub min_score: usize,
    /// Normalized keywords tried against sheet names, in order
    pub sheet_keywords: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            year_scan_rows: 20,
            fallback_scan_rows: 10,
            min_year_candidates: 2,
            year_range: 2000..=2050,
            min_sheet_rows: 2,
            min_score: 4,
            sheet_keywords: DEFAULT_SHEET_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Options for the Newton-Raphson IRR solver
#[derive(Debug, Clone)]
pub struct IrrOptions {
    /// Starting rate as a fraction (default: 0.10)
    pub initial_guess: f64,
    /// Maximum iterations (default: 100)
    pub max_iterations: u32,
    /// Give up when |dNPV/dr| falls below this (default: 1e-10)
    pub min_derivative: f64,
    /// Converged when the step is smaller than this (default: 1e-7)
    pub tolerance: f64,
    /// Rates at or below this are divergence (default: -0.99)
    pub lower_bound: f64,
    /// Rates at or above this are divergence (default: 10.0)
    pub upper_bound: f64,
}

impl Default for IrrOptions {
    fn default() -> Self {
        Self {
            initial_guess: 0.10,
            max_iterations: 100,
            min_derivative: 1e-10,
            tolerance: 1e-7,
            lower_bound: -0.99,
            upper_bound: 10.0,
        }
    }
}

/// Options for the WACC x terminal-growth sensitivity grid
#[derive(Debug, Clone)]
pub struct SensitivityOptions {
    /// WACC offsets in percentage points (rows)
    pub wacc_offsets: Vec<f64>,
    /// Terminal growth offsets in percentage points (columns)
    pub growth_offsets: Vec<f64>,
    /// Value cells straight off the latest free cash flow with the Gordon
    /// formula when it is positive, instead of rescaling the base enterprise
    /// value. The centre cell then no longer equals the base value.
    pub direct_fcf: bool,
}

impl Default for SensitivityOptions {
    fn default() -> Self {
        Self {
            wacc_offsets: vec![-2.0, -1.0, -0.5, 0.0, 0.5, 1.0, 2.0],
            growth_offsets: vec![-1.0, -0.5, 0.0, 0.5, 1.0],
            direct_fcf: false,
        }
    }
}
