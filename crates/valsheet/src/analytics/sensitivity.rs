//! WACC x terminal-growth sensitivity grid

use crate::options::SensitivityOptions;

/// Base case the grid is built around. Rates are in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityInput {
    pub wacc: f64,
    pub terminal_growth: f64,
    pub enterprise_value: f64,
    /// Most recent free cash flow, used only in direct mode
    pub latest_fcf: Option<f64>,
}

/// Enterprise value estimates over WACC (rows) and growth (columns)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensitivityGrid {
    /// WACC of each row, in percent
    pub wacc_values: Vec<f64>,
    /// Terminal growth of each column, in percent
    pub growth_values: Vec<f64>,
    /// `cells[row][column]`; `None` where WACC does not exceed growth
    pub cells: Vec<Vec<Option<f64>>>,
    /// Position of the base case, when both offset lists contain zero
    pub base: Option<(usize, usize)>,
}

impl SensitivityGrid {
    /// Value at a row and column
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.cells.get(row)?.get(column).copied().flatten()
    }

    /// Value at the base case
    pub fn base_value(&self) -> Option<f64> {
        let (row, column) = self.base?;
        self.get(row, column)
    }
}

/// Gordon growth multiple `(1 + g) / (w - g)`, for fractional rates
fn gordon_multiple(wacc: f64, growth: f64) -> Option<f64> {
    (wacc > growth).then(|| (1.0 + growth) / (wacc - growth))
}

fn cell_value(
    wacc_pct: f64,
    growth_pct: f64,
    input: &SensitivityInput,
    options: &SensitivityOptions,
) -> Option<f64> {
    let multiple = gordon_multiple(wacc_pct / 100.0, growth_pct / 100.0)?;

    if options.direct_fcf {
        if let Some(fcf) = input.latest_fcf.filter(|fcf| *fcf > 0.0) {
            return Some(fcf * multiple);
        }
    }

    match gordon_multiple(input.wacc / 100.0, input.terminal_growth / 100.0) {
        Some(base) => Some(input.enterprise_value * (multiple / base)),
        None => Some(input.enterprise_value),
    }
}

/// Build the grid.
///
/// Each cell rescales the base enterprise value by how much the Gordon
/// multiple moves from the base case, so the base cell reproduces the base
/// value. A degenerate base case (WACC not above growth) leaves every
/// defined cell at the base value. Cells where WACC does not exceed growth
/// are `None`.
pub fn sensitivity_grid(input: &SensitivityInput, options: &SensitivityOptions) -> SensitivityGrid {
    let wacc_values: Vec<f64> = options.wacc_offsets.iter().map(|d| input.wacc + d).collect();
    let growth_values: Vec<f64> = options
        .growth_offsets
        .iter()
        .map(|d| input.terminal_growth + d)
        .collect();

    let cells = wacc_values
        .iter()
        .map(|&w| {
            growth_values
                .iter()
                .map(|&g| cell_value(w, g, input, options))
                .collect()
        })
        .collect();

    let base = options
        .wacc_offsets
        .iter()
        .position(|d| *d == 0.0)
        .zip(options.growth_offsets.iter().position(|d| *d == 0.0));

    SensitivityGrid {
        wacc_values,
        growth_values,
        cells,
        base,
    }
}
