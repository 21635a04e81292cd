//! Reading the numbers off a labeled row

use valsheet_core::CellValue;

use crate::model::Series;
use crate::years::YearColumn;

/// What a labeled row contributes to the model
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// One value per year column, absent where the cell held no number
    Series(Series),
    /// A single value not tied to a year
    Scalar(f64),
}

/// Classify a row as a series or a scalar and collect its numbers.
///
/// With year columns, the row is a series when at least one year cell holds
/// a number. Otherwise the first numeric cell after the label is the scalar.
/// Returns `None` when the row has no usable number at all.
pub fn extract_row(row: &[CellValue], year_columns: &[YearColumn]) -> Option<RowValues> {
    if !year_columns.is_empty() {
        let values: Series = year_columns
            .iter()
            .map(|yc| row.get(yc.column).and_then(CellValue::coerce_number))
            .collect();

        if values.iter().any(Option::is_some) {
            return Some(RowValues::Series(values));
        }
    }

    row.iter()
        .skip(1)
        .filter(|cell| !cell.is_empty())
        .find_map(CellValue::coerce_number)
        .map(RowValues::Scalar)
}
