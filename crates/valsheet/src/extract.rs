//! Per-sheet extraction

use std::collections::HashMap;

use valsheet_core::Worksheet;

use crate::labels::LabelMatcher;
use crate::model::{ExtractedModel, MetricKey};
use crate::options::ExtractOptions;
use crate::rows::{extract_row, RowValues};
use crate::years::detect_years;

/// Which map a value went into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    Series,
    Scalar,
}

/// Two rows of one sheet resolved to the same key and category.
///
/// The later row's values are kept; this records what was overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelConflict {
    pub key: MetricKey,
    pub kind: ValueKind,
    /// 0-based row whose values were discarded
    pub first_row: usize,
    /// 0-based row whose values were kept
    pub replaced_by_row: usize,
}

/// The raw (not yet derived) result of extracting one sheet
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetExtraction {
    /// Sheet the model came from
    pub sheet: String,
    /// 0-based index of the year row, if one was found
    pub year_row: Option<usize>,
    /// Extracted values
    pub model: ExtractedModel,
    /// Duplicate-label overwrites, in row order
    pub conflicts: Vec<LabelConflict>,
}

impl SheetExtraction {
    /// See [`ExtractedModel::score`]
    pub fn score(&self) -> usize {
        self.model.score()
    }
}

/// Extract a raw model from one sheet.
///
/// Returns `None` for an empty sheet, or for a sheet with neither a year row
/// nor a single recognised row caption.
pub fn extract_sheet(
    sheet: &Worksheet,
    matcher: &LabelMatcher,
    options: &ExtractOptions,
) -> Option<SheetExtraction> {
    if sheet.is_empty() {
        return None;
    }

    let year_row = detect_years(sheet.rows(), options);
    let (header_row, columns) = match &year_row {
        Some(yr) => (Some(yr.row), yr.columns.as_slice()),
        None => (None, &[][..]),
    };

    let years = year_row.as_ref().map(|yr| yr.years()).unwrap_or_default();
    let mut model = ExtractedModel::new(years);
    let mut conflicts = Vec::new();
    let mut series_rows: HashMap<MetricKey, usize> = HashMap::new();
    let mut scalar_rows: HashMap<MetricKey, usize> = HashMap::new();
    let mut labeled_rows = 0usize;

    for (idx, row) in sheet.rows().iter().enumerate() {
        if Some(idx) == header_row {
            continue;
        }
        let Some(label) = row.first().filter(|cell| !cell.is_empty()) else {
            continue;
        };
        let Some(key) = matcher.match_label(&label.to_string()) else {
            continue;
        };
        labeled_rows += 1;

        let (kind, previous) = match extract_row(row, columns) {
            Some(RowValues::Series(values)) => {
                model.series.insert(key, values);
                (ValueKind::Series, series_rows.insert(key, idx))
            }
            Some(RowValues::Scalar(value)) => {
                model.scalars.insert(key, value);
                (ValueKind::Scalar, scalar_rows.insert(key, idx))
            }
            None => continue,
        };

        if let Some(first_row) = previous {
            tracing::warn!(
                sheet = sheet.name(),
                %key,
                first_row,
                row = idx,
                "duplicate label; keeping the later row"
            );
            conflicts.push(LabelConflict {
                key,
                kind,
                first_row,
                replaced_by_row: idx,
            });
        }
    }

    if year_row.is_none() && labeled_rows == 0 {
        return None;
    }

    Some(SheetExtraction {
        sheet: sheet.name().to_string(),
        year_row: header_row,
        model,
        conflicts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use valsheet_core::CellValue;

    fn extract(rows: Vec<Vec<CellValue>>) -> Option<SheetExtraction> {
        let sheet = Worksheet::from_rows("Test", rows);
        extract_sheet(&sheet, &LabelMatcher::new(), &ExtractOptions::default())
    }

    #[test]
    fn test_series_and_scalars() {
        let result = extract(vec![
            vec![CellValue::Empty, 2024.into(), 2025.into()],
            vec!["Revenue".into(), 100.0.into(), 110.0.into()],
            vec!["EBITDA".into(), 20.0.into(), CellValue::Empty],
            vec!["WACC".into(), CellValue::Empty, CellValue::Empty, 0.09.into()],
            vec!["Some note".into(), 1.0.into(), 2.0.into()],
        ])
        .unwrap();

        assert_eq!(result.year_row, Some(0));
        assert_eq!(result.model.years, vec![2024, 2025]);
        assert_eq!(
            result.model.series(MetricKey::Revenue),
            Some(&[Some(100.0), Some(110.0)][..])
        );
        assert_eq!(
            result.model.series(MetricKey::Ebitda),
            Some(&[Some(20.0), None][..])
        );
        assert_eq!(result.model.scalar(MetricKey::Wacc), Some(0.09));
        assert_eq!(result.model.series.len(), 2);
        assert_eq!(result.score(), 4);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_duplicate_labels_last_write_wins() {
        let result = extract(vec![
            vec![CellValue::Empty, 2024.into(), 2025.into()],
            vec!["Revenue".into(), 1.0.into(), 2.0.into()],
            vec!["Net Revenue".into(), 3.0.into(), 4.0.into()],
        ])
        .unwrap();

        assert_eq!(
            result.model.series(MetricKey::Revenue),
            Some(&[Some(3.0), Some(4.0)][..])
        );
        assert_eq!(
            result.conflicts,
            vec![LabelConflict {
                key: MetricKey::Revenue,
                kind: ValueKind::Series,
                first_row: 1,
                replaced_by_row: 2,
            }]
        );
    }

    #[test]
    fn test_series_and_scalar_for_same_key_coexist() {
        let result = extract(vec![
            vec![CellValue::Empty, 2024.into(), 2025.into()],
            vec!["Enterprise Value".into(), 900.0.into(), 1000.0.into()],
            vec!["EV".into(), CellValue::Empty, CellValue::Empty, 950.0.into()],
        ])
        .unwrap();

        assert!(result.model.series(MetricKey::EnterpriseValue).is_some());
        assert_eq!(result.model.scalar(MetricKey::EnterpriseValue), Some(950.0));
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_declines_without_years_or_labels() {
        assert_eq!(extract(vec![]), None);
        assert_eq!(
            extract(vec![
                vec!["Notes".into(), 1.0.into()],
                vec!["More notes".into(), 2.0.into()],
            ]),
            None
        );
    }

    #[test]
    fn test_labeled_rows_without_numbers_still_yield_a_model() {
        let result = extract(vec![
            vec!["Revenue".into(), "tbd".into()],
            vec!["Notes".into()],
        ])
        .unwrap();
        assert!(result.model.is_empty());
        assert_eq!(result.score(), 0);
    }

    #[test]
    fn test_year_row_only() {
        let result = extract(vec![vec![CellValue::Empty, 2024.into(), 2025.into()]]).unwrap();
        assert_eq!(result.model.years, vec![2024, 2025]);
        assert!(result.model.is_empty());
    }

    #[test]
    fn test_numeric_first_cell_is_not_a_label() {
        let result = extract(vec![
            vec![CellValue::Empty, 2024.into(), 2025.into()],
            vec![42.0.into(), 1.0.into(), 2.0.into()],
            vec![CellValue::Empty, 1.0.into(), 2.0.into()],
        ])
        .unwrap();
        assert!(result.model.is_empty());
    }
}
