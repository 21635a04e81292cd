//! Worksheet type

use crate::cell::CellValue;

/// A worksheet (single sheet in a workbook)
///
/// Cells are held as a dense grid of rows. Rows may have different lengths;
/// reads past the end of a row yield [`CellValue::Empty`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Rows of cells, top to bottom
    rows: Vec<Vec<CellValue>>,
}

impl Worksheet {
    /// Create a new, empty worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Create a worksheet from an existing grid of rows
    pub fn from_rows<S: Into<String>>(name: S, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the sheet
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    // === Grid Access ===

    /// Number of rows in the grid
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the sheet has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows, top to bottom
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Get a cell value by row and column indices (0-based)
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Get cell value by indices, `Empty` when out of range
    pub fn get_value_at(&self, row: usize, col: usize) -> CellValue {
        self.cell_at(row, col).cloned().unwrap_or_default()
    }

    // === Grid Modification ===

    /// Append a row to the bottom of the grid
    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    /// Set a cell value by row and column indices, growing the grid as needed
    pub fn set_cell_value_at<V: Into<CellValue>>(&mut self, row: usize, col: usize, value: V) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize_with(col + 1, CellValue::default);
        }
        cells[col] = value.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_worksheet() {
        let ws = Worksheet::new("Test");
        assert_eq!(ws.name(), "Test");
        assert!(ws.is_empty());
        assert_eq!(ws.column_count(), 0);
    }

    #[test]
    fn test_set_and_get_values() {
        let mut ws = Worksheet::new("Test");

        ws.set_cell_value_at(0, 0, "Hello");
        ws.set_cell_value_at(2, 3, 42.0);

        assert_eq!(ws.row_count(), 3);
        assert_eq!(ws.column_count(), 4);
        assert_eq!(ws.get_value_at(0, 0), CellValue::string("Hello"));
        assert_eq!(ws.get_value_at(2, 3), CellValue::Number(42.0));
        assert_eq!(ws.get_value_at(1, 0), CellValue::Empty);
        assert_eq!(ws.get_value_at(99, 99), CellValue::Empty);
        assert!(ws.rows()[1].is_empty());
    }

    #[test]
    fn test_ragged_rows() {
        let ws = Worksheet::from_rows(
            "Ragged",
            vec![
                vec!["a".into()],
                vec!["b".into(), 1.0.into(), 2.0.into()],
            ],
        );

        assert_eq!(ws.row_count(), 2);
        assert_eq!(ws.column_count(), 3);
        assert_eq!(ws.cell_at(0, 2), None);
        assert_eq!(ws.cell_at(1, 2), Some(&CellValue::Number(2.0)));
    }

    #[test]
    fn test_rename() {
        let mut ws = Worksheet::new("dcf");
        ws.set_name("dcf (2)");
        assert_eq!(ws.name(), "dcf (2)");
    }
}
