//! Reading CSV files from disk

use std::io::Write;

use pretty_assertions::assert_eq;
use valsheet_core::CellValue;
use valsheet_csv::{CsvError, CsvReadOptions, CsvReader};

#[test]
fn test_sheet_named_after_file_stem() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("DCF Summary.csv");

    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, ",2024,2025").unwrap();
    writeln!(file, "Revenue,100,\"1,210\"").unwrap();
    drop(file);

    let ws = CsvReader::read_file(&path, &CsvReadOptions::default()).unwrap();

    assert_eq!(ws.name(), "DCF Summary");
    assert_eq!(ws.row_count(), 2);
    assert_eq!(ws.get_value_at(0, 0), CellValue::Empty);
    assert_eq!(ws.get_value_at(1, 2), CellValue::string("1,210"));
    assert_eq!(ws.get_value_at(1, 2).coerce_number(), Some(1210.0));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = CsvReader::read_file(dir.path().join("nope.csv"), &CsvReadOptions::default());
    assert!(matches!(result, Err(CsvError::Io(_))));
}
