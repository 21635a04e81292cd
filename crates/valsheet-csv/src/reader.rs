//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use valsheet_core::{CellError, CellValue, Worksheet};

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a worksheet named after the file stem
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Worksheet> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Sheet1");
        let file = File::open(path)?;
        Self::read(file, name, options)
    }

    /// Read CSV from a reader into a worksheet
    ///
    /// Every record becomes one grid row. Records may have different lengths.
    pub fn read<R: Read>(reader: R, name: &str, options: &CsvReadOptions) -> CsvResult<Worksheet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut worksheet = Worksheet::new(name);

        for (idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            if idx == 0 && options.skip_header {
                continue;
            }

            let row = record
                .iter()
                .map(|field| {
                    if options.auto_detect_types {
                        Self::detect_type(field)
                    } else if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::string(field)
                    }
                })
                .collect();

            worksheet.push_row(row);
        }

        Ok(worksheet)
    }

    /// Detect the type of a field value
    ///
    /// Formatted numbers such as `1,200` or `(50)` stay text here; the
    /// extractor coerces them when it needs a number.
    fn detect_type(field: &str) -> CellValue {
        let field = field.trim();

        if field.is_empty() {
            return CellValue::Empty;
        }

        if let Some(err) = CellError::parse(field) {
            return CellValue::Error(err);
        }

        // Try boolean
        match field.to_lowercase().as_str() {
            "true" => return CellValue::Boolean(true),
            "false" => return CellValue::Boolean(false),
            _ => {}
        }

        // Try number
        if let Ok(n) = field.parse::<f64>() {
            if n.is_finite() {
                return CellValue::Number(n);
            }
        }

        // Default to string
        CellValue::string(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect_type() {
        assert_eq!(CsvReader::detect_type(""), CellValue::Empty);
        assert_eq!(CsvReader::detect_type("  "), CellValue::Empty);
        assert_eq!(CsvReader::detect_type("2024"), CellValue::Number(2024.0));
        assert_eq!(CsvReader::detect_type("0"), CellValue::Number(0.0));
        assert_eq!(CsvReader::detect_type("1"), CellValue::Number(1.0));
        assert_eq!(CsvReader::detect_type("TRUE"), CellValue::Boolean(true));
        assert_eq!(
            CsvReader::detect_type("#DIV/0!"),
            CellValue::Error(CellError::Div0)
        );
        assert_eq!(CsvReader::detect_type("1,200"), CellValue::string("1,200"));
        assert_eq!(CsvReader::detect_type("NaN"), CellValue::string("NaN"));
    }

    #[test]
    fn test_read_ragged_rows() {
        let data = "Item,2024,2025\nRevenue,100,110\nWACC,9%\n";
        let ws = CsvReader::read(data.as_bytes(), "DCF", &CsvReadOptions::default()).unwrap();

        assert_eq!(ws.name(), "DCF");
        assert_eq!(ws.row_count(), 3);
        assert_eq!(ws.get_value_at(0, 1), CellValue::Number(2024.0));
        assert_eq!(ws.get_value_at(1, 0), CellValue::string("Revenue"));
        assert_eq!(ws.get_value_at(2, 1), CellValue::string("9%"));
        assert_eq!(ws.rows()[2].len(), 2);
    }

    #[test]
    fn test_skip_header_and_raw_strings() {
        let data = "title\nRevenue,100\n";
        let options = CsvReadOptions {
            skip_header: true,
            auto_detect_types: false,
            ..Default::default()
        };
        let ws = CsvReader::read(data.as_bytes(), "Raw", &options).unwrap();

        assert_eq!(ws.row_count(), 1);
        assert_eq!(ws.get_value_at(0, 1), CellValue::string("100"));
    }

    #[test]
    fn test_tsv() {
        let data = "Revenue\t100\t110\n";
        let ws = CsvReader::read(data.as_bytes(), "Tabs", &CsvReadOptions::tsv()).unwrap();
        assert_eq!(ws.get_value_at(0, 2), CellValue::Number(110.0));
    }
}
