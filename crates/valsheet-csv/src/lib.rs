//! # valsheet-csv
//!
//! CSV reader for valsheet. Turns a delimited text file into a
//! [`Worksheet`](valsheet_core::Worksheet) grid.

mod error;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use options::CsvReadOptions;
pub use reader::CsvReader;
