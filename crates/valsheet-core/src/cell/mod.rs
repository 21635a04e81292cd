//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The raw value stored in a cell
//! - [`CellError`] - Spreadsheet error literals (`#DIV/0!`, `#N/A`, ...)
//! - Numeric coercion helpers used when reading unstructured grids

mod coerce;
mod value;

pub use coerce::parse_numeric_text;
pub use value::{CellError, CellValue};
