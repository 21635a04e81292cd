//! # valsheet-core
//!
//! Cell grid data structures for the valsheet model extractor.
//!
//! This crate provides the input side of extraction:
//! - [`CellValue`] - Raw cell values (numbers, strings, booleans, errors, empty)
//! - [`Worksheet`] - A named, ordered grid of rows
//! - [`Workbook`] - An ordered collection of worksheets
//!
//! Readers (CSV, or any external spreadsheet reader) produce these types; the
//! extraction engine only ever reads them.
//!
//! ## Example
//!
//! ```rust
//! use valsheet_core::{CellValue, Workbook, Worksheet};
//!
//! let sheet = Worksheet::from_rows(
//!     "DCF",
//!     vec![
//!         vec![CellValue::Empty, 2024.into(), 2025.into()],
//!         vec!["Revenue".into(), 100.0.into(), 110.0.into()],
//!     ],
//! );
//!
//! let mut workbook = Workbook::empty();
//! workbook.add_existing_worksheet(sheet).unwrap();
//! assert_eq!(workbook.sheet_count(), 1);
//! ```

pub mod cell;
pub mod error;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{CellError, CellValue};
pub use error::{Error, Result};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
