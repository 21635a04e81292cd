//! Prelude module - common imports for valsheet users
//!
//! ```rust
//! use valsheet::prelude::*;
//! ```

pub use crate::{
    // Cell grid types
    CellValue,
    CsvReadOptions,
    // Error types
    Error,
    // Options
    ExtractOptions,
    // Model types
    ExtractedModel,
    IrrOptions,
    MetricKey,
    Result,
    SensitivityGrid,
    SensitivityOptions,
    SheetExtraction,
    Summary,
    Workbook,
    // Extension traits
    WorkbookExt,
    WorkbookExtractExt,
    Worksheet,
};
