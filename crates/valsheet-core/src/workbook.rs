//! Workbook type - an ordered collection of worksheets

use crate::error::{Error, Result};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// A workbook (spreadsheet document)
///
/// Sheet order is significant: it is the order sheets are considered in when
/// several of them could hold a model.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    /// Worksheets in the workbook
    worksheets: Vec<Worksheet>,
}

impl Workbook {
    /// Create an empty workbook with no worksheets
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a workbook from worksheets, validating every name
    pub fn from_worksheets<I: IntoIterator<Item = Worksheet>>(worksheets: I) -> Result<Self> {
        let mut wb = Self::empty();
        for ws in worksheets {
            wb.add_existing_worksheet(ws)?;
        }
        Ok(wb)
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Check if the workbook has no worksheets
    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a worksheet by name
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name() == name)
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.worksheets.iter().map(Worksheet::name)
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Add an existing worksheet to the workbook
    pub fn add_existing_worksheet(&mut self, worksheet: Worksheet) -> Result<usize> {
        self.validate_sheet_name(worksheet.name())?;
        let index = self.worksheets.len();
        self.worksheets.push(worksheet);
        Ok(index)
    }

    /// A name derived from `base` that [`add_existing_worksheet`] will accept
    ///
    /// Brackets become parentheses and the other forbidden characters become
    /// `_`. The result is cut to [`MAX_SHEET_NAME_LEN`] characters, and a name
    /// already taken gets a ` (2)`, ` (3)`, ... suffix.
    ///
    /// [`add_existing_worksheet`]: Workbook::add_existing_worksheet
    pub fn unique_sheet_name(&self, base: &str) -> String {
        let cleaned: String = base
            .chars()
            .map(|c| match c {
                '[' => '(',
                ']' => ')',
                c if INVALID_CHARS.contains(&c) => '_',
                c => c,
            })
            .collect();
        let cleaned = match cleaned.trim() {
            "" => "Sheet",
            trimmed => trimmed,
        };

        let name = truncate(cleaned, MAX_SHEET_NAME_LEN);
        if !self.has_sheet_named(&name) {
            return name;
        }

        (2usize..)
            .map(|n| {
                let suffix = format!(" ({n})");
                let stem = truncate(cleaned, MAX_SHEET_NAME_LEN - suffix.len());
                format!("{stem}{suffix}")
            })
            .find(|candidate| !self.has_sheet_named(candidate))
            .unwrap_or(name)
    }

    /// Case-insensitive name lookup
    fn has_sheet_named(&self, name: &str) -> bool {
        let name_lower = name.to_lowercase();
        self.worksheets
            .iter()
            .any(|ws| ws.name().to_lowercase() == name_lower)
    }

    /// Validate a sheet name against the existing sheets
    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        // Check length
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters)",
                MAX_SHEET_NAME_LEN
            )));
        }

        // Check for invalid characters
        for c in INVALID_CHARS {
            if name.contains(*c) {
                return Err(Error::InvalidSheetName(format!(
                    "Sheet name cannot contain '{}'",
                    c
                )));
            }
        }

        // Check for duplicate names (case-insensitive)
        if self.has_sheet_named(name) {
            return Err(Error::DuplicateSheetName(name.into()));
        }

        Ok(())
    }
}

/// Characters a sheet name may not contain
const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];

/// First `max` characters of `name`, without trailing whitespace
fn truncate(name: &str, max: usize) -> String {
    let cut: String = name.chars().take(max).collect();
    cut.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_workbook() {
        let wb = Workbook::empty();
        assert_eq!(wb.sheet_count(), 0);
        assert!(wb.is_empty());
        assert!(wb.worksheet(0).is_none());
    }

    #[test]
    fn test_add_worksheets() {
        let mut wb = Workbook::empty();

        assert_eq!(wb.add_existing_worksheet(Worksheet::new("Inputs")).unwrap(), 0);
        assert_eq!(wb.add_existing_worksheet(Worksheet::new("DCF")).unwrap(), 1);
        assert_eq!(wb.sheet_names().collect::<Vec<_>>(), vec!["Inputs", "DCF"]);
        assert_eq!(wb.worksheet(1).unwrap().name(), "DCF");
    }

    #[test]
    fn test_duplicate_name() {
        let mut wb = Workbook::empty();
        wb.add_existing_worksheet(Worksheet::new("Sheet1")).unwrap();

        // Case-insensitive duplicate check
        assert!(matches!(
            wb.add_existing_worksheet(Worksheet::new("SHEET1")),
            Err(Error::DuplicateSheetName(_))
        ));
        assert!(wb.add_existing_worksheet(Worksheet::new("sheet1")).is_err());
    }

    #[test]
    fn test_invalid_sheet_name() {
        let mut wb = Workbook::empty();

        for name in ["", "Sheet/1", "Sheet:1", "Sheet[1]"] {
            assert!(matches!(
                wb.add_existing_worksheet(Worksheet::new(name)),
                Err(Error::InvalidSheetName(_))
            ));
        }

        // Too long
        let long_name = "A".repeat(MAX_SHEET_NAME_LEN + 1);
        assert!(wb.add_existing_worksheet(Worksheet::new(long_name)).is_err());
    }

    #[test]
    fn test_from_worksheets() {
        let wb = Workbook::from_worksheets(vec![Worksheet::new("A"), Worksheet::new("B")])
            .unwrap();
        assert_eq!(wb.sheet_count(), 2);
        assert_eq!(wb.worksheet(0).unwrap().name(), "A");

        let dup = Workbook::from_worksheets(vec![Worksheet::new("A"), Worksheet::new("a")]);
        assert!(matches!(dup, Err(Error::DuplicateSheetName(name)) if name == "a"));
    }

    #[test]
    fn test_worksheet_by_name() {
        let wb = Workbook::from_worksheets(vec![Worksheet::new("Data")]).unwrap();

        assert!(wb.worksheet_by_name("Data").is_some());
        assert!(wb.worksheet_by_name("NonExistent").is_none());
    }

    #[test]
    fn test_unique_sheet_name() {
        let mut wb = Workbook::empty();

        assert_eq!(wb.unique_sheet_name("DCF [v2]"), "DCF (v2)");
        assert_eq!(wb.unique_sheet_name("Q1/Q2: a*b?"), "Q1_Q2_ a_b_");
        assert_eq!(wb.unique_sheet_name("  "), "Sheet");

        let long = "acme_corp_discounted_cash_flow_model_2025";
        let name = wb.unique_sheet_name(long);
        assert_eq!(name, "acme_corp_discounted_cash_flow_");
        assert_eq!(name.chars().count(), MAX_SHEET_NAME_LEN);

        wb.add_existing_worksheet(Worksheet::new("dcf")).unwrap();
        assert_eq!(wb.unique_sheet_name("DCF"), "DCF (2)");
        wb.add_existing_worksheet(Worksheet::new("dcf (2)")).unwrap();
        assert_eq!(wb.unique_sheet_name("dcf"), "dcf (3)");

        wb.add_existing_worksheet(Worksheet::new(name)).unwrap();
        let next = wb.unique_sheet_name(long);
        assert_eq!(next, "acme_corp_discounted_cash_f (2)");
        assert!(wb.add_existing_worksheet(Worksheet::new(next)).is_ok());
    }
}
