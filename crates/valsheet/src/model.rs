//! The extracted financial model

use std::collections::BTreeMap;
use std::fmt;

/// One value per detected fiscal year; `None` where the sheet had no number.
pub type Series = Vec<Option<f64>>;

/// Canonical identifier every recognised row caption is mapped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum MetricKey {
    Revenue,
    RevenueGrowth,
    Cogs,
    GrossProfit,
    GrossMargin,
    Ebitda,
    EbitdaMargin,
    Ebit,
    EbitMargin,
    DepreciationAmortization,
    Tax,
    NetIncome,
    NetMargin,
    Capex,
    Fcf,
    PvFcf,
    Wacc,
    TerminalGrowth,
    TerminalValue,
    PvTerminal,
    EnterpriseValue,
    NetDebt,
    EquityValue,
}

impl MetricKey {
    /// Every key, in display order
    pub const ALL: [MetricKey; 23] = [
        MetricKey::Revenue,
        MetricKey::RevenueGrowth,
        MetricKey::Cogs,
        MetricKey::GrossProfit,
        MetricKey::GrossMargin,
        MetricKey::Ebitda,
        MetricKey::EbitdaMargin,
        MetricKey::Ebit,
        MetricKey::EbitMargin,
        MetricKey::DepreciationAmortization,
        MetricKey::Tax,
        MetricKey::NetIncome,
        MetricKey::NetMargin,
        MetricKey::Capex,
        MetricKey::Fcf,
        MetricKey::PvFcf,
        MetricKey::Wacc,
        MetricKey::TerminalGrowth,
        MetricKey::TerminalValue,
        MetricKey::PvTerminal,
        MetricKey::EnterpriseValue,
        MetricKey::NetDebt,
        MetricKey::EquityValue,
    ];

    /// Stable identifier, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::Revenue => "revenue",
            MetricKey::RevenueGrowth => "revenueGrowth",
            MetricKey::Cogs => "cogs",
            MetricKey::GrossProfit => "grossProfit",
            MetricKey::GrossMargin => "grossMargin",
            MetricKey::Ebitda => "ebitda",
            MetricKey::EbitdaMargin => "ebitdaMargin",
            MetricKey::Ebit => "ebit",
            MetricKey::EbitMargin => "ebitMargin",
            MetricKey::DepreciationAmortization => "depreciationAmortization",
            MetricKey::Tax => "tax",
            MetricKey::NetIncome => "netIncome",
            MetricKey::NetMargin => "netMargin",
            MetricKey::Capex => "capex",
            MetricKey::Fcf => "fcf",
            MetricKey::PvFcf => "pvFcf",
            MetricKey::Wacc => "wacc",
            MetricKey::TerminalGrowth => "terminalGrowth",
            MetricKey::TerminalValue => "terminalValue",
            MetricKey::PvTerminal => "pvTerminal",
            MetricKey::EnterpriseValue => "enterpriseValue",
            MetricKey::NetDebt => "netDebt",
            MetricKey::EquityValue => "equityValue",
        }
    }

    /// Human-readable caption
    pub fn caption(&self) -> &'static str {
        match self {
            MetricKey::Revenue => "Revenue",
            MetricKey::RevenueGrowth => "Revenue Growth (%)",
            MetricKey::Cogs => "COGS",
            MetricKey::GrossProfit => "Gross Profit",
            MetricKey::GrossMargin => "Gross Margin (%)",
            MetricKey::Ebitda => "EBITDA",
            MetricKey::EbitdaMargin => "EBITDA Margin (%)",
            MetricKey::Ebit => "EBIT",
            MetricKey::EbitMargin => "EBIT Margin (%)",
            MetricKey::DepreciationAmortization => "D&A",
            MetricKey::Tax => "Tax",
            MetricKey::NetIncome => "Net Income",
            MetricKey::NetMargin => "Net Margin (%)",
            MetricKey::Capex => "Capex",
            MetricKey::Fcf => "Free Cash Flow",
            MetricKey::PvFcf => "PV of FCF",
            MetricKey::Wacc => "WACC (%)",
            MetricKey::TerminalGrowth => "Terminal Growth (%)",
            MetricKey::TerminalValue => "Terminal Value",
            MetricKey::PvTerminal => "PV of Terminal Value",
            MetricKey::EnterpriseValue => "Enterprise Value",
            MetricKey::NetDebt => "Net Debt",
            MetricKey::EquityValue => "Equity Value",
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A financial model pulled out of one sheet
///
/// Every entry of `series` has exactly `years.len()` positions.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractedModel {
    /// Fiscal years in the order their columns appear
    pub years: Vec<i32>,
    /// Per-year value tracks
    pub series: BTreeMap<MetricKey, Series>,
    /// Point-in-time values
    pub scalars: BTreeMap<MetricKey, f64>,
}

impl ExtractedModel {
    /// Create an empty model over the given years
    pub fn new(years: Vec<i32>) -> Self {
        Self {
            years,
            ..Self::default()
        }
    }

    /// Get a series by key
    pub fn series(&self, key: MetricKey) -> Option<&[Option<f64>]> {
        self.series.get(&key).map(Vec::as_slice)
    }

    /// Get a scalar by key
    pub fn scalar(&self, key: MetricKey) -> Option<f64> {
        self.scalars.get(&key).copied()
    }

    /// Last present value of a series
    pub fn latest(&self, key: MetricKey) -> Option<f64> {
        self.series(key).and_then(last_present)
    }

    /// Check if nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.series.is_empty() && self.scalars.is_empty()
    }

    /// Extraction quality score: scalars count double, being rarer and
    /// carrying the valuation itself.
    pub fn score(&self) -> usize {
        self.series.len() + 2 * self.scalars.len()
    }
}

/// First present value of a series
pub(crate) fn first_present(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().next().copied()
}

/// Last present value of a series
pub(crate) fn last_present(values: &[Option<f64>]) -> Option<f64> {
    values.iter().rev().flatten().next().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_helpers() {
        let values = vec![None, Some(1.0), None, Some(3.0), None];
        assert_eq!(first_present(&values), Some(1.0));
        assert_eq!(last_present(&values), Some(3.0));
        assert_eq!(first_present(&[None, None]), None);
        assert_eq!(last_present(&[]), None);
    }

    #[test]
    fn test_score() {
        let mut model = ExtractedModel::new(vec![2024, 2025]);
        assert_eq!(model.score(), 0);
        assert!(model.is_empty());

        model.series.insert(MetricKey::Revenue, vec![Some(1.0), Some(2.0)]);
        model.scalars.insert(MetricKey::Wacc, 9.0);
        model.scalars.insert(MetricKey::EnterpriseValue, 500.0);
        assert_eq!(model.score(), 5);
        assert_eq!(model.latest(MetricKey::Revenue), Some(2.0));
        assert_eq!(model.scalar(MetricKey::Wacc), Some(9.0));
    }

    #[test]
    fn test_key_names_are_unique() {
        let mut names: Vec<_> = MetricKey::ALL.iter().map(MetricKey::as_str).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), MetricKey::ALL.len());
        assert_eq!(MetricKey::PvTerminal.to_string(), "pvTerminal");
    }
}
