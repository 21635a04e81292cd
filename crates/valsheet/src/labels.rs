//! Row caption matching
//!
//! Captions in hand-built models vary endlessly ("Net Revenue", "Revenue ($m)",
//! "Total revenues"). Each caption is normalized and then checked against an
//! ordered registry of patterns; the first entry with a matching pattern wins.
//!
//! Registry order is part of the matching behaviour. Short patterns that also
//! occur inside longer terms (`ebit` in `ebitda`, `ev` in `revenue`, `tax`) are
//! listed after every entry that should take precedence over them.

use crate::model::MetricKey;

/// Maximum number of extra characters a caption may carry around a pattern
/// that only matches as a substring.
const SUBSTRING_SLACK: usize = 10;

/// One registry entry: a metric and the normalized captions that name it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelEntry {
    /// Metric this entry resolves to
    pub key: MetricKey,
    /// Normalized patterns, tried in order
    pub patterns: &'static [&'static str],
}

/// The built-in caption registry, in matching order
pub const DEFAULT_REGISTRY: &[LabelEntry] = &[
    LabelEntry {
        key: MetricKey::GrossMargin,
        patterns: &["gross margin", "gross profit margin"],
    },
    LabelEntry {
        key: MetricKey::EbitdaMargin,
        patterns: &["ebitda margin", "adjusted ebitda margin"],
    },
    LabelEntry {
        key: MetricKey::EbitMargin,
        patterns: &["ebit margin", "operating margin"],
    },
    LabelEntry {
        key: MetricKey::NetMargin,
        patterns: &["net margin", "net income margin", "net profit margin"],
    },
    LabelEntry {
        key: MetricKey::RevenueGrowth,
        patterns: &["revenue growth", "sales growth", "yoy growth"],
    },
    LabelEntry {
        key: MetricKey::GrossProfit,
        patterns: &["gross profit"],
    },
    LabelEntry {
        key: MetricKey::Ebitda,
        patterns: &["ebitda", "adjusted ebitda"],
    },
    LabelEntry {
        key: MetricKey::Ebit,
        patterns: &["ebit", "operating income", "operating profit"],
    },
    LabelEntry {
        key: MetricKey::DepreciationAmortization,
        patterns: &[
            "depreciation and amortization",
            "depreciation amortization",
            "depreciation",
            "amortization",
            "d a",
        ],
    },
    LabelEntry {
        key: MetricKey::PvTerminal,
        patterns: &[
            "pv of terminal value",
            "present value of terminal value",
            "pv terminal value",
            "discounted terminal value",
            "pv of tv",
            "pv tv",
        ],
    },
    LabelEntry {
        key: MetricKey::PvFcf,
        patterns: &[
            "sum of pv of fcf",
            "pv of fcf",
            "present value of fcf",
            "pv of free cash flow",
            "present value of free cash flow",
            "pv of cash flows",
            "pv fcf",
            "discounted fcf",
            "discounted cash flow",
        ],
    },
    LabelEntry {
        key: MetricKey::TerminalGrowth,
        patterns: &[
            "terminal growth rate",
            "terminal growth",
            "perpetuity growth rate",
            "perpetuity growth",
            "perpetual growth rate",
            "long term growth rate",
            "long term growth",
            "tgr",
        ],
    },
    LabelEntry {
        key: MetricKey::TerminalValue,
        patterns: &["terminal value", "tv"],
    },
    LabelEntry {
        key: MetricKey::Fcf,
        patterns: &["unlevered free cash flow", "free cash flow", "fcf", "ufcf"],
    },
    LabelEntry {
        key: MetricKey::Capex,
        patterns: &["capital expenditures", "capital expenditure", "capex"],
    },
    LabelEntry {
        key: MetricKey::NetIncome,
        patterns: &["net income", "net profit", "net earnings"],
    },
    LabelEntry {
        key: MetricKey::Cogs,
        patterns: &[
            "cost of goods sold",
            "cost of revenue",
            "cost of revenues",
            "cost of sales",
            "cogs",
        ],
    },
    LabelEntry {
        key: MetricKey::Revenue,
        patterns: &[
            "total revenue",
            "net revenue",
            "revenue",
            "revenues",
            "net sales",
            "sales",
            "turnover",
        ],
    },
    LabelEntry {
        key: MetricKey::Wacc,
        patterns: &["weighted average cost of capital", "wacc", "discount rate"],
    },
    LabelEntry {
        key: MetricKey::EquityValue,
        patterns: &["implied equity value", "equity value"],
    },
    LabelEntry {
        key: MetricKey::NetDebt,
        patterns: &["net debt"],
    },
    LabelEntry {
        key: MetricKey::EnterpriseValue,
        patterns: &["implied enterprise value", "enterprise value", "ev"],
    },
    LabelEntry {
        key: MetricKey::Tax,
        patterns: &["income tax", "taxes", "tax"],
    },
];

/// Normalize a caption for matching.
///
/// Lowercases, replaces everything outside `[a-z0-9 ]` with a space, collapses
/// whitespace runs and trims. Applying it twice changes nothing.
pub fn normalize_label(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }

    out
}

/// Does a normalized caption match a normalized pattern?
fn pattern_matches(label: &str, pattern: &str) -> bool {
    if label == pattern {
        return true;
    }
    if label
        .strip_prefix(pattern)
        .map_or(false, |rest| rest.starts_with(' '))
    {
        return true;
    }
    if label
        .strip_suffix(pattern)
        .map_or(false, |rest| rest.ends_with(' '))
    {
        return true;
    }
    label.contains(pattern) && label.len() - pattern.len() < SUBSTRING_SLACK
}

/// Resolves row captions to metric keys
#[derive(Debug, Clone, Copy)]
pub struct LabelMatcher {
    registry: &'static [LabelEntry],
}

impl LabelMatcher {
    /// Matcher over the built-in registry
    pub fn new() -> Self {
        Self::with_registry(DEFAULT_REGISTRY)
    }

    /// Matcher over a caller-supplied registry
    ///
    /// Patterns must already be normalized (see [`normalize_label`]).
    pub fn with_registry(registry: &'static [LabelEntry]) -> Self {
        Self { registry }
    }

    /// Classify a raw caption. Returns the first registry entry, in order,
    /// that has a matching pattern.
    pub fn match_label(&self, raw: &str) -> Option<MetricKey> {
        let label = normalize_label(raw);
        if label.is_empty() {
            return None;
        }
        self.match_normalized(&label)
    }

    /// Classify a caption that has already been normalized
    pub fn match_normalized(&self, label: &str) -> Option<MetricKey> {
        let key = self
            .registry
            .iter()
            .find(|entry| entry.patterns.iter().any(|p| pattern_matches(label, p)))
            .map(|entry| entry.key);

        if let Some(key) = key {
            tracing::trace!(label, %key, "matched caption");
        }
        key
    }
}

impl Default for LabelMatcher {
    fn default() -> Self {
        Self::new()
    }
}
