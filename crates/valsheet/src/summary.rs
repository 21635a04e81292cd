//! Headline figures of a completed model

use crate::model::{first_present, last_present, ExtractedModel, MetricKey};

/// The figures a summary view leads with. Each is `None` when the model
/// cannot supply it.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub latest_revenue: Option<f64>,
    /// Compound annual revenue growth, in percent
    pub revenue_cagr: Option<f64>,
    pub latest_ebitda_margin: Option<f64>,
    pub enterprise_value: Option<f64>,
    pub equity_value: Option<f64>,
    pub wacc: Option<f64>,
    pub terminal_growth: Option<f64>,
    /// IRR in percent
    pub irr: Option<f64>,
    /// PV of terminal value as a percentage of enterprise value
    pub terminal_share: Option<f64>,
}

impl Summary {
    /// Gather the summary from a derived model
    pub fn from_model(model: &ExtractedModel) -> Self {
        let enterprise_value = model.scalar(MetricKey::EnterpriseValue);

        let terminal_share = model
            .scalar(MetricKey::PvTerminal)
            .zip(enterprise_value)
            .filter(|(_, ev)| *ev != 0.0)
            .map(|(pv, ev)| pv / ev * 100.0);

        Self {
            first_year: model.years.first().copied(),
            last_year: model.years.last().copied(),
            latest_revenue: model.latest(MetricKey::Revenue),
            revenue_cagr: revenue_cagr(model),
            latest_ebitda_margin: model.latest(MetricKey::EbitdaMargin),
            enterprise_value,
            equity_value: model.scalar(MetricKey::EquityValue),
            wacc: model.scalar(MetricKey::Wacc),
            terminal_growth: model.scalar(MetricKey::TerminalGrowth),
            irr: model.irr(),
            terminal_share,
        }
    }
}

/// CAGR between the first and last present revenue values.
///
/// The period is the year difference of their columns, or the position
/// difference if the years do not increase. Both values must be positive.
fn revenue_cagr(model: &ExtractedModel) -> Option<f64> {
    let revenue = model.series(MetricKey::Revenue)?;
    let first = revenue.iter().position(Option::is_some)?;
    let last = revenue.iter().rposition(Option::is_some)?;
    if first == last {
        return None;
    }

    let start = first_present(revenue)?;
    let end = last_present(revenue)?;
    if start <= 0.0 || end <= 0.0 {
        return None;
    }

    let periods = match (model.years.get(first), model.years.get(last)) {
        (Some(a), Some(b)) if b > a => f64::from(b - a),
        _ => (last - first) as f64,
    };

    Some(((end / start).powf(1.0 / periods) - 1.0) * 100.0)
}
