//! Filling in metrics the sheet implies but does not state
//!
//! Rules run once, in a fixed order; later rules see what earlier ones filled
//! in. A rule never overwrites a value that was extracted, and an absent
//! input skips the year (or the rule) rather than counting as zero.

use std::collections::BTreeMap;

use crate::model::{first_present, last_present, ExtractedModel, MetricKey, Series};

type SeriesMap = BTreeMap<MetricKey, Series>;
type ScalarMap = BTreeMap<MetricKey, f64>;

/// Complete a raw model with derived series and scalars.
///
/// The input is left untouched; the result is a new model.
pub fn derive(model: &ExtractedModel) -> ExtractedModel {
    let mut series = model.series.clone();
    let mut scalars = model.scalars.clone();

    derive_profit_lines(&mut series);
    derive_margins(&mut series);
    derive_rates(&series, &mut scalars);
    derive_valuation(&series, &mut scalars);

    ExtractedModel {
        years: model.years.clone(),
        series,
        scalars,
    }
}

/// Apply `f` pairwise where both inputs are present
fn combine<F>(a: &[Option<f64>], b: &[Option<f64>], f: F) -> Series
where
    F: Fn(f64, f64) -> Option<f64>,
{
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => f(*x, *y),
            _ => None,
        })
        .collect()
}

/// Derive `target` from two existing series unless it was extracted.
/// Nothing is inserted when no year could be computed.
fn derive_series<F>(series: &mut SeriesMap, target: MetricKey, a: MetricKey, b: MetricKey, f: F)
where
    F: Fn(f64, f64) -> Option<f64>,
{
    if series.contains_key(&target) {
        return;
    }
    let (Some(xs), Some(ys)) = (series.get(&a), series.get(&b)) else {
        return;
    };
    let values = combine(xs, ys, f);
    if values.iter().any(Option::is_some) {
        tracing::trace!(%target, "derived series");
        series.insert(target, values);
    }
}

fn derive_profit_lines(series: &mut SeriesMap) {
    use MetricKey::*;

    // COGS and D&A are sometimes entered negative; only their size matters
    derive_series(series, GrossProfit, Revenue, Cogs, |rev, cogs| {
        Some(rev - cogs.abs())
    });
    derive_series(series, Ebitda, Ebit, DepreciationAmortization, |ebit, da| {
        Some(ebit + da.abs())
    });
    derive_series(series, Ebit, Ebitda, DepreciationAmortization, |ebitda, da| {
        Some(ebitda - da.abs())
    });
}

fn derive_margins(series: &mut SeriesMap) {
    use MetricKey::*;

    for (margin, numerator) in [
        (GrossMargin, GrossProfit),
        (EbitdaMargin, Ebitda),
        (NetMargin, NetIncome),
    ] {
        derive_series(series, margin, numerator, Revenue, |num, rev| {
            (rev != 0.0).then(|| num / rev * 100.0)
        });
    }
}

/// WACC and terminal growth as percentages
fn derive_rates(series: &SeriesMap, scalars: &mut ScalarMap) {
    for key in [MetricKey::Wacc, MetricKey::TerminalGrowth] {
        if !scalars.contains_key(&key) {
            if let Some(first) = series.get(&key).and_then(|s| first_present(s)) {
                scalars.insert(key, first);
            }
        }

        // 0.09 means 9%
        if let Some(rate) = scalars.get_mut(&key) {
            if *rate > 0.0 && *rate < 1.0 {
                *rate *= 100.0;
            }
        }
    }
}

fn derive_valuation(series: &SeriesMap, scalars: &mut ScalarMap) {
    use MetricKey::*;

    let latest = |key: MetricKey| series.get(&key).and_then(|s| last_present(s));

    for key in [EnterpriseValue, TerminalValue, EquityValue] {
        if !scalars.contains_key(&key) {
            if let Some(value) = latest(key) {
                scalars.insert(key, value);
            }
        }
    }

    // No net debt adjustment is attempted
    if !scalars.contains_key(&EquityValue) {
        if let Some(&ev) = scalars.get(&EnterpriseValue) {
            scalars.insert(EquityValue, ev);
        }
    }

    if !scalars.contains_key(&PvFcf) {
        if let Some(pv) = series.get(&PvFcf).filter(|s| s.iter().any(Option::is_some)) {
            scalars.insert(PvFcf, pv.iter().flatten().sum());
        }
    }

    if !scalars.contains_key(&PvTerminal) {
        if let Some(value) = latest(PvTerminal) {
            scalars.insert(PvTerminal, value);
        }
    }

    // Split EV into its two present-value parts when one part is known
    let ev = scalars.get(&EnterpriseValue).copied();
    let pv_fcf = scalars.get(&PvFcf).copied();
    let pv_terminal = scalars.get(&PvTerminal).copied();
    match (ev, pv_fcf, pv_terminal) {
        (Some(ev), None, Some(pv_terminal)) => {
            scalars.insert(PvFcf, ev - pv_terminal);
        }
        (Some(ev), Some(pv_fcf), None) => {
            scalars.insert(PvTerminal, ev - pv_fcf);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn model(years: usize) -> ExtractedModel {
        ExtractedModel::new((0..years as i32).map(|i| 2024 + i).collect())
    }

    fn s(values: &[Option<f64>]) -> Series {
        values.to_vec()
    }

    #[test]
    fn test_gross_profit_uses_cogs_magnitude() {
        let mut m = model(3);
        m.series.insert(MetricKey::Revenue, s(&[Some(100.0), Some(110.0), None]));
        m.series.insert(MetricKey::Cogs, s(&[Some(-60.0), Some(65.0), Some(70.0)]));

        let d = derive(&m);
        assert_eq!(
            d.series(MetricKey::GrossProfit),
            Some(&[Some(40.0), Some(45.0), None][..])
        );
        // The input model is untouched
        assert!(m.series(MetricKey::GrossProfit).is_none());
    }

    #[test]
    fn test_extracted_series_are_not_overwritten() {
        let mut m = model(1);
        m.series.insert(MetricKey::Revenue, s(&[Some(100.0)]));
        m.series.insert(MetricKey::Cogs, s(&[Some(60.0)]));
        m.series.insert(MetricKey::GrossProfit, s(&[Some(41.0)]));
        m.series.insert(MetricKey::GrossMargin, s(&[Some(50.0)]));

        let d = derive(&m);
        assert_eq!(d.series(MetricKey::GrossProfit), Some(&[Some(41.0)][..]));
        assert_eq!(d.series(MetricKey::GrossMargin), Some(&[Some(50.0)][..]));
    }

    #[test]
    fn test_ebitda_from_ebit_and_back() {
        let mut m = model(2);
        m.series.insert(MetricKey::Ebit, s(&[Some(30.0), None]));
        m.series
            .insert(MetricKey::DepreciationAmortization, s(&[Some(-5.0), Some(6.0)]));
        let d = derive(&m);
        assert_eq!(d.series(MetricKey::Ebitda), Some(&[Some(35.0), None][..]));

        let mut m = model(2);
        m.series.insert(MetricKey::Ebitda, s(&[Some(50.0), Some(60.0)]));
        m.series
            .insert(MetricKey::DepreciationAmortization, s(&[Some(10.0), Some(10.0)]));
        let d = derive(&m);
        assert_eq!(d.series(MetricKey::Ebit), Some(&[Some(40.0), Some(50.0)][..]));
    }

    #[test]
    fn test_margins() {
        let mut m = model(3);
        m.series
            .insert(MetricKey::Revenue, s(&[Some(200.0), Some(0.0), None]));
        m.series.insert(MetricKey::Ebitda, s(&[Some(0.0), Some(5.0), Some(5.0)]));
        m.series.insert(MetricKey::NetIncome, s(&[Some(20.0), None, None]));

        let d = derive(&m);
        // Zero numerator is a real 0%; zero revenue has no margin
        assert_eq!(
            d.series(MetricKey::EbitdaMargin),
            Some(&[Some(0.0), None, None][..])
        );
        assert_eq!(
            d.series(MetricKey::NetMargin),
            Some(&[Some(10.0), None, None][..])
        );
        assert_eq!(d.series(MetricKey::GrossMargin), None);
    }

    #[test]
    fn test_nothing_derivable_inserts_nothing() {
        let mut m = model(2);
        m.series.insert(MetricKey::Revenue, s(&[Some(1.0), None]));
        m.series.insert(MetricKey::Cogs, s(&[None, Some(1.0)]));

        let d = derive(&m);
        assert_eq!(d.series(MetricKey::GrossProfit), None);
    }

    #[test]
    fn test_rates_promoted_and_scaled() {
        let mut m = model(3);
        m.series.insert(MetricKey::Wacc, s(&[None, Some(0.085), Some(0.09)]));
        m.scalars.insert(MetricKey::TerminalGrowth, 2.5);

        let d = derive(&m);
        assert!((d.scalar(MetricKey::Wacc).unwrap() - 8.5).abs() < 1e-9);
        // Already a percentage
        assert_eq!(d.scalar(MetricKey::TerminalGrowth), Some(2.5));
        // The series survives beside the scalar
        assert!(d.series(MetricKey::Wacc).is_some());
    }

    #[test]
    fn test_rate_bounds_are_exclusive() {
        let mut m = model(0);
        m.scalars.insert(MetricKey::Wacc, 1.0);
        m.scalars.insert(MetricKey::TerminalGrowth, 0.0);

        let d = derive(&m);
        assert_eq!(d.scalar(MetricKey::Wacc), Some(1.0));
        assert_eq!(d.scalar(MetricKey::TerminalGrowth), Some(0.0));
    }

    #[test]
    fn test_value_scalars_from_series() {
        let mut m = model(3);
        m.series
            .insert(MetricKey::EnterpriseValue, s(&[Some(900.0), Some(1000.0), None]));
        m.series
            .insert(MetricKey::TerminalValue, s(&[None, None, Some(1500.0)]));

        let d = derive(&m);
        assert_eq!(d.scalar(MetricKey::EnterpriseValue), Some(1000.0));
        assert_eq!(d.scalar(MetricKey::TerminalValue), Some(1500.0));
        // Equity falls back to EV
        assert_eq!(d.scalar(MetricKey::EquityValue), Some(1000.0));
    }

    #[test]
    fn test_equity_value_kept_when_extracted() {
        let mut m = model(0);
        m.scalars.insert(MetricKey::EnterpriseValue, 1000.0);
        m.scalars.insert(MetricKey::EquityValue, 800.0);

        let d = derive(&m);
        assert_eq!(d.scalar(MetricKey::EquityValue), Some(800.0));
    }

    #[test]
    fn test_pv_fcf_sums_series() {
        let mut m = model(4);
        m.series
            .insert(MetricKey::PvFcf, s(&[Some(10.0), None, Some(12.0), Some(13.0)]));
        m.series
            .insert(MetricKey::PvTerminal, s(&[None, None, None, Some(400.0)]));

        let d = derive(&m);
        assert_eq!(d.scalar(MetricKey::PvFcf), Some(35.0));
        assert_eq!(d.scalar(MetricKey::PvTerminal), Some(400.0));
        // No EV, so no split
        assert_eq!(d.scalar(MetricKey::EnterpriseValue), None);
    }

    #[test]
    fn test_ev_split_fills_either_side() {
        let mut m = model(0);
        m.scalars.insert(MetricKey::EnterpriseValue, 1000.0);
        m.scalars.insert(MetricKey::PvTerminal, 650.0);
        let d = derive(&m);
        assert_eq!(d.scalar(MetricKey::PvFcf), Some(350.0));

        let mut m = model(0);
        m.scalars.insert(MetricKey::EnterpriseValue, 1000.0);
        m.scalars.insert(MetricKey::PvFcf, 300.0);
        let d = derive(&m);
        assert_eq!(d.scalar(MetricKey::PvTerminal), Some(700.0));

        // Both known: neither is touched
        let mut m = model(0);
        m.scalars.insert(MetricKey::EnterpriseValue, 1000.0);
        m.scalars.insert(MetricKey::PvFcf, 300.0);
        m.scalars.insert(MetricKey::PvTerminal, 600.0);
        let d = derive(&m);
        assert_eq!(d.scalar(MetricKey::PvFcf), Some(300.0));
        assert_eq!(d.scalar(MetricKey::PvTerminal), Some(600.0));

        // Only EV: nothing to split
        let mut m = model(0);
        m.scalars.insert(MetricKey::EnterpriseValue, 1000.0);
        let d = derive(&m);
        assert_eq!(d.scalar(MetricKey::PvFcf), None);
        assert_eq!(d.scalar(MetricKey::PvTerminal), None);
    }

    #[test]
    fn test_derive_is_deterministic() {
        let mut m = model(2);
        m.series.insert(MetricKey::Revenue, s(&[Some(100.0), Some(120.0)]));
        m.series.insert(MetricKey::Cogs, s(&[Some(50.0), Some(55.0)]));
        m.scalars.insert(MetricKey::Wacc, 0.1);
        assert_eq!(derive(&m), derive(&m));
    }
}
