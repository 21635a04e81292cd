//! Valuation analytics over a completed model
//!
//! - [`irr`] - Newton-Raphson internal rate of return
//! - [`sensitivity`] - WACC x terminal-growth enterprise value grid
//!
//! Both are computed on demand and never stored in the model.

pub mod irr;
pub mod sensitivity;

pub use irr::{estimate_irr, irr, npv};
pub use sensitivity::{sensitivity_grid, SensitivityGrid, SensitivityInput};

use crate::error::{Error, Result};
use crate::model::{ExtractedModel, MetricKey};
use crate::options::{IrrOptions, SensitivityOptions};

impl ExtractedModel {
    /// IRR in percent of paying the enterprise value for the free cash
    /// flows plus terminal value. `None` when it cannot be computed.
    pub fn irr(&self) -> Option<f64> {
        self.irr_with_options(&IrrOptions::default())
    }

    /// [`ExtractedModel::irr`] with custom solver options
    pub fn irr_with_options(&self, options: &IrrOptions) -> Option<f64> {
        let fcf = self.series(MetricKey::Fcf)?;
        let ev = self.scalar(MetricKey::EnterpriseValue)?;
        estimate_irr(fcf, ev, self.scalar(MetricKey::TerminalValue), options)
    }

    /// Base case for the sensitivity grid, from the model's scalars
    pub fn sensitivity_input(&self) -> Result<SensitivityInput> {
        let require = |key: MetricKey| self.scalar(key).ok_or(Error::MissingInput(key));
        Ok(SensitivityInput {
            wacc: require(MetricKey::Wacc)?,
            terminal_growth: require(MetricKey::TerminalGrowth)?,
            enterprise_value: require(MetricKey::EnterpriseValue)?,
            latest_fcf: self.latest(MetricKey::Fcf),
        })
    }

    /// Sensitivity grid around the model's WACC, terminal growth and EV
    ///
    /// By default every cell rescales the base EV by the change in the Gordon
    /// multiple, so the base cell is the EV itself even when the model has a
    /// positive free cash flow. Set [`SensitivityOptions::direct_fcf`] to value
    /// cells from the latest positive FCF instead.
    pub fn sensitivity(&self, options: &SensitivityOptions) -> Result<SensitivityGrid> {
        Ok(sensitivity_grid(&self.sensitivity_input()?, options))
    }
}
