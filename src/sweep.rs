//! Sensitivity sweeps over redemption and growth assumptions
//!
//! Re-runs the valuation engine once per override against a fixed base set
//! of parameters. Results always come back in the order the overrides were
//! given; chart labels rely on that positional correspondence.

use std::ops::RangeInclusive;

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ValuationResult;
use crate::grant::ValuationParameters;
use crate::projection::{combine, project_grant, CombinedSeries, PeriodSeries};

/// Redemption rates compared at the configured growth rate
pub const STANDARD_REDEMPTION_RATES: [f64; 3] = [0.00, 0.05, 0.10];

/// Growth rates compared at zero redemption
pub const STANDARD_GROWTH_RATES: [f64; 2] = [0.15, 0.20];

/// Periods shown on sweep charts
pub const CHART_PERIODS: RangeInclusive<u32> = 1..=9;

/// Replacement values for one sweep run; `None` keeps the base value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepOverride {
    pub label: String,
    pub redemption_rate: Option<f64>,
    pub growth_rate: Option<f64>,
}

impl SweepOverride {
    pub fn redemption(rate: f64) -> Self {
        Self {
            label: format!("{}% Redemption", percent_label(rate)),
            redemption_rate: Some(rate),
            growth_rate: None,
        }
    }

    pub fn growth(rate: f64) -> Self {
        Self {
            label: format!("{}% PBT Growth", percent_label(rate)),
            redemption_rate: None,
            growth_rate: Some(rate),
        }
    }

    /// Override both rates at once
    pub fn both(growth_rate: f64, redemption_rate: f64) -> Self {
        Self {
            label: format!(
                "{}% PBT Growth, {}% Redemption",
                percent_label(growth_rate),
                percent_label(redemption_rate)
            ),
            redemption_rate: Some(redemption_rate),
            growth_rate: Some(growth_rate),
        }
    }

    /// Base parameters with this override's rates substituted
    pub fn apply(&self, base: &ValuationParameters) -> ValuationParameters {
        let mut params = base.clone();
        if let Some(rate) = self.redemption_rate {
            params.redemption_rate = rate;
        }
        if let Some(rate) = self.growth_rate {
            params.growth_rate = rate;
        }
        params
    }
}

/// One labelled projection from a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub label: String,
    pub redemption_rate: f64,
    pub growth_rate: f64,
    pub series: PeriodSeries,
}

impl SweepResult {
    /// Total grant value for the given periods (clipped to the horizon)
    pub fn total_values_in(&self, periods: RangeInclusive<u32>) -> Vec<f64> {
        periods
            .filter_map(|p| self.series.row(p))
            .map(|r| r.total_value)
            .collect()
    }
}

/// Runs one grant class under a list of alternative assumptions
#[derive(Debug, Clone)]
pub struct SensitivitySweep {
    base: ValuationParameters,
}

impl SensitivitySweep {
    pub fn new(base: ValuationParameters) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &ValuationParameters {
        &self.base
    }

    /// Run every override in order; the first invalid combination aborts the sweep
    pub fn run(&self, overrides: &[SweepOverride]) -> ValuationResult<Vec<SweepResult>> {
        info!(
            "{} sweep: {} scenarios",
            self.base.kind.name(),
            overrides.len()
        );
        overrides.iter().map(|o| self.run_one(o)).collect()
    }

    /// Same as [`SensitivitySweep::run`], with scenarios projected on the rayon pool
    pub fn run_parallel(&self, overrides: &[SweepOverride]) -> ValuationResult<Vec<SweepResult>> {
        info!(
            "{} sweep: {} scenarios (parallel)",
            self.base.kind.name(),
            overrides.len()
        );
        overrides.par_iter().map(|o| self.run_one(o)).collect()
    }

    /// Compare redemption rates at the base growth rate
    pub fn redemption_rates(&self, rates: &[f64]) -> ValuationResult<Vec<SweepResult>> {
        let overrides: Vec<_> = rates.iter().map(|&r| SweepOverride::redemption(r)).collect();
        self.run(&overrides)
    }

    /// Compare growth rates at the base redemption rate
    pub fn growth_rates(&self, rates: &[f64]) -> ValuationResult<Vec<SweepResult>> {
        let overrides: Vec<_> = rates.iter().map(|&r| SweepOverride::growth(r)).collect();
        self.run(&overrides)
    }

    fn run_one(&self, sweep_override: &SweepOverride) -> ValuationResult<SweepResult> {
        let params = sweep_override.apply(&self.base);
        let series = project_grant(&params)?;
        Ok(SweepResult {
            label: sweep_override.label.clone(),
            redemption_rate: params.redemption_rate,
            growth_rate: params.growth_rate,
            series,
        })
    }
}

/// Combined value of both grant classes at one growth rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedSweepResult {
    pub label: String,
    pub growth_rate: f64,
    pub combined: CombinedSeries,
}

impl CombinedSweepResult {
    pub fn combined_values_in(&self, periods: RangeInclusive<u32>) -> Vec<f64> {
        periods
            .filter_map(|p| self.combined.row(p))
            .map(|r| r.combined_value)
            .collect()
    }
}

/// Combined common + option value per growth rate, with no redemption
pub fn combined_growth_sweep(
    common: &ValuationParameters,
    option: &ValuationParameters,
    growth_rates: &[f64],
) -> ValuationResult<Vec<CombinedSweepResult>> {
    info!("combined growth sweep: {} scenarios", growth_rates.len());

    growth_rates
        .iter()
        .map(|&rate| {
            let scenario = SweepOverride::both(rate, 0.0);
            let common_series = project_grant(&scenario.apply(common))?;
            let option_series = project_grant(&scenario.apply(option))?;
            Ok(CombinedSweepResult {
                label: SweepOverride::growth(rate).label,
                growth_rate: rate,
                combined: combine(&common_series, &option_series)?,
            })
        })
        .collect()
}

/// Percentage label without trailing zeros (0.05 -> "5", 0.125 -> "12.5")
fn percent_label(rate: f64) -> String {
    let pct = rate * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{:.0}", pct)
    } else {
        let text = format!("{:.4}", pct);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
