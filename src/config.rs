//! Working-sheet configuration
//!
//! Collects the scalar assumptions from a JSON file and environment
//! variables, then hands the engine one immutable [`ValuationParameters`]
//! per grant class. Defaults match the working sheet's input panel.

use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ValuationResult;
use crate::grant::{ValuationParameters, VestingSchedule, DEFAULT_HORIZON, DEFAULT_VESTING_STEP};

fn default_horizon() -> u32 { DEFAULT_HORIZON }
fn default_growth_rate() -> f64 { 0.15 }
fn default_start_redemption_period() -> u32 { 2 }
fn default_redemption_rate() -> f64 { 0.05 }
fn default_total_shares() -> f64 { 10_000.0 }
fn default_purchase_price() -> f64 { 1.00 }
fn default_strike_price() -> f64 { 10.00 }

/// Common share inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonConfig {
    #[serde(default = "default_redemption_rate")]
    pub redemption_rate: f64,

    #[serde(default = "default_total_shares")]
    pub total_shares: f64,

    #[serde(default = "default_purchase_price")]
    pub purchase_price: f64,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            redemption_rate: default_redemption_rate(),
            total_shares: default_total_shares(),
            purchase_price: default_purchase_price(),
        }
    }
}

/// A-share / option inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionConfig {
    #[serde(default = "default_redemption_rate")]
    pub redemption_rate: f64,

    #[serde(default = "default_total_shares")]
    pub total_shares: f64,

    #[serde(default = "default_strike_price")]
    pub strike_price: f64,

    /// Cumulative vested fraction per period, starting at period 1.
    /// Graded 25% per period when absent.
    #[serde(default)]
    pub vesting: Option<Vec<f64>>,
}

impl Default for OptionConfig {
    fn default() -> Self {
        Self {
            redemption_rate: default_redemption_rate(),
            total_shares: default_total_shares(),
            strike_price: default_strike_price(),
            vesting: None,
        }
    }
}

/// All inputs for one working-sheet run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantConfig {
    #[serde(default = "default_horizon")]
    pub horizon: u32,

    /// PBT growth rate applied to the share price
    #[serde(default = "default_growth_rate")]
    pub growth_rate: f64,

    #[serde(default = "default_start_redemption_period")]
    pub start_redemption_period: u32,

    #[serde(default)]
    pub common: CommonConfig,

    #[serde(default)]
    pub options: OptionConfig,
}

impl Default for GrantConfig {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            growth_rate: default_growth_rate(),
            start_redemption_period: default_start_redemption_period(),
            common: CommonConfig::default(),
            options: OptionConfig::default(),
        }
    }
}

impl GrantConfig {
    pub fn from_json_str(json: &str) -> ValuationResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> ValuationResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Apply `GRANT_*` overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply `GRANT_*` overrides from any key lookup.
    /// Unparseable values are ignored with a warning.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_env(&lookup, "GRANT_HORIZON") {
            self.horizon = v;
        }
        if let Some(v) = parse_env(&lookup, "GRANT_GROWTH_RATE") {
            self.growth_rate = v;
        }
        if let Some(v) = parse_env(&lookup, "GRANT_START_REDEMPTION_PERIOD") {
            self.start_redemption_period = v;
        }
        if let Some(v) = parse_env(&lookup, "GRANT_COMMON_REDEMPTION_RATE") {
            self.common.redemption_rate = v;
        }
        if let Some(v) = parse_env(&lookup, "GRANT_OPTION_REDEMPTION_RATE") {
            self.options.redemption_rate = v;
        }
    }

    /// Vesting schedule for the option grant over the configured horizon
    pub fn vesting_schedule(&self) -> VestingSchedule {
        match &self.options.vesting {
            Some(fractions) => VestingSchedule::from_fractions(fractions),
            None => VestingSchedule::graded(DEFAULT_VESTING_STEP, self.horizon),
        }
    }

    pub fn common_parameters(&self) -> ValuationParameters {
        ValuationParameters::common(
            self.common.total_shares,
            self.common.purchase_price,
            self.growth_rate,
            self.common.redemption_rate,
            self.start_redemption_period,
        )
        .with_horizon(self.horizon)
    }

    pub fn option_parameters(&self) -> ValuationParameters {
        ValuationParameters::option(
            self.options.total_shares,
            self.options.strike_price,
            self.growth_rate,
            self.options.redemption_rate,
            self.start_redemption_period,
            self.vesting_schedule(),
        )
        .with_horizon(self.horizon)
    }
}

fn parse_env<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grant::GrantKind;
    use crate::projection::project_grant;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_working_sheet() {
        let config = GrantConfig::default();
        let common = config.common_parameters();
        let option = config.option_parameters();

        assert_eq!(common.horizon, 10);
        assert_eq!(common.growth_rate, 0.15);
        assert_eq!(common.redemption_rate, 0.05);
        assert_eq!(common.start_redemption_period, 2);
        assert_eq!(common.total_shares, 10_000.0);
        assert_eq!(common.basis_price, 1.0);
        assert_eq!(common.kind, GrantKind::Common);

        assert_eq!(option.basis_price, 10.0);
        let vesting = option.kind.vesting().unwrap();
        assert_eq!(vesting.fraction(1), Some(0.25));
        assert_eq!(vesting.fraction(10), Some(1.0));

        assert!(project_grant(&common).is_ok());
        assert!(project_grant(&option).is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "growth_rate": 0.2,
            "common": { "total_shares": 5000 },
            "options": { "vesting": [0.5, 1.0, 1.0] },
            "horizon": 3
        }"#;
        let config = GrantConfig::from_json_str(json).unwrap();

        assert_eq!(config.growth_rate, 0.2);
        assert_eq!(config.start_redemption_period, 2);
        assert_eq!(config.common.total_shares, 5_000.0);
        assert_eq!(config.common.purchase_price, 1.0);
        assert_eq!(config.options.strike_price, 10.0);

        let option = config.option_parameters();
        assert_eq!(option.horizon, 3);
        assert_eq!(project_grant(&option).unwrap().rows[1].vested_shares, Some(5_000.0));
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(GrantConfig::from_json_str("{}").unwrap(), GrantConfig::default());
    }

    #[test]
    fn test_malformed_json() {
        assert!(GrantConfig::from_json_str("{ \"growth_rate\": \"fast\" }").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GRANT_GROWTH_RATE", "0.2"),
            ("GRANT_START_REDEMPTION_PERIOD", "3"),
            ("GRANT_OPTION_REDEMPTION_RATE", "0.1"),
            ("GRANT_HORIZON", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = GrantConfig::default();
        config.apply_env_with(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.growth_rate, 0.2);
        assert_eq!(config.start_redemption_period, 3);
        assert_eq!(config.options.redemption_rate, 0.1);
        assert_eq!(config.common.redemption_rate, 0.05);
        assert_eq!(config.horizon, 10);
    }
}
