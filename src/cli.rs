//! Command-line scenario inputs shared by the binaries
//!
//! Flatten [`ScenarioArgs`] into a binary's parser to get the config file,
//! vesting CSV, and per-field overrides, layered over defaults and `GRANT_*`
//! environment variables.

use std::path::PathBuf;

use clap::Args;

use crate::config::GrantConfig;
use crate::error::ValuationResult;
use crate::grant::{load_vesting_schedule, GrantKind, ValuationParameters};

#[derive(Args, Debug, Clone, Default)]
pub struct ScenarioArgs {
    /// JSON config file; missing fields use the working-sheet defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Vesting schedule CSV (`period,fraction`) for the option grant
    #[arg(long)]
    pub vesting_csv: Option<PathBuf>,

    /// Number of periods after period 0
    #[arg(long)]
    pub horizon: Option<u32>,

    /// PBT growth rate, e.g. 0.15
    #[arg(long)]
    pub growth_rate: Option<f64>,

    /// Common share redemption rate per period
    #[arg(long)]
    pub common_redemption: Option<f64>,

    /// Option redemption rate per period
    #[arg(long)]
    pub option_redemption: Option<f64>,

    /// First period in which redemption may occur
    #[arg(long)]
    pub start_period: Option<u32>,
}

impl ScenarioArgs {
    /// Defaults, then config file, then process environment, then flags
    pub fn load_config(&self) -> ValuationResult<GrantConfig> {
        let mut config = self.file_config()?;
        config.apply_env();
        self.apply_flags(&mut config);
        Ok(config)
    }

    /// As [`load_config`](Self::load_config), with `lookup` standing in for the environment
    pub fn load_config_with<F>(&self, lookup: F) -> ValuationResult<GrantConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self.file_config()?;
        config.apply_env_with(lookup);
        self.apply_flags(&mut config);
        Ok(config)
    }

    fn file_config(&self) -> ValuationResult<GrantConfig> {
        match &self.config {
            Some(path) => GrantConfig::from_json_path(path),
            None => Ok(GrantConfig::default()),
        }
    }

    fn apply_flags(&self, config: &mut GrantConfig) {
        if let Some(v) = self.horizon {
            config.horizon = v;
        }
        if let Some(v) = self.growth_rate {
            config.growth_rate = v;
        }
        if let Some(v) = self.common_redemption {
            config.common.redemption_rate = v;
        }
        if let Some(v) = self.option_redemption {
            config.options.redemption_rate = v;
        }
        if let Some(v) = self.start_period {
            config.start_redemption_period = v;
        }
    }

    /// Common and option parameters, with the vesting CSV applied if given
    pub fn parameters(
        &self,
        config: &GrantConfig,
    ) -> ValuationResult<(ValuationParameters, ValuationParameters)> {
        let common = config.common_parameters();
        let mut option = config.option_parameters();
        if let Some(path) = &self.vesting_csv {
            option.kind = GrantKind::Option {
                vesting: load_vesting_schedule(path)?,
            };
        }
        Ok((common, option))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::{SensitivitySweep, SweepOverride, CHART_PERIODS};
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        scenario: ScenarioArgs,
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = TestCli::try_parse_from([
            "grant_sweep",
            "--horizon",
            "4",
            "--growth-rate",
            "0.2",
            "--start-period",
            "3",
            "--option-redemption",
            "0.1",
        ])
        .unwrap();

        let config = cli.scenario.load_config_with(no_env).unwrap();
        assert_eq!(config.horizon, 4);
        assert_eq!(config.growth_rate, 0.2);
        assert_eq!(config.start_redemption_period, 3);
        assert_eq!(config.options.redemption_rate, 0.1);
        assert_eq!(config.common.redemption_rate, 0.05);
    }

    #[test]
    fn test_flags_beat_environment() {
        let cli = TestCli::try_parse_from(["grant_sweep", "--growth-rate", "0.1"]).unwrap();
        let config = cli
            .scenario
            .load_config_with(|key| match key {
                "GRANT_GROWTH_RATE" => Some("0.2".to_string()),
                "GRANT_START_REDEMPTION_PERIOD" => Some("1".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.growth_rate, 0.1);
        assert_eq!(config.start_redemption_period, 1);
    }

    #[test]
    fn test_vesting_csv_replaces_option_schedule() {
        let dir = std::env::temp_dir().join(format!("grant_valuation_cli_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("vesting.csv");
        std::fs::write(&path, "period,fraction\n1,0.5\n2,0.5\n3,1.0\n").unwrap();

        let cli = TestCli::try_parse_from([
            "grant_sweep",
            "--horizon",
            "3",
            "--vesting-csv",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let config = cli.scenario.load_config_with(no_env).unwrap();
        let (common, option) = cli.scenario.parameters(&config).unwrap();

        assert_eq!(common.kind, GrantKind::Common);
        let vesting = option.kind.vesting().unwrap();
        assert_eq!(vesting.fraction(1), Some(0.5));
        assert_eq!(vesting.fraction(3), Some(1.0));
        assert_eq!(option.horizon, 3);
        assert!(option.validate().is_ok());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_sweep_runs_on_flagged_scenario() {
        let cli = TestCli::try_parse_from([
            "grant_sweep",
            "--horizon",
            "4",
            "--growth-rate",
            "0.0",
            "--start-period",
            "1",
        ])
        .unwrap();
        let config = cli.scenario.load_config_with(no_env).unwrap();
        let (common, _) = cli.scenario.parameters(&config).unwrap();

        let results = SensitivitySweep::new(common)
            .run(&[SweepOverride::redemption(0.0), SweepOverride::redemption(0.5)])
            .unwrap();

        assert_eq!(results.len(), 2);
        for result in &results {
            assert_eq!(result.series.rows.len(), 5);
            assert_eq!(result.growth_rate, 0.0);
        }
        // Price never leaves the purchase price, so there is no gain to realise
        assert_eq!(results[1].total_values_in(CHART_PERIODS), vec![0.0; 4]);
    }

    #[test]
    fn test_missing_vesting_csv_is_an_error() {
        let args = ScenarioArgs {
            vesting_csv: Some(PathBuf::from("/nonexistent/vesting.csv")),
            ..Default::default()
        };
        let config = args.load_config_with(no_env).unwrap();
        assert!(args.parameters(&config).is_err());
    }
}
