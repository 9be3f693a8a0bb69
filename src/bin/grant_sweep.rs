//! Sensitivity sweeps for the grant working sheet
//!
//! Compares total grant value at several redemption rates (per grant class)
//! and combined value at several growth rates with no redemption. Prints the
//! chart window (periods 1-9) and optionally writes one CSV per sweep.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use csv::Writer;

use grant_valuation::{
    cli::ScenarioArgs,
    sweep::{
        combined_growth_sweep, CombinedSweepResult, SensitivitySweep, SweepOverride, SweepResult,
        CHART_PERIODS, STANDARD_GROWTH_RATES, STANDARD_REDEMPTION_RATES,
    },
    ResultFormatter,
};

#[derive(Parser, Debug)]
#[command(name = "grant_sweep", version, about = "Redemption and growth sensitivity sweeps")]
struct Args {
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Redemption rates to compare
    #[arg(long, value_delimiter = ',')]
    redemption_rates: Option<Vec<f64>>,

    /// Growth rates to compare (combined value, zero redemption)
    #[arg(long, value_delimiter = ',')]
    growth_rates: Option<Vec<f64>>,

    /// Project scenarios on the rayon thread pool
    #[arg(long)]
    parallel: bool,

    /// Directory for sweep CSVs
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.scenario.load_config().context("loading configuration")?;
    let (common_params, option_params) = args
        .scenario
        .parameters(&config)
        .context("reading vesting schedule")?;

    let redemption_rates = args
        .redemption_rates
        .clone()
        .unwrap_or_else(|| STANDARD_REDEMPTION_RATES.to_vec());
    let growth_rates = args
        .growth_rates
        .clone()
        .unwrap_or_else(|| STANDARD_GROWTH_RATES.to_vec());

    let overrides: Vec<SweepOverride> = redemption_rates
        .iter()
        .map(|&r| SweepOverride::redemption(r))
        .collect();

    let common_sweep = SensitivitySweep::new(common_params);
    let option_sweep = SensitivitySweep::new(option_params);

    let (common_results, option_results) = if args.parallel {
        (common_sweep.run_parallel(&overrides)?, option_sweep.run_parallel(&overrides)?)
    } else {
        (common_sweep.run(&overrides)?, option_sweep.run(&overrides)?)
    };

    let combined_results = combined_growth_sweep(
        common_sweep.base(),
        option_sweep.base(),
        &growth_rates,
    )?;

    let formatter = ResultFormatter::new();
    print_sweep("Common Share Grant Value at Various Redemption Rates", &common_results, &formatter);
    print_sweep("A-Share/Options Grant Value at Various Redemption Rates", &option_results, &formatter);
    print_combined("Combined Grant Value with No Share Redemption", &combined_results, &formatter);

    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
        write_sweep_csv(&dir.join("common_redemption_sweep.csv"), &common_results)?;
        write_sweep_csv(&dir.join("options_redemption_sweep.csv"), &option_results)?;
        write_combined_csv(&dir.join("combined_growth_sweep.csv"), &combined_results)?;
        eprintln!("Sweep results written to {}", dir.display());
    }

    Ok(())
}

fn print_sweep(title: &str, results: &[SweepResult], formatter: &ResultFormatter) {
    println!("{}", title);
    for result in results {
        let values: Vec<String> = result
            .total_values_in(CHART_PERIODS)
            .into_iter()
            .map(|v| formatter.currency(v))
            .collect();
        println!("  {:<16} {}", result.label, values.join("  "));
    }
    println!();
}

fn print_combined(title: &str, results: &[CombinedSweepResult], formatter: &ResultFormatter) {
    println!("{}", title);
    for result in results {
        let values: Vec<String> = result
            .combined_values_in(CHART_PERIODS)
            .into_iter()
            .map(|v| formatter.currency(v))
            .collect();
        println!("  {:<16} {}", result.label, values.join("  "));
    }
    println!();
}

/// One row per period, one column per scenario label
fn write_sweep_csv(path: &Path, results: &[SweepResult]) -> Result<()> {
    let columns: Vec<Vec<f64>> = results
        .iter()
        .map(|r| r.total_values_in(CHART_PERIODS))
        .collect();
    let labels: Vec<&str> = results.iter().map(|r| r.label.as_str()).collect();
    write_columns(path, &labels, &columns)
}

fn write_combined_csv(path: &Path, results: &[CombinedSweepResult]) -> Result<()> {
    let columns: Vec<Vec<f64>> = results
        .iter()
        .map(|r| r.combined_values_in(CHART_PERIODS))
        .collect();
    let labels: Vec<&str> = results.iter().map(|r| r.label.as_str()).collect();
    write_columns(path, &labels, &columns)
}

fn write_columns(path: &Path, labels: &[&str], columns: &[Vec<f64>]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut csv = Writer::from_writer(file);

    let mut header = vec!["Year"];
    header.extend_from_slice(labels);
    csv.write_record(&header)?;

    for (i, period) in CHART_PERIODS.enumerate() {
        let mut record = vec![period.to_string()];
        record.extend(
            columns
                .iter()
                .map(|c| c.get(i).map(|v| v.to_string()).unwrap_or_default()),
        );
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}
