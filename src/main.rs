//! Grant Valuation CLI
//!
//! Runs the working sheet: projects the common share and option grants,
//! combines them, prints the tables, and writes the download CSVs.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use grant_valuation::{
    cli::ScenarioArgs,
    combine,
    projection::{Column, GrantValuationEngine},
    report::{write_combined_csv, write_series_csv, Rendering},
    ResultFormatter, ValuationReport,
};

/// Output format for stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum OutputFormat {
    /// Formatted tables
    #[default]
    Table,
    /// CSV for each table
    Csv,
    /// Single JSON report
    Json,
}

/// Project common share and A-share/option grant values
#[derive(Parser, Debug)]
#[command(name = "grant_valuation", version, about)]
struct Args {
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Stdout format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Format CSV cells as currency/counts instead of raw numbers
    #[arg(long)]
    formatted: bool,

    /// Directory for the three download CSVs
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

    let common = GrantValuationEngine::new(common_params.clone())
        .context("common share parameters")?
        .project();
    let options = GrantValuationEngine::new(option_params.clone())
        .context("option parameters")?
        .project();
    let combined = combine(&common, &options)?;

    let report = ValuationReport::new(common_params, option_params, common, options, combined);

    let rendering = if args.formatted { Rendering::Formatted } else { Rendering::Raw };

    match args.format {
        OutputFormat::Table => print_tables(&report),
        OutputFormat::Csv => {
            let stdout = io::stdout();
            for series in [&report.common, &report.options] {
                println!("# {}", series.grant);
                write_series_csv(series, stdout.lock(), rendering)?;
            }
            println!("# Combined");
            write_combined_csv(&report.combined, stdout.lock(), rendering)?;
        }
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    if let Some(dir) = &args.output_dir {
        report
            .write_csv_files(dir)
            .with_context(|| format!("writing CSVs to {}", dir.display()))?;
        eprintln!("Results written to {}", dir.display());
    }

    Ok(())
}

fn print_tables(report: &ValuationReport) {
    let formatter = ResultFormatter::new();

    // Display order differs from export order: values grouped after redemptions
    let common_columns = [
        Column::Period,
        Column::SharePrice,
        Column::RedeemedShares,
        Column::RedemptionValue,
        Column::CumulativeRedemptionValue,
        Column::UnsoldShares,
        Column::UnsoldValue,
        Column::TotalValue,
    ];
    let option_columns = [
        Column::Period,
        Column::SharePrice,
        Column::VestedShares,
        Column::RedeemedShares,
        Column::RedemptionValue,
        Column::CumulativeRedemptionValue,
        Column::UnsoldShares,
        Column::UnsoldValue,
        Column::TotalValue,
    ];

    println!("Common Share Grant Value");
    println!("{}", formatter.format_columns(&report.common, &common_columns).render_text());

    println!("A-Share / Options Grant Value");
    println!("{}", formatter.format_columns(&report.options, &option_columns).render_text());

    println!("Combined Grants Value");
    println!("{}", formatter.format_combined(&report.combined).render_text());

    let common = report.common.summary();
    let options = report.options.summary();
    println!("Summary (period {}):", common.periods.saturating_sub(1));
    println!(
        "  Common:  realised {}  unsold {}  total {}",
        formatter.currency(common.realized_value),
        formatter.currency(common.unsold_value),
        formatter.currency(common.total_value)
    );
    println!(
        "  Options: realised {}  unsold {}  total {}",
        formatter.currency(options.realized_value),
        formatter.currency(options.unsold_value),
        formatter.currency(options.total_value)
    );
}
