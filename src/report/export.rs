//! CSV and JSON export of projection results

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::Writer;
use serde::Serialize;

use super::format::{FormattedTable, ResultFormatter};
use crate::error::ValuationResult;
use crate::grant::ValuationParameters;
use crate::projection::{CombinedSeries, PeriodSeries, COMBINED_HEADERS};

/// Default download file names
pub const COMMON_CSV: &str = "common_share_values.csv";
pub const OPTIONS_CSV: &str = "options_values.csv";
pub const COMBINED_CSV: &str = "combined_values.csv";

/// Numeric rendering for CSV cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rendering {
    /// Full-precision numbers for downstream tools
    #[default]
    Raw,
    /// Currency and count strings, as displayed
    Formatted,
}

/// Write a series as CSV with a header row
pub fn write_series_csv<W: Write>(
    series: &PeriodSeries,
    writer: W,
    rendering: Rendering,
) -> ValuationResult<()> {
    let mut csv = Writer::from_writer(writer);
    let columns = series.columns();

    match rendering {
        Rendering::Raw => {
            csv.write_record(columns.iter().map(|c| c.header()))?;
            for row in &series.rows {
                csv.write_record(columns.iter().map(|&c| raw_cell(row.value(c))))?;
            }
        }
        Rendering::Formatted => {
            write_table(&mut csv, &ResultFormatter::new().format_series(series))?;
        }
    }

    csv.flush()?;
    Ok(())
}

/// Write a combined series as CSV with a header row
pub fn write_combined_csv<W: Write>(
    combined: &CombinedSeries,
    writer: W,
    rendering: Rendering,
) -> ValuationResult<()> {
    let mut csv = Writer::from_writer(writer);

    match rendering {
        Rendering::Raw => {
            csv.write_record(COMBINED_HEADERS)?;
            for row in &combined.rows {
                csv.write_record([
                    row.period.to_string(),
                    raw_cell(row.common_value),
                    raw_cell(row.option_value),
                    raw_cell(row.combined_value),
                ])?;
            }
        }
        Rendering::Formatted => {
            write_table(&mut csv, &ResultFormatter::new().format_combined(combined))?;
        }
    }

    csv.flush()?;
    Ok(())
}

pub fn series_to_csv_string(series: &PeriodSeries, rendering: Rendering) -> ValuationResult<String> {
    let mut buf = Vec::new();
    write_series_csv(series, &mut buf, rendering)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn combined_to_csv_string(
    combined: &CombinedSeries,
    rendering: Rendering,
) -> ValuationResult<String> {
    let mut buf = Vec::new();
    write_combined_csv(combined, &mut buf, rendering)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_table<W: Write>(csv: &mut Writer<W>, table: &FormattedTable) -> ValuationResult<()> {
    csv.write_record(&table.headers)?;
    for row in &table.rows {
        csv.write_record(row)?;
    }
    Ok(())
}

fn raw_cell(value: f64) -> String {
    value.to_string()
}

/// Full working-sheet output for JSON consumers
#[derive(Debug, Clone, Serialize)]
pub struct ValuationReport {
    pub generated_at: DateTime<Utc>,
    pub common_parameters: ValuationParameters,
    pub option_parameters: ValuationParameters,
    pub common: PeriodSeries,
    pub options: PeriodSeries,
    pub combined: CombinedSeries,
}

impl ValuationReport {
    pub fn new(
        common_parameters: ValuationParameters,
        option_parameters: ValuationParameters,
        common: PeriodSeries,
        options: PeriodSeries,
        combined: CombinedSeries,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            common_parameters,
            option_parameters,
            common,
            options,
            combined,
        }
    }

    pub fn to_json(&self) -> ValuationResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the three download CSVs (raw numbers) into `dir`
    pub fn write_csv_files(&self, dir: &Path) -> ValuationResult<()> {
        std::fs::create_dir_all(dir)?;
        write_series_csv(&self.common, File::create(dir.join(COMMON_CSV))?, Rendering::Raw)?;
        write_series_csv(&self.options, File::create(dir.join(OPTIONS_CSV))?, Rendering::Raw)?;
        write_combined_csv(&self.combined, File::create(dir.join(COMBINED_CSV))?, Rendering::Raw)?;
        Ok(())
    }
}
