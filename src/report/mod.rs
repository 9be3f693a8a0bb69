//! Display and export of projection results

mod format;
pub mod export;

pub use format::{FormattedTable, ResultFormatter};
pub use export::{
    combined_to_csv_string, series_to_csv_string, write_combined_csv, write_series_csv,
    Rendering, ValuationReport, COMBINED_CSV, COMMON_CSV, OPTIONS_CSV,
};
