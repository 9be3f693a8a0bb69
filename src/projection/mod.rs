//! Valuation engine and its output series

mod state;
mod engine;
mod series;
mod combined;

pub use state::ValuationState;
pub use engine::{GrantValuationEngine, project_grant};
pub use series::{
    Column, ColumnKind, PeriodRow, PeriodSeries, SeriesSummary, COMMON_COLUMNS, OPTION_COLUMNS,
};
pub use combined::{combine, CombinedRow, CombinedSeries, COMBINED_HEADERS};
