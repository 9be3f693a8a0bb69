//! Joint value of a common share grant and an option grant

use serde::{Deserialize, Serialize};

use super::series::PeriodSeries;
use crate::error::{ValuationError, ValuationResult};

/// Column headers in export order
pub const COMBINED_HEADERS: [&str; 4] = [
    "Year",
    "Common Share Value ($)",
    "A-Share/Options Value ($)",
    "Combined Total Value ($)",
];

/// Total grant value of both classes for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedRow {
    pub period: u32,
    pub common_value: f64,
    pub option_value: f64,
    pub combined_value: f64,
}

/// Per-period sum of two series' total values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedSeries {
    pub rows: Vec<CombinedRow>,
}

impl CombinedSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, period: u32) -> Option<&CombinedRow> {
        self.rows.get(period as usize)
    }

    pub fn combined_values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.combined_value).collect()
    }
}

/// Add the total values of two equal-length series period by period
pub fn combine(common: &PeriodSeries, option: &PeriodSeries) -> ValuationResult<CombinedSeries> {
    if common.len() != option.len() {
        return Err(ValuationError::MismatchedHorizon {
            left: common.len(),
            right: option.len(),
        });
    }

    let rows = common
        .rows
        .iter()
        .zip(&option.rows)
        .map(|(c, o)| CombinedRow {
            period: c.period,
            common_value: c.total_value,
            option_value: o.total_value,
            combined_value: c.total_value + o.total_value,
        })
        .collect();

    Ok(CombinedSeries { rows })
}
