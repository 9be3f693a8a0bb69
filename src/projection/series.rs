//! Per-period projection output

use serde::{Deserialize, Serialize};

/// A single row of projection output for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRow {
    pub period: u32,
    pub share_price: f64,
    /// Cumulative vested shares; `None` for common share runs
    pub vested_shares: Option<f64>,
    pub redeemed_shares: f64,
    pub cumulative_redeemed_shares: f64,
    pub unsold_shares: f64,
    pub redemption_value: f64,
    pub cumulative_redemption_value: f64,
    pub unsold_value: f64,
    pub total_value: f64,
}

impl PeriodRow {
    /// Value of a named column for this row
    pub fn value(&self, column: Column) -> f64 {
        match column {
            Column::Period => self.period as f64,
            Column::SharePrice => self.share_price,
            Column::VestedShares => self.vested_shares.unwrap_or(0.0),
            Column::RedeemedShares => self.redeemed_shares,
            Column::CumulativeRedeemedShares => self.cumulative_redeemed_shares,
            Column::UnsoldShares => self.unsold_shares,
            Column::RedemptionValue => self.redemption_value,
            Column::CumulativeRedemptionValue => self.cumulative_redemption_value,
            Column::UnsoldValue => self.unsold_value,
            Column::TotalValue => self.total_value,
        }
    }
}

/// How a column is rendered for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Period index
    Period,
    /// Dollar amount
    Money,
    /// Number of shares
    ShareCount,
}

/// Named columns of a [`PeriodSeries`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Period,
    SharePrice,
    VestedShares,
    RedeemedShares,
    CumulativeRedeemedShares,
    UnsoldShares,
    RedemptionValue,
    CumulativeRedemptionValue,
    UnsoldValue,
    TotalValue,
}

/// Export order for common share series
pub const COMMON_COLUMNS: [Column; 9] = [
    Column::Period,
    Column::SharePrice,
    Column::RedeemedShares,
    Column::CumulativeRedeemedShares,
    Column::UnsoldShares,
    Column::RedemptionValue,
    Column::CumulativeRedemptionValue,
    Column::UnsoldValue,
    Column::TotalValue,
];

/// Export order for option series
pub const OPTION_COLUMNS: [Column; 10] = [
    Column::Period,
    Column::SharePrice,
    Column::VestedShares,
    Column::RedeemedShares,
    Column::CumulativeRedeemedShares,
    Column::UnsoldShares,
    Column::RedemptionValue,
    Column::CumulativeRedemptionValue,
    Column::UnsoldValue,
    Column::TotalValue,
];

impl Column {
    pub fn header(&self) -> &'static str {
        match self {
            Column::Period => "Year",
            Column::SharePrice => "Share Price ($)",
            Column::VestedShares => "Vested Shares",
            Column::RedeemedShares => "Redeemed Shares",
            Column::CumulativeRedeemedShares => "Cumulative Redeemed Shares",
            Column::UnsoldShares => "Unsold Shares",
            Column::RedemptionValue => "Redemption Value ($)",
            Column::CumulativeRedemptionValue => "Cumulative Redemption Value ($)",
            Column::UnsoldValue => "Value of Unsold Shares ($)",
            Column::TotalValue => "Total Grant Value ($)",
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Period => ColumnKind::Period,
            Column::VestedShares
            | Column::RedeemedShares
            | Column::CumulativeRedeemedShares
            | Column::UnsoldShares => ColumnKind::ShareCount,
            Column::SharePrice
            | Column::RedemptionValue
            | Column::CumulativeRedemptionValue
            | Column::UnsoldValue
            | Column::TotalValue => ColumnKind::Money,
        }
    }
}

/// Complete projection for one grant class, periods 0..=horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSeries {
    /// Display name of the grant class
    pub grant: String,

    /// Whether rows carry vested shares
    pub has_vesting: bool,

    pub rows: Vec<PeriodRow>,
}

impl PeriodSeries {
    pub fn new(grant: impl Into<String>, has_vesting: bool, capacity: usize) -> Self {
        Self {
            grant: grant.into(),
            has_vesting,
            rows: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn add_row(&mut self, row: PeriodRow) {
        self.rows.push(row);
    }

    /// Number of periods after period 0
    pub fn horizon(&self) -> u32 {
        self.rows.len().saturating_sub(1) as u32
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, period: u32) -> Option<&PeriodRow> {
        self.rows.get(period as usize)
    }

    /// Columns in export order
    pub fn columns(&self) -> &'static [Column] {
        if self.has_vesting {
            &OPTION_COLUMNS
        } else {
            &COMMON_COLUMNS
        }
    }

    /// One column across all periods
    pub fn column(&self, column: Column) -> Vec<f64> {
        self.rows.iter().map(|r| r.value(column)).collect()
    }

    pub fn total_values(&self) -> Vec<f64> {
        self.column(Column::TotalValue)
    }

    /// Final-period totals
    pub fn summary(&self) -> SeriesSummary {
        let last = self.rows.last();
        SeriesSummary {
            periods: self.rows.len() as u32,
            final_share_price: last.map(|r| r.share_price).unwrap_or(0.0),
            total_redeemed_shares: last.map(|r| r.cumulative_redeemed_shares).unwrap_or(0.0),
            final_unsold_shares: last.map(|r| r.unsold_shares).unwrap_or(0.0),
            realized_value: last.map(|r| r.cumulative_redemption_value).unwrap_or(0.0),
            unsold_value: last.map(|r| r.unsold_value).unwrap_or(0.0),
            total_value: last.map(|r| r.total_value).unwrap_or(0.0),
        }
    }
}

/// Summary of a projection at its final period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub periods: u32,
    pub final_share_price: f64,
    pub total_redeemed_shares: f64,
    pub final_unsold_shares: f64,
    pub realized_value: f64,
    pub unsold_value: f64,
    pub total_value: f64,
}
