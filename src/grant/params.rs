//! Immutable valuation inputs for one grant class

use serde::{Deserialize, Serialize};

use super::vesting::VestingSchedule;
use crate::error::{ValuationError, ValuationResult};

/// Default number of periods after period 0
pub const DEFAULT_HORIZON: u32 = 10;

/// Grant class, and the class-specific inputs it carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GrantKind {
    /// Directly purchased shares; fully vested from period 0
    Common,
    /// Strike-priced options with a cumulative vesting schedule
    Option { vesting: VestingSchedule },
}

impl GrantKind {
    pub fn vesting(&self) -> Option<&VestingSchedule> {
        match self {
            GrantKind::Common => None,
            GrantKind::Option { vesting } => Some(vesting),
        }
    }

    pub fn has_vesting(&self) -> bool {
        matches!(self, GrantKind::Option { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            GrantKind::Common => "Common Share",
            GrantKind::Option { .. } => "A-Share/Options",
        }
    }
}

/// Scalar assumptions driving one projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationParameters {
    /// Number of periods after period 0
    pub horizon: u32,

    /// Per-period multiplicative share price growth
    pub growth_rate: f64,

    /// Fraction of the prior period's unsold shares redeemed each period
    pub redemption_rate: f64,

    /// First period (>= 1) in which redemption may occur
    pub start_redemption_period: u32,

    /// Total shares granted
    pub total_shares: f64,

    /// Purchase price (common) or strike price (options).
    /// Also the period 0 share price.
    pub basis_price: f64,

    /// Grant class
    pub kind: GrantKind,
}

impl ValuationParameters {
    /// Common share parameters over the default horizon
    pub fn common(
        total_shares: f64,
        purchase_price: f64,
        growth_rate: f64,
        redemption_rate: f64,
        start_redemption_period: u32,
    ) -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            growth_rate,
            redemption_rate,
            start_redemption_period,
            total_shares,
            basis_price: purchase_price,
            kind: GrantKind::Common,
        }
    }

    /// Option parameters over the default horizon
    pub fn option(
        total_shares: f64,
        strike_price: f64,
        growth_rate: f64,
        redemption_rate: f64,
        start_redemption_period: u32,
        vesting: VestingSchedule,
    ) -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            growth_rate,
            redemption_rate,
            start_redemption_period,
            total_shares,
            basis_price: strike_price,
            kind: GrantKind::Option { vesting },
        }
    }

    pub fn with_horizon(mut self, horizon: u32) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_growth_rate(mut self, growth_rate: f64) -> Self {
        self.growth_rate = growth_rate;
        self
    }

    pub fn with_redemption_rate(mut self, redemption_rate: f64) -> Self {
        self.redemption_rate = redemption_rate;
        self
    }

    /// Number of rows in a projection (periods 0..=horizon)
    pub fn period_count(&self) -> usize {
        self.horizon as usize + 1
    }

    /// Intrinsic value per share at `share_price`, floored at zero
    pub fn intrinsic_value(&self, share_price: f64) -> f64 {
        (share_price - self.basis_price).max(0.0)
    }

    /// Check every range constraint the engine depends on
    pub fn validate(&self) -> ValuationResult<()> {
        if self.horizon == 0 {
            return Err(ValuationError::invalid("horizon", "must be at least 1"));
        }

        if !self.growth_rate.is_finite() || self.growth_rate < -1.0 {
            return Err(ValuationError::invalid(
                "growth_rate",
                format!("must be finite and >= -1, got {}", self.growth_rate),
            ));
        }

        if !(0.0..=1.0).contains(&self.redemption_rate) {
            return Err(ValuationError::invalid(
                "redemption_rate",
                format!("must be within [0, 1], got {}", self.redemption_rate),
            ));
        }

        if !self.total_shares.is_finite() || self.total_shares <= 0.0 {
            return Err(ValuationError::invalid(
                "total_shares",
                format!("must be positive, got {}", self.total_shares),
            ));
        }

        if !self.basis_price.is_finite() || self.basis_price < 0.0 {
            return Err(ValuationError::invalid(
                "basis_price",
                format!("must be non-negative, got {}", self.basis_price),
            ));
        }

        // Compounded exactly as the engine does, so an overflow here is one there
        let final_price = (0..self.horizon).fold(self.basis_price, |price, _| {
            price * (1.0 + self.growth_rate)
        });
        if !final_price.is_finite() {
            return Err(ValuationError::invalid(
                "growth_rate",
                format!(
                    "share price overflows within {} periods at growth {}",
                    self.horizon, self.growth_rate
                ),
            ));
        }

        if self.start_redemption_period < 1 {
            return Err(ValuationError::invalid(
                "start_redemption_period",
                "must be at least 1",
            ));
        }

        if let Some(vesting) = self.kind.vesting() {
            vesting.ensure_covers(self.horizon)?;
        }

        Ok(())
    }
}
