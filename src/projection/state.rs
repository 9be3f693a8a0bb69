//! Carry-forward state between projection periods

use crate::grant::ValuationParameters;

/// Values of the previous period that the next period depends on
#[derive(Debug, Clone)]
pub struct ValuationState {
    /// Current period (0 = grant date)
    pub period: u32,

    pub share_price: f64,

    /// Shares still held at the end of the period
    pub unsold_shares: f64,

    pub cumulative_redeemed_shares: f64,

    pub cumulative_redemption_value: f64,
}

impl ValuationState {
    /// Period 0: price at basis, nothing redeemed
    pub fn initial(params: &ValuationParameters) -> Self {
        Self {
            period: 0,
            share_price: params.basis_price,
            unsold_shares: params.total_shares,
            cumulative_redeemed_shares: 0.0,
            cumulative_redemption_value: 0.0,
        }
    }

    /// Move to the next period and grow the share price
    pub fn advance_period(&mut self, params: &ValuationParameters) {
        self.period += 1;
        self.share_price *= 1.0 + params.growth_rate;
    }

    /// Whether redemption is allowed in the current period
    pub fn redemption_open(&self, params: &ValuationParameters) -> bool {
        self.period >= params.start_redemption_period
    }
}
