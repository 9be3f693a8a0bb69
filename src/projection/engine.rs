//! Year-by-year valuation recurrence shared by every grant class

use log::{debug, warn};

use super::series::{PeriodRow, PeriodSeries};
use super::state::ValuationState;
use crate::error::ValuationResult;
use crate::grant::{GrantKind, ValuationParameters};

/// Projects one grant class across its horizon
///
/// Common share, option, and sweep runs all go through the same
/// recurrence; [`GrantKind`] decides whether vested shares are reported.
#[derive(Debug, Clone)]
pub struct GrantValuationEngine {
    params: ValuationParameters,
}

impl GrantValuationEngine {
    /// Validate parameters up front so no partial series is ever produced
    pub fn new(params: ValuationParameters) -> ValuationResult<Self> {
        params.validate()?;

        if let Some(period) = params.kind.vesting().and_then(|v| v.first_decrease()) {
            warn!(
                "vesting schedule decreases at period {}; reporting as given",
                period
            );
        }

        Ok(Self { params })
    }

    pub fn params(&self) -> &ValuationParameters {
        &self.params
    }

    /// Run the projection for periods 0..=horizon
    pub fn project(&self) -> PeriodSeries {
        let params = &self.params;
        let mut series = PeriodSeries::new(
            params.kind.name(),
            params.kind.has_vesting(),
            params.period_count(),
        );
        let mut state = ValuationState::initial(params);

        series.add_row(self.initial_row(&state));

        for _period in 1..=params.horizon {
            state.advance_period(params);
            let row = self.calculate_period(&mut state);
            series.add_row(row);
        }

        debug!(
            "{} projection: {} periods, final total value {:.2}",
            series.grant,
            series.len(),
            series.summary().total_value
        );

        series
    }

    fn initial_row(&self, state: &ValuationState) -> PeriodRow {
        PeriodRow {
            period: 0,
            share_price: state.share_price,
            vested_shares: self.params.kind.has_vesting().then_some(0.0),
            redeemed_shares: 0.0,
            cumulative_redeemed_shares: 0.0,
            unsold_shares: state.unsold_shares,
            redemption_value: 0.0,
            cumulative_redemption_value: 0.0,
            unsold_value: 0.0,
            total_value: 0.0,
        }
    }

    /// Calculate one period from the prior period's state, then roll state forward
    fn calculate_period(&self, state: &mut ValuationState) -> PeriodRow {
        let params = &self.params;

        // Reported only; redemption draws from all unsold shares
        let vested_shares = match &params.kind {
            GrantKind::Common => None,
            GrantKind::Option { vesting } => vesting
                .fraction(state.period)
                .map(|fraction| params.total_shares * fraction),
        };

        let redeemed_shares = if state.redemption_open(params) {
            state.unsold_shares * params.redemption_rate
        } else {
            0.0
        };

        let cumulative_redeemed_shares = state.cumulative_redeemed_shares + redeemed_shares;
        // Clamp rounding residue so a fully redeemed position reads as zero
        let unsold_shares = (params.total_shares - cumulative_redeemed_shares).max(0.0);

        let intrinsic = params.intrinsic_value(state.share_price);
        let redemption_value = intrinsic * redeemed_shares;
        let cumulative_redemption_value = state.cumulative_redemption_value + redemption_value;
        let unsold_value = intrinsic * unsold_shares;

        state.unsold_shares = unsold_shares;
        state.cumulative_redeemed_shares = cumulative_redeemed_shares;
        state.cumulative_redemption_value = cumulative_redemption_value;

        PeriodRow {
            period: state.period,
            share_price: state.share_price,
            vested_shares,
            redeemed_shares,
            cumulative_redeemed_shares,
            unsold_shares,
            redemption_value,
            cumulative_redemption_value,
            unsold_value,
            total_value: cumulative_redemption_value + unsold_value,
        }
    }
}

/// Validate and project in one call
pub fn project_grant(params: &ValuationParameters) -> ValuationResult<PeriodSeries> {
    Ok(GrantValuationEngine::new(params.clone())?.project())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValuationError;
    use crate::grant::{VestingSchedule, DEFAULT_VESTING_STEP};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn common_params() -> ValuationParameters {
        ValuationParameters::common(10_000.0, 1.0, 0.15, 0.05, 2)
    }

    fn option_params() -> ValuationParameters {
        ValuationParameters::option(
            10_000.0,
            10.0,
            0.15,
            0.05,
            2,
            VestingSchedule::graded(DEFAULT_VESTING_STEP, 10),
        )
    }

    fn assert_invariants(params: &ValuationParameters, series: &PeriodSeries) {
        assert_eq!(series.len(), params.period_count());
        assert_eq!(series.rows[0].share_price, params.basis_price);
        assert_eq!(series.rows[0].unsold_shares, params.total_shares);

        for (t, row) in series.rows.iter().enumerate() {
            assert_eq!(row.period as usize, t);
            assert_eq!(row.total_value, row.cumulative_redemption_value + row.unsold_value);
            assert_relative_eq!(
                row.unsold_shares + row.cumulative_redeemed_shares,
                params.total_shares,
                max_relative = 1e-12
            );
            assert!(row.cumulative_redeemed_shares <= params.total_shares);
            if row.period < params.start_redemption_period {
                assert_eq!(row.redeemed_shares, 0.0);
            }
            for value in [
                row.share_price,
                row.redeemed_shares,
                row.cumulative_redeemed_shares,
                row.unsold_shares,
                row.redemption_value,
                row.cumulative_redemption_value,
                row.unsold_value,
                row.total_value,
            ] {
                assert!(value >= 0.0, "negative value in period {}: {}", t, value);
            }
        }

        for pair in series.rows.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            assert_relative_eq!(
                next.share_price,
                prev.share_price * (1.0 + params.growth_rate),
                max_relative = 1e-12
            );
            assert!(next.cumulative_redeemed_shares >= prev.cumulative_redeemed_shares);
            if params.growth_rate >= 0.0 {
                assert!(next.share_price >= prev.share_price);
            }
        }
    }

    #[test]
    fn test_common_share_scenario() {
        let params = common_params();
        let series = project_grant(&params).unwrap();
        assert_invariants(&params, &series);

        let r1 = &series.rows[1];
        assert_relative_eq!(r1.share_price, 1.15, max_relative = 1e-12);
        assert_eq!(r1.redeemed_shares, 0.0);
        assert!(r1.vested_shares.is_none());
        assert_relative_eq!(r1.unsold_value, 0.15 * 10_000.0, max_relative = 1e-12);

        let r2 = &series.rows[2];
        assert_relative_eq!(r2.share_price, 1.3225, epsilon = 1e-12);
        assert_relative_eq!(r2.redeemed_shares, 500.0, max_relative = 1e-12);
        assert_relative_eq!(r2.unsold_shares, 9_500.0, max_relative = 1e-12);
        assert_abs_diff_eq!(r2.redemption_value, 161.25, epsilon = 1e-9);

        // Redemption compounds on the remaining unsold shares
        let r3 = &series.rows[3];
        assert_relative_eq!(r3.redeemed_shares, 475.0, max_relative = 1e-12);
        assert_relative_eq!(r3.unsold_shares, 9_025.0, max_relative = 1e-12);
    }

    #[test]
    fn test_option_scenario_reports_vesting_without_gating() {
        let params = option_params();
        let series = project_grant(&params).unwrap();
        assert_invariants(&params, &series);

        assert_eq!(series.rows[0].vested_shares, Some(0.0));

        let r1 = &series.rows[1];
        assert_relative_eq!(r1.vested_shares.unwrap(), 2_500.0);
        assert_eq!(r1.redeemed_shares, 0.0);

        // Redemption draws on all unsold shares, not just the vested ones
        let r2 = &series.rows[2];
        assert_relative_eq!(r2.vested_shares.unwrap(), 5_000.0);
        assert_relative_eq!(r2.redeemed_shares, 500.0, max_relative = 1e-12);

        assert_relative_eq!(series.rows[10].vested_shares.unwrap(), 10_000.0);
    }

    #[test]
    fn test_vesting_does_not_change_values() {
        let with_vesting = project_grant(&option_params()).unwrap();
        let mut params = option_params();
        params.kind = GrantKind::Common;
        let without = project_grant(&params).unwrap();

        assert_eq!(with_vesting.total_values(), without.total_values());
    }

    #[test]
    fn test_zero_redemption() {
        let params = common_params().with_redemption_rate(0.0);
        let series = project_grant(&params).unwrap();
        assert_invariants(&params, &series);

        assert!(series.rows.iter().all(|r| r.redeemed_shares == 0.0));
        let last = series.rows.last().unwrap();
        assert_eq!(last.unsold_value, last.total_value);
        assert_eq!(last.unsold_shares, 10_000.0);
    }

    #[test]
    fn test_start_after_horizon_never_redeems() {
        let mut params = common_params();
        params.start_redemption_period = 11;
        let series = project_grant(&params).unwrap();

        assert!(series.rows.iter().all(|r| r.redeemed_shares == 0.0));
        assert!(series.rows.iter().all(|r| r.cumulative_redemption_value == 0.0));
    }

    #[test]
    fn test_price_below_basis_is_clamped() {
        let params = common_params().with_growth_rate(-0.2);
        let series = project_grant(&params).unwrap();
        assert_invariants(&params, &series);

        assert!(series.rows.iter().all(|r| r.total_value == 0.0));
        assert!(series.rows[5].redeemed_shares > 0.0);
    }

    #[test]
    fn test_full_redemption_empties_position() {
        let mut params = common_params().with_redemption_rate(1.0);
        params.start_redemption_period = 1;
        let series = project_grant(&params).unwrap();
        assert_invariants(&params, &series);

        let r1 = &series.rows[1];
        assert_eq!(r1.unsold_shares, 0.0);
        assert_eq!(r1.unsold_value, 0.0);
        assert_relative_eq!(r1.total_value, 1_500.0, max_relative = 1e-12);

        let last = series.rows.last().unwrap();
        assert_eq!(last.redeemed_shares, 0.0);
        assert_relative_eq!(last.total_value, 1_500.0, max_relative = 1e-12);
    }

    #[test]
    fn test_long_doubling_horizon_stays_finite() {
        let mut params = common_params()
            .with_growth_rate(1.0)
            .with_redemption_rate(1.0)
            .with_horizon(1000);
        params.start_redemption_period = 1;
        let series = project_grant(&params).unwrap();

        assert!(series.rows.iter().all(|r| !r.total_value.is_nan()));
        assert!(series.rows.iter().all(|r| r.unsold_value == 0.0 || r.period == 0));
        for row in &series.rows {
            assert_eq!(row.total_value, row.cumulative_redemption_value + row.unsold_value);
        }

        let err = project_grant(&params.with_horizon(1100)).unwrap_err();
        assert!(matches!(
            err,
            ValuationError::InvalidParameter { field: "growth_rate", .. }
        ));
    }

    #[test]
    fn test_configurable_horizon() {
        let params = common_params().with_horizon(25);
        let series = project_grant(&params).unwrap();
        assert_eq!(series.len(), 26);
        assert_eq!(series.horizon(), 25);
        assert_invariants(&params, &series);
    }

    #[test]
    fn test_invariants_hold_across_grid() {
        for &growth in &[0.0, 0.05, 0.15, 0.20] {
            for &redemption in &[0.0, 0.05, 0.10, 0.5] {
                for start in 1..=3 {
                    let mut params = option_params()
                        .with_growth_rate(growth)
                        .with_redemption_rate(redemption);
                    params.start_redemption_period = start;
                    let series = project_grant(&params).unwrap();
                    assert_invariants(&params, &series);
                }
            }
        }
    }

    #[test]
    fn test_invalid_parameters_produce_no_series() {
        let params = common_params().with_redemption_rate(1.5);
        let err = GrantValuationEngine::new(params).unwrap_err();
        assert!(matches!(
            err,
            ValuationError::InvalidParameter { field: "redemption_rate", .. }
        ));

        let mut params = option_params();
        params.kind = GrantKind::Option {
            vesting: VestingSchedule::graded(0.25, 9),
        };
        let err = project_grant(&params).unwrap_err();
        assert!(matches!(
            err,
            ValuationError::InvalidParameter { field: "vesting_schedule", .. }
        ));
    }

    #[test]
    fn test_decreasing_vesting_is_reported_as_given() {
        let fractions = [0.25, 0.5, 0.4, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let mut params = option_params();
        params.kind = GrantKind::Option {
            vesting: VestingSchedule::from_fractions(&fractions),
        };
        let series = project_grant(&params).unwrap();
        assert_relative_eq!(series.rows[3].vested_shares.unwrap(), 4_000.0);
    }
}
