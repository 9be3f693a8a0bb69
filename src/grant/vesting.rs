//! Cumulative vesting schedules for option grants

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ValuationError, ValuationResult};

/// Default annual vesting step (25% per year until fully vested)
pub const DEFAULT_VESTING_STEP: f64 = 0.25;

/// Cumulative vested fraction keyed by period (1-indexed)
///
/// Entries are expected in [0, 1] and non-decreasing, but neither is
/// enforced: vesting is reported alongside the projection and never gates
/// redemption.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VestingSchedule {
    fractions: BTreeMap<u32, f64>,
}

impl VestingSchedule {
    /// Empty schedule; entries are added with [`VestingSchedule::with_period`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Graded schedule: `min(step * period, 1.0)` for periods 1..=horizon
    pub fn graded(step: f64, horizon: u32) -> Self {
        let fractions = (1..=horizon)
            .map(|period| (period, (step * period as f64).min(1.0)))
            .collect();
        Self { fractions }
    }

    /// Schedule from a slice where index 0 holds period 1
    pub fn from_fractions(fractions: &[f64]) -> Self {
        let fractions = fractions
            .iter()
            .enumerate()
            .map(|(i, &f)| (i as u32 + 1, f))
            .collect();
        Self { fractions }
    }

    /// Set the cumulative fraction for one period
    pub fn with_period(mut self, period: u32, fraction: f64) -> Self {
        self.fractions.insert(period, fraction);
        self
    }

    /// Cumulative vested fraction at `period`, if the schedule defines it
    pub fn fraction(&self, period: u32) -> Option<f64> {
        self.fractions.get(&period).copied()
    }

    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }

    /// Iterate `(period, fraction)` in period order
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.fractions.iter().map(|(&p, &f)| (p, f))
    }

    /// Check every period in 1..=horizon has an entry
    pub fn ensure_covers(&self, horizon: u32) -> ValuationResult<()> {
        match (1..=horizon).find(|p| !self.fractions.contains_key(p)) {
            Some(missing) => Err(ValuationError::invalid(
                "vesting_schedule",
                format!("no entry for period {} (horizon is {})", missing, horizon),
            )),
            None => Ok(()),
        }
    }

    /// First period whose fraction falls below the previous period's, if any
    pub fn first_decrease(&self) -> Option<u32> {
        self.fractions
            .iter()
            .zip(self.fractions.iter().skip(1))
            .find(|((_, prev), (_, next))| next < prev)
            .map(|(_, (&period, _))| period)
    }
}
