//! Grant Valuation - year-by-year value projection for employee equity grants
//!
//! This library provides:
//! - A single valuation recurrence for common share and option grants
//! - Combined value of a common share grant and an option grant
//! - Sensitivity sweeps over redemption and growth rates
//! - Currency/count formatting and CSV/JSON export
//! - Working-sheet configuration with defaults, JSON, env, and CLI overrides

pub mod error;
pub mod grant;
pub mod projection;
pub mod sweep;
pub mod report;
pub mod config;
pub mod cli;

// Re-export commonly used types
pub use error::{ValuationError, ValuationResult};
pub use grant::{GrantKind, ValuationParameters, VestingSchedule};
pub use projection::{combine, project_grant, CombinedSeries, GrantValuationEngine, PeriodSeries};
pub use sweep::{SensitivitySweep, SweepOverride, SweepResult};
pub use report::{ResultFormatter, ValuationReport};
pub use config::GrantConfig;
