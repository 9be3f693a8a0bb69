//! Grant parameters and vesting schedules

mod params;
mod vesting;
pub mod loader;

pub use params::{GrantKind, ValuationParameters, DEFAULT_HORIZON};
pub use vesting::{VestingSchedule, DEFAULT_VESTING_STEP};
pub use loader::{load_vesting_schedule, load_vesting_schedule_from_reader};
