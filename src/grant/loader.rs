//! Load vesting schedules from CSV
//!
//! Expected columns: `period,fraction` with one row per period.

use std::path::Path;

use csv::Reader;

use super::VestingSchedule;
use crate::error::ValuationResult;

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    period: u32,
    fraction: f64,
}

/// Load a vesting schedule from a CSV file
pub fn load_vesting_schedule<P: AsRef<Path>>(path: P) -> ValuationResult<VestingSchedule> {
    let reader = Reader::from_path(path)?;
    read_rows(reader)
}

/// Load a vesting schedule from any reader (e.g., string buffer)
pub fn load_vesting_schedule_from_reader<R: std::io::Read>(
    reader: R,
) -> ValuationResult<VestingSchedule> {
    read_rows(Reader::from_reader(reader))
}

fn read_rows<R: std::io::Read>(mut reader: Reader<R>) -> ValuationResult<VestingSchedule> {
    let mut schedule = VestingSchedule::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        schedule = schedule.with_period(row.period, row.fraction);
    }

    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValuationError;

    #[test]
    fn test_load_from_reader() {
        let data = "period,fraction\n1,0.25\n2,0.5\n3,0.75\n4,1.0\n";
        let schedule = load_vesting_schedule_from_reader(data.as_bytes()).unwrap();

        assert_eq!(schedule.len(), 4);
        assert_eq!(schedule.fraction(2), Some(0.5));
        assert!(schedule.ensure_covers(4).is_ok());
    }

    #[test]
    fn test_bad_row_is_csv_error() {
        let data = "period,fraction\n1,quarter\n";
        let err = load_vesting_schedule_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ValuationError::Csv(_)));
    }
}
