//! Billing period helpers
//!
//! Periods are calendar months written as `YYYY-MM`.

use chrono::{Datelike, Local, Months, NaiveDate};

use crate::error::{Error, Result};

/// Check that a period is a valid `YYYY-MM` month
pub fn validate_period(period: &str) -> Result<()> {
    parse_period(period).map(|_| ())
}

/// Parse a period into the first day of its month
pub fn parse_period(period: &str) -> Result<NaiveDate> {
    let invalid = || Error::InvalidData(format!("Invalid period '{}', expected YYYY-MM", period));

    let (year, month) = period.split_once('-').ok_or_else(invalid)?;
    let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(year, 4) || !digits(month, 2) {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

/// Format a date as its billing period
pub fn period_of(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// The current month as a period
pub fn current_period() -> String {
    period_of(Local::now().date_naive())
}

/// A selectable billing period
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodOption {
    pub period: String,
    pub is_current: bool,
}

/// The last `count` periods, most recent first
pub fn recent_periods(today: NaiveDate, count: usize) -> Vec<PeriodOption> {
    let first = today.with_day(1).unwrap_or(today);
    (0..count)
        .filter_map(|i| first.checked_sub_months(Months::new(i as u32)))
        .enumerate()
        .map(|(i, date)| PeriodOption {
            period: period_of(date),
            is_current: i == 0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_period() {
        let date = parse_period("2025-07").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
    }

    #[test]
    fn test_parse_invalid_periods() {
        for bad in ["2025-7", "2025-13", "25-07", "July", "2025/07", "", "2025-00"] {
            assert!(parse_period(bad).is_err(), "expected {} to be rejected", bad);
        }
    }

    #[test]
    fn test_signs_and_spaces_rejected() {
        for bad in ["+025-07", "-025-07", "2025-+7", " 025-07", "2025- 7"] {
            assert!(parse_period(bad).is_err(), "expected {:?} to be rejected", bad);
        }
    }

    #[test]
    fn test_recent_periods_cross_year() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 17).unwrap();
        let periods = recent_periods(today, 4);

        let names: Vec<_> = periods.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(names, vec!["2025-02", "2025-01", "2024-12", "2024-11"]);
        assert!(periods[0].is_current);
        assert!(periods[1..].iter().all(|p| !p.is_current));
    }

    #[test]
    fn test_recent_periods_twelve() {
        let today = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();
        let periods = recent_periods(today, 12);
        assert_eq!(periods.len(), 12);
        assert_eq!(periods[11].period, "2024-08");
    }
}
