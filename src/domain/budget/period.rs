//! Budget period value object and its calendar window arithmetic.

use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::Timestamp;

/// The pacing window for automatic budget calculation.
///
/// Window boundaries are calendar-based: `Daily` is the UTC calendar day,
/// `Weekly` is the ISO week (Monday start), `Monthly` is the calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Daily,
    Weekly,
    Monthly,
}

impl BudgetPeriod {
    /// Start of the window containing `as_of`, at midnight UTC.
    pub fn window_start(&self, as_of: Timestamp) -> Timestamp {
        let date = as_of.as_datetime().date_naive();
        let start_date = match self {
            BudgetPeriod::Daily => date,
            BudgetPeriod::Weekly => {
                date - chrono::Duration::days(date.weekday().num_days_from_monday() as i64)
            }
            BudgetPeriod::Monthly => date.with_day(1).unwrap_or(date),
        };
        let midnight = start_date.and_hms_opt(0, 0, 0).unwrap_or_default();
        Timestamp::from_datetime(Utc.from_utc_datetime(&midnight))
    }

    /// Length of the window containing `as_of`, in whole days.
    pub fn length_days(&self, as_of: Timestamp) -> u32 {
        match self {
            BudgetPeriod::Daily => 1,
            BudgetPeriod::Weekly => 7,
            BudgetPeriod::Monthly => {
                let date = as_of.as_datetime().date_naive();
                days_in_month(date.year(), date.month())
            }
        }
    }

    /// Whole days elapsed since the window start, inclusive of today.
    ///
    /// Day 10 of a month yields 10; a Wednesday yields 3 for `Weekly`.
    pub fn elapsed_days(&self, as_of: Timestamp) -> u32 {
        let date = as_of.as_datetime().date_naive();
        match self {
            BudgetPeriod::Daily => 1,
            BudgetPeriod::Weekly => date.weekday().number_from_monday(),
            BudgetPeriod::Monthly => date.day(),
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BudgetPeriod::Daily => "daily",
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(BudgetPeriod::Daily),
            "weekly" => Ok(BudgetPeriod::Weekly),
            "monthly" => Ok(BudgetPeriod::Monthly),
            other => Err(format!("Invalid budget period: {}", other)),
        }
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default();
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .unwrap_or_default();
    (next - first).num_days() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(year: i32, month: u32, day: u32) -> Timestamp {
        Timestamp::from_ymd_hms(year, month, day, 15, 30, 0).unwrap()
    }

    #[test]
    fn daily_window_starts_at_midnight_of_the_same_day() {
        let start = BudgetPeriod::Daily.window_start(at(2025, 6, 18));
        assert_eq!(start, Timestamp::from_ymd_hms(2025, 6, 18, 0, 0, 0).unwrap());
        assert_eq!(BudgetPeriod::Daily.length_days(at(2025, 6, 18)), 1);
        assert_eq!(BudgetPeriod::Daily.elapsed_days(at(2025, 6, 18)), 1);
    }

    #[test]
    fn weekly_window_starts_on_iso_monday() {
        // 2025-06-18 is a Wednesday; the ISO week began Monday the 16th.
        let start = BudgetPeriod::Weekly.window_start(at(2025, 6, 18));
        assert_eq!(start, Timestamp::from_ymd_hms(2025, 6, 16, 0, 0, 0).unwrap());
        assert_eq!(BudgetPeriod::Weekly.elapsed_days(at(2025, 6, 18)), 3);
        assert_eq!(BudgetPeriod::Weekly.length_days(at(2025, 6, 18)), 7);
    }

    #[test]
    fn weekly_window_on_a_monday_counts_one_elapsed_day() {
        let monday = at(2025, 6, 16);
        assert_eq!(BudgetPeriod::Weekly.window_start(monday).as_datetime().date_naive(), monday.as_datetime().date_naive());
        assert_eq!(BudgetPeriod::Weekly.elapsed_days(monday), 1);
    }

    #[test]
    fn weekly_window_on_a_sunday_counts_seven_elapsed_days() {
        assert_eq!(BudgetPeriod::Weekly.elapsed_days(at(2025, 6, 22)), 7);
    }

    #[test]
    fn monthly_window_starts_on_the_first() {
        let start = BudgetPeriod::Monthly.window_start(at(2025, 6, 18));
        assert_eq!(start, Timestamp::from_ymd_hms(2025, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(BudgetPeriod::Monthly.elapsed_days(at(2025, 6, 18)), 18);
    }

    #[test]
    fn monthly_length_tracks_the_calendar() {
        assert_eq!(BudgetPeriod::Monthly.length_days(at(2025, 6, 10)), 30);
        assert_eq!(BudgetPeriod::Monthly.length_days(at(2025, 7, 10)), 31);
        assert_eq!(BudgetPeriod::Monthly.length_days(at(2025, 2, 10)), 28);
        // Leap February
        assert_eq!(BudgetPeriod::Monthly.length_days(at(2024, 2, 10)), 29);
        assert_eq!(BudgetPeriod::Monthly.length_days(at(2025, 12, 31)), 31);
    }

    #[test]
    fn parses_from_lowercase_names() {
        assert_eq!("daily".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Daily);
        assert_eq!("Weekly".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Weekly);
        assert_eq!("MONTHLY".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Monthly);
        assert!("fortnightly".parse::<BudgetPeriod>().is_err());
    }
}
