//! Calendar helpers for month-based scheduling.
//!
//! Everything here operates on plain `chrono` dates; there is no notion of
//! time zones because schedules are civil-calendar artifacts (a slot on
//! "2025-03-02" means that date wherever the congregation is).

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// A validated (year, month) pair identifying one scheduling period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a period, rejecting out-of-range months.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        // Validity was checked in `new`.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        next.map(|d| d - Duration::days(1)).unwrap_or(NaiveDate::MAX)
    }

    /// Number of days in the month.
    pub fn days(&self) -> u32 {
        self.last_day().day()
    }

    /// The given day-of-month as a date. Out-of-range days return `None`.
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// Whether `date` falls inside this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// English month name, for schedule titles.
    pub fn month_name(&self) -> &'static str {
        match self.month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            _ => "December",
        }
    }
}

/// Display label for a weekday, as stored on slots and saved schedules.
pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Start dates of every calendar week touching the month.
///
/// The first start is the `week_start` day on or before the 1st, so partial
/// weeks at the month edges are included; each week covers exactly 7 days
/// from its start regardless of month boundaries.
pub fn week_starts(period: YearMonth, week_start: Weekday) -> Vec<NaiveDate> {
    let first = period.first_day();
    let last = period.last_day();

    let back = first.weekday().days_since(week_start) as i64;
    let mut current = first - Duration::days(back);

    let mut starts = Vec::new();
    while current <= last {
        starts.push(current);
        current += Duration::days(7);
    }
    starts
}

/// Inclusive containment test for a week (or any) date range.
///
/// The end date counts through its entire day, matching the legacy
/// end-of-day extension on range lookups.
pub fn in_range(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    date >= start && date <= end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_month_rejects_bad_month() {
        assert!(YearMonth::new(2025, 0).is_none());
        assert!(YearMonth::new(2025, 13).is_none());
        assert!(YearMonth::new(2025, 12).is_some());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(YearMonth::new(2025, 4).unwrap().days(), 30);
        assert_eq!(YearMonth::new(2025, 2).unwrap().days(), 28);
        assert_eq!(YearMonth::new(2024, 2).unwrap().days(), 29);
        assert_eq!(YearMonth::new(2025, 12).unwrap().days(), 31);
    }

    #[test]
    fn test_month_bounds() {
        let period = YearMonth::new(2025, 3).unwrap();
        assert_eq!(
            period.first_day(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert_eq!(
            period.last_day(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
        );
        assert!(period.contains(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()));
    }

    #[test]
    fn test_week_starts_cover_month_edges() {
        // March 2025 starts on a Saturday; with Sunday weeks the first start
        // is Sunday 2025-02-23 and the last is Sunday 2025-03-30.
        let period = YearMonth::new(2025, 3).unwrap();
        let starts = week_starts(period, Weekday::Sun);
        assert_eq!(starts.len(), 6);
        assert_eq!(starts[0], NaiveDate::from_ymd_opt(2025, 2, 23).unwrap());
        assert_eq!(
            *starts.last().unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 30).unwrap()
        );
        for pair in starts.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(7));
        }
    }

    #[test]
    fn test_week_starts_configurable_boundary() {
        // With Monday weeks, March 2025 begins on Monday 2025-02-24.
        let period = YearMonth::new(2025, 3).unwrap();
        let starts = week_starts(period, Weekday::Mon);
        assert_eq!(starts[0], NaiveDate::from_ymd_opt(2025, 2, 24).unwrap());
        assert_eq!(starts.len(), 6);
    }

    #[test]
    fn test_in_range_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        assert!(in_range(start, start, end));
        assert!(in_range(end, start, end));
        assert!(!in_range(end + Duration::days(1), start, end));
    }

    #[test]
    fn test_weekday_labels() {
        assert_eq!(weekday_label(Weekday::Sun), "Sunday");
        assert_eq!(weekday_label(Weekday::Sat), "Saturday");
    }
}
