use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::fmt;

use super::MONTH_NAMES;

/// A calendar month of a specific year. `month` is zero-based (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthPeriod {
    month: u32,
    year: i32,
}

impl MonthPeriod {
    /// Build a period from a zero-based month (0..=11).
    pub fn new(month: u32, year: i32) -> Option<Self> {
        (month < 12).then_some(Self { month, year })
    }

    /// Build a period from a one-based month (1..=12), as typed by users.
    pub fn from_human(month: u32, year: i32) -> Option<Self> {
        month.checked_sub(1).and_then(|m| Self::new(m, year))
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            month: date.month0(),
            year: date.year(),
        }
    }

    pub fn current(now: DateTime<Utc>) -> Self {
        Self::containing(now.date_naive())
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month as usize]
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month0() == self.month && date.year() == self.year
    }

    pub fn previous(&self) -> Self {
        if self.month == 0 {
            Self {
                month: 11,
                year: self.year - 1,
            }
        } else {
            Self {
                month: self.month - 1,
                year: self.year,
            }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 11 {
            Self {
                month: 0,
                year: self.year + 1,
            }
        } else {
            Self {
                month: self.month + 1,
                year: self.year,
            }
        }
    }
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

/// Years offered for selection: five either side of the current one.
pub fn year_options(current_year: i32) -> Vec<i32> {
    (current_year - 5..=current_year + 5).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_month_bounds() {
        assert!(MonthPeriod::new(0, 2024).is_some());
        assert!(MonthPeriod::new(11, 2024).is_some());
        assert!(MonthPeriod::new(12, 2024).is_none());
        assert_eq!(MonthPeriod::from_human(3, 2024), MonthPeriod::new(2, 2024));
        assert!(MonthPeriod::from_human(0, 2024).is_none());
        assert!(MonthPeriod::from_human(13, 2024).is_none());
    }

    #[test]
    fn test_contains() {
        let march = MonthPeriod::new(2, 2024).unwrap();
        assert!(march.contains(day("2024-03-01")));
        assert!(march.contains(day("2024-03-31")));
        assert!(!march.contains(day("2024-04-01")));
        assert!(!march.contains(day("2023-03-15")));
        assert_eq!(MonthPeriod::containing(day("2024-03-15")), march);
    }

    #[test]
    fn test_navigation_wraps_years() {
        let jan = MonthPeriod::new(0, 2024).unwrap();
        assert_eq!(jan.previous(), MonthPeriod::new(11, 2023).unwrap());
        assert_eq!(jan.previous().next(), jan);
        let dec = MonthPeriod::new(11, 2024).unwrap();
        assert_eq!(dec.next(), MonthPeriod::new(0, 2025).unwrap());
    }

    #[test]
    fn test_display_and_name() {
        let march = MonthPeriod::new(2, 2024).unwrap();
        assert_eq!(march.month_name(), "March");
        assert_eq!(march.to_string(), "March 2024");
    }

    #[test]
    fn test_year_options() {
        let years = year_options(2024);
        assert_eq!(years.len(), 11);
        assert_eq!(years.first(), Some(&2019));
        assert_eq!(years.last(), Some(&2029));
    }
}
