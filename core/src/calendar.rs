use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Year whose first day (1 Farvardin) is taken as weekday offset 0 (Saturday).
pub const REFERENCE_YEAR: i32 = 1404;

/// Residues of `year % 33` that mark a leap year in the 33-year cycle.
const LEAP_RESIDUES: [i32; 8] = [1, 5, 9, 13, 17, 22, 26, 30];

pub const MONTH_NAMES: [&str; 12] = [
    "فروردین", "اردیبهشت", "خرداد", "تیر", "مرداد", "شهریور",
    "مهر", "آبان", "آذر", "دی", "بهمن", "اسفند",
];

/// Short weekday names, Saturday first (offset 0).
pub const WEEKDAY_NAMES: [&str; 7] = ["ش", "ی", "د", "س", "چ", "پ", "ج"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Invalid year: {0}")]
    Year(i32),
    #[error("Invalid month: {0}")]
    Month(u32),
    #[error("Invalid day {day} for {year}/{month}")]
    Day { year: i32, month: u32, day: u32 },
    #[error("Could not parse date: {0}")]
    Parse(String),
}

/// Cyclical approximation of the Jalali leap rule. Kept exactly as the
/// server computes it so both sides agree on month 12's length.
pub fn is_leap_year(year: i32) -> bool {
    LEAP_RESIDUES.contains(&(year % 33))
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1..=6 => 31,
        7..=11 => 30,
        _ => {
            if is_leap_year(year) {
                30
            } else {
                29
            }
        }
    }
}

pub fn year_length(year: i32) -> i64 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Weekday of the first day of `month`, 0 = Saturday.
///
/// Counts days from 1 Farvardin 1404 using the 33-year leap approximation.
/// Not checked against an authoritative Jalali table; drift from the real
/// calendar is possible for years far from the reference.
pub fn first_weekday_offset(year: i32, month: u32) -> u32 {
    let mut total_days: i64 = 0;

    for y in REFERENCE_YEAR..year {
        total_days += year_length(y);
    }
    for y in year..REFERENCE_YEAR {
        total_days -= year_length(y);
    }

    for m in 1..month {
        total_days += days_in_month(year, m) as i64;
    }

    (((total_days % 7) + 7) % 7) as u32
}

/// Persian month name, 1-based. Falls back to an empty string outside 1..=12.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("")
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, DateError> {
        if year < 1 {
            return Err(DateError::Year(year));
        }
        if !(1..=12).contains(&month) {
            return Err(DateError::Month(month));
        }
        Ok(Self { year, month })
    }

    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(self) -> Self {
        if self.month <= 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year, self.month)
    }

    pub fn first_weekday_offset(&self) -> u32 {
        first_weekday_offset(self.year, self.month)
    }

    pub fn name(&self) -> &'static str {
        month_name(self.month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JalaliDate {
    year: i32,
    month: u32,
    day: u32,
}

impl JalaliDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        YearMonth::new(year, month)?;
        if day < 1 || day > days_in_month(year, month) {
            return Err(DateError::Day { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Parses `Y/M/D` or `Y-M-D`.
    pub fn parse(input: &str) -> Result<Self, DateError> {
        let parts: Vec<&str> = input.trim().split(['/', '-']).collect();
        if parts.len() != 3 {
            return Err(DateError::Parse(input.to_string()));
        }
        let year: i32 = parts[0].parse().map_err(|_| DateError::Parse(input.to_string()))?;
        let month: u32 = parts[1].parse().map_err(|_| DateError::Parse(input.to_string()))?;
        let day: u32 = parts[2].parse().map_err(|_| DateError::Parse(input.to_string()))?;
        Self::new(year, month, day)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn year_month(&self) -> YearMonth {
        YearMonth { year: self.year, month: self.month }
    }
}

impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.day, month_name(self.month), self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_year_depends_on_residue() {
        assert!(!is_leap_year(1404)); // residue 18
        assert!(is_leap_year(1403)); // residue 17
        assert!(is_leap_year(1387)); // residue 1
        assert!(!is_leap_year(1386)); // residue 0

        for year in 1..200 {
            assert_eq!(is_leap_year(year), is_leap_year(year + 33));
        }
    }

    #[test]
    fn test_days_in_month() {
        for year in [1399, 1403, 1404, 1408] {
            for month in 1..=6 {
                assert_eq!(days_in_month(year, month), 31);
            }
            for month in 7..=11 {
                assert_eq!(days_in_month(year, month), 30);
            }
            let expected = if is_leap_year(year) { 30 } else { 29 };
            assert_eq!(days_in_month(year, 12), expected);
        }
    }

    #[test]
    fn test_first_weekday_offset_reference() {
        assert_eq!(first_weekday_offset(REFERENCE_YEAR, 1), 0);
        assert_eq!(first_weekday_offset(1404, 2), 3);
        assert_eq!(first_weekday_offset(1404, 7), 4);
        assert_eq!(first_weekday_offset(1405, 1), 1);
        assert_eq!(first_weekday_offset(1403, 1), 5);
        assert_eq!(first_weekday_offset(1403, 12), 5);
    }

    #[test]
    fn test_first_weekday_offset_follows_month_lengths() {
        let mut ym = YearMonth::new(1380, 1).unwrap();
        let end = YearMonth::new(1430, 12).unwrap();
        while ym < end {
            let expected = (ym.first_weekday_offset() + ym.days() % 7) % 7;
            assert_eq!(ym.next().first_weekday_offset(), expected, "after {:?}", ym);
            ym = ym.next();
        }
    }

    #[test]
    fn test_year_month_rollover() {
        let esfand = YearMonth::new(1404, 12).unwrap();
        assert_eq!(esfand.next(), YearMonth::new(1405, 1).unwrap());

        let farvardin = YearMonth::new(1404, 1).unwrap();
        assert_eq!(farvardin.prev(), YearMonth::new(1403, 12).unwrap());
    }

    #[test]
    fn test_month_name_table() {
        assert_eq!(month_name(1), "فروردین");
        assert_eq!(month_name(12), "اسفند");
        assert_eq!(month_name(0), "");
        assert_eq!(month_name(13), "");
    }

    #[test]
    fn test_jalali_date_validation() {
        assert!(JalaliDate::new(1404, 1, 31).is_ok());
        assert_eq!(JalaliDate::new(1404, 13, 1), Err(DateError::Month(13)));
        assert_eq!(
            JalaliDate::new(1404, 12, 30),
            Err(DateError::Day { year: 1404, month: 12, day: 30 })
        );
        assert!(JalaliDate::new(1403, 12, 30).is_ok());
        assert_eq!(JalaliDate::new(0, 1, 1), Err(DateError::Year(0)));
    }

    #[test]
    fn test_jalali_date_parse() {
        let date = JalaliDate::parse("1404/7/24").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (1404, 7, 24));
        assert_eq!(JalaliDate::parse("1404-07-24").unwrap(), date);
        assert!(JalaliDate::parse("1404/7").is_err());
        assert!(JalaliDate::parse("abc/1/1").is_err());
    }
}
