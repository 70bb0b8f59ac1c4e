use crate::DateError;
use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, JANUARY,
    LEAP_YEAR_CYCLE, MAX_MONTH, MAX_YEAR, MIN_DAY, MIN_YEAR,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;
use std::num::NonZeroU16;

/// Longest month of any year; the context-free upper bound for a day
const MAX_DAY: u8 = 31;

/// A year value guaranteed to be in the range `1..=MAX_YEAR` (1..=9999)
/// Uses `NonZeroU16` internally, so 0 is not a valid year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Year(NonZeroU16);

impl Year {
    /// Creates a new Year, validating that it's non-zero and <= `MAX_YEAR`
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear` if the value is 0 or > `MAX_YEAR`.
    pub fn new(value: u16) -> Result<Self, DateError> {
        let non_zero = NonZeroU16::new(value).ok_or(DateError::InvalidYear(value))?;
        if value > MAX_YEAR {
            return Err(DateError::InvalidYear(value));
        }
        Ok(Self(non_zero))
    }

    /// Creates a Year, pulling out-of-range values to the nearest valid year
    pub fn clamped(value: u16) -> Self {
        let value = value.clamp(MIN_YEAR, MAX_YEAR);
        Self(NonZeroU16::MIN.saturating_add(value - MIN_YEAR))
    }

    /// Returns the year value as u16
    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    pub const fn is_leap(self) -> bool {
        is_leap_year(self.get())
    }
}

impl TryFrom<u16> for Year {
    type Error = DateError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> Self {
        year.0.get()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12)
/// Uses `NonZeroU8` internally, so 0 is not a valid month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `DateError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, DateError> {
        let non_zero = NonZeroU8::new(value).ok_or(DateError::InvalidMonth(value))?;
        if value > MAX_MONTH {
            return Err(DateError::InvalidMonth(value));
        }
        Ok(Self(non_zero))
    }

    /// Creates a Month, pulling out-of-range values to January or December
    pub fn clamped(value: u8) -> Self {
        let value = value.clamp(JANUARY, MAX_MONTH);
        Self(NonZeroU8::MIN.saturating_add(value - JANUARY))
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// Number of days this month has in `year`
    pub const fn length_in(self, year: Year) -> u8 {
        days_in_month(year.get(), self.get())
    }

    /// January through December, in calendar order
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=MAX_MONTH).map(|m| Self(NonZeroU8::MIN.saturating_add(m - 1)))
    }
}

impl TryFrom<u8> for Month {
    type Error = DateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A day value guaranteed to be valid for a given year and month
/// Uses `NonZeroU8` internally, so 0 is not a valid day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    /// Creates a new Day, validating that it's non-zero and valid for the given year and month
    ///
    /// # Errors
    /// Returns `DateError::InvalidDay` if the value is 0 or invalid for the given year and month.
    pub fn new(value: u8, year: Year, month: Month) -> Result<Self, DateError> {
        let invalid = DateError::InvalidDay {
            year: year.get(),
            month: month.get(),
            day: value,
        };
        let non_zero = NonZeroU8::new(value).ok_or_else(|| invalid.clone())?;
        if value > month.length_in(year) {
            return Err(invalid);
        }
        Ok(Self(non_zero))
    }

    /// Creates a Day clamped into `1..=days_in_month(year, month)`.
    ///
    /// This is the overflow correction applied whenever a month or year
    /// change shortens the month under an existing day (31 -> 30, Feb 29 -> 28).
    pub fn clamped(value: u8, year: Year, month: Month) -> Self {
        let value = value.clamp(MIN_DAY, month.length_in(year));
        Self(NonZeroU8::MIN.saturating_add(value - MIN_DAY))
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Day {
    type Error = DateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        // Can't validate without year/month context, so check against the longest month
        let invalid = DateError::InvalidDay {
            year: 0,
            month: 0,
            day: value,
        };
        if value > MAX_DAY {
            return Err(invalid);
        }
        NonZeroU8::new(value).map(Self).ok_or(invalid)
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Helper functions

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}
