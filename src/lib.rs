//! Consistency core for three-wheel date pickers.
//!
//! A wheel date picker shows day, month and year as independently scrollable
//! lists. This crate owns the part that keeps them agreeing with each other:
//! the value sequences behind each wheel, the selected [`CalendarDate`], and
//! the [`DateResolver`] that turns a wheel snap into a corrected date plus
//! scroll instructions for the wheels that have to follow.

mod consts;
mod format;
mod picker;
mod prelude;
mod range;
mod resolver;
mod scroll;
mod sequence;
mod types;

#[cfg(test)]
mod test_utils;

pub use consts::*;
pub use format::{CjkSuffixConfig, DateField, DateFormatter, DateOrder, DayDisplayStyle, Locale, MonthDisplayStyle};
pub use picker::{PickerConfig, PickerError, PickerLayout, WheelColumn, WheelDatePicker, YearsSetting};
pub use range::{DateRange, RangeError, YearRange};
pub use resolver::{DateResolver, SnapCallback, SnappedDate};
pub use scroll::{ScrollCommand, ScrollQueue, WheelScroller};
pub use sequence::{IndexedValue, SequenceCache, build_day_sequence, build_month_sequence, build_year_sequence, index_of, value_at};
pub use types::{Day, Month, Year, days_in_month, is_leap_year};

use crate::prelude::*;
use chrono::{Datelike, NaiveDate};
use std::str::FromStr;

/// A calendar-valid (year, month, day) triple.
///
/// The day never exceeds the length of its month, so every value of this
/// type is a real Gregorian date between 0001-01-01 and 9999-12-31.
/// Ordering is lexicographic by year, month, day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
pub struct CalendarDate {
    year:  Year,
    month: Month,
    day:   Day,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("Invalid date format: {0}")]
    InvalidFormat(String),
    #[error("Invalid year: {0} (must be 1-{max})", max = MAX_YEAR)]
    InvalidYear(u16),
    #[error("Invalid month: {0} (must be 1-{max})", max = MAX_MONTH)]
    InvalidMonth(u8),
    #[error("Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u8 },
    #[error("Date {0} is outside the supported years 1-{max}", max = MAX_YEAR)]
    OutOfRange(String),
    #[error("Empty date string")]
    EmptyInput,
}

impl CalendarDate {
    /// Creates a date from raw components, validating each of them.
    ///
    /// # Errors
    /// Returns the `DateError` of the first invalid component.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, DateError> {
        let year = Year::new(year)?;
        let month = Month::new(month)?;
        let day = Day::new(day, year, month)?;
        Ok(Self { year, month, day })
    }

    /// Creates a date whose day is pulled into the month's valid range.
    pub fn new_clamped(year: Year, month: Month, day: u8) -> Self {
        Self {
            year,
            month,
            day: Day::clamped(day, year, month),
        }
    }

    /// Lower bound used when no minimum is configured: 1970-01-01
    pub fn default_min() -> Self {
        let (y, m, d) = DEFAULT_MIN_DATE;
        Self::from_const(y, m, d)
    }

    /// Upper bound used when no maximum is configured: 9999-12-31
    pub fn default_max() -> Self {
        let (y, m, d) = DEFAULT_MAX_DATE;
        Self::from_const(y, m, d)
    }

    fn from_const(year: u16, month: u8, day: u8) -> Self {
        Self::new_clamped(Year::clamped(year), Month::clamped(month), day)
    }

    /// Today's date in the local time zone.
    ///
    /// Falls back to [`CalendarDate::default_min`] if the clock reports a year
    /// outside 1..=9999.
    pub fn today() -> Self {
        let now = chrono::Local::now().date_naive();
        Self::try_from(now).unwrap_or_else(|err| {
            tracing::warn!(%err, "local clock outside supported years, using default minimum");
            Self::default_min()
        })
    }

    pub const fn year(&self) -> Year {
        self.year
    }

    pub const fn month(&self) -> Month {
        self.month
    }

    pub const fn day(&self) -> Day {
        self.day
    }

    /// Number of days in this date's month
    pub const fn length_of_month(&self) -> u8 {
        self.month.length_in(self.year)
    }

    /// Replaces the day, clamping it to the current month's length.
    pub fn with_day_clamped(self, day: u8) -> Self {
        Self::new_clamped(self.year, self.month, day)
    }

    /// Replaces the month, keeping the year and clamping the existing day
    /// to the new month's length.
    pub fn with_month_clamped(self, month: Month) -> Self {
        Self::new_clamped(self.year, month, self.day.get())
    }

    /// Replaces the year, keeping the month and clamping the existing day
    /// (Feb 29 becomes Feb 28 outside leap years).
    pub fn with_year_clamped(self, year: Year) -> Self {
        Self::new_clamped(year, self.month, self.day.get())
    }

    /// Converts to a `chrono` date
    pub fn to_naive_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year.get()),
            u32::from(self.month.get()),
            u32::from(self.day.get()),
        )
    }

    fn parse_u16(s: &str) -> Result<u16, DateError> {
        s.parse::<u16>()
            .map_err(|_| DateError::InvalidFormat(s.to_owned()))
    }

    fn parse_u8(s: &str) -> Result<u8, DateError> {
        s.parse::<u8>()
            .map_err(|_| DateError::InvalidFormat(s.to_owned()))
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    /// Parses a strict ISO `YYYY-MM-DD` date.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DateError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        match parts.as_slice() {
            [year, month, day] => {
                let year = Self::parse_u16(year)?;
                let month = Self::parse_u8(month)?;
                let day = Self::parse_u8(day)?;
                Self::new(year, month, day)
            },
            _ => Err(DateError::InvalidFormat(format!(
                "expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, found {trimmed}"
            ))),
        }
    }
}

impl TryFrom<NaiveDate> for CalendarDate {
    type Error = DateError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        let year = u16::try_from(date.year()).map_err(|_| DateError::OutOfRange(date.to_string()))?;
        let month = u8::try_from(date.month()).map_err(|_| DateError::OutOfRange(date.to_string()))?;
        let day = u8::try_from(date.day()).map_err(|_| DateError::OutOfRange(date.to_string()))?;
        Self::new(year, month, day).map_err(|_| DateError::OutOfRange(date.to_string()))
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, month, year};

    #[test]
    fn test_new_validates_components() {
        assert!(CalendarDate::new(2024, 2, 29).is_ok());
        assert!(matches!(CalendarDate::new(2023, 2, 29), Err(DateError::InvalidDay { .. })));
        assert!(matches!(CalendarDate::new(2023, 13, 1), Err(DateError::InvalidMonth(13))));
        assert!(matches!(CalendarDate::new(0, 1, 1), Err(DateError::InvalidYear(0))));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(date(2019, 12, 31) < date(2020, 1, 1));
        assert!(date(2020, 1, 31) < date(2020, 2, 1));
        assert!(date(2020, 2, 1) < date(2020, 2, 2));
    }

    #[test]
    fn test_with_month_clamped_corrects_overflow() {
        let d = date(2024, 1, 31).with_month_clamped(month(4));
        assert_eq!(d, date(2024, 4, 30));

        let d = date(2023, 3, 31).with_month_clamped(month(2));
        assert_eq!(d, date(2023, 2, 28));
    }

    #[test]
    fn test_with_year_clamped_leaves_leap_day() {
        assert_eq!(date(2024, 2, 29).with_year_clamped(year(2025)), date(2025, 2, 28));
        assert_eq!(date(2024, 2, 29).with_year_clamped(year(2028)), date(2028, 2, 29));
    }

    #[test]
    fn test_with_day_clamped() {
        assert_eq!(date(2024, 6, 1).with_day_clamped(31), date(2024, 6, 30));
        assert_eq!(date(2024, 6, 1).with_day_clamped(0), date(2024, 6, 1));
    }

    #[test]
    fn test_display_and_parse() {
        let d = date(987, 3, 5);
        assert_eq!(d.to_string(), "0987-03-05");
        assert_eq!("0987-03-05".parse::<CalendarDate>(), Ok(d));
        assert_eq!(" 2024-02-29 ".parse::<CalendarDate>(), Ok(date(2024, 2, 29)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<CalendarDate>(), Err(DateError::EmptyInput));
        assert!(matches!("2024-02".parse::<CalendarDate>(), Err(DateError::InvalidFormat(_))));
        assert!(matches!("2024/02/01".parse::<CalendarDate>(), Err(DateError::InvalidFormat(_))));
        assert!(matches!("2023-02-29".parse::<CalendarDate>(), Err(DateError::InvalidDay { .. })));
    }

    #[test]
    fn test_serde_string_format() {
        let json = serde_json::to_string(&date(2024, 4, 30)).expect("serialize date");
        assert_eq!(json, r#""2024-04-30""#);
        let parsed: CalendarDate = serde_json::from_str(&json).expect("deserialize date");
        assert_eq!(parsed, date(2024, 4, 30));
    }

    #[test]
    fn test_chrono_interop() {
        let naive = NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid chrono date");
        assert_eq!(CalendarDate::try_from(naive), Ok(date(2024, 2, 29)));
        assert_eq!(date(2024, 2, 29).to_naive_date(), Some(naive));

        let ancient = NaiveDate::from_ymd_opt(-5, 1, 1).expect("valid chrono date");
        assert!(matches!(CalendarDate::try_from(ancient), Err(DateError::OutOfRange(_))));
    }

    #[test]
    fn test_default_bounds() {
        assert_eq!(CalendarDate::default_min(), date(1970, 1, 1));
        assert_eq!(CalendarDate::default_max(), date(9999, 12, 31));
        assert!(CalendarDate::today() >= CalendarDate::default_min());
    }
}
