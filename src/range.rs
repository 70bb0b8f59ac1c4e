use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, DateError, RANGE_SEPARATOR, Year, prelude::*};

/// Inclusive bounds on the selectable date.
/// The minimum must be less than or equal to the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{min}/{max}")]
pub struct DateRange {
    min: CalendarDate,
    max: CalendarDate,
}

/// Inclusive span of years offered by the year wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{start}..={end}")]
#[serde(try_from = "RawYearRange", into = "RawYearRange")]
pub struct YearRange {
    start: Year,
    end:   Year,
}

/// Error type for range construction and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Minimum date is after maximum date.
    #[error("Invalid date range: min ({min}) is after max ({max})")]
    InvalidRange { min: CalendarDate, max: CalendarDate },

    /// First year is after last year.
    #[error("Invalid year range: start ({start}) is after end ({end})")]
    InvalidYearRange { start: Year, end: Year },

    /// Error parsing date component.
    #[error(transparent)]
    ParseError(#[from] DateError),

    /// Invalid range format.
    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

impl DateRange {
    /// Creates a new date range with validation.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if min > max.
    pub fn new(min: CalendarDate, max: CalendarDate) -> Result<Self, RangeError> {
        if min > max {
            return Err(RangeError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub const fn min(&self) -> CalendarDate {
        self.min
    }

    pub const fn max(&self) -> CalendarDate {
        self.max
    }

    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.min <= *date && *date <= self.max
    }

    /// Pulls `date` into `[min, max]`.
    pub fn clamp(&self, date: CalendarDate) -> CalendarDate {
        date.clamp(self.min, self.max)
    }

    /// Years spanned by the bounds, used as the default year wheel
    pub const fn years(&self) -> YearRange {
        YearRange {
            start: self.min.year(),
            end:   self.max.year(),
        }
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            min: CalendarDate::default_min(),
            max: CalendarDate::default_max(),
        }
    }
}

impl FromStr for DateRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let Some((min, max)) = trimmed.split_once(RANGE_SEPARATOR) else {
            return Err(RangeError::InvalidFormat(format!(
                "No range separator found (expected '{RANGE_SEPARATOR}'): {s}"
            )));
        };
        if max.contains(RANGE_SEPARATOR) {
            return Err(RangeError::InvalidFormat(format!(
                "Too many '{RANGE_SEPARATOR}' separators: {s}"
            )));
        }
        Self::new(min.trim().parse()?, max.trim().parse()?)
    }
}

impl Serialize for DateRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl YearRange {
    /// Creates a new year range with validation.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidYearRange` if start > end.
    pub fn new(start: Year, end: Year) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidYearRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub const fn start(&self) -> Year {
        self.start
    }

    pub const fn end(&self) -> Year {
        self.end
    }

    pub fn contains(&self, year: Year) -> bool {
        self.start <= year && year <= self.end
    }

    /// Number of years in the range (never zero)
    pub fn len(&self) -> usize {
        usize::from(self.end.get() - self.start.get()) + 1
    }

    /// Every year in the range, ascending
    pub fn iter(&self) -> impl Iterator<Item = Year> + use<> {
        (self.start.get()..=self.end.get()).map(Year::clamped)
    }
}

impl From<DateRange> for YearRange {
    fn from(range: DateRange) -> Self {
        range.years()
    }
}

#[derive(Serialize, Deserialize)]
struct RawYearRange {
    start: Year,
    end:   Year,
}

impl TryFrom<RawYearRange> for YearRange {
    type Error = RangeError;

    fn try_from(raw: RawYearRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl From<YearRange> for RawYearRange {
    fn from(range: YearRange) -> Self {
        Self {
            start: range.start,
            end:   range.end,
        }
    }
}
