//! Shorthand constructors for tests. Panics on invalid input.

use crate::{CalendarDate, DateRange, Day, Month, Year};

pub fn year(value: u16) -> Year {
    Year::new(value).expect("valid year in test")
}

pub fn month(value: u8) -> Month {
    Month::new(value).expect("valid month in test")
}

/// Context-free day (1..=31)
pub fn day(value: u8) -> Day {
    Day::try_from(value).expect("valid day in test")
}

pub fn date(y: u16, m: u8, d: u8) -> CalendarDate {
    CalendarDate::new(y, m, d).expect("valid date in test")
}

pub fn range(min: (u16, u8, u8), max: (u16, u8, u8)) -> DateRange {
    DateRange::new(date(min.0, min.1, min.2), date(max.0, max.1, max.2)).expect("valid range in test")
}
