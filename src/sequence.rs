//! Value sequences behind each wheel.
//!
//! A wheel shows a list of [`IndexedValue`]s: the semantic value, its
//! position on the wheel and its label. Indices are 0-based, contiguous and
//! increase with the value.

use std::sync::Arc;

use crate::format::LabelKey;
use crate::{DateFormatter, Day, Month, Year, YearRange};

/// One wheel entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexedValue<T> {
    pub value: T,
    pub index: usize,
    pub text:  String,
}

/// Days `1..=days_in_month(year, month)` labelled by `formatter`.
pub fn build_day_sequence(month: Month, year: Year, formatter: &DateFormatter) -> Vec<IndexedValue<Day>> {
    (1..=month.length_in(year))
        .map(|d| Day::clamped(d, year, month))
        .enumerate()
        .map(|(index, value)| IndexedValue {
            value,
            index,
            text: formatter.day_label(value),
        })
        .collect()
}

/// January through December labelled per the formatter's month style.
pub fn build_month_sequence(formatter: &DateFormatter) -> Vec<IndexedValue<Month>> {
    Month::all()
        .enumerate()
        .map(|(index, value)| IndexedValue {
            value,
            index,
            text: formatter.month_label(value),
        })
        .collect()
}

/// Every year in `years`, ascending. `None` means the picker has no year wheel.
pub fn build_year_sequence(years: Option<&YearRange>, formatter: &DateFormatter) -> Option<Vec<IndexedValue<Year>>> {
    let years = years?;
    Some(
        years
            .iter()
            .enumerate()
            .map(|(index, value)| IndexedValue {
                value,
                index,
                text: formatter.year_label(value),
            })
            .collect(),
    )
}

/// Value of the entry at wheel position `index`
pub fn value_at<T: Copy>(sequence: &[IndexedValue<T>], index: usize) -> Option<T> {
    sequence.iter().find(|entry| entry.index == index).map(|entry| entry.value)
}

/// Wheel position of `value`
pub fn index_of<T: PartialEq>(sequence: &[IndexedValue<T>], value: &T) -> Option<usize> {
    sequence.iter().find(|entry| entry.value == *value).map(|entry| entry.index)
}

type DayKey = (Month, Year, LabelKey);
type YearKey = (Option<YearRange>, LabelKey);

/// Memoizes the last sequence built for each wheel.
///
/// Asking again with an unchanged context returns the same `Arc`, so a
/// presentation layer can compare pointers to decide whether a wheel's
/// contents (and therefore its scroll position) need resetting.
#[derive(Debug, Default)]
pub struct SequenceCache {
    days:   Option<(DayKey, Arc<[IndexedValue<Day>]>)>,
    months: Option<(LabelKey, Arc<[IndexedValue<Month>]>)>,
    years:  Option<(YearKey, Option<Arc<[IndexedValue<Year>]>>)>,
}

impl SequenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn days(&mut self, month: Month, year: Year, formatter: &DateFormatter) -> Arc<[IndexedValue<Day>]> {
        let key = (month, year, formatter.label_key());
        match &self.days {
            Some((cached, sequence)) if *cached == key => Arc::clone(sequence),
            _ => {
                tracing::trace!(month = month.get(), year = year.get(), "building day sequence");
                let sequence: Arc<[IndexedValue<Day>]> = build_day_sequence(month, year, formatter).into();
                self.days = Some((key, Arc::clone(&sequence)));
                sequence
            },
        }
    }

    pub fn months(&mut self, formatter: &DateFormatter) -> Arc<[IndexedValue<Month>]> {
        let key = formatter.label_key();
        match &self.months {
            Some((cached, sequence)) if *cached == key => Arc::clone(sequence),
            _ => {
                tracing::trace!(style = ?formatter.month_style(), "building month sequence");
                let sequence: Arc<[IndexedValue<Month>]> = build_month_sequence(formatter).into();
                self.months = Some((key, Arc::clone(&sequence)));
                sequence
            },
        }
    }

    pub fn years(&mut self, years: Option<YearRange>, formatter: &DateFormatter) -> Option<Arc<[IndexedValue<Year>]>> {
        let key = (years, formatter.label_key());
        match &self.years {
            Some((cached, sequence)) if *cached == key => sequence.clone(),
            _ => {
                tracing::trace!(range = ?years, "building year sequence");
                let sequence: Option<Arc<[IndexedValue<Year>]>> =
                    build_year_sequence(years.as_ref(), formatter).map(Into::into);
                self.years = Some((key, sequence.clone()));
                sequence
            },
        }
    }
}
