//! Selection state and the snap transitions that keep it consistent.
//!
//! [`DateResolver`] owns the selected [`CalendarDate`] and is the only thing
//! that changes it. Each wheel snap runs one transition to completion:
//! read the snapped value, correct the day for the (possibly new) month
//! length, clamp into the configured bounds, store, report, and queue scroll
//! instructions for the wheels that must follow. The stored date is final
//! before any instruction is queued.

use std::fmt;
use std::sync::Arc;

use crate::sequence::{index_of, value_at};
use crate::{
    CalendarDate, DateField, DateFormatter, DateRange, Day, IndexedValue, Month, ScrollQueue, SequenceCache, Year,
    YearRange,
};

/// Result of one transition: the wheel that moved, the resolved date, and
/// the position of the resolved value on that wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnappedDate {
    DayOfMonth { date: CalendarDate, index: usize },
    Month { date: CalendarDate, index: usize },
    Year { date: CalendarDate, index: usize },
}

impl SnappedDate {
    pub const fn date(&self) -> CalendarDate {
        match *self {
            Self::DayOfMonth { date, .. } | Self::Month { date, .. } | Self::Year { date, .. } => date,
        }
    }

    pub const fn index(&self) -> usize {
        match *self {
            Self::DayOfMonth { index, .. } | Self::Month { index, .. } | Self::Year { index, .. } => index,
        }
    }

    pub const fn field(&self) -> DateField {
        match self {
            Self::DayOfMonth { .. } => DateField::Day,
            Self::Month { .. } => DateField::Month,
            Self::Year { .. } => DateField::Year,
        }
    }
}

/// Called once per completed transition. Returning `Some(i)` asks the
/// triggering wheel to settle on `i` instead of the resolved index.
pub type SnapCallback = Box<dyn FnMut(SnappedDate) -> Option<usize>>;

pub struct DateResolver {
    selected:   CalendarDate,
    bounds:     DateRange,
    years:      Option<YearRange>,
    formatter:  DateFormatter,
    sequences:  SequenceCache,
    scroll:     ScrollQueue,
    on_snapped: SnapCallback,
}

impl fmt::Debug for DateResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateResolver")
            .field("selected", &self.selected)
            .field("bounds", &self.bounds)
            .field("years", &self.years)
            .field("formatter", &self.formatter)
            .field("scroll", &self.scroll)
            .field("on_snapped", &"<callback>")
            .finish_non_exhaustive()
    }
}

impl DateResolver {
    /// Creates a resolver whose selection starts at `start` pulled into `bounds`.
    ///
    /// `years` is the span offered by the year wheel; `None` means the picker
    /// has no year wheel and the year never changes through a snap.
    pub fn new(start: CalendarDate, bounds: DateRange, years: Option<YearRange>, formatter: DateFormatter) -> Self {
        let selected = bounds.clamp(start);
        if selected != start {
            tracing::debug!(%start, %selected, %bounds, "start date clamped into bounds");
        }
        Self {
            selected,
            bounds,
            years,
            formatter,
            sequences: SequenceCache::new(),
            scroll: ScrollQueue::new(),
            on_snapped: Box::new(|_| None),
        }
    }

    #[must_use]
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(SnappedDate) -> Option<usize> + 'static,
    {
        self.set_on_snapped(callback);
        self
    }

    pub fn set_on_snapped<F>(&mut self, callback: F)
    where
        F: FnMut(SnappedDate) -> Option<usize> + 'static,
    {
        self.on_snapped = Box::new(callback);
    }

    /// The currently selected date
    pub const fn selected(&self) -> CalendarDate {
        self.selected
    }

    pub const fn bounds(&self) -> DateRange {
        self.bounds
    }

    pub const fn years(&self) -> Option<YearRange> {
        self.years
    }

    pub const fn formatter(&self) -> &DateFormatter {
        &self.formatter
    }

    pub const fn has_year_wheel(&self) -> bool {
        self.years.is_some()
    }

    /// Handle for the presentation layer to drain scroll instructions.
    pub fn scroll_queue(&self) -> ScrollQueue {
        self.scroll.clone()
    }

    /// Days of the selected month
    pub fn day_sequence(&mut self) -> Arc<[IndexedValue<Day>]> {
        self.sequences
            .days(self.selected.month(), self.selected.year(), &self.formatter)
    }

    pub fn month_sequence(&mut self) -> Arc<[IndexedValue<Month>]> {
        self.sequences.months(&self.formatter)
    }

    pub fn year_sequence(&mut self) -> Option<Arc<[IndexedValue<Year>]>> {
        self.sequences.years(self.years, &self.formatter)
    }

    /// Position of the selected value on `field`'s wheel.
    pub fn selected_index(&mut self, field: DateField) -> Option<usize> {
        let selected = self.selected;
        match field {
            DateField::Day => index_of(&self.day_sequence(), &selected.day()),
            DateField::Month => index_of(&self.month_sequence(), &selected.month()),
            DateField::Year => index_of(&self.year_sequence()?, &selected.year()),
        }
    }

    /// Runs the transition for `field`'s wheel settling on `index`.
    pub fn on_snapped(&mut self, field: DateField, index: usize) -> Option<usize> {
        match field {
            DateField::Day => self.on_day_snapped(index),
            DateField::Month => self.on_month_snapped(index),
            DateField::Year => self.on_year_snapped(index),
        }
    }

    /// The day wheel settled on `index`. Other wheels never move.
    pub fn on_day_snapped(&mut self, index: usize) -> Option<usize> {
        let current = self.selected;
        let days = self.day_sequence();
        let target = value_at(&days, index).map_or_else(
            || {
                tracing::warn!(index, "day wheel index not in sequence, keeping current day");
                current.day().get()
            },
            Day::get,
        );

        let resolved = self.commit(current.with_day_clamped(target));

        match index_of(&self.day_sequence(), &resolved.day()) {
            Some(index) => self.report(SnappedDate::DayOfMonth { date: resolved, index }),
            None => {
                tracing::warn!(date = %resolved, "resolved day missing from day wheel");
                None
            },
        }
    }

    /// The month wheel settled on `index`. The day wheel follows the
    /// corrected day.
    pub fn on_month_snapped(&mut self, index: usize) -> Option<usize> {
        let current = self.selected;
        let months = self.month_sequence();
        let target = value_at(&months, index).unwrap_or_else(|| {
            tracing::warn!(index, "month wheel index not in sequence, keeping current month");
            current.month()
        });

        let resolved = self.commit(current.with_month_clamped(target));

        let settled = match index_of(&months, &resolved.month()) {
            Some(index) => self.report(SnappedDate::Month { date: resolved, index }),
            None => {
                tracing::warn!(date = %resolved, "resolved month missing from month wheel");
                None
            },
        };
        self.follow(DateField::Day);
        settled
    }

    /// The year wheel settled on `index`. Month and day wheels follow.
    pub fn on_year_snapped(&mut self, index: usize) -> Option<usize> {
        let Some(years) = self.year_sequence() else {
            tracing::warn!(index, "year snap on a picker without a year wheel");
            return None;
        };
        let current = self.selected;
        let target = value_at(&years, index).unwrap_or_else(|| {
            tracing::warn!(index, "year wheel index not in sequence, keeping current year");
            current.year()
        });

        let resolved = self.commit(current.with_year_clamped(target));

        let settled = match index_of(&years, &resolved.year()) {
            Some(index) => self.report(SnappedDate::Year { date: resolved, index }),
            None => {
                tracing::warn!(date = %resolved, "resolved year missing from year wheel");
                None
            },
        };
        self.follow(DateField::Month);
        self.follow(DateField::Day);
        settled
    }

    /// Clamps `candidate` into bounds and makes it the selection.
    fn commit(&mut self, candidate: CalendarDate) -> CalendarDate {
        let resolved = self.bounds.clamp(candidate);
        if resolved != candidate {
            tracing::debug!(%candidate, %resolved, "snapped date clamped into bounds");
        }
        debug_assert!(self.bounds.contains(&resolved));
        self.selected = resolved;
        resolved
    }

    fn report(&mut self, snapped: SnappedDate) -> Option<usize> {
        tracing::debug!(field = %snapped.field(), date = %snapped.date(), index = snapped.index(), "wheel snapped");
        let override_index = (self.on_snapped)(snapped);
        if let Some(index) = override_index {
            tracing::debug!(field = %snapped.field(), index, "snap callback overrode settle index");
        }
        override_index.or(Some(snapped.index()))
    }

    /// Queues a scroll so `field`'s wheel shows the selected value.
    fn follow(&mut self, field: DateField) {
        if let Some(index) = self.selected_index(field) {
            self.scroll.submit(field, index);
        }
    }
}

impl Drop for DateResolver {
    fn drop(&mut self) {
        // Teardown abandons wheel animations that have not run yet.
        self.scroll.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use proptest::prelude::*;

    use super::*;
    use crate::test_utils::{date, range, year};
    use crate::{ScrollCommand, days_in_month};

    fn resolver(start: CalendarDate, bounds: DateRange) -> DateResolver {
        DateResolver::new(start, bounds, Some(bounds.years()), DateFormatter::default())
    }

    fn recording(resolver: DateResolver) -> (DateResolver, Rc<RefCell<Vec<SnappedDate>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let resolver = resolver.with_callback(move |snapped| {
            sink.borrow_mut().push(snapped);
            None
        });
        (resolver, log)
    }

    fn year_index(resolver: &mut DateResolver, y: u16) -> usize {
        let years = resolver.year_sequence().expect("year wheel present");
        index_of(&years, &year(y)).expect("year on wheel")
    }

    #[test]
    fn test_start_is_clamped_into_bounds() {
        let bounds = range((2020, 1, 1), (2020, 12, 31));
        assert_eq!(resolver(date(2019, 5, 5), bounds).selected(), date(2020, 1, 1));
        assert_eq!(resolver(date(2030, 5, 5), bounds).selected(), date(2020, 12, 31));
        assert_eq!(resolver(date(2020, 5, 5), bounds).selected(), date(2020, 5, 5));
    }

    #[test]
    fn test_day_snap_sets_day_without_moving_other_wheels() {
        let (mut resolver, log) = recording(resolver(date(2024, 3, 10), DateRange::default()));
        let queue = resolver.scroll_queue();

        assert_eq!(resolver.on_day_snapped(19), Some(19));
        assert_eq!(resolver.selected(), date(2024, 3, 20));
        assert_eq!(
            log.borrow().as_slice(),
            [SnappedDate::DayOfMonth { date: date(2024, 3, 20), index: 19 }]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_month_snap_corrects_day_overflow() {
        let (mut resolver, log) = recording(resolver(date(2024, 1, 31), DateRange::default()));
        let queue = resolver.scroll_queue();

        assert_eq!(resolver.on_month_snapped(3), Some(3));
        assert_eq!(resolver.selected(), date(2024, 4, 30));
        assert_eq!(
            log.borrow().as_slice(),
            [SnappedDate::Month { date: date(2024, 4, 30), index: 3 }]
        );
        assert_eq!(
            queue.drain_all(),
            vec![ScrollCommand { field: DateField::Day, index: 29 }]
        );
    }

    #[test]
    fn test_year_snap_leaves_leap_day() {
        let (mut resolver, log) = recording(resolver(date(2024, 2, 29), DateRange::default()));
        let queue = resolver.scroll_queue();
        let index = year_index(&mut resolver, 2025);

        assert_eq!(resolver.on_year_snapped(index), Some(index));
        assert_eq!(resolver.selected(), date(2025, 2, 28));
        assert_eq!(
            log.borrow().as_slice(),
            [SnappedDate::Year { date: date(2025, 2, 28), index }]
        );
        assert_eq!(
            queue.drain_all(),
            vec![
                ScrollCommand { field: DateField::Month, index: 1 },
                ScrollCommand { field: DateField::Day, index: 27 },
            ]
        );
    }

    #[test]
    fn test_snaps_clamp_to_max_date() {
        let bounds = range((2020, 1, 1), (2020, 6, 15));

        let mut day_case = resolver(date(2020, 6, 10), bounds);
        assert_eq!(day_case.on_day_snapped(29), Some(14));
        assert_eq!(day_case.selected(), date(2020, 6, 15));

        let mut month_case = resolver(date(2020, 3, 20), bounds);
        assert_eq!(month_case.on_month_snapped(11), Some(5), "month wheel settles back on June");
        assert_eq!(month_case.selected(), date(2020, 6, 15));
        assert_eq!(
            month_case.scroll_queue().drain_all(),
            vec![ScrollCommand { field: DateField::Day, index: 14 }]
        );
    }

    #[test]
    fn test_snap_past_max_of_one_year_range() {
        let bounds = range((2020, 1, 1), (2020, 12, 31));
        let years = YearRange::new(year(2020), year(2021)).ok();
        let (mut resolver, log) = recording(DateResolver::new(
            date(2020, 11, 15),
            bounds,
            years,
            DateFormatter::default(),
        ));
        let queue = resolver.scroll_queue();

        assert_eq!(resolver.on_year_snapped(1), Some(0), "year wheel settles back on 2020");
        assert_eq!(resolver.selected(), date(2020, 12, 31));
        assert_eq!(
            log.borrow().as_slice(),
            [SnappedDate::Year { date: date(2020, 12, 31), index: 0 }]
        );
        assert_eq!(
            queue.drain_all(),
            vec![
                ScrollCommand { field: DateField::Month, index: 11 },
                ScrollCommand { field: DateField::Day, index: 30 },
            ]
        );
    }

    #[test]
    fn test_year_snap_clamps_to_bounds() {
        let bounds = range((2020, 3, 1), (2020, 12, 31));
        let years = YearRange::new(year(2019), year(2021)).ok();
        let mut resolver = DateResolver::new(date(2020, 7, 4), bounds, years, DateFormatter::default());

        assert_eq!(resolver.on_year_snapped(2), Some(1));
        assert_eq!(resolver.selected(), date(2020, 12, 31));

        assert_eq!(resolver.on_year_snapped(0), Some(1));
        assert_eq!(resolver.selected(), date(2020, 3, 1));
    }

    #[test]
    fn test_snapping_to_current_value_is_idempotent() {
        let start = date(2023, 8, 17);
        let mut resolver = resolver(start, DateRange::default());
        let year = year_index(&mut resolver, 2023);

        resolver.on_day_snapped(16);
        resolver.on_month_snapped(7);
        resolver.on_year_snapped(year);
        assert_eq!(resolver.selected(), start);
    }

    #[test]
    fn test_lookup_miss_keeps_current_value() {
        let (mut resolver, log) = recording(resolver(date(2024, 4, 12), DateRange::default()));

        assert_eq!(resolver.on_day_snapped(400), Some(11));
        assert_eq!(resolver.on_month_snapped(12), Some(3));
        assert_eq!(resolver.on_year_snapped(usize::MAX), Some(year_index(&mut resolver, 2024)));
        assert_eq!(resolver.selected(), date(2024, 4, 12));
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_without_year_wheel() {
        let (mut resolver, log) = recording(DateResolver::new(
            date(2024, 2, 29),
            DateRange::default(),
            None,
            DateFormatter::default(),
        ));
        let queue = resolver.scroll_queue();

        assert!(!resolver.has_year_wheel());
        assert!(resolver.year_sequence().is_none());
        assert_eq!(resolver.selected_index(DateField::Year), None);
        assert_eq!(resolver.on_year_snapped(0), None);
        assert_eq!(resolver.on_snapped(DateField::Year, 3), None);
        assert_eq!(resolver.selected(), date(2024, 2, 29));
        assert!(log.borrow().is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_callback_override_is_returned() {
        let mut resolver = resolver(date(2024, 5, 5), DateRange::default())
            .with_callback(|snapped| (snapped.field() == DateField::Month).then_some(0));

        assert_eq!(resolver.on_month_snapped(6), Some(0));
        assert_eq!(resolver.selected(), date(2024, 7, 5), "override does not change the selection");
        assert_eq!(resolver.on_day_snapped(9), Some(9));
    }

    #[test]
    fn test_day_sequence_follows_selection() {
        let mut resolver = resolver(date(2023, 1, 31), DateRange::default());
        assert_eq!(resolver.day_sequence().len(), 31);
        let before = resolver.day_sequence();

        resolver.on_month_snapped(1);
        assert_eq!(resolver.selected(), date(2023, 2, 28));
        let after = resolver.day_sequence();
        assert_eq!(after.len(), 28);
        assert!(!Arc::ptr_eq(&before, &after));

        resolver.on_day_snapped(3);
        assert!(Arc::ptr_eq(&after, &resolver.day_sequence()), "same month keeps the sequence");
    }

    #[test]
    fn test_drop_abandons_pending_scrolls() {
        let mut resolver = resolver(date(2024, 1, 31), DateRange::default());
        let queue = resolver.scroll_queue();
        resolver.on_month_snapped(1);
        assert!(!queue.is_empty());

        drop(resolver);
        assert!(queue.is_empty());
    }

    fn any_date() -> impl Strategy<Value = CalendarDate> {
        (2000u16..2030, 1u8..=12, 1u8..=31).prop_map(|(y, m, d)| date(y, m, 1).with_day_clamped(d))
    }

    fn any_snap() -> impl Strategy<Value = (DateField, usize)> {
        (
            prop_oneof![Just(DateField::Day), Just(DateField::Month), Just(DateField::Year)],
            0usize..40,
        )
    }

    proptest! {
        #[test]
        fn selection_stays_valid_and_in_bounds(
            a in any_date(),
            b in any_date(),
            start in any_date(),
            snaps in proptest::collection::vec(any_snap(), 1..30),
        ) {
            let bounds = DateRange::new(a.min(b), a.max(b)).expect("ordered bounds");
            let mut resolver = resolver(start, bounds);

            for (field, index) in snaps {
                resolver.on_snapped(field, index);
                let selected = resolver.selected();
                prop_assert!(bounds.contains(&selected), "{selected} outside {bounds}");
                prop_assert!(
                    selected.day().get() <= days_in_month(selected.year().get(), selected.month().get())
                );
            }
        }

        #[test]
        fn snapping_to_selected_index_changes_nothing(
            a in any_date(),
            b in any_date(),
            start in any_date(),
            field in prop_oneof![Just(DateField::Day), Just(DateField::Month), Just(DateField::Year)],
        ) {
            let bounds = DateRange::new(a.min(b), a.max(b)).expect("ordered bounds");
            let mut resolver = resolver(start, bounds);
            let before = resolver.selected();
            let index = resolver.selected_index(field).expect("selected value on wheel");

            prop_assert_eq!(resolver.on_snapped(field, index), Some(index));
            prop_assert_eq!(resolver.selected(), before);
        }

        #[test]
        fn followed_day_index_matches_selection(
            start in any_date(),
            index in 0usize..31,
        ) {
            let bounds = range((2000, 1, 1), (2030, 12, 31));
            let mut resolver = resolver(start, bounds);
            let queue = resolver.scroll_queue();

            resolver.on_year_snapped(index);
            let expected = resolver.selected_index(DateField::Day);
            let day_scroll = queue
                .drain_latest()
                .into_iter()
                .find(|command| command.field == DateField::Day)
                .map(|command| command.index);
            prop_assert_eq!(day_scroll, expected);
        }
    }
}
