//! Configuration and the facade a wheel toolkit embeds.
//!
//! [`WheelDatePicker`] is what a presentation layer talks to: it builds the
//! formatter and resolver from a [`PickerConfig`], describes the columns to
//! draw, and forwards "scroll finished" events to the resolver. Both layout
//! variants share the same resolver; they only differ in column chrome.

use serde::{Deserialize, Serialize};

use crate::{
    CalendarDate, CjkSuffixConfig, DateField, DateFormatter, DateOrder, DateRange, DateResolver, DayDisplayStyle,
    Locale, MonthDisplayStyle, RangeError, ScrollQueue, SnappedDate, YearRange, DEFAULT_ROW_COUNT,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerLayout {
    /// Equal-width columns, labels only
    #[default]
    Standard,
    /// Columns with a unit suffix after the label (年 月 日)
    Cjk,
}

impl PickerLayout {
    const fn default_suffix(self) -> CjkSuffixConfig {
        match self {
            Self::Standard => CjkSuffixConfig::hide_all(),
            Self::Cjk => CjkSuffixConfig::show_all(),
        }
    }
}

/// Which years the year wheel offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearsSetting {
    /// The years spanned by `min_date..=max_date`
    #[default]
    FromBounds,
    Range(YearRange),
    /// No year wheel at all
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Initial selection; today when absent
    pub start_date:  Option<CalendarDate>,
    pub min_date:    CalendarDate,
    pub max_date:    CalendarDate,
    pub years:       YearsSetting,
    pub layout:      PickerLayout,
    pub locale:      Locale,
    pub month_style: MonthDisplayStyle,
    pub day_style:   DayDisplayStyle,
    /// Overrides the locale's field order
    pub date_order:  Option<DateOrder>,
    pub row_count:   usize,
    /// Overrides the layout's suffix defaults
    pub cjk_suffix:  Option<CjkSuffixConfig>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            start_date:  None,
            min_date:    CalendarDate::default_min(),
            max_date:    CalendarDate::default_max(),
            years:       YearsSetting::default(),
            layout:      PickerLayout::default(),
            locale:      Locale::default(),
            month_style: MonthDisplayStyle::default(),
            day_style:   DayDisplayStyle::default(),
            date_order:  None,
            row_count:   DEFAULT_ROW_COUNT,
            cjk_suffix:  None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PickerError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("Row count must be at least 1")]
    ZeroRows,
}

impl PickerConfig {
    /// Validated selectable bounds.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if `min_date > max_date`.
    pub fn bounds(&self) -> Result<DateRange, RangeError> {
        DateRange::new(self.min_date, self.max_date)
    }

    /// Year wheel span for `bounds`, `None` when hidden.
    pub const fn year_range(&self, bounds: &DateRange) -> Option<YearRange> {
        match self.years {
            YearsSetting::FromBounds => Some(bounds.years()),
            YearsSetting::Range(years) => Some(years),
            YearsSetting::Hidden => None,
        }
    }

    /// The standard layout never draws suffixes, whatever the override says.
    fn suffix_config(&self) -> CjkSuffixConfig {
        match self.layout {
            PickerLayout::Standard => CjkSuffixConfig::hide_all(),
            PickerLayout::Cjk => self.cjk_suffix.unwrap_or_else(|| self.layout.default_suffix()),
        }
    }

    pub fn formatter(&self) -> DateFormatter {
        let formatter = DateFormatter::new(self.locale)
            .with_month_style(self.month_style)
            .with_day_style(self.day_style)
            .with_cjk_suffix(self.suffix_config());
        match self.date_order {
            Some(order) => formatter.with_date_order(order),
            None => formatter,
        }
    }
}

/// Everything a toolkit needs to draw one wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelColumn {
    pub field:          DateField,
    pub texts:          Vec<String>,
    /// Unit suffix drawn after the text (CJK layout only)
    pub suffix:         Option<&'static str>,
    pub suffix_spacing: f32,
    /// Entry the wheel should rest on for the current selection
    pub selected_index: usize,
}

#[derive(Debug)]
pub struct WheelDatePicker {
    layout:    PickerLayout,
    row_count: usize,
    resolver:  DateResolver,
}

impl WheelDatePicker {
    /// Builds a picker from `config`.
    ///
    /// # Errors
    /// Returns `PickerError` if the bounds are inverted or `row_count` is 0.
    pub fn new(config: &PickerConfig) -> Result<Self, PickerError> {
        if config.row_count == 0 {
            return Err(PickerError::ZeroRows);
        }
        let bounds = config.bounds()?;
        let years = config.year_range(&bounds);
        let start = config.start_date.unwrap_or_else(CalendarDate::today);
        let resolver = DateResolver::new(start, bounds, years, config.formatter());

        tracing::debug!(
            layout = ?config.layout,
            locale = config.locale.tag(),
            %bounds,
            selected = %resolver.selected(),
            year_wheel = years.is_some(),
            "created wheel date picker"
        );

        Ok(Self {
            layout: config.layout,
            row_count: config.row_count,
            resolver,
        })
    }

    #[must_use]
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(SnappedDate) -> Option<usize> + 'static,
    {
        self.resolver.set_on_snapped(callback);
        self
    }

    pub const fn layout(&self) -> PickerLayout {
        self.layout
    }

    pub const fn row_count(&self) -> usize {
        self.row_count
    }

    pub const fn selected(&self) -> CalendarDate {
        self.resolver.selected()
    }

    pub const fn resolver(&self) -> &DateResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut DateResolver {
        &mut self.resolver
    }

    /// Handle the toolkit drains to animate wheels that must follow a snap.
    pub fn scroll_queue(&self) -> ScrollQueue {
        self.resolver.scroll_queue()
    }

    /// Fields in display order. Year is left out when there is no year wheel.
    pub fn display_fields(&self) -> Vec<DateField> {
        self.resolver
            .formatter()
            .date_order()
            .fields()
            .into_iter()
            .filter(|field| *field != DateField::Year || self.resolver.has_year_wheel())
            .collect()
    }

    /// One column per displayed field, in display order.
    pub fn columns(&mut self) -> Vec<WheelColumn> {
        self.display_fields()
            .into_iter()
            .filter_map(|field| self.column(field))
            .collect()
    }

    fn column(&mut self, field: DateField) -> Option<WheelColumn> {
        let texts: Vec<String> = match field {
            DateField::Day => self.resolver.day_sequence().iter().map(|e| e.text.clone()).collect(),
            DateField::Month => self.resolver.month_sequence().iter().map(|e| e.text.clone()).collect(),
            DateField::Year => self
                .resolver
                .year_sequence()?
                .iter()
                .map(|e| e.text.clone())
                .collect(),
        };
        let formatter = self.resolver.formatter();
        let (suffix, suffix_spacing) = match self.layout {
            PickerLayout::Standard => (None, 0.0),
            PickerLayout::Cjk => (formatter.suffix(field), formatter.suffix_spacing(field)),
        };
        Some(WheelColumn {
            field,
            texts,
            suffix,
            suffix_spacing,
            selected_index: self.resolver.selected_index(field).unwrap_or(0),
        })
    }

    /// A wheel finished scrolling at `index`. Returns the index it should
    /// settle on, if any.
    pub fn on_scroll_finished(&mut self, field: DateField, index: usize) -> Option<usize> {
        self.resolver.on_snapped(field, index)
    }
}
