//! Labels, field order and CJK suffixes for the three wheels.
//!
//! [`DateFormatter`] is read-only input to the sequence builders: it decides
//! which fields appear and in what order, how each value is rendered, and
//! which unit suffix (if any) follows the text in the CJK layout.

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::{Day, Month, Year, prelude::*};

/// One of the three wheels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    #[display(fmt = "day")]
    Day,
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "year")]
    Year,
}

/// Left-to-right order of the wheels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    DayMonthYear,
    MonthDayYear,
    YearMonthDay,
}

impl DateOrder {
    pub const fn fields(self) -> [DateField; 3] {
        match self {
            Self::DayMonthYear => [DateField::Day, DateField::Month, DateField::Year],
            Self::MonthDayYear => [DateField::Month, DateField::Day, DateField::Year],
            Self::YearMonthDay => [DateField::Year, DateField::Month, DateField::Day],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthDisplayStyle {
    /// `1`..`12`
    Numeric,
    /// `Jan`, or `1月` in CJK locales
    #[default]
    Short,
    /// `January`, or `1月` in CJK locales
    Full,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayDisplayStyle {
    /// `7`
    #[default]
    Numeric,
    /// `07`
    TwoDigit,
}

/// Visibility and spacing of the unit suffix drawn after each wheel's text
/// in the CJK layout. Spacing is in layout units of the embedding toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CjkSuffixConfig {
    pub show_year_suffix:     bool,
    pub show_month_suffix:    bool,
    pub show_day_suffix:      bool,
    pub year_suffix_spacing:  f32,
    pub month_suffix_spacing: f32,
    pub day_suffix_spacing:   f32,
}

impl CjkSuffixConfig {
    const DEFAULT_SPACING: f32 = 4.0;

    pub const fn show_all() -> Self {
        Self {
            show_year_suffix:     true,
            show_month_suffix:    true,
            show_day_suffix:      true,
            year_suffix_spacing:  Self::DEFAULT_SPACING,
            month_suffix_spacing: Self::DEFAULT_SPACING,
            day_suffix_spacing:   Self::DEFAULT_SPACING,
        }
    }

    pub const fn hide_all() -> Self {
        Self {
            show_year_suffix:     false,
            show_month_suffix:    false,
            show_day_suffix:      false,
            year_suffix_spacing:  0.0,
            month_suffix_spacing: 0.0,
            day_suffix_spacing:   0.0,
        }
    }

    pub const fn shows(&self, field: DateField) -> bool {
        match field {
            DateField::Day => self.show_day_suffix,
            DateField::Month => self.show_month_suffix,
            DateField::Year => self.show_year_suffix,
        }
    }

    pub const fn spacing(&self, field: DateField) -> f32 {
        match field {
            DateField::Day => self.day_suffix_spacing,
            DateField::Month => self.month_suffix_spacing,
            DateField::Year => self.year_suffix_spacing,
        }
    }
}

impl Default for CjkSuffixConfig {
    fn default() -> Self {
        Self::hide_all()
    }
}

/// Language used for labels and suffixes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Locale {
    #[default]
    English,
    Chinese,
    Japanese,
    Korean,
}

impl Locale {
    /// Resolves a BCP 47 tag (`zh-Hans-CN`, `ja_JP`, `ko`) by its language
    /// subtag. Unknown languages and unparseable tags fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().parse::<LanguageIdentifier>() {
            Ok(langid) => Self::from_langid(&langid),
            Err(err) => {
                tracing::debug!(tag, %err, "unparseable locale tag, using English");
                Self::English
            },
        }
    }

    pub fn from_langid(langid: &LanguageIdentifier) -> Self {
        match langid.language.as_str() {
            "zh" => Self::Chinese,
            "ja" => Self::Japanese,
            "ko" => Self::Korean,
            _ => Self::English,
        }
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Chinese => "zh",
            Self::Japanese => "ja",
            Self::Korean => "ko",
        }
    }

    pub const fn is_cjk(self) -> bool {
        !matches!(self, Self::English)
    }

    pub const fn default_order(self) -> DateOrder {
        if self.is_cjk() {
            DateOrder::YearMonthDay
        } else {
            DateOrder::MonthDayYear
        }
    }

    /// Unit suffix for `field`, empty when the language has none
    pub const fn suffix(self, field: DateField) -> &'static str {
        match (self, field) {
            (Self::English, _) => "",
            (Self::Chinese | Self::Japanese, DateField::Year) => "年",
            (Self::Chinese | Self::Japanese, DateField::Month) => "月",
            (Self::Chinese | Self::Japanese, DateField::Day) => "日",
            (Self::Korean, DateField::Year) => "년",
            (Self::Korean, DateField::Month) => "월",
            (Self::Korean, DateField::Day) => "일",
        }
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag().to_owned()
    }
}

/// Everything that changes the text of a wheel entry. Two formatters with the
/// same key produce identical sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct LabelKey {
    locale:      Locale,
    month_style: MonthDisplayStyle,
    day_style:   DayDisplayStyle,
    month_unit:  bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateFormatter {
    locale:      Locale,
    date_order:  DateOrder,
    month_style: MonthDisplayStyle,
    day_style:   DayDisplayStyle,
    cjk_suffix:  CjkSuffixConfig,
}

impl DateFormatter {
    /// Formatter with the locale's default order, short months, plain days
    /// and hidden suffixes.
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            date_order: locale.default_order(),
            month_style: MonthDisplayStyle::default(),
            day_style: DayDisplayStyle::default(),
            cjk_suffix: CjkSuffixConfig::hide_all(),
        }
    }

    #[must_use]
    pub const fn with_date_order(mut self, order: DateOrder) -> Self {
        self.date_order = order;
        self
    }

    #[must_use]
    pub const fn with_month_style(mut self, style: MonthDisplayStyle) -> Self {
        self.month_style = style;
        self
    }

    #[must_use]
    pub const fn with_day_style(mut self, style: DayDisplayStyle) -> Self {
        self.day_style = style;
        self
    }

    #[must_use]
    pub const fn with_cjk_suffix(mut self, config: CjkSuffixConfig) -> Self {
        self.cjk_suffix = config;
        self
    }

    pub const fn locale(&self) -> Locale {
        self.locale
    }

    pub const fn date_order(&self) -> DateOrder {
        self.date_order
    }

    pub const fn month_style(&self) -> MonthDisplayStyle {
        self.month_style
    }

    pub const fn cjk_suffix(&self) -> &CjkSuffixConfig {
        &self.cjk_suffix
    }

    pub(crate) const fn label_key(&self) -> LabelKey {
        LabelKey {
            locale:      self.locale,
            month_style: self.month_style,
            day_style:   self.day_style,
            month_unit:  self.month_unit_in_label(),
        }
    }

    pub fn day_label(&self, day: Day) -> String {
        match self.day_style {
            DayDisplayStyle::Numeric => day.get().to_string(),
            DayDisplayStyle::TwoDigit => format!("{:02}", day.get()),
        }
    }

    /// CJK month names carry the unit (`3月`) unless the month suffix is
    /// drawn separately.
    const fn month_unit_in_label(&self) -> bool {
        self.locale.is_cjk()
            && !self.cjk_suffix.shows(DateField::Month)
            && !matches!(self.month_style, MonthDisplayStyle::Numeric)
    }

    pub fn month_label(&self, month: Month) -> String {
        let number = month.get();
        if self.month_unit_in_label() {
            return format!("{number}{}", self.locale.suffix(DateField::Month));
        }
        match (self.month_style, self.locale) {
            (MonthDisplayStyle::Short, Locale::English) => english_month_name(number, 3),
            (MonthDisplayStyle::Full, Locale::English) => english_month_name(number, usize::MAX),
            _ => number.to_string(),
        }
    }

    pub fn year_label(&self, year: Year) -> String {
        year.get().to_string()
    }

    /// Suffix text to draw after `field`'s wheel, if it is enabled and the
    /// locale has one.
    pub fn suffix(&self, field: DateField) -> Option<&'static str> {
        let text = self.locale.suffix(field);
        (self.cjk_suffix.shows(field) && !text.is_empty()).then_some(text)
    }

    pub const fn suffix_spacing(&self, field: DateField) -> f32 {
        self.cjk_suffix.spacing(field)
    }
}

/// English name of month `number`, cut to `len` characters.
fn english_month_name(number: u8, len: usize) -> String {
    chrono::Month::try_from(number).map_or_else(
        |_| number.to_string(),
        |month| month.name().chars().take(len).collect(),
    )
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}
