//!
//! Date arithmetic used by the pickers.
//!
//! Everything in this crate is generic over a [GenerateConfig].
//! The pickers never look into a date value, they only ask the
//! config. [ChronoConfig] is the implementation for
//! [chrono::NaiveDateTime].
//!
//! Implementations must not keep mutable state that is visible
//! across calls. Several panels use the same config while
//! building one frame.
//!

use crate::PickerError;
use std::fmt::Debug;

mod chrono_config;
pub mod pattern;

pub use chrono_config::ChronoConfig;

/// Date math and locale aware text conversion.
///
/// Months are 0-based, days of the week start with 0 = Sunday.
pub trait GenerateConfig: Debug {
    /// The date type.
    type Date: Clone + Debug;
    /// Locale used for parsing and formatting.
    type Locale: Clone + Debug + Default;

    /// Current date and time.
    fn get_now(&self) -> Self::Date;

    fn get_year(&self, date: &Self::Date) -> i32;
    /// Month 0..=11
    fn get_month(&self, date: &Self::Date) -> u32;
    /// Day of month 1..=31
    fn get_date(&self, date: &Self::Date) -> u32;
    fn get_hour(&self, date: &Self::Date) -> u32;
    fn get_minute(&self, date: &Self::Date) -> u32;
    fn get_second(&self, date: &Self::Date) -> u32;
    fn get_millisecond(&self, date: &Self::Date) -> u32;
    /// Day of the week, 0 = Sunday.
    fn get_week_day(&self, date: &Self::Date) -> u32;

    fn add_year(&self, date: &Self::Date, diff: i32) -> Self::Date;
    fn add_month(&self, date: &Self::Date, diff: i32) -> Self::Date;
    fn add_date(&self, date: &Self::Date, diff: i32) -> Self::Date;

    fn set_year(&self, date: &Self::Date, year: i32) -> Self::Date;
    /// Month 0..=11
    fn set_month(&self, date: &Self::Date, month: u32) -> Self::Date;
    fn set_date(&self, date: &Self::Date, day: u32) -> Self::Date;
    fn set_hour(&self, date: &Self::Date, hour: u32) -> Self::Date;
    fn set_minute(&self, date: &Self::Date, minute: u32) -> Self::Date;
    fn set_second(&self, date: &Self::Date, second: u32) -> Self::Date;
    fn set_millisecond(&self, date: &Self::Date, millisecond: u32) -> Self::Date;

    /// a is strictly after b.
    fn is_after(&self, a: &Self::Date, b: &Self::Date) -> bool;

    /// The value is a usable date.
    fn is_validate(&self, date: &Self::Date) -> bool;

    /// First day of the week, 0 = Sunday.
    fn week_first_day(&self, locale: &Self::Locale) -> u32;

    /// First date of the week containing date.
    fn week_first_date(&self, locale: &Self::Locale, date: &Self::Date) -> Self::Date;

    /// Week of the year.
    fn get_week(&self, locale: &Self::Locale, date: &Self::Date) -> u32;

    /// Check a format pattern when it is configured.
    fn check_pattern(&self, _pattern: &str) -> Result<(), PickerError> {
        Ok(())
    }

    /// Format the date. Must be deterministic.
    fn format(&self, locale: &Self::Locale, date: &Self::Date, pattern: &str) -> String;

    /// Parse with the first matching pattern.
    /// Returns None if no pattern matches.
    fn parse(&self, locale: &Self::Locale, text: &str, patterns: &[&str]) -> Option<Self::Date>;

    /// Abbreviated month names.
    fn short_months(&self, _locale: &Self::Locale) -> Option<Vec<String>> {
        None
    }

    /// Abbreviated weekday names, starting with Sunday.
    fn short_week_days(&self, _locale: &Self::Locale) -> Option<Vec<String>> {
        None
    }
}
