use crate::generate::pattern;
use crate::generate::GenerateConfig;
use crate::PickerError;
use chrono::{Datelike, Days, Local, Locale, Months, NaiveDate, NaiveDateTime, Timelike};

/// [GenerateConfig] for [NaiveDateTime].
///
/// Week numbers are ISO weeks. The first day of the week can be set,
/// it defaults to Monday.
#[derive(Debug, Clone)]
pub struct ChronoConfig {
    /// First day of the week, 0 = Sunday.
    pub week_start: u32,
}

impl Default for ChronoConfig {
    fn default() -> Self {
        Self { week_start: 1 }
    }
}

impl ChronoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// First day of the week, 0 = Sunday.
    pub fn with_week_start(mut self, week_start: u32) -> Self {
        self.week_start = week_start % 7;
        self
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// Replace year/month/day, clamping the day to the end of the month.
fn with_ymd(date: &NaiveDateTime, year: i32, month: u32, day: u32) -> NaiveDateTime {
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|d| d.and_time(date.time()))
        .unwrap_or(*date)
}

impl GenerateConfig for ChronoConfig {
    type Date = NaiveDateTime;
    type Locale = Locale;

    fn get_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn get_year(&self, date: &NaiveDateTime) -> i32 {
        date.year()
    }

    fn get_month(&self, date: &NaiveDateTime) -> u32 {
        date.month0()
    }

    fn get_date(&self, date: &NaiveDateTime) -> u32 {
        date.day()
    }

    fn get_hour(&self, date: &NaiveDateTime) -> u32 {
        date.hour()
    }

    fn get_minute(&self, date: &NaiveDateTime) -> u32 {
        date.minute()
    }

    fn get_second(&self, date: &NaiveDateTime) -> u32 {
        date.second()
    }

    fn get_millisecond(&self, date: &NaiveDateTime) -> u32 {
        (date.nanosecond() / 1_000_000) % 1000
    }

    fn get_week_day(&self, date: &NaiveDateTime) -> u32 {
        date.weekday().num_days_from_sunday()
    }

    fn add_year(&self, date: &NaiveDateTime, diff: i32) -> NaiveDateTime {
        with_ymd(date, date.year() + diff, date.month(), date.day())
    }

    fn add_month(&self, date: &NaiveDateTime, diff: i32) -> NaiveDateTime {
        let r = if diff >= 0 {
            date.checked_add_months(Months::new(diff.unsigned_abs()))
        } else {
            date.checked_sub_months(Months::new(diff.unsigned_abs()))
        };
        r.unwrap_or(*date)
    }

    fn add_date(&self, date: &NaiveDateTime, diff: i32) -> NaiveDateTime {
        let r = if diff >= 0 {
            date.checked_add_days(Days::new(diff.unsigned_abs() as u64))
        } else {
            date.checked_sub_days(Days::new(diff.unsigned_abs() as u64))
        };
        r.unwrap_or(*date)
    }

    fn set_year(&self, date: &NaiveDateTime, year: i32) -> NaiveDateTime {
        with_ymd(date, year, date.month(), date.day())
    }

    fn set_month(&self, date: &NaiveDateTime, month: u32) -> NaiveDateTime {
        with_ymd(date, date.year(), month.min(11) + 1, date.day())
    }

    fn set_date(&self, date: &NaiveDateTime, day: u32) -> NaiveDateTime {
        with_ymd(date, date.year(), date.month(), day)
    }

    fn set_hour(&self, date: &NaiveDateTime, hour: u32) -> NaiveDateTime {
        date.with_hour(hour).unwrap_or(*date)
    }

    fn set_minute(&self, date: &NaiveDateTime, minute: u32) -> NaiveDateTime {
        date.with_minute(minute).unwrap_or(*date)
    }

    fn set_second(&self, date: &NaiveDateTime, second: u32) -> NaiveDateTime {
        date.with_second(second).unwrap_or(*date)
    }

    fn set_millisecond(&self, date: &NaiveDateTime, millisecond: u32) -> NaiveDateTime {
        date.with_nanosecond((millisecond % 1000) * 1_000_000)
            .unwrap_or(*date)
    }

    fn is_after(&self, a: &NaiveDateTime, b: &NaiveDateTime) -> bool {
        a > b
    }

    fn is_validate(&self, _date: &NaiveDateTime) -> bool {
        // NaiveDateTime can't hold an invalid date.
        true
    }

    fn week_first_day(&self, _locale: &Locale) -> u32 {
        self.week_start
    }

    fn week_first_date(&self, locale: &Locale, date: &NaiveDateTime) -> NaiveDateTime {
        let wd = self.get_week_day(date);
        let back = (wd + 7 - self.week_first_day(locale)) % 7;
        let d = self.add_date(date, -(back as i32));
        d.date().and_time(Default::default())
    }

    fn get_week(&self, _locale: &Locale, date: &NaiveDateTime) -> u32 {
        date.iso_week().week()
    }

    fn check_pattern(&self, pattern: &str) -> Result<(), PickerError> {
        pattern::tokenize(pattern).map(|_| ())
    }

    fn format(&self, locale: &Locale, date: &NaiveDateTime, pattern: &str) -> String {
        match pattern::tokenize(pattern) {
            Ok(tokens) => pattern::format(&tokens, date, *locale),
            Err(e) => {
                log::warn!("invalid format pattern {:?}", e);
                String::new()
            }
        }
    }

    fn parse(&self, locale: &Locale, text: &str, patterns: &[&str]) -> Option<NaiveDateTime> {
        for p in patterns {
            let Ok(tokens) = pattern::tokenize(p) else {
                continue;
            };
            if let Some(date) = pattern::parse(&tokens, text, *locale) {
                // strict: the text must be exactly what we would write.
                if pattern::format(&tokens, &date, *locale) == text {
                    return Some(date);
                }
            }
        }
        None
    }

    fn short_months(&self, locale: &Locale) -> Option<Vec<String>> {
        let names = (1..=12)
            .filter_map(|m| NaiveDate::from_ymd_opt(2000, m, 1))
            .map(|d| self.format(locale, &d.and_time(Default::default()), "MMM"))
            .collect();
        Some(names)
    }

    fn short_week_days(&self, locale: &Locale) -> Option<Vec<String>> {
        // 2000-01-02 was a sunday
        let names = (2..=8)
            .filter_map(|d| NaiveDate::from_ymd_opt(2000, 1, d))
            .map(|d| self.format(locale, &d.and_time(Default::default()), "ddd"))
            .collect();
        Some(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .expect("date")
            .and_hms_opt(0, 0, 0)
            .expect("time")
    }

    #[test]
    fn test_clamp_month_end() {
        let g = ChronoConfig::default();
        assert_eq!(g.add_month(&dt(2021, 1, 31), 1), dt(2021, 2, 28));
        assert_eq!(g.set_month(&dt(2020, 3, 31), 1), dt(2020, 2, 29));
        assert_eq!(g.add_year(&dt(2020, 2, 29), 1), dt(2021, 2, 28));
    }

    #[test]
    fn test_week_first_date() {
        let g = ChronoConfig::default();
        // 2021-06-23 is a wednesday
        assert_eq!(
            g.week_first_date(&Locale::POSIX, &dt(2021, 6, 23)),
            dt(2021, 6, 21)
        );
        let g = ChronoConfig::default().with_week_start(0);
        assert_eq!(
            g.week_first_date(&Locale::POSIX, &dt(2021, 6, 23)),
            dt(2021, 6, 20)
        );
    }

    #[test]
    fn test_parse_first_match() {
        let g = ChronoConfig::default();
        let l = Locale::POSIX;
        assert_eq!(
            g.parse(&l, "21.06.2021", &["YYYY-MM-DD", "DD.MM.YYYY"]),
            Some(dt(2021, 6, 21))
        );
        assert_eq!(g.parse(&l, "2021-06-2", &["YYYY-MM-DD"]), None);
        // M accepts 1 or 2 digits, but the round trip must be exact.
        assert_eq!(g.parse(&l, "2021-06-21", &["YYYY-M-DD"]), None);
        assert_eq!(g.format(&l, &dt(2021, 6, 21), "YYYY-MM-DD"), "2021-06-21");
    }
}
