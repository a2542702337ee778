//!
//! Comparisons and panel boundaries at picker granularity.
//!

use crate::generate::GenerateConfig;

/// Unit of selection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickerMode {
    #[default]
    Date,
    Week,
    Month,
    Quarter,
    Year,
    Decade,
    Time,
    /// Date with a time part.
    DateTime,
}

impl PickerMode {
    /// Modes that need an explicit confirm before commit.
    pub fn is_complex(&self) -> bool {
        matches!(self, PickerMode::Time | PickerMode::DateTime)
    }

    /// Granularity of a single cell in the panel.
    pub fn cell_mode(&self) -> PickerMode {
        match self {
            PickerMode::DateTime => PickerMode::Date,
            m => *m,
        }
    }
}

/// Both None counts as equal, one None as different.
fn nullable<D>(a: Option<&D>, b: Option<&D>, cmp: impl FnOnce(&D, &D) -> bool) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

pub fn is_same_decade<G: GenerateConfig>(g: &G, a: Option<&G::Date>, b: Option<&G::Date>) -> bool {
    nullable(a, b, |a, b| {
        g.get_year(a).div_euclid(10) == g.get_year(b).div_euclid(10)
    })
}

pub fn is_same_year<G: GenerateConfig>(g: &G, a: Option<&G::Date>, b: Option<&G::Date>) -> bool {
    nullable(a, b, |a, b| g.get_year(a) == g.get_year(b))
}

pub fn quarter<G: GenerateConfig>(g: &G, date: &G::Date) -> u32 {
    g.get_month(date) / 3 + 1
}

pub fn is_same_quarter<G: GenerateConfig>(
    g: &G,
    a: Option<&G::Date>,
    b: Option<&G::Date>,
) -> bool {
    nullable(a, b, |a, b| {
        g.get_year(a) == g.get_year(b) && quarter(g, a) == quarter(g, b)
    })
}

pub fn is_same_month<G: GenerateConfig>(g: &G, a: Option<&G::Date>, b: Option<&G::Date>) -> bool {
    nullable(a, b, |a, b| {
        g.get_year(a) == g.get_year(b) && g.get_month(a) == g.get_month(b)
    })
}

pub fn is_same_date<G: GenerateConfig>(g: &G, a: Option<&G::Date>, b: Option<&G::Date>) -> bool {
    nullable(a, b, |a, b| {
        g.get_year(a) == g.get_year(b)
            && g.get_month(a) == g.get_month(b)
            && g.get_date(a) == g.get_date(b)
    })
}

pub fn is_same_time<G: GenerateConfig>(g: &G, a: Option<&G::Date>, b: Option<&G::Date>) -> bool {
    nullable(a, b, |a, b| {
        g.get_hour(a) == g.get_hour(b)
            && g.get_minute(a) == g.get_minute(b)
            && g.get_second(a) == g.get_second(b)
    })
}

/// Same date and time including milliseconds.
pub fn is_same_timestamp<G: GenerateConfig>(
    g: &G,
    a: Option<&G::Date>,
    b: Option<&G::Date>,
) -> bool {
    nullable(a, b, |a, b| {
        is_same_date(g, Some(a), Some(b))
            && is_same_time(g, Some(a), Some(b))
            && g.get_millisecond(a) == g.get_millisecond(b)
    })
}

pub fn is_same_week<G: GenerateConfig>(
    g: &G,
    locale: &G::Locale,
    a: Option<&G::Date>,
    b: Option<&G::Date>,
) -> bool {
    nullable(a, b, |a, b| {
        let wa = g.week_first_date(locale, a);
        let wb = g.week_first_date(locale, b);
        is_same_date(g, Some(&wa), Some(&wb))
    })
}

/// Equal at the granularity of the mode.
pub fn is_same<G: GenerateConfig>(
    g: &G,
    locale: &G::Locale,
    a: Option<&G::Date>,
    b: Option<&G::Date>,
    mode: PickerMode,
) -> bool {
    match mode {
        PickerMode::Decade => is_same_decade(g, a, b),
        PickerMode::Year => is_same_year(g, a, b),
        PickerMode::Quarter => is_same_quarter(g, a, b),
        PickerMode::Month => is_same_month(g, a, b),
        PickerMode::Week => is_same_week(g, locale, a, b),
        PickerMode::Date => is_same_date(g, a, b),
        PickerMode::Time => is_same_time(g, a, b),
        PickerMode::DateTime => is_same_timestamp(g, a, b),
    }
}

/// a is after b or the same at the granularity of the mode.
pub fn is_same_or_after<G: GenerateConfig>(
    g: &G,
    locale: &G::Locale,
    a: &G::Date,
    b: &G::Date,
    mode: PickerMode,
) -> bool {
    is_same(g, locale, Some(a), Some(b), mode) || g.is_after(a, b)
}

/// Date is between start and end, exclusive.
pub fn is_in_range<G: GenerateConfig>(
    g: &G,
    start: Option<&G::Date>,
    end: Option<&G::Date>,
    date: Option<&G::Date>,
) -> bool {
    match (start, end, date) {
        (Some(start), Some(end), Some(date)) => {
            !is_same_date(g, Some(start), Some(date))
                && !is_same_date(g, Some(end), Some(date))
                && g.is_after(date, start)
                && g.is_after(end, date)
        }
        _ => false,
    }
}

/// Copy the time part of `time` into `date`. Without a time
/// the time part is reset to midnight.
pub fn fill_time<G: GenerateConfig>(g: &G, date: &G::Date, time: Option<&G::Date>) -> G::Date {
    let (h, m, s, ms) = match time {
        Some(t) => (
            g.get_hour(t),
            g.get_minute(t),
            g.get_second(t),
            g.get_millisecond(t),
        ),
        None => (0, 0, 0, 0),
    };
    let d = g.set_hour(date, h);
    let d = g.set_minute(&d, m);
    let d = g.set_second(&d, s);
    g.set_millisecond(&d, ms)
}

/// Sort a pair ascending.
pub fn order_dates<G: GenerateConfig>(g: &G, start: G::Date, end: G::Date) -> (G::Date, G::Date) {
    if g.is_after(&start, &end) {
        (end, start)
    } else {
        (start, end)
    }
}

/// First date shown by the panel that contains the date.
pub fn panel_start<G: GenerateConfig>(g: &G, mode: PickerMode, date: &G::Date) -> G::Date {
    match mode {
        PickerMode::Date | PickerMode::Week | PickerMode::DateTime => g.set_date(date, 1),
        PickerMode::Month | PickerMode::Quarter => g.set_date(&g.set_month(date, 0), 1),
        PickerMode::Year => {
            let d = g.set_date(&g.set_month(date, 0), 1);
            g.set_year(&d, g.get_year(date).div_euclid(10) * 10)
        }
        PickerMode::Decade => {
            let d = g.set_date(&g.set_month(date, 0), 1);
            g.set_year(&d, g.get_year(date).div_euclid(100) * 100)
        }
        PickerMode::Time => date.clone(),
    }
}

/// Last date shown by the panel that contains the date.
pub fn panel_end<G: GenerateConfig>(g: &G, mode: PickerMode, date: &G::Date) -> G::Date {
    match mode {
        PickerMode::Date | PickerMode::Week | PickerMode::DateTime => {
            let start = g.set_date(date, 1);
            g.add_date(&g.add_month(&start, 1), -1)
        }
        PickerMode::Month | PickerMode::Quarter => g.set_date(&g.set_month(date, 11), 31),
        PickerMode::Year => {
            let d = g.set_date(&g.set_month(date, 11), 31);
            g.set_year(&d, g.get_year(date).div_euclid(10) * 10 + 9)
        }
        PickerMode::Decade => {
            let d = g.set_date(&g.set_month(date, 11), 31);
            g.set_year(&d, g.get_year(date).div_euclid(100) * 100 + 99)
        }
        PickerMode::Time => date.clone(),
    }
}
