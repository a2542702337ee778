//!
//! Format patterns in the dayjs style.
//!
//! | token | meaning |
//! |---|---|
//! | YYYY | four digit year |
//! | YY | two digit year, 2000 based |
//! | GGGG | ISO week based year |
//! | Q | quarter |
//! | MMMM, MMM | month name, abbreviated month name |
//! | MM, M | month |
//! | ww, w | ISO week |
//! | DD, D | day of month |
//! | dddd, ddd | weekday name, abbreviated weekday name |
//! | HH, H | hour 0..=23 |
//! | hh, h | hour 1..=12 |
//! | mm, m | minute |
//! | ss, s | second |
//! | SSS | millisecond |
//! | A, a | AM/PM, am/pm |
//!
//! Text in `[...]` is copied verbatim, everything else that is not
//! a token too.
//!

use crate::PickerError;
use chrono::{
    Datelike, Local, Locale, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc, Weekday,
};

/// One element of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Year4,
    Year2,
    IsoYear4,
    Quarter,
    MonthLong,
    MonthShort,
    Month2,
    Month1,
    Week2,
    Week1,
    Day2,
    Day1,
    WeekdayLong,
    WeekdayShort,
    Hour2,
    Hour1,
    Hour12_2,
    Hour12_1,
    Minute2,
    Minute1,
    Second2,
    Second1,
    Milli3,
    AmPmUpper,
    AmPmLower,
}

// longest first
const TOKENS: &[(&str, Token)] = &[
    ("YYYY", Token::Year4),
    ("GGGG", Token::IsoYear4),
    ("MMMM", Token::MonthLong),
    ("dddd", Token::WeekdayLong),
    ("MMM", Token::MonthShort),
    ("ddd", Token::WeekdayShort),
    ("SSS", Token::Milli3),
    ("YY", Token::Year2),
    ("MM", Token::Month2),
    ("ww", Token::Week2),
    ("DD", Token::Day2),
    ("HH", Token::Hour2),
    ("hh", Token::Hour12_2),
    ("mm", Token::Minute2),
    ("ss", Token::Second2),
    ("Q", Token::Quarter),
    ("M", Token::Month1),
    ("w", Token::Week1),
    ("D", Token::Day1),
    ("H", Token::Hour1),
    ("h", Token::Hour12_1),
    ("m", Token::Minute1),
    ("s", Token::Second1),
    ("A", Token::AmPmUpper),
    ("a", Token::AmPmLower),
];

/// Tokenize a pattern.
pub fn tokenize(pattern: &str) -> Result<Vec<Token>, PickerError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();

    let mut rest = pattern;
    'outer: while !rest.is_empty() {
        if let Some(escaped) = rest.strip_prefix('[') {
            let Some(end) = escaped.find(']') else {
                return Err(PickerError::InvalidPattern(
                    pattern.into(),
                    pattern.len() - rest.len(),
                ));
            };
            literal.push_str(&escaped[..end]);
            rest = &escaped[end + 1..];
            continue;
        }

        for (tok, token) in TOKENS {
            if let Some(r) = rest.strip_prefix(tok) {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(token.clone());
                rest = r;
                continue 'outer;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            literal.push(c);
        }
        rest = chars.as_str();
    }
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }

    Ok(tokens)
}

fn localized(date: &NaiveDateTime, fmt: &str, locale: Locale) -> String {
    Utc.from_utc_datetime(date)
        .format_localized(fmt, locale)
        .to_string()
}

fn hour12(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

/// Format a date with the tokens.
pub fn format(tokens: &[Token], date: &NaiveDateTime, locale: Locale) -> String {
    let mut buf = String::new();
    for token in tokens {
        match token {
            Token::Literal(s) => buf.push_str(s),
            Token::Year4 => buf.push_str(&format!("{:04}", date.year())),
            Token::Year2 => buf.push_str(&format!("{:02}", date.year().rem_euclid(100))),
            Token::IsoYear4 => buf.push_str(&format!("{:04}", date.iso_week().year())),
            Token::Quarter => buf.push_str(&format!("{}", date.month0() / 3 + 1)),
            Token::MonthLong => buf.push_str(&localized(date, "%B", locale)),
            Token::MonthShort => buf.push_str(&localized(date, "%b", locale)),
            Token::Month2 => buf.push_str(&format!("{:02}", date.month())),
            Token::Month1 => buf.push_str(&format!("{}", date.month())),
            Token::Week2 => buf.push_str(&format!("{:02}", date.iso_week().week())),
            Token::Week1 => buf.push_str(&format!("{}", date.iso_week().week())),
            Token::Day2 => buf.push_str(&format!("{:02}", date.day())),
            Token::Day1 => buf.push_str(&format!("{}", date.day())),
            Token::WeekdayLong => buf.push_str(&localized(date, "%A", locale)),
            Token::WeekdayShort => buf.push_str(&localized(date, "%a", locale)),
            Token::Hour2 => buf.push_str(&format!("{:02}", date.hour())),
            Token::Hour1 => buf.push_str(&format!("{}", date.hour())),
            Token::Hour12_2 => buf.push_str(&format!("{:02}", hour12(date.hour()))),
            Token::Hour12_1 => buf.push_str(&format!("{}", hour12(date.hour()))),
            Token::Minute2 => buf.push_str(&format!("{:02}", date.minute())),
            Token::Minute1 => buf.push_str(&format!("{}", date.minute())),
            Token::Second2 => buf.push_str(&format!("{:02}", date.second())),
            Token::Second1 => buf.push_str(&format!("{}", date.second())),
            Token::Milli3 => {
                buf.push_str(&format!("{:03}", (date.nanosecond() / 1_000_000) % 1000))
            }
            Token::AmPmUpper => buf.push_str(&localized(date, "%p", locale).to_uppercase()),
            Token::AmPmLower => buf.push_str(&localized(date, "%p", locale).to_lowercase()),
        }
    }
    buf
}

#[derive(Debug, Default)]
struct Fields {
    year: Option<i32>,
    iso_year: Option<i32>,
    quarter: Option<u32>,
    month: Option<u32>,
    week: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    hour12: Option<u32>,
    pm: Option<bool>,
    minute: Option<u32>,
    second: Option<u32>,
    milli: Option<u32>,
}

/// Exactly n ascii digits.
fn fixed_digits(text: &str, n: usize) -> Option<(u32, &str)> {
    if text.len() < n || !text.as_bytes()[..n].iter().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let v = text[..n].parse::<u32>().ok()?;
    Some((v, &text[n..]))
}

/// One or two ascii digits.
fn short_digits(text: &str) -> Option<(u32, &str)> {
    let n = text
        .as_bytes()
        .iter()
        .take(2)
        .take_while(|c| c.is_ascii_digit())
        .count();
    if n == 0 {
        return None;
    }
    let v = text[..n].parse::<u32>().ok()?;
    Some((v, &text[n..]))
}

/// Longest matching name, case insensitive. Returns the index.
fn name<'a>(text: &'a str, names: &[String]) -> Option<(usize, &'a str)> {
    let lower = text.to_lowercase();
    let mut found: Option<(usize, usize)> = None;
    for (idx, n) in names.iter().enumerate() {
        let n = n.to_lowercase();
        if !n.is_empty() && lower.starts_with(&n) {
            if found.map(|(_, len)| n.len() > len).unwrap_or(true) {
                found = Some((idx, n.len()));
            }
        }
    }
    let (idx, len) = found?;
    // lowercase may change byte lengths, map back by char count.
    let chars = lower[..len].chars().count();
    let byte_len = text
        .char_indices()
        .nth(chars)
        .map(|(p, _)| p)
        .unwrap_or(text.len());
    Some((idx, &text[byte_len..]))
}

fn month_names(fmt: &str, locale: Locale) -> Vec<String> {
    (1..=12)
        .filter_map(|m| NaiveDate::from_ymd_opt(2000, m, 1))
        .map(|d| localized(&d.and_time(Default::default()), fmt, locale))
        .collect()
}

fn weekday_names(fmt: &str, locale: Locale) -> Vec<String> {
    // 2000-01-02 was a sunday
    (2..=8)
        .filter_map(|d| NaiveDate::from_ymd_opt(2000, 1, d))
        .map(|d| localized(&d.and_time(Default::default()), fmt, locale))
        .collect()
}

fn am_pm_names(locale: Locale) -> Vec<String> {
    [0, 12]
        .iter()
        .filter_map(|h| NaiveDate::from_ymd_opt(2000, 1, 1)?.and_hms_opt(*h, 0, 0))
        .map(|d| localized(&d, "%p", locale))
        .collect()
}

/// Parse the text with the tokens.
///
/// Numeric fields with a two-letter token need exactly that many
/// digits. The whole text must be consumed.
///
/// Missing date fields default to the first of the period. A pattern
/// without any date field uses today's date.
pub fn parse(tokens: &[Token], text: &str, locale: Locale) -> Option<NaiveDateTime> {
    let mut f = Fields::default();
    let mut rest = text;

    for token in tokens {
        rest = match token {
            Token::Literal(s) => rest.strip_prefix(s.as_str())?,
            Token::Year4 => {
                let (v, r) = fixed_digits(rest, 4)?;
                f.year = Some(v as i32);
                r
            }
            Token::Year2 => {
                let (v, r) = fixed_digits(rest, 2)?;
                f.year = Some(2000 + v as i32);
                r
            }
            Token::IsoYear4 => {
                let (v, r) = fixed_digits(rest, 4)?;
                f.iso_year = Some(v as i32);
                r
            }
            Token::Quarter => {
                let (v, r) = fixed_digits(rest, 1)?;
                f.quarter = Some(v);
                r
            }
            Token::MonthLong => {
                let (v, r) = name(rest, &month_names("%B", locale))?;
                f.month = Some(v as u32 + 1);
                r
            }
            Token::MonthShort => {
                let (v, r) = name(rest, &month_names("%b", locale))?;
                f.month = Some(v as u32 + 1);
                r
            }
            Token::Month2 => {
                let (v, r) = fixed_digits(rest, 2)?;
                f.month = Some(v);
                r
            }
            Token::Month1 => {
                let (v, r) = short_digits(rest)?;
                f.month = Some(v);
                r
            }
            Token::Week2 => {
                let (v, r) = fixed_digits(rest, 2)?;
                f.week = Some(v);
                r
            }
            Token::Week1 => {
                let (v, r) = short_digits(rest)?;
                f.week = Some(v);
                r
            }
            Token::Day2 => {
                let (v, r) = fixed_digits(rest, 2)?;
                f.day = Some(v);
                r
            }
            Token::Day1 => {
                let (v, r) = short_digits(rest)?;
                f.day = Some(v);
                r
            }
            Token::WeekdayLong => name(rest, &weekday_names("%A", locale))?.1,
            Token::WeekdayShort => name(rest, &weekday_names("%a", locale))?.1,
            Token::Hour2 => {
                let (v, r) = fixed_digits(rest, 2)?;
                f.hour = Some(v);
                r
            }
            Token::Hour1 => {
                let (v, r) = short_digits(rest)?;
                f.hour = Some(v);
                r
            }
            Token::Hour12_2 => {
                let (v, r) = fixed_digits(rest, 2)?;
                f.hour12 = Some(v);
                r
            }
            Token::Hour12_1 => {
                let (v, r) = short_digits(rest)?;
                f.hour12 = Some(v);
                r
            }
            Token::Minute2 => {
                let (v, r) = fixed_digits(rest, 2)?;
                f.minute = Some(v);
                r
            }
            Token::Minute1 => {
                let (v, r) = short_digits(rest)?;
                f.minute = Some(v);
                r
            }
            Token::Second2 => {
                let (v, r) = fixed_digits(rest, 2)?;
                f.second = Some(v);
                r
            }
            Token::Second1 => {
                let (v, r) = short_digits(rest)?;
                f.second = Some(v);
                r
            }
            Token::Milli3 => {
                let (v, r) = fixed_digits(rest, 3)?;
                f.milli = Some(v);
                r
            }
            Token::AmPmUpper | Token::AmPmLower => {
                let (v, r) = name(rest, &am_pm_names(locale))?;
                f.pm = Some(v == 1);
                r
            }
        };
    }
    if !rest.is_empty() {
        return None;
    }

    assemble(f)
}

fn assemble(f: Fields) -> Option<NaiveDateTime> {
    let date = if let Some(week) = f.week {
        let year = f.iso_year.or(f.year)?;
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?
    } else if f.year.is_none()
        && f.iso_year.is_none()
        && f.month.is_none()
        && f.quarter.is_none()
        && f.day.is_none()
    {
        Local::now().date_naive()
    } else {
        let year = f.year.or(f.iso_year).unwrap_or(1970);
        let month = match (f.month, f.quarter) {
            (Some(m), _) => m,
            (None, Some(q)) if (1..=4).contains(&q) => (q - 1) * 3 + 1,
            (None, Some(_)) => return None,
            (None, None) => 1,
        };
        NaiveDate::from_ymd_opt(year, month, f.day.unwrap_or(1))?
    };

    let hour = match (f.hour, f.hour12) {
        (Some(h), _) => h,
        (None, Some(h)) if (1..=12).contains(&h) => {
            (h % 12) + if f.pm.unwrap_or(false) { 12 } else { 0 }
        }
        (None, Some(_)) => return None,
        (None, None) => 0,
    };

    date.and_hms_milli_opt(
        hour,
        f.minute.unwrap_or(0),
        f.second.unwrap_or(0),
        f.milli.unwrap_or(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("YYYY-MM-DD").expect("pattern"),
            vec![
                Token::Year4,
                Token::Literal("-".into()),
                Token::Month2,
                Token::Literal("-".into()),
                Token::Day2
            ]
        );
        assert_eq!(
            tokenize("YYYY-[Q]Q").expect("pattern"),
            vec![
                Token::Year4,
                Token::Literal("-Q".into()),
                Token::Quarter
            ]
        );
        assert_eq!(
            tokenize("YYYY[-"),
            Err(PickerError::InvalidPattern("YYYY[-".into(), 4))
        );
    }

    #[test]
    fn test_parse_strict_width() {
        let t = tokenize("YYYY-MM-DD").expect("pattern");
        assert!(parse(&t, "2021-06-21", Locale::POSIX).is_some());
        assert!(parse(&t, "2021-6-21", Locale::POSIX).is_none());
        assert!(parse(&t, "2021-06-31", Locale::POSIX).is_none());
        assert!(parse(&t, "2021-06-21x", Locale::POSIX).is_none());
    }

    #[test]
    fn test_parse_week() {
        let t = tokenize("GGGG-[W]ww").expect("pattern");
        let d = parse(&t, "2021-W25", Locale::POSIX).expect("date");
        assert_eq!(d.date(), NaiveDate::from_ymd_opt(2021, 6, 21).expect("date"));
        assert_eq!(format(&t, &d, Locale::POSIX), "2021-W25");
    }

    #[test]
    fn test_twelve_hours() {
        let t = tokenize("hh:mm A").expect("pattern");
        let d = parse(&t, "12:15 AM", Locale::POSIX).expect("date");
        assert_eq!(d.hour(), 0);
        let d = parse(&t, "01:15 PM", Locale::POSIX).expect("date");
        assert_eq!(d.hour(), 13);
        assert_eq!(format(&t, &d, Locale::POSIX), "01:15 PM");
    }

    #[test]
    fn test_month_names() {
        let t = tokenize("DD MMM YYYY").expect("pattern");
        let d = parse(&t, "03 Feb 2020", Locale::POSIX).expect("date");
        assert_eq!(d.month(), 2);
        assert_eq!(format(&t, &d, Locale::POSIX), "03 Feb 2020");
    }
}
