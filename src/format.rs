//!
//! Format specifications.
//!
//! A picker accepts a list of formats. The first one is used for
//! display, all of them are tried in order when parsing typed text.
//!

use crate::date_util::PickerMode;
use crate::generate::GenerateConfig;
use crate::PickerError;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Parse function of a custom format.
pub type ParseFn<D> = Rc<dyn Fn(&str) -> Option<D>>;
/// Format function of a custom format.
pub type FormatFn<D> = Rc<dyn Fn(&D) -> String>;

/// One format.
pub enum FormatSpec<D> {
    /// Pattern understood by the [GenerateConfig].
    Pattern(String),
    /// Custom parse/format pair.
    Custom { parse: ParseFn<D>, format: FormatFn<D> },
}

impl<D> Clone for FormatSpec<D> {
    fn clone(&self) -> Self {
        match self {
            FormatSpec::Pattern(p) => FormatSpec::Pattern(p.clone()),
            FormatSpec::Custom { parse, format } => FormatSpec::Custom {
                parse: parse.clone(),
                format: format.clone(),
            },
        }
    }
}

impl<D> Debug for FormatSpec<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatSpec::Pattern(p) => f.debug_tuple("Pattern").field(p).finish(),
            FormatSpec::Custom { .. } => f.debug_struct("Custom").finish_non_exhaustive(),
        }
    }
}

impl<D> From<&str> for FormatSpec<D> {
    fn from(value: &str) -> Self {
        FormatSpec::Pattern(value.to_string())
    }
}

impl<D> FormatSpec<D> {
    pub fn custom(
        parse: impl Fn(&str) -> Option<D> + 'static,
        format: impl Fn(&D) -> String + 'static,
    ) -> Self {
        FormatSpec::Custom {
            parse: Rc::new(parse),
            format: Rc::new(format),
        }
    }

    /// The pattern, if this is one.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            FormatSpec::Pattern(p) => Some(p.as_str()),
            FormatSpec::Custom { .. } => None,
        }
    }
}

/// Non-empty list of formats.
#[derive(Debug)]
pub struct FormatList<D> {
    formats: Vec<FormatSpec<D>>,
}

impl<D> Clone for FormatList<D> {
    fn clone(&self) -> Self {
        Self {
            formats: self.formats.clone(),
        }
    }
}

impl<D> FormatList<D> {
    pub fn new(formats: Vec<FormatSpec<D>>) -> Result<Self, PickerError> {
        if formats.is_empty() {
            return Err(PickerError::NoFormat);
        }
        Ok(Self { formats })
    }

    /// Single pattern.
    pub fn pattern(pattern: &str) -> Self {
        Self {
            formats: vec![FormatSpec::Pattern(pattern.to_string())],
        }
    }

    /// Default pattern for the mode.
    pub fn for_mode(mode: PickerMode) -> Self {
        Self::pattern(default_format(mode))
    }

    /// The display format.
    pub fn first(&self) -> &FormatSpec<D> {
        &self.formats[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormatSpec<D>> {
        self.formats.iter()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Default pattern per mode.
pub fn default_format(mode: PickerMode) -> &'static str {
    match mode {
        PickerMode::Date => "YYYY-MM-DD",
        PickerMode::Week => "GGGG-[W]ww",
        PickerMode::Month => "YYYY-MM",
        PickerMode::Quarter => "YYYY-[Q]Q",
        PickerMode::Year => "YYYY",
        PickerMode::Decade => "YYYY",
        PickerMode::Time => "HH:mm:ss",
        PickerMode::DateTime => "YYYY-MM-DD HH:mm:ss",
    }
}

/// Format with a single format.
pub fn format_date<G: GenerateConfig>(
    generate: &G,
    locale: &G::Locale,
    date: &G::Date,
    format: &FormatSpec<G::Date>,
) -> String {
    match format {
        FormatSpec::Pattern(p) => generate.format(locale, date, p),
        FormatSpec::Custom { format, .. } => format(date),
    }
}

/// Try each format in order, the first one that parses to a
/// valid date wins.
pub fn validate_format<G: GenerateConfig>(
    generate: &G,
    locale: &G::Locale,
    text: &str,
    formats: &FormatList<G::Date>,
) -> Option<G::Date> {
    for format in formats.iter() {
        let parsed = match format {
            FormatSpec::Pattern(p) => generate.parse(locale, text, &[p.as_str()]),
            FormatSpec::Custom { parse, .. } => parse(text),
        };
        if let Some(parsed) = parsed {
            if generate.is_validate(&parsed) {
                return Some(parsed);
            }
        }
    }
    None
}
