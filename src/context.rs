use crate::date_util::PickerMode;
use crate::format::{format_date, validate_format, FormatList, FormatSpec};
use crate::generate::GenerateConfig;
use crate::mask_format::MaskFormat;
use crate::PickerError;

/// Configuration shared by all parts of one picker.
///
/// Each picker owns its context, two pickers can use different
/// configs and locales side by side.
#[derive(Debug, Clone)]
pub struct PickerContext<G: GenerateConfig> {
    pub generate: G,
    pub locale: G::Locale,
    pub mode: PickerMode,
    formats: FormatList<G::Date>,
}

impl<G: GenerateConfig + Default> Default for PickerContext<G> {
    fn default() -> Self {
        Self::new(G::default(), PickerMode::Date)
    }
}

impl<G: GenerateConfig> PickerContext<G> {
    /// New context with the default format for the mode.
    pub fn new(generate: G, mode: PickerMode) -> Self {
        Self {
            generate,
            locale: Default::default(),
            mode,
            formats: FormatList::for_mode(mode),
        }
    }

    pub fn with_locale(mut self, locale: G::Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Replace the formats.
    pub fn with_formats(mut self, formats: Vec<FormatSpec<G::Date>>) -> Result<Self, PickerError> {
        self.set_formats(formats)?;
        Ok(self)
    }

    /// Use a single pattern.
    pub fn with_pattern(self, pattern: &str) -> Result<Self, PickerError> {
        self.with_formats(vec![FormatSpec::Pattern(pattern.to_string())])
    }

    /// Replace the formats. Patterns are checked by the
    /// [GenerateConfig].
    pub fn set_formats(&mut self, formats: Vec<FormatSpec<G::Date>>) -> Result<(), PickerError> {
        for f in formats.iter() {
            if let Some(p) = f.pattern() {
                self.generate.check_pattern(p)?;
            }
        }
        self.formats = FormatList::new(formats)?;
        Ok(())
    }

    pub fn formats(&self) -> &FormatList<G::Date> {
        &self.formats
    }

    /// Format with the display format.
    pub fn format(&self, date: &G::Date) -> String {
        format_date(&self.generate, &self.locale, date, self.formats.first())
    }

    /// Format with the display format. Empty for None.
    pub fn format_value(&self, date: Option<&G::Date>) -> String {
        match date {
            Some(date) => self.format(date),
            None => String::new(),
        }
    }

    /// Parse with all formats, first match wins.
    pub fn parse(&self, text: &str) -> Option<G::Date> {
        validate_format(&self.generate, &self.locale, text, &self.formats)
    }

    /// Mask for the display format.
    ///
    /// The display format must be a pattern without `[...]` escapes,
    /// otherwise the formatted text can't follow the mask.
    pub fn mask_format(&self) -> Result<MaskFormat, PickerError> {
        match self.formats.first().pattern() {
            Some(p) if !p.contains('[') => Ok(MaskFormat::new(p)),
            _ => Err(PickerError::MaskNeedsPattern),
        }
    }
}
