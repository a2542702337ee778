//!
//! Picker for a start and an end date.
//!
//! By default both dates are required, and they are kept in order.
//! Confirming the start moves the focus to the end field, confirming
//! the end as well commits the range and closes the popup.
//!

use crate::generate::GenerateConfig;
use crate::masked_field::MaskedFieldState;
use crate::picker::PickerState;

/// State for a date range.
pub type RangePickerState<G> = PickerState<G, 2>;

impl<G> PickerState<G, 2>
where
    G: GenerateConfig,
{
    /// Initial value.
    pub fn with_value(mut self, start: Option<G::Date>, end: Option<G::Date>) -> Self {
        self.set_value(start, end);
        self
    }

    /// Show two panels side by side.
    pub fn with_multiple_panel(mut self, multiple: bool) -> Self {
        self.set_multiple_panel(multiple);
        self
    }

    /// Committed range.
    pub fn value(&self) -> (Option<&G::Date>, Option<&G::Date>) {
        let v = self.values();
        (v[0].as_ref(), v[1].as_ref())
    }

    pub fn start(&self) -> Option<&G::Date> {
        self.values()[0].as_ref()
    }

    pub fn end(&self) -> Option<&G::Date> {
        self.values()[1].as_ref()
    }

    pub fn set_value(&mut self, start: Option<G::Date>, end: Option<G::Date>) {
        self.set_values([start, end]);
    }

    /// Live range.
    pub fn calendar_value(&self) -> (Option<&G::Date>, Option<&G::Date>) {
        let v = self.calendar_values();
        (v[0].as_ref(), v[1].as_ref())
    }

    pub fn start_field(&self) -> &MaskedFieldState {
        &self.fields[0]
    }

    pub fn end_field(&self) -> &MaskedFieldState {
        &self.fields[1]
    }

    pub fn start_text(&self) -> &str {
        self.fields[0].text()
    }

    pub fn end_text(&self) -> &str {
        self.fields[1].text()
    }
}
