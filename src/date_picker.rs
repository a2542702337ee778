//!
//! Picker for a single date.
//!
//! ```rust ignore
//! let mut state = DatePickerState::new(PickerContext::new(ChronoConfig::new(), PickerMode::Date))
//!     .with_mask()?;
//!
//! match state.handle(event, Regular) {
//!     PickerOutcome::Value => {
//!         let date = state.value();
//!     }
//!     _ => {}
//! }
//! ```
//!

use crate::generate::GenerateConfig;
use crate::masked_field::MaskedFieldState;
use crate::picker::PickerState;

/// State for a single date.
pub type DatePickerState<G> = PickerState<G, 1>;

impl<G> PickerState<G, 1>
where
    G: GenerateConfig,
{
    /// Initial value.
    pub fn with_value(mut self, value: Option<G::Date>) -> Self {
        self.set_value(value);
        self
    }

    /// Committed value.
    pub fn value(&self) -> Option<&G::Date> {
        self.values()[0].as_ref()
    }

    pub fn set_value(&mut self, value: Option<G::Date>) {
        self.set_values([value]);
    }

    /// Live value.
    pub fn calendar_value(&self) -> Option<&G::Date> {
        self.calendar_values()[0].as_ref()
    }

    pub fn field(&self) -> &MaskedFieldState {
        &self.fields[0]
    }

    pub fn field_mut(&mut self) -> &mut MaskedFieldState {
        &mut self.fields[0]
    }
}
