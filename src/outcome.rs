use crate::masked_field::FieldOutcome;
use crate::panel::PickerValueChange;
use crate::value::{CalendarChange, ValueChange};
use rat_event::{ConsumedEvent, Outcome};

/// Result of event handling.
///
/// Details are queued as [PickerEvent]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PickerOutcome {
    /// The given event has not been used at all.
    Continue,
    /// The event has been recognized, but the result was nil.
    /// Further processing for this event may stop.
    Unchanged,
    /// The event has been recognized and there is some change
    /// due to it.
    /// Further processing for this event may stop.
    /// Rendering the ui is advised.
    Changed,
    /// The calendar value changed.
    CalendarChanged,
    /// The value changed.
    Value,
}

impl ConsumedEvent for PickerOutcome {
    fn is_consumed(&self) -> bool {
        *self != PickerOutcome::Continue
    }
}

impl From<bool> for PickerOutcome {
    fn from(value: bool) -> Self {
        if value {
            PickerOutcome::Changed
        } else {
            PickerOutcome::Unchanged
        }
    }
}

impl From<Outcome> for PickerOutcome {
    fn from(value: Outcome) -> Self {
        match value {
            Outcome::Continue => PickerOutcome::Continue,
            Outcome::Unchanged => PickerOutcome::Unchanged,
            Outcome::Changed => PickerOutcome::Changed,
        }
    }
}

impl From<FieldOutcome> for PickerOutcome {
    fn from(value: FieldOutcome) -> Self {
        match value {
            FieldOutcome::Continue => PickerOutcome::Continue,
            FieldOutcome::Unchanged => PickerOutcome::Unchanged,
            FieldOutcome::Changed => PickerOutcome::Changed,
            FieldOutcome::Invalid => PickerOutcome::Changed,
            FieldOutcome::Value => PickerOutcome::Changed,
            FieldOutcome::Submit => PickerOutcome::Changed,
        }
    }
}

impl From<PickerOutcome> for Outcome {
    fn from(value: PickerOutcome) -> Self {
        match value {
            PickerOutcome::Continue => Outcome::Continue,
            PickerOutcome::Unchanged => Outcome::Unchanged,
            PickerOutcome::Changed => Outcome::Changed,
            PickerOutcome::CalendarChanged => Outcome::Changed,
            PickerOutcome::Value => Outcome::Changed,
        }
    }
}

/// Everything a picker reports.
#[derive(Debug, Clone)]
pub enum PickerEvent<D, const N: usize> {
    /// The calendar value changed, committed or not.
    CalendarChange(CalendarChange<D, N>),
    /// A new value was committed.
    Change(ValueChange<D, N>),
    /// A field became invalid or valid again.
    Invalid { index: usize, invalid: bool },
    /// A panel shows a different date.
    PickerValueChange(PickerValueChange<D, N>),
    /// The popup opened or closed.
    OpenChange(bool),
}

impl<D, const N: usize> PickerEvent<D, N> {
    /// Maps to the strongest outcome for this event.
    pub fn outcome(&self) -> PickerOutcome {
        match self {
            PickerEvent::CalendarChange(_) => PickerOutcome::CalendarChanged,
            PickerEvent::Change(_) => PickerOutcome::Value,
            PickerEvent::Invalid { .. } => PickerOutcome::Changed,
            PickerEvent::PickerValueChange(_) => PickerOutcome::Changed,
            PickerEvent::OpenChange(_) => PickerOutcome::Changed,
        }
    }
}
