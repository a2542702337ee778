#![doc = include_str!("../readme.md")]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::new_without_default)]

pub mod event {
    //!
    //! Event-handler traits and Keybindings.
    //!
    //! See [rat-event](https://docs.rs/rat-event/latest/rat_event/)
    //!
    pub use rat_event::*;

    pub use crate::masked_field::FieldOutcome;
    pub use crate::outcome::{PickerEvent, PickerOutcome};
}

/// Module for focus-handling functionality.
/// For details see [rat-focus](https://docs.rs/rat-focus)
pub mod focus {
    pub use rat_focus::{
        handle_focus, match_focus, on_gained, on_lost, Focus, FocusBuilder, FocusFlag, HasFocus,
        Navigation,
    };
}

mod error;
mod outcome;

pub mod active;
pub mod context;
pub mod date_picker;
pub mod date_util;
pub mod format;
pub mod frames;
pub mod generate;
pub mod mask_format;
pub mod masked_field;
pub mod merged;
pub mod open;
pub mod panel;
pub mod picker;
pub mod range_picker;
pub mod time_scroll;
pub mod value;

pub use error::PickerError;

mod _private {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct NonExhaustive;
}
