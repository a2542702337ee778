use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors when setting up a picker.
///
/// Interactive editing never produces these, invalid input is
/// reported through outcomes and the invalid flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerError {
    /// The format pattern could not be parsed.
    /// Contains the pattern and the byte offset of the problem.
    InvalidPattern(String, usize),
    /// An empty list of formats was given.
    NoFormat,
    /// Masked editing needs a pattern as first format.
    MaskNeedsPattern,
}

impl Display for PickerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for PickerError {}
