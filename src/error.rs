//! Error types shared across the picker.

use thiserror::Error;

use crate::color::ColorParseError;

/// Top-level error type for the color picker.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PickerError {
    #[error("maximum number of pins reached ({max})")]
    PinCapacity { max: usize },

    #[error("color parse error: {0}")]
    ColorParse(#[from] ColorParseError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("renderer error: {0}")]
    Renderer(String),

    #[error("window error: {0}")]
    Window(String),
}

pub type PickerResult<T> = Result<T, PickerError>;
