//! Picker Configuration
//!
//! Sizes of the picker surfaces and the pin limits.

use crate::error::{PickerError, PickerResult};
use crate::paint::PinStyle;
use crate::pins::MAX_PINS;

/// Parameters that define the picker layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerConfig {
    /// Width of the color field and the hue slider in pixels
    pub field_width: u32,
    /// Height of the color field in pixels
    pub field_height: u32,
    /// Height of the hue slider in pixels (drawn under the field)
    pub slider_height: u32,
    /// Maximum number of pins on the field
    pub max_pins: usize,
    /// Pin marker diameter in pixels
    pub pin_diameter: f32,
    /// Pin marker ring thickness in pixels
    pub pin_border: f32,
}

impl PickerConfig {
    /// Validate that parameters are in acceptable ranges
    pub fn validate(&self) -> PickerResult<()> {
        if self.field_width == 0 || self.field_height == 0 {
            return Err(PickerError::InvalidConfig("Field size must be positive".to_string()));
        }
        if self.slider_height == 0 {
            return Err(PickerError::InvalidConfig("Slider height must be positive".to_string()));
        }
        if !(1..=MAX_PINS).contains(&self.max_pins) {
            return Err(PickerError::InvalidConfig(format!(
                "Pin limit must be between 1 and {}",
                MAX_PINS
            )));
        }
        if self.pin_diameter <= 0.0 {
            return Err(PickerError::InvalidConfig("Pin diameter must be positive".to_string()));
        }
        if self.pin_border <= 0.0 || self.pin_border > self.pin_diameter / 2.0 {
            return Err(PickerError::InvalidConfig(
                "Pin border must be positive and at most half the diameter".to_string(),
            ));
        }
        Ok(())
    }

    /// Size of the composed frame: the field with the slider underneath
    pub fn frame_size(&self) -> (u32, u32) {
        (self.field_width, self.field_height + self.slider_height)
    }

    pub fn pin_style(&self) -> PinStyle {
        PinStyle {
            diameter: self.pin_diameter,
            border: self.pin_border,
            ..PinStyle::default()
        }
    }
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            field_width: 600,
            field_height: 500,
            slider_height: 30,
            max_pins: MAX_PINS,
            pin_diameter: 24.0,
            pin_border: 4.0,
        }
    }
}
