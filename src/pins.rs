//! Pin Markers
//!
//! Pins mark the colors picked on the field. The set is capacity-bounded and
//! tracks which pin, if any, is being dragged.

use crate::color::Rgb;
use crate::error::{PickerError, PickerResult};

/// Hard upper bound on the number of pins
pub const MAX_PINS: usize = 6;

/// A single pin on the color field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pin {
    /// Position in field space (pixels from top-left)
    pub position: [f32; 2],
    /// Color sampled under the pin
    pub color: Rgb,
    /// Whether the pin follows the pointer
    pub is_dragging: bool,
}

/// Capacity-bounded collection of pins
#[derive(Debug, Clone)]
pub struct PinSet {
    pins: Vec<Pin>,
    capacity: usize,
    /// Marker radius used for hit testing
    hit_radius: f32,
}

impl PinSet {
    /// Create an empty set holding at most `capacity` pins (capped at [`MAX_PINS`])
    pub fn with_capacity(capacity: usize, pin_diameter: f32) -> Self {
        let capacity = capacity.min(MAX_PINS);
        Self {
            pins: Vec::with_capacity(capacity),
            capacity,
            hit_radius: pin_diameter / 2.0,
        }
    }

    /// Add a pin. At capacity this is a no-op that logs a warning.
    ///
    /// Returns the index of the new pin.
    pub fn add_pin(&mut self, position: [f32; 2], color: Rgb) -> PickerResult<usize> {
        if self.pins.len() >= self.capacity {
            log::warn!("Maximum number of pins reached ({})", self.capacity);
            return Err(PickerError::PinCapacity { max: self.capacity });
        }

        self.pins.push(Pin {
            position,
            color,
            is_dragging: false,
        });
        log::debug!("Pin {} added at {:?} with {}", self.pins.len() - 1, position, color);
        Ok(self.pins.len() - 1)
    }

    /// Mark a pin as dragging. Unknown indices are ignored.
    pub fn start_dragging(&mut self, index: usize) {
        if let Some(pin) = self.pins.get_mut(index) {
            pin.is_dragging = true;
        }
    }

    /// Move a dragging pin, constraining it to `[0, width] x [0, height]`.
    ///
    /// Has no effect unless the pin at `index` is being dragged.
    pub fn update_pin_position(&mut self, index: usize, position: [f32; 2], bounds: [f32; 2], color: Rgb) {
        let constrained = constrain(position, bounds);
        if let Some(pin) = self.pins.get_mut(index) {
            if pin.is_dragging {
                pin.position = constrained;
                pin.color = color;
            }
        }
    }

    /// Release every pin
    pub fn stop_dragging(&mut self) {
        for pin in &mut self.pins {
            pin.is_dragging = false;
        }
    }

    /// Move a pin regardless of drag state (used for typed colors)
    pub fn place_pin(&mut self, index: usize, position: [f32; 2], color: Rgb) {
        if let Some(pin) = self.pins.get_mut(index) {
            pin.position = position;
            pin.color = color;
        }
    }

    /// Find the topmost pin whose marker covers `position`
    pub fn hit_test(&self, position: [f32; 2]) -> Option<usize> {
        self.pins.iter().rposition(|pin| {
            let dx = position[0] - pin.position[0];
            let dy = position[1] - pin.position[1];
            (dx * dx + dy * dy).sqrt() <= self.hit_radius
        })
    }

    /// Index of the pin being dragged, if any
    pub fn dragging_index(&self) -> Option<usize> {
        self.pins.iter().position(|pin| pin.is_dragging)
    }

    pub fn get(&self, index: usize) -> Option<&Pin> {
        self.pins.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pin> + '_ {
        self.pins.iter()
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.pins.len() >= self.capacity
    }
}

impl Default for PinSet {
    fn default() -> Self {
        Self::with_capacity(MAX_PINS, 24.0)
    }
}

/// Clamp a position into `[0, width] x [0, height]`
#[inline]
pub fn constrain(position: [f32; 2], bounds: [f32; 2]) -> [f32; 2] {
    [
        position[0].clamp(0.0, bounds[0]),
        position[1].clamp(0.0, bounds[1]),
    ]
}
