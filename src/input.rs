//! Input Event Handling
//!
//! This module handles pointer input events (mouse, touch) and queues them
//! until the app processes them. Events carry the picker surface they landed
//! on so a drag that leaves that surface keeps addressing it.

use std::collections::VecDeque;

/// A pointer input event
#[derive(Debug, Clone)]
pub struct PointerEvent {
    /// Position in the target surface's space (pixels from its top-left)
    pub position: [f32; 2],
    /// Timestamp in milliseconds since some reference point
    pub timestamp: f64,
    /// Type of event (down, move, up)
    pub event_type: PointerEventType,
    /// Picker surface the gesture started on
    pub target: PointerTarget,
    /// Device the event came from
    pub source: PointerEventSource,
}

impl PointerEvent {
    pub fn new(event_type: PointerEventType, target: PointerTarget, position: [f32; 2]) -> Self {
        Self {
            position,
            timestamp: 0.0,
            event_type,
            target,
            source: PointerEventSource::Mouse,
        }
    }
}

/// Type of pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventType {
    /// Pointer button pressed
    Down,
    /// Pointer moved while button held
    Move,
    /// Pointer button released
    Up,
}

/// Picker surface an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The saturation/value field
    Field,
    /// The hue slider strip
    HueSlider,
}

/// Device that produced a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventSource {
    Mouse,
    Touch,
}

/// Queue for input events between updates
pub struct InputQueue {
    /// Pending events to process
    events: VecDeque<PointerEvent>,
    /// Whether a pointer button is currently held
    is_pressed: bool,
}

impl InputQueue {
    /// Create a new empty input queue
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
            is_pressed: false,
        }
    }

    /// Add an event to the queue
    pub fn push_event(&mut self, event: PointerEvent) {
        match event.event_type {
            PointerEventType::Down => {
                self.is_pressed = true;
            }
            PointerEventType::Move => {
                // Hover moves carry nothing for the picker
                if !self.is_pressed {
                    return;
                }
            }
            PointerEventType::Up => {
                self.is_pressed = false;
            }
        }

        log::debug!(
            "Input event queued: {:?} on {:?} (queue size: {})",
            event.event_type,
            event.target,
            self.events.len() + 1
        );
        self.events.push_back(event);
    }

    /// Drain all pending events for processing
    /// Returns an iterator that consumes the events
    pub fn drain_events(&mut self) -> impl Iterator<Item = PointerEvent> + '_ {
        self.events.drain(..)
    }

    /// Check if there are pending events
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
