//! Application State and Logic
//!
//! This module contains the picker state machine: hue selection, pins, the
//! typed RGB input and the composed frame. It's designed to be independent
//! of the windowing system; the window layer only feeds it events and hands
//! it a renderer.

use crate::color::{parse_rgb, Rgb};
use crate::config::PickerConfig;
use crate::error::PickerResult;
use crate::input::{InputQueue, PointerEvent, PointerEventType, PointerTarget};
use crate::paint::{self, PinStyle};
use crate::pins::{constrain, Pin, PinSet};
use crate::renderer::Renderer;
use crate::surface::PixelBuffer;

/// Called with the CSS string (`rgb(r, g, b)`) of every selected color
pub type SelectCallback = Box<dyn FnMut(&str)>;

/// Main application state
pub struct App {
    config: PickerConfig,
    /// Current hue in degrees, [0, 360)
    hue: f64,
    /// Saturation/value field for the current hue
    field: PixelBuffer,
    /// Hue slider, painted once
    slider: PixelBuffer,
    /// Field + slider + markers, uploaded to the GPU
    frame: PixelBuffer,
    frame_dirty: bool,
    pins: PinSet,
    /// Pin that typed colors move
    active_pin: Option<usize>,
    /// Slider marker in slider space
    hue_pin: Option<[f32; 2]>,
    selected: Rgb,
    /// Raw contents of the RGB text input
    rgb_input: String,
    pin_style: PinStyle,
    input_queue: InputQueue,
    on_select: Option<SelectCallback>,
}

impl App {
    /// Create a new picker with the field painted for hue 0
    pub fn new(config: PickerConfig) -> PickerResult<Self> {
        config.validate()?;

        let (frame_width, frame_height) = config.frame_size();
        let mut slider = PixelBuffer::new(config.field_width, config.slider_height);
        paint::paint_hue_slider(&mut slider);

        let selected = Rgb::BLACK;
        let mut app = Self {
            config,
            hue: 0.0,
            field: PixelBuffer::new(config.field_width, config.field_height),
            slider,
            frame: PixelBuffer::new(frame_width, frame_height),
            frame_dirty: true,
            pins: PinSet::with_capacity(config.max_pins, config.pin_diameter),
            active_pin: None,
            hue_pin: None,
            selected,
            rgb_input: selected.to_css(),
            pin_style: config.pin_style(),
            input_queue: InputQueue::new(),
            on_select: None,
        };
        app.repaint_field();

        log::info!(
            "Picker created: field {}x{}, slider height {}, up to {} pins",
            config.field_width,
            config.field_height,
            config.slider_height,
            app.pins.capacity()
        );
        Ok(app)
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Register the selection callback
    pub fn set_on_select(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_select = Some(Box::new(callback));
    }

    /// Queue an input event for processing
    pub fn queue_input_event(&mut self, event: PointerEvent) {
        self.input_queue.push_event(event);
    }

    /// Check if there are pending input events
    pub fn has_pending_input(&self) -> bool {
        self.input_queue.has_events()
    }

    /// Process queued input (called before each render)
    pub fn update(&mut self) {
        let events: Vec<PointerEvent> = self.input_queue.drain_events().collect();
        for event in events {
            if event.event_type == PointerEventType::Down {
                log::debug!(
                    "{:?} press on {:?} at {:?} (t={:.0}ms)",
                    event.source,
                    event.target,
                    event.position,
                    event.timestamp
                );
            }
            match (event.event_type, event.target) {
                (PointerEventType::Down, PointerTarget::Field) => self.press_field(event.position),
                (PointerEventType::Move, PointerTarget::Field) => self.drag_field(event.position),
                (PointerEventType::Down | PointerEventType::Move, PointerTarget::HueSlider) => {
                    self.pick_hue(event.position[0])
                }
                (PointerEventType::Up, _) => self.pins.stop_dragging(),
            }
        }
    }

    /// Render the picker (called each frame)
    pub fn render(&mut self, renderer: &mut Renderer) {
        self.update();

        if self.frame_dirty {
            renderer.upload_frame(self.compose_frame());
        }
        renderer.render();
    }

    /// Force the next render to upload the frame again
    pub fn invalidate(&mut self) {
        self.frame_dirty = true;
    }

    /// Map a point in frame space onto the surface under it
    pub fn locate(&self, frame_pos: [f32; 2]) -> Option<(PointerTarget, [f32; 2])> {
        let width = self.config.field_width as f32;
        let field_height = self.config.field_height as f32;
        let slider_height = self.config.slider_height as f32;
        let [x, y] = frame_pos;

        if !(0.0..=width).contains(&x) || y < 0.0 {
            return None;
        }
        if y < field_height {
            Some((PointerTarget::Field, frame_pos))
        } else if y <= field_height + slider_height {
            Some((PointerTarget::HueSlider, [x, y - field_height]))
        } else {
            None
        }
    }

    /// Convert a frame-space point into a surface's own space, without bounds checks
    pub fn to_target_space(&self, target: PointerTarget, frame_pos: [f32; 2]) -> [f32; 2] {
        match target {
            PointerTarget::Field => frame_pos,
            PointerTarget::HueSlider => [frame_pos[0], frame_pos[1] - self.config.field_height as f32],
        }
    }

    /// Press on the field: grab the pin under the pointer, or pick the color
    /// there and drop a new pin
    fn press_field(&mut self, position: [f32; 2]) {
        if let Some(index) = self.pins.hit_test(position) {
            self.pins.start_dragging(index);
            self.active_pin = Some(index);
            log::debug!("Dragging pin {}", index);
            return;
        }

        let Some(color) = self.field.sample(position[0], position[1]) else {
            return;
        };
        self.select_color(color);

        if let Ok(index) = self.pins.add_pin(position, color) {
            self.active_pin = Some(index);
            crate::debug::update_pin_count(self.pins.len());
        }
        self.frame_dirty = true;
    }

    /// Pointer moved over the field with the button held
    fn drag_field(&mut self, position: [f32; 2]) {
        let Some(index) = self.pins.dragging_index() else {
            return;
        };

        let bounds = self.field_bounds();
        let clamped = constrain(position, bounds);
        let Some(color) = self.field.sample(clamped[0], clamped[1]) else {
            return;
        };

        self.pins.update_pin_position(index, position, bounds, color);
        self.select_color(color);
        self.frame_dirty = true;
    }

    /// Select the hue under a slider x coordinate
    fn pick_hue(&mut self, x: f32) {
        let width = self.config.field_width as f32;
        let x = x.clamp(0.0, width);
        self.hue = (x as f64 / width as f64 * 360.0).rem_euclid(360.0);
        self.hue_pin = Some([x, self.config.slider_height as f32 / 2.0]);
        self.repaint_field();
    }

    /// Select a hue programmatically
    pub fn set_hue(&mut self, hue: f64) {
        let hue = hue.rem_euclid(360.0);
        let x = (hue / 360.0 * self.config.field_width as f64) as f32;
        self.hue = hue;
        self.hue_pin = Some([x, self.config.slider_height as f32 / 2.0]);
        self.repaint_field();
    }

    /// Apply the contents of the RGB text input.
    ///
    /// The text is always kept. When it reads `rgb(r, g, b)` the color is
    /// selected and the active pin moves to where that color first appears
    /// on the field; anything else leaves the picker untouched.
    pub fn set_rgb_input(&mut self, text: &str) {
        let color = match parse_rgb(text) {
            Ok(color) => color,
            Err(err) => {
                log::debug!("Ignoring RGB input {:?}: {}", text, err);
                self.rgb_input = text.to_string();
                return;
            }
        };

        self.select_color(color);
        self.rgb_input = text.to_string();

        let Some((x, y)) = self.field.find_color(color) else {
            log::debug!("{} does not appear on the field for hue {:.1}", color, self.hue);
            return;
        };
        let position = [x as f32, y as f32];

        match self.pins.dragging_index().or(self.active_pin) {
            Some(index) => self.pins.place_pin(index, position, color),
            None => {
                if let Ok(index) = self.pins.add_pin(position, color) {
                    self.active_pin = Some(index);
                    crate::debug::update_pin_count(self.pins.len());
                }
            }
        }
        self.frame_dirty = true;
    }

    fn select_color(&mut self, color: Rgb) {
        self.selected = color;
        self.rgb_input = color.to_css();
        log::debug!("Selected {}", self.rgb_input);

        crate::debug::update_selected_color(&self.rgb_input);
        if let Some(callback) = self.on_select.as_mut() {
            callback(&self.rgb_input);
        }
    }

    fn repaint_field(&mut self) {
        paint::paint_saturation_value_field(&mut self.field, self.hue);
        self.frame_dirty = true;
    }

    fn field_bounds(&self) -> [f32; 2] {
        [self.config.field_width as f32, self.config.field_height as f32]
    }

    /// Compose field, slider and markers into the frame buffer
    pub fn compose_frame(&mut self) -> &PixelBuffer {
        if self.frame_dirty {
            let field_height = self.config.field_height;
            self.frame.blit_from(&self.field, 0, 0);
            self.frame.blit_from(&self.slider, 0, field_height);

            for pin in self.pins.iter() {
                paint::draw_pin(&mut self.frame, pin.position, &self.pin_style);
            }
            if let Some([x, y]) = self.hue_pin {
                paint::draw_pin(&mut self.frame, [x, y + field_height as f32], &self.pin_style);
            }

            self.frame_dirty = false;
        }
        &self.frame
    }

    pub fn hue(&self) -> f64 {
        self.hue
    }

    pub fn hue_pin(&self) -> Option<[f32; 2]> {
        self.hue_pin
    }

    pub fn pins(&self) -> impl Iterator<Item = &Pin> + '_ {
        self.pins.iter()
    }

    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    pub fn selected_color(&self) -> Rgb {
        self.selected
    }

    pub fn selected_color_css(&self) -> String {
        self.selected.to_css()
    }

    pub fn rgb_input(&self) -> &str {
        &self.rgb_input
    }

    /// Current saturation/value field
    pub fn field(&self) -> &PixelBuffer {
        &self.field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn small_config() -> PickerConfig {
        PickerConfig {
            field_width: 60,
            field_height: 50,
            slider_height: 10,
            ..PickerConfig::default()
        }
    }

    fn event(event_type: PointerEventType, target: PointerTarget, position: [f32; 2]) -> PointerEvent {
        PointerEvent::new(event_type, target, position)
    }

    fn click_field(app: &mut App, position: [f32; 2]) {
        app.queue_input_event(event(PointerEventType::Down, PointerTarget::Field, position));
        app.queue_input_event(event(PointerEventType::Up, PointerTarget::Field, position));
        app.update();
    }

    #[test]
    fn test_initial_state() {
        let app = App::new(small_config()).unwrap();
        assert_eq!(app.hue(), 0.0);
        assert_eq!(app.selected_color(), Rgb::BLACK);
        assert_eq!(app.rgb_input(), "rgb(0, 0, 0)");
        assert_eq!(app.field().get_pixel(0, 0), Some(Rgb::WHITE));
        assert_eq!(app.pin_count(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PickerConfig { max_pins: 0, ..small_config() };
        assert!(App::new(config).is_err());
    }

    #[test]
    fn test_click_adds_pin_and_selects() {
        let mut app = App::new(small_config()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        app.set_on_select(move |color| sink.borrow_mut().push(color.to_string()));

        click_field(&mut app, [30.0, 25.0]);

        assert_eq!(app.pin_count(), 1);
        assert_eq!(app.selected_color(), Rgb::new(128, 64, 64));
        assert_eq!(app.rgb_input(), "rgb(128, 64, 64)");
        assert_eq!(seen.borrow().as_slice(), ["rgb(128, 64, 64)"]);
        let pin = app.pins().next().unwrap();
        assert_eq!(pin.position, [30.0, 25.0]);
        assert!(!pin.is_dragging);
    }

    #[test]
    fn test_pin_count_bounded() {
        let mut app = App::new(small_config()).unwrap();
        for i in 0..20 {
            // Spread clicks so none lands on an existing pin
            let x = (i % 4) as f32 * 15.0 + 2.0;
            let y = (i / 4) as f32 * 15.0 + 2.0;
            click_field(&mut app, [x, y]);
        }
        assert_eq!(app.pin_count(), 6);
    }

    #[test]
    fn test_drag_constrained_to_field() {
        let mut app = App::new(small_config()).unwrap();
        click_field(&mut app, [10.0, 10.0]);

        app.queue_input_event(event(PointerEventType::Down, PointerTarget::Field, [12.0, 11.0]));
        app.queue_input_event(event(PointerEventType::Move, PointerTarget::Field, [-5.0, 100.0]));
        app.update();

        let pin = *app.pins().next().unwrap();
        assert!(pin.is_dragging);
        assert_eq!(pin.position, [0.0, 50.0]);
        // Bottom-left of the field: no saturation, value 1 - 49/50
        assert_eq!(pin.color, Rgb::new(5, 5, 5));
        assert_eq!(app.selected_color(), Rgb::new(5, 5, 5));
        // Grabbing a pin does not add one
        assert_eq!(app.pin_count(), 1);

        app.queue_input_event(event(PointerEventType::Up, PointerTarget::Field, [-5.0, 100.0]));
        app.update();
        assert!(!app.pins().next().unwrap().is_dragging);
    }

    #[test]
    fn test_clicks_at_capacity_still_select() {
        let mut app = App::new(small_config()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        app.set_on_select(move |color| sink.borrow_mut().push(color.to_string()));

        for i in 0..7 {
            let position = [(i % 4) as f32 * 15.0 + 2.0, (i / 4) as f32 * 15.0 + 2.0];
            click_field(&mut app, position);
        }

        assert_eq!(app.pin_count(), 6);
        assert_eq!(seen.borrow().len(), 7);
        // The seventh click still picked the color under it
        let last = app.field().sample(32.0, 17.0).unwrap();
        assert_eq!(app.selected_color(), last);
        assert_eq!(seen.borrow().last().map(String::as_str), Some(last.to_css().as_str()));
    }

    #[test]
    fn test_release_anywhere_ends_drag() {
        let mut app = App::new(small_config()).unwrap();
        click_field(&mut app, [10.0, 10.0]);

        app.queue_input_event(event(PointerEventType::Down, PointerTarget::Field, [10.0, 10.0]));
        app.queue_input_event(event(PointerEventType::Move, PointerTarget::Field, [20.0, 20.0]));
        // Button released outside the window: no known position
        app.queue_input_event(event(PointerEventType::Up, PointerTarget::Field, [0.0, 0.0]));
        app.queue_input_event(event(PointerEventType::Move, PointerTarget::Field, [40.0, 40.0]));
        app.update();

        let pin = app.pins().next().unwrap();
        assert!(!pin.is_dragging);
        assert_eq!(pin.position, [20.0, 20.0]);
    }

    #[test]
    fn test_move_without_grab_does_nothing() {
        let mut app = App::new(small_config()).unwrap();
        click_field(&mut app, [10.0, 10.0]);

        app.queue_input_event(event(PointerEventType::Down, PointerTarget::Field, [40.0, 40.0]));
        app.queue_input_event(event(PointerEventType::Move, PointerTarget::Field, [45.0, 45.0]));
        app.update();

        let positions: Vec<_> = app.pins().map(|p| p.position).collect();
        assert_eq!(positions, vec![[10.0, 10.0], [40.0, 40.0]]);
    }

    #[test]
    fn test_hue_slider_repaints_field() {
        let mut app = App::new(small_config()).unwrap();
        app.queue_input_event(event(PointerEventType::Down, PointerTarget::HueSlider, [30.0, 4.0]));
        app.queue_input_event(event(PointerEventType::Up, PointerTarget::HueSlider, [30.0, 4.0]));
        app.update();

        assert_eq!(app.hue(), 180.0);
        assert_eq!(app.hue_pin(), Some([30.0, 5.0]));
        let corner = app.field().get_pixel(59, 0).unwrap();
        assert!(corner.g > corner.r && corner.b > corner.r, "{:?}", corner);
    }

    #[test]
    fn test_hue_slider_end_wraps() {
        let mut app = App::new(small_config()).unwrap();
        app.queue_input_event(event(PointerEventType::Down, PointerTarget::HueSlider, [75.0, 4.0]));
        app.update();
        assert_eq!(app.hue(), 0.0);
        assert_eq!(app.hue_pin(), Some([60.0, 5.0]));

        app.set_hue(-90.0);
        assert_eq!(app.hue(), 270.0);
    }

    #[test]
    fn test_rgb_input_moves_active_pin() {
        let mut app = App::new(small_config()).unwrap();
        click_field(&mut app, [30.0, 25.0]);

        app.set_rgb_input("rgb(255, 255, 255)");
        assert_eq!(app.selected_color(), Rgb::WHITE);
        assert_eq!(app.rgb_input(), "rgb(255, 255, 255)");
        let pin = app.pins().next().unwrap();
        assert_eq!(pin.position, [0.0, 0.0]);
        assert_eq!(pin.color, Rgb::WHITE);
        assert_eq!(app.pin_count(), 1);
    }

    #[test]
    fn test_rgb_input_prefers_dragging_pin() {
        let mut app = App::new(small_config()).unwrap();
        click_field(&mut app, [10.0, 10.0]);

        // Grab pin 0, then a second touch drops pin 1 and makes it active
        app.queue_input_event(event(PointerEventType::Down, PointerTarget::Field, [10.0, 10.0]));
        app.queue_input_event(event(PointerEventType::Down, PointerTarget::Field, [40.0, 40.0]));
        app.update();
        assert_eq!(app.pin_count(), 2);

        app.set_rgb_input("rgb(255, 255, 255)");

        let positions: Vec<_> = app.pins().map(|p| p.position).collect();
        assert_eq!(positions, vec![[0.0, 0.0], [40.0, 40.0]]);
        assert!(app.pins().next().unwrap().is_dragging);
    }

    #[test]
    fn test_rgb_input_without_pins_adds_one() {
        let mut app = App::new(small_config()).unwrap();
        app.set_rgb_input("rgb(255, 255, 255)");
        assert_eq!(app.pin_count(), 1);
    }

    #[test]
    fn test_rgb_input_not_on_field_only_selects() {
        let mut app = App::new(small_config()).unwrap();
        // Pure green never appears in the hue 0 field
        app.set_rgb_input("rgb(0, 255, 0)");
        assert_eq!(app.selected_color(), Rgb::new(0, 255, 0));
        assert_eq!(app.pin_count(), 0);
    }

    #[test]
    fn test_malformed_rgb_input_ignored() {
        let mut app = App::new(small_config()).unwrap();
        click_field(&mut app, [30.0, 25.0]);
        let before = app.selected_color();

        for text in ["rgb(1,2,3)", "rgb(300, 0, 0)", "red"] {
            app.set_rgb_input(text);
            assert_eq!(app.rgb_input(), text);
            assert_eq!(app.selected_color(), before);
            assert_eq!(app.pins().next().unwrap().position, [30.0, 25.0]);
        }
    }

    #[test]
    fn test_locate() {
        let app = App::new(small_config()).unwrap();
        assert_eq!(app.locate([10.0, 10.0]), Some((PointerTarget::Field, [10.0, 10.0])));
        assert_eq!(app.locate([10.0, 55.0]), Some((PointerTarget::HueSlider, [10.0, 5.0])));
        assert_eq!(app.locate([10.0, 61.0]), None);
        assert_eq!(app.locate([-1.0, 10.0]), None);
        assert_eq!(app.to_target_space(PointerTarget::HueSlider, [3.0, 40.0]), [3.0, -10.0]);
    }

    #[test]
    fn test_compose_frame() {
        let mut app = App::new(small_config()).unwrap();
        click_field(&mut app, [30.0, 25.0]);

        let frame = app.compose_frame();
        assert_eq!((frame.width(), frame.height()), (60, 60));
        // Slider sits under the field and starts red
        assert_eq!(frame.get_pixel(0, 55).map(|c| c.r), Some(255));
        // Pin ring 10px right of the pin
        assert_eq!(frame.get_pixel(40, 25), Some(Rgb::WHITE));
        // Inside the ring the field shows through
        assert_eq!(frame.get_pixel(30, 25), Some(Rgb::new(128, 64, 64)));
    }
}
