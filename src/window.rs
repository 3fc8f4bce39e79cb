//! Window and Event Loop Management
//!
//! This module contains the shared windowing logic used by both
//! WASM (lib.rs) and desktop (main.rs) entry points. It turns winit
//! pointer and keyboard events into picker input.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoopProxy};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::error::PickerError;
use crate::input::{PointerEvent, PointerEventSource, PointerEventType, PointerTarget};
use crate::{App, Renderer};

/// Events delivered to the event loop from outside winit
pub enum PickerEvent {
    /// Renderer finished async initialization
    RendererReady(Renderer),
    RendererFailed(PickerError),
    /// New contents of the host page's RGB text input
    RgbInput(String),
}

/// Wrapper for the application window and state
pub struct AppWrapper {
    pub window: Option<Arc<Window>>,
    pub renderer: Option<Renderer>,
    pub app: App,
    // Desktop builds the renderer synchronously and never posts to itself
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    proxy: EventLoopProxy<PickerEvent>,
    /// Last cursor position in surface pixels
    cursor: Option<[f32; 2]>,
    /// Surface the current press started on
    press_target: Option<PointerTarget>,
}

impl AppWrapper {
    /// Create a new app wrapper around picker state
    pub fn new(app: App, proxy: EventLoopProxy<PickerEvent>) -> Self {
        Self {
            window: None,
            renderer: None,
            app,
            proxy,
            cursor: None,
            press_target: None,
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Convert a surface position into frame space (needs the renderer's letterbox)
    fn frame_position(&self, surface_pos: [f32; 2]) -> Option<[f32; 2]> {
        self.renderer
            .as_ref()
            .map(|renderer| renderer.letterbox().surface_to_frame(surface_pos))
    }

    fn pointer_down(&mut self, surface_pos: [f32; 2], source: PointerEventSource) {
        let Some(frame_pos) = self.frame_position(surface_pos) else {
            return;
        };
        let Some((target, position)) = self.app.locate(frame_pos) else {
            return;
        };

        self.press_target = Some(target);
        self.queue(PointerEventType::Down, target, position, source);
    }

    fn pointer_move(&mut self, surface_pos: [f32; 2], source: PointerEventSource) {
        let Some(target) = self.press_target else {
            return;
        };
        let Some(frame_pos) = self.frame_position(surface_pos) else {
            return;
        };

        let position = self.app.to_target_space(target, frame_pos);
        self.queue(PointerEventType::Move, target, position, source);
    }

    fn pointer_up(&mut self, surface_pos: [f32; 2], source: PointerEventSource) {
        let Some(target) = self.press_target.take() else {
            return;
        };
        let frame_pos = self.frame_position(surface_pos).unwrap_or_default();

        let position = self.app.to_target_space(target, frame_pos);
        self.queue(PointerEventType::Up, target, position, source);
    }

    fn queue(
        &mut self,
        event_type: PointerEventType,
        target: PointerTarget,
        position: [f32; 2],
        source: PointerEventSource,
    ) {
        self.app.queue_input_event(PointerEvent {
            position,
            timestamp: now_ms(),
            event_type,
            target,
            source,
        });
        self.request_redraw();
    }

    fn handle_touch(&mut self, touch: Touch) {
        let position = [touch.location.x as f32, touch.location.y as f32];
        self.cursor = Some(position);
        match touch.phase {
            TouchPhase::Started => self.pointer_down(position, PointerEventSource::Touch),
            TouchPhase::Moved => self.pointer_move(position, PointerEventSource::Touch),
            TouchPhase::Ended | TouchPhase::Cancelled => self.pointer_up(position, PointerEventSource::Touch),
        }
    }

    /// Edit the RGB input from the keyboard (desktop has no DOM input)
    fn edit_rgb_input(&mut self, event: &KeyEvent) {
        let mut text = self.app.rgb_input().to_string();
        match &event.logical_key {
            Key::Named(NamedKey::Backspace) => {
                text.pop();
            }
            Key::Named(NamedKey::Escape) => text.clear(),
            _ => match &event.text {
                Some(typed) => text.extend(typed.chars().filter(|c| !c.is_control())),
                None => return,
            },
        }

        self.app.set_rgb_input(&text);
        self.request_redraw();
    }

    fn install_renderer(&mut self, mut renderer: Renderer) {
        if let Some(window) = &self.window {
            // The canvas may have been resized while the renderer was being built
            renderer.resize(window.inner_size());
        }
        self.renderer = Some(renderer);
        self.app.invalidate();
        log::info!("✅ Renderer initialized successfully");
        self.request_redraw();
    }
}

impl ApplicationHandler<PickerEvent> for AppWrapper {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let frame_size = self.app.config().frame_size();
        let desired_size = winit::dpi::PhysicalSize::new(frame_size.0, frame_size.1);
        let window_attributes = Window::default_attributes()
            .with_title("Color Picker")
            .with_inner_size(desired_size);

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        log::info!("Window created: {:?}", window.inner_size());
        self.window = Some(window.clone());

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowExtWebSys;

            // Append canvas to DOM
            let appended = window.canvas().and_then(|canvas| {
                let doc = web_sys::window()?.document()?;
                let container = doc.get_element_by_id("picker-container")?;
                container.append_child(&canvas).ok()
            });
            if appended.is_none() {
                log::error!("Failed to append canvas to #picker-container");
                crate::debug::update_status("❌ Missing #picker-container");
                return;
            }

            // On web the canvas size only applies once it is in the DOM
            let _ = window.request_inner_size(desired_size);
            log::info!("✅ Canvas appended to DOM and size requested: {:?}", desired_size);

            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match Renderer::new(window, desired_size, frame_size).await {
                    Ok(renderer) => PickerEvent::RendererReady(renderer),
                    Err(e) => PickerEvent::RendererFailed(e),
                };
                if proxy.send_event(event).is_err() {
                    log::warn!("Event loop closed before the renderer was ready");
                }
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let size = window.inner_size();
            match pollster::block_on(Renderer::new(window, size, frame_size)) {
                Ok(renderer) => self.install_renderer(renderer),
                Err(e) => {
                    log::error!("Failed to create renderer: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: PickerEvent) {
        match event {
            PickerEvent::RendererReady(renderer) => self.install_renderer(renderer),
            PickerEvent::RendererFailed(e) => {
                log::error!("Renderer initialization failed: {}", e);
            }
            PickerEvent::RgbInput(text) => {
                self.app.set_rgb_input(&text);
                self.request_redraw();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                // Skip invalid sizes
                if physical_size.width == 0 || physical_size.height == 0 {
                    log::warn!("Ignoring resize to zero size: {:?}", physical_size);
                    return;
                }

                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                    log::info!("✅ Surface configured with size: {:?}", physical_size);
                }
                self.request_redraw();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = [position.x as f32, position.y as f32];
                self.cursor = Some(position);
                self.pointer_move(position, PointerEventSource::Mouse);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                match mouse_button_press(state, self.cursor) {
                    Some((PointerEventType::Down, position)) => {
                        self.pointer_down(position, PointerEventSource::Mouse)
                    }
                    Some((_, position)) => self.pointer_up(position, PointerEventSource::Mouse),
                    None => {}
                }
            }
            WindowEvent::Touch(touch) => self.handle_touch(touch),
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                self.edit_rgb_input(&event);
            }
            WindowEvent::RedrawRequested => {
                if let Some(renderer) = &mut self.renderer {
                    self.app.render(renderer);
                    // Wait mode: only redraw on events
                }
            }
            _ => {}
        }
    }
}

/// Pointer event for a left-button change.
///
/// A press needs a known cursor. A release always ends the gesture, even when
/// the cursor left the window before the button came up.
fn mouse_button_press(state: ElementState, cursor: Option<[f32; 2]>) -> Option<(PointerEventType, [f32; 2])> {
    match state {
        ElementState::Pressed => cursor.map(|position| (PointerEventType::Down, position)),
        ElementState::Released => Some((PointerEventType::Up, cursor.unwrap_or_default())),
    }
}

/// Milliseconds since the Unix epoch
fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;
    use winit::event_loop::EventLoopProxy;

    use super::PickerEvent;

    thread_local! {
        static PROXY: RefCell<Option<EventLoopProxy<PickerEvent>>> = RefCell::new(None);
        static SELECTED: RefCell<String> = RefCell::new(String::new());
    }

    /// Store the event loop proxy so JS callbacks can reach the app
    pub fn set_global_proxy(proxy: EventLoopProxy<PickerEvent>) {
        PROXY.with(|slot| *slot.borrow_mut() = Some(proxy));
    }

    pub fn send_rgb_input(text: String) {
        PROXY.with(|slot| match slot.borrow().as_ref() {
            Some(proxy) => {
                if proxy.send_event(PickerEvent::RgbInput(text)).is_err() {
                    log::warn!("Event loop closed, dropping RGB input");
                }
            }
            None => log::warn!("Picker not started, dropping RGB input"),
        });
    }

    pub fn selected_color() -> String {
        SELECTED.with(|selected| selected.borrow().clone())
    }

    /// Record the selection and hand it to the page's `onSelectColor` hook
    pub fn notify_selected_color(color: &str) {
        #[wasm_bindgen]
        extern "C" {
            #[wasm_bindgen(js_name = onSelectColor)]
            fn on_select_color(color: &str);
        }

        SELECTED.with(|selected| *selected.borrow_mut() = color.to_string());
        on_select_color(color);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{notify_selected_color, selected_color, send_rgb_input, set_global_proxy};
