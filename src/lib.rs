//! Color Picker Library
//!
//! This crate provides a canvas color picker: a saturation/value field for
//! the selected hue, a hue slider underneath it, up to six draggable pins
//! marking picked colors, and `rgb(r, g, b)` text entry. It can run:
//! - Standalone in a browser (via WASM)
//! - As a native desktop window
//!
//! The picker state and painting are plain CPU code; only the renderer and
//! window modules touch wgpu and winit.

mod app;
mod color;
mod config;
pub mod debug;
mod error;
mod input;
mod paint;
mod pins;
mod renderer;
mod surface;
mod window;

pub use app::{App, SelectCallback};
pub use color::{hsv_to_rgb, hue_stop_color, parse_rgb, ColorParseError, Rgb};
pub use config::PickerConfig;
pub use error::{PickerError, PickerResult};
pub use input::{InputQueue, PointerEvent, PointerEventSource, PointerEventType, PointerTarget};
pub use paint::{
    draw_pin, hue_slider_stops, paint_hue_saturation_field, paint_hue_slider,
    paint_saturation_value_field, PinStyle,
};
pub use pins::{Pin, PinSet, MAX_PINS};
pub use renderer::{Letterbox, Renderer};
pub use surface::PixelBuffer;
pub use window::{AppWrapper, PickerEvent};

// Re-export for WASM builds
#[cfg(target_arch = "wasm32")]
pub use wasm_bindgen;

/// Initialize panic hook for better error messages in WASM
#[cfg(target_arch = "wasm32")]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize logging for WASM (logs go to browser console)
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    // Fails only if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Debug);
}

/// WASM entry point - called when the module is loaded
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_start() {
    init_panic_hook();
    init_logging();

    log::info!("🚀 Color Picker WASM module started");

    if let Err(e) = run_event_loop() {
        log::error!("Failed to start picker: {}", e);
        debug::update_status(&format!("❌ {}", e));
    }
}

#[cfg(target_arch = "wasm32")]
fn run_event_loop() -> PickerResult<()> {
    use winit::event_loop::{ControlFlow, EventLoop};
    use winit::platform::web::EventLoopExtWebSys;

    let event_loop = EventLoop::<PickerEvent>::with_user_event()
        .build()
        .map_err(|e| PickerError::Window(e.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(PickerConfig::default())?;
    app.set_on_select(window::notify_selected_color);

    // Store the proxy for JS callbacks
    window::set_global_proxy(event_loop.create_proxy());

    let app_wrapper = AppWrapper::new(app, event_loop.create_proxy());
    event_loop.spawn_app(app_wrapper);
    Ok(())
}

/// Feed the page's RGB text input into the picker
///
/// # Arguments
/// * `text` - Current contents of the input, expected as `rgb(r, g, b)`
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn set_rgb_input(text: String) {
    window::send_rgb_input(text);
}

/// Most recently selected color as `rgb(r, g, b)`, empty before the first pick
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn selected_color() -> String {
    window::selected_color()
}
