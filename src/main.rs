//! Standalone Color Picker Application (Desktop)
//!
//! This binary runs the picker as a native desktop application.
//! For WASM/web builds, the entry point is in lib.rs (wasm_start).

use color_picker::{App, AppWrapper, PickerConfig, PickerError, PickerEvent, PickerResult};
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> PickerResult<()> {
    env_logger::init();

    log::info!("🚀 Starting color picker desktop app");

    let event_loop = EventLoop::<PickerEvent>::with_user_event()
        .build()
        .map_err(|e| PickerError::Window(e.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(PickerConfig::default())?;
    app.set_on_select(|color| log::info!("🎨 Selected {}", color));

    let mut app_wrapper = AppWrapper::new(app, event_loop.create_proxy());
    event_loop
        .run_app(&mut app_wrapper)
        .map_err(|e| PickerError::Window(e.to_string()))
}
