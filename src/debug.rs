//! Debug overlay utilities for web platform
//!
//! Provides functions to update the on-screen debug display
//! for tracking initialization stages and picker state.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Update the debug status line
#[cfg(target_arch = "wasm32")]
pub fn update_status(status: &str) {
    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_name = updateDebugStatus)]
        fn update_debug_status(status: &str);
    }
    update_debug_status(status);
}

/// Show the currently selected color
#[cfg(target_arch = "wasm32")]
pub fn update_selected_color(color: &str) {
    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_name = updateDebugColor)]
        fn update_debug_color(color: &str);
    }
    update_debug_color(color);
}

/// Show how many pins are on the field
#[cfg(target_arch = "wasm32")]
pub fn update_pin_count(count: usize) {
    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_name = updateDebugPinCount)]
        fn update_debug_pin_count(count: u32);
    }
    update_debug_pin_count(count as u32);
}

// No-op versions for non-WASM platforms
#[cfg(not(target_arch = "wasm32"))]
pub fn update_status(_status: &str) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn update_selected_color(_color: &str) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn update_pin_count(_count: usize) {}
