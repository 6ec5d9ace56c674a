//! Leptos frontend for the browser build.

pub mod app;
pub mod browser;

use wasm_bindgen::prelude::*;

/// WASM entry point: runs when the module loads.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    leptos::mount_to_body(app::App);
}
