pub mod account;
pub mod api;
mod app;
mod components;
pub mod config;
pub mod models;
pub mod notifications;
mod pages;
pub mod push;
pub mod session;
mod state;
pub mod storage;
pub mod subscription;
pub mod telemetry;
mod util;

pub use app::App;

use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    telemetry::init(tracing::Level::INFO);
    mount_to_body(App);
}
