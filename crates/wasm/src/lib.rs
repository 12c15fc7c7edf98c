//! Browser binding for the STP chat widget and the quote/invoice form.
//!
//! The pure pieces (markup, embed configuration) build on every target so they
//! can be unit tested natively; everything touching the DOM is wasm-only.

pub mod embed;
pub mod markup;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod invoice;
#[cfg(target_arch = "wasm32")]
mod local_storage;
#[cfg(target_arch = "wasm32")]
mod widget;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Module entry point: installs logging and mounts both components once the
/// document is parsed.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    use wasm_bindgen::JsCast;

    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("STP widget module initialized");

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window is unavailable"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("document is unavailable"))?;

    if document.ready_state() == "loading" {
        let on_ready = Closure::wrap(Box::new(move |_: web_sys::Event| {
            if let Err(error) = mount_all() {
                log::error!("failed to mount STP components: {error:?}");
            }
        }) as Box<dyn FnMut(_)>);
        document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())?;
        on_ready.forget();
        Ok(())
    } else {
        mount_all()
    }
}

#[cfg(target_arch = "wasm32")]
fn mount_all() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window is unavailable"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("document is unavailable"))?;

    if invoice::mount_invoice_form(&document)? {
        tracing::debug!("invoice line-item calculator bound");
    }
    widget::mount_chat_widget(&window, &document)
}
