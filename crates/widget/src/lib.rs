#![deny(unsafe_code)]

/// Chat widget state machine, rendering and persisted history.
pub mod chat;
#[cfg(not(target_arch = "wasm32"))]
pub mod host;
pub mod settings;
