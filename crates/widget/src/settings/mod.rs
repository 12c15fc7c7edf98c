pub mod labels;
#[cfg(not(target_arch = "wasm32"))]
pub mod state;

pub use labels::WidgetLabels;
#[cfg(not(target_arch = "wasm32"))]
pub use state::{SettingsError, SettingsStore, WidgetSettings};
