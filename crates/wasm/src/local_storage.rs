use stp_storage::{KeyValueStore, StorageError, StorageResult};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Storage, Window};

const BACKEND: &str = "localStorage";

/// `window.localStorage` behind the widget's key-value contract.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn from_window(window: &Window) -> StorageResult<Self> {
        let storage = window
            .local_storage()
            .map_err(|error| {
                StorageError::unavailable("local-storage-open", BACKEND, describe(&error))
            })?
            .ok_or_else(|| {
                StorageError::unavailable(
                    "local-storage-open",
                    BACKEND,
                    "the browser exposes no localStorage",
                )
            })?;

        Ok(Self { storage })
    }
}

fn describe(error: &JsValue) -> String {
    if let Some(error) = error.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    error.as_string().unwrap_or_else(|| format!("{error:?}"))
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|error| StorageError::unavailable("local-storage-get", BACKEND, describe(&error)))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        // Quota exhaustion surfaces here.
        self.storage
            .set_item(key, value)
            .map_err(|error| StorageError::unavailable("local-storage-set", BACKEND, describe(&error)))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.storage.remove_item(key).map_err(|error| {
            StorageError::unavailable("local-storage-remove", BACKEND, describe(&error))
        })
    }
}
