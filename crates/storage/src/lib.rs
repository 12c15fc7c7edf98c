pub mod error;
pub mod keys;
pub mod memory;
#[cfg(not(target_arch = "wasm32"))]
pub mod sqlite;

pub use error::{StorageError, StorageResult};
pub use keys::{GUEST_USER_ID, StorageKeys, UserIdentity};
pub use memory::MemoryStore;
#[cfg(not(target_arch = "wasm32"))]
pub use sqlite::SqliteKvStore;

/// Text key-value persistence scoped by caller-chosen keys.
///
/// Implementations report failures; callers in the widget treat any error,
/// absent value or malformed value as the empty default.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<T> KeyValueStore for std::rc::Rc<T>
where
    T: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}
