use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::KeyValueStore;
use super::error::StorageResult;

/// In-memory key-value store.
///
/// Clones share the same entries, which lets tests rebuild a widget over the
/// "same page storage" to simulate a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let store = MemoryStore::new();
        let reloaded = store.clone();

        store.set("stpChatOpen_guest", "true").unwrap();
        assert_eq!(
            reloaded.get("stpChatOpen_guest").unwrap().as_deref(),
            Some("true")
        );

        reloaded.remove("stpChatOpen_guest").unwrap();
        assert!(store.is_empty());
        assert_eq!(store.get("stpChatOpen_guest").unwrap(), None);
    }
}
