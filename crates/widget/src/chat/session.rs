use std::rc::Rc;

use stp_storage::KeyValueStore;

use super::message::Message;

/// Maximum number of messages kept in the persisted history.
pub const HISTORY_CAPACITY: usize = 50;

/// Bounded, persisted chat history for one user identity.
///
/// Sole writer of the history key. Every mutation is written through
/// immediately; storage failures are logged and never surfaced.
pub struct SessionStore {
    storage: Rc<dyn KeyValueStore>,
    key: String,
    messages: Vec<Message>,
}

impl SessionStore {
    /// Opens the history stored under `key`, starting empty when absent or unreadable.
    pub fn open(storage: Rc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let messages = load_history(storage.as_ref(), &key);
        Self {
            storage,
            key,
            messages,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the persisted history. Never fails: malformed or missing data yields an empty list.
    pub fn load(&self) -> Vec<Message> {
        load_history(self.storage.as_ref(), &self.key)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Appends, evicts the oldest entries beyond capacity, then persists the whole list.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        if self.messages.len() > HISTORY_CAPACITY {
            let overflow = self.messages.len() - HISTORY_CAPACITY;
            self.messages.drain(..overflow);
        }
        self.persist();
    }

    /// Empties the history and removes the persisted key.
    pub fn clear(&mut self) {
        self.messages.clear();
        if let Err(error) = self.storage.remove(&self.key) {
            tracing::warn!("failed to remove chat history '{}': {}", self.key, error);
        }
    }

    fn persist(&self) {
        let encoded = match serde_json::to_string(&self.messages) {
            Ok(encoded) => encoded,
            Err(error) => {
                tracing::warn!("failed to encode chat history '{}': {}", self.key, error);
                return;
            }
        };

        if let Err(error) = self.storage.set(&self.key, &encoded) {
            tracing::warn!("failed to persist chat history '{}': {}", self.key, error);
        }
    }
}

fn load_history(storage: &dyn KeyValueStore, key: &str) -> Vec<Message> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(error) => {
            tracing::warn!("failed to read chat history '{key}': {error}");
            return Vec::new();
        }
    };

    let entries = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!("discarding malformed chat history '{key}': {error}");
            return Vec::new();
        }
    };

    // Keep readable entries; a single bad record should not wipe the whole history.
    let total = entries.len();
    let mut messages = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<Message>(entry).ok())
        .collect::<Vec<_>>();
    if messages.len() != total {
        tracing::warn!(
            "skipped {} unreadable entries in chat history '{key}'",
            total - messages.len()
        );
    }

    if messages.len() > HISTORY_CAPACITY {
        let overflow = messages.len() - HISTORY_CAPACITY;
        messages.drain(..overflow);
    }
    messages
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use stp_storage::{MemoryStore, StorageError, StorageResult};

    use super::*;
    use crate::chat::message::Sender;

    const KEY: &str = "stpChatHistory_guest";

    fn open(store: &MemoryStore) -> SessionStore {
        SessionStore::open(Rc::new(store.clone()), KEY)
    }

    #[test]
    fn appended_messages_survive_reload_in_order() {
        let store = MemoryStore::new();
        let mut session = open(&store);
        let sent = (0..HISTORY_CAPACITY)
            .map(|index| {
                if index % 2 == 0 {
                    Message::user(format!("question {index}"))
                } else {
                    Message::bot(format!("réponse {index}"))
                }
            })
            .collect::<Vec<_>>();

        for message in &sent {
            session.append(message.clone());
        }

        let reloaded = open(&store);
        assert_eq!(reloaded.messages(), sent.as_slice());
        assert_eq!(reloaded.load(), sent);
    }

    #[test]
    fn overflow_evicts_oldest_first() {
        let store = MemoryStore::new();
        let mut session = open(&store);

        for index in 0..(HISTORY_CAPACITY + 7) {
            session.append(Message::user(format!("message {index}")));
        }

        let reloaded = open(&store).load();
        assert_eq!(reloaded.len(), HISTORY_CAPACITY);
        assert_eq!(reloaded.first().map(|m| m.text.as_str()), Some("message 7"));
        assert_eq!(
            reloaded.last().map(|m| m.text.as_str()),
            Some(format!("message {}", HISTORY_CAPACITY + 6).as_str())
        );
        assert_eq!(session.len(), HISTORY_CAPACITY);
    }

    #[test]
    fn clear_removes_persisted_key() {
        let store = MemoryStore::new();
        let mut session = open(&store);
        session.append(Message::user("Bonjour"));

        session.clear();

        assert!(session.is_empty());
        assert_eq!(store.get(KEY).unwrap(), None);
        assert!(open(&store).is_empty());
    }

    #[test]
    fn malformed_history_loads_empty() {
        let store = MemoryStore::new();
        store.set(KEY, "{not json").unwrap();

        let session = open(&store);
        assert!(session.is_empty());
        assert!(session.load().is_empty());
    }

    #[test]
    fn unreadable_entries_are_skipped() {
        let store = MemoryStore::new();
        store
            .set(
                KEY,
                r#"[{"text":"Bonjour","sender":"user"},{"text":42},{"text":"Salut!","sender":"bot"}]"#,
            )
            .unwrap();

        let session = open(&store);
        assert_eq!(
            session.messages(),
            &[Message::user("Bonjour"), Message::bot("Salut!")]
        );
    }

    #[test]
    fn oversized_stored_history_is_trimmed_to_newest() {
        let store = MemoryStore::new();
        let stored = (0..60)
            .map(|index| Message::new(format!("m{index}"), Sender::Bot))
            .collect::<Vec<_>>();
        store
            .set(KEY, &serde_json::to_string(&stored).unwrap())
            .unwrap();

        let session = open(&store);
        assert_eq!(session.len(), HISTORY_CAPACITY);
        assert_eq!(session.messages()[0].text, "m10");
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::unavailable("test-get", "failing", "disk gone"))
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::unavailable("test-set", "failing", "disk gone"))
        }

        fn remove(&self, _key: &str) -> StorageResult<()> {
            Err(StorageError::unavailable("test-remove", "failing", "disk gone"))
        }
    }

    #[test]
    fn storage_failures_degrade_to_in_memory_session() {
        let mut session = SessionStore::open(Rc::new(FailingStore), KEY);
        assert!(session.is_empty());

        session.append(Message::user("Bonjour"));
        assert_eq!(session.messages(), &[Message::user("Bonjour")]);
        assert!(session.load().is_empty());

        session.clear();
        assert!(session.is_empty());
    }
}
