use crate::storage::LocalStore;
use crate::types::{Message, Role};

pub const HISTORY_KEY: &str = "ai-chat-history-v1";

/// Append-only chat history mirrored to local storage on every append.
#[derive(Debug)]
pub struct ChatHistory {
    entries: Vec<Message>,
    store: LocalStore,
}

impl ChatHistory {
    /// Rehydrate the stored history. Missing or unreadable data yields an empty history.
    pub fn load(store: LocalStore) -> Self {
        let entries = match store.get(HISTORY_KEY) {
            Some(raw) => serde_json::from_str::<Vec<Message>>(&raw).unwrap_or_else(|err| {
                tracing::debug!("discarding unreadable chat history: {err}");
                Vec::new()
            }),
            None => Vec::new(),
        };
        Self { entries, store }
    }

    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    /// Append a message stamped with the current time.
    pub fn push(&mut self, role: Role, content: impl Into<String>) -> &Message {
        self.append(Message::new(role, content))
    }

    pub fn append(&mut self, message: Message) -> &Message {
        self.entries.push(message);
        self.save();
        &self.entries[self.entries.len() - 1]
    }

    fn save(&self) {
        let raw = match serde_json::to_string(&self.entries) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("failed to serialize chat history: {err}");
                return;
            }
        };
        if let Err(err) = self.store.set(HISTORY_KEY, &raw) {
            tracing::warn!("failed to persist chat history: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_storage_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::at(dir.path());
        store.set(HISTORY_KEY, "{not json").unwrap();

        let history = ChatHistory::load(store);
        assert!(history.is_empty());
    }

    #[test]
    fn every_append_is_persisted_in_full() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::at(dir.path());
        let mut history = ChatHistory::load(store.clone());

        history.append(Message::at(Role::User, "Halo", "10:00"));
        let stored: Vec<Message> =
            serde_json::from_str(&store.get(HISTORY_KEY).unwrap()).unwrap();
        assert_eq!(stored.len(), 1);

        history.append(Message::at(Role::Assistant, "Hai!", "10:01"));
        let stored: Vec<Message> =
            serde_json::from_str(&store.get(HISTORY_KEY).unwrap()).unwrap();
        assert_eq!(stored, history.entries());
    }
}
