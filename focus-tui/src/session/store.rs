use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Key under which a timer window leaves its finished session record.
pub const SESSION_DATA_KEY: &str = "sessionData";

const CHANGE_CAPACITY: usize = 64;

/// A change notification; `new_value` is `None` when the key was removed.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreChange {
    pub key: String,
    pub new_value: Option<String>,
}

/// Key/value store shared between the main screen and timer windows.
/// Every write is broadcast to subscribers.
#[derive(Debug, Clone)]
pub struct SharedStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    changes: broadcast::Sender<StoreChange>,
}

impl SharedStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            changes,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("shared store lock poisoned")
            .get(key)
            .cloned()
    }

    pub fn set(&self, key: &str, value: impl Into<String>) {
        let value = value.into();
        self.entries
            .lock()
            .expect("shared store lock poisoned")
            .insert(key.to_string(), value.clone());
        self.notify(key, Some(value));
    }

    pub fn remove(&self, key: &str) {
        let removed = self
            .entries
            .lock()
            .expect("shared store lock poisoned")
            .remove(key);
        if removed.is_some() {
            self.notify(key, None);
        }
    }

    fn notify(&self, key: &str, new_value: Option<String>) {
        // No subscribers is fine.
        let _ = self.changes.send(StoreChange {
            key: key.to_string(),
            new_value,
        });
    }
}

impl Default for SharedStore {
    fn default() -> Self {
        Self::new()
    }
}
