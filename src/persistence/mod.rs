//! Key-value persistence
//!
//! Three string slots survive between sessions:
//! - win streak (integer as text)
//! - match history (JSON array of result strings)
//! - settings (JSON object)
//!
//! Reads never fail: absent or corrupt data falls back to defaults at the
//! call site. Writes report a `StorageError` that callers log and ignore.

mod error;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::collections::HashMap;

pub use error::StorageError;

/// Minimal string store (LocalStorage on the web)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store for native runs and tests
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot (handy for corrupt-data tests)
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("missing"), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_error_recoverability() {
        assert!(!StorageError::Unavailable.is_recoverable());
        assert!(
            StorageError::WriteRejected {
                key: "k".to_string()
            }
            .is_recoverable()
        );
    }
}
