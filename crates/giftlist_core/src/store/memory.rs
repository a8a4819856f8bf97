//! In-process key-value store.
//!
//! Clones share the same map, so a caller can keep a handle after moving a
//! clone into a repository. Write failures can be switched on to exercise
//! persist-error paths.

use super::{KeyValueStore, StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, String>,
    fail_writes: bool,
    writes: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with `blob` already stored under `key`.
    pub fn with_entry(key: &str, blob: impl Into<String>) -> Self {
        let store = Self::new();
        store
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .insert(key.to_string(), blob.into());
        store
    }

    /// When enabled, every `set` fails with `StoreError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .fail_writes = fail;
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .writes
    }

    pub fn peek(&self, key: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .get(key)
            .cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.peek(key))
    }

    fn set(&mut self, key: &str, blob: &str) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.fail_writes {
            return Err(StoreError::Unavailable(format!(
                "writes to `{key}` are disabled"
            )));
        }
        state.entries.insert(key.to_string(), blob.to_string());
        state.writes += 1;
        Ok(())
    }
}
