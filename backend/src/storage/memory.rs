//! In-memory key-value store.
//!
//! Used by tests and previews. Writes can be counted and made to fail per key
//! so the partial-failure paths of the repository can be exercised.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::traits::KeyValueStore;

#[derive(Default)]
struct MemoryState {
    values: HashMap<String, String>,
    failing_keys: HashSet<String>,
    writes: usize,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds the given pairs
    pub fn with_values<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                values,
                ..MemoryState::default()
            })),
        }
    }

    /// Number of successful writes so far
    pub async fn write_count(&self) -> usize {
        self.state.lock().await.writes
    }

    /// Make every later write to `key` fail
    pub async fn fail_writes_to(&self, key: &str) {
        self.state.lock().await.failing_keys.insert(key.to_string());
    }

    pub async fn restore_writes(&self) {
        self.state.lock().await.failing_keys.clear();
    }

    /// Raw stored value, bypassing the trait
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.state.lock().await.values.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get_value(&self, key: &str) -> Result<Option<String>> {
        Ok(self.state.lock().await.values.get(key).cloned())
    }

    async fn put_value(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.failing_keys.contains(key) {
            return Err(anyhow!("write to {} rejected", key));
        }
        state.values.insert(key.to_string(), value.to_string());
        state.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_writes_and_injects_failures() {
        let store = InMemoryStore::with_values([("income", "10")]);
        assert_eq!(store.get_value("income").await.unwrap().as_deref(), Some("10"));

        store.put_value("entries", "[]").await.unwrap();
        assert_eq!(store.write_count().await, 1);

        store.fail_writes_to("income").await;
        assert!(store.put_value("income", "20").await.is_err());
        assert_eq!(store.raw("income").await.as_deref(), Some("10"));
        assert_eq!(store.write_count().await, 1);

        store.restore_writes().await;
        store.put_value("income", "20").await.unwrap();
        assert_eq!(store.raw("income").await.as_deref(), Some("20"));
    }
}
