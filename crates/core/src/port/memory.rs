// In-Memory State Store
//
// Reference adapter for the StateStore port. A transaction works on a
// copy of the map taken at begin and publishes it wholesale at commit
// (last commit wins). Good enough for unit tests and examples; real
// deployments use the SQLite adapter.

use crate::domain::StateKey;
use crate::error::{AppError, Result};
use crate::port::state_store::{StateStore, StateTransaction};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

type StateMap = BTreeMap<String, Vec<u8>>;

/// Shared in-memory store backed by an ordered map
#[derive(Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<Mutex<StateMap>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the committed state (test inspection)
    pub fn snapshot(&self) -> StateMap {
        self.inner.lock().expect("state lock poisoned").clone()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn begin(&self) -> Result<Box<dyn StateTransaction>> {
        let working = self.inner.lock().expect("state lock poisoned").clone();
        Ok(Box::new(MemoryTransaction {
            shared: Arc::clone(&self.inner),
            working,
        }))
    }
}

struct MemoryTransaction {
    shared: Arc<Mutex<StateMap>>,
    working: StateMap,
}

#[async_trait]
impl StateTransaction for MemoryTransaction {
    async fn get(&mut self, key: &StateKey) -> Result<Option<Vec<u8>>> {
        Ok(self.working.get(key.as_str()).cloned())
    }

    async fn put(&mut self, key: &StateKey, value: &[u8]) -> Result<()> {
        self.working.insert(key.as_str().to_string(), value.to_vec());
        Ok(())
    }

    async fn insert(&mut self, key: &StateKey, value: &[u8]) -> Result<()> {
        if self.working.contains_key(key.as_str()) {
            return Err(AppError::DuplicateKey(key.to_string()));
        }
        self.working.insert(key.as_str().to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&mut self, key: &StateKey) -> Result<()> {
        self.working.remove(key.as_str());
        Ok(())
    }

    async fn list_prefix(&mut self, prefix: &str) -> Result<Vec<(StateKey, Vec<u8>)>> {
        Ok(self
            .working
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (StateKey::from_raw(k.clone()), v.clone()))
            .collect())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        *self.shared.lock().expect("state lock poisoned") = self.working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        // working copy is simply dropped
        Ok(())
    }
}
