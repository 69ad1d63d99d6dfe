//! InMemoryBackend - HashMap-backed records for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::BackendError;
use crate::model::ModelKey;

use super::Backend;

/// In-memory backend backed by a HashMap.
///
/// Clone-friendly via Arc: clones share the same records.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    storage: Arc<RwLock<HashMap<ModelKey, Vec<u8>>>>,
}

impl InMemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records across all collections.
    pub fn len(&self) -> Result<usize, BackendError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| BackendError::Unavailable("lock poisoned".into()))?;
        Ok(storage.len())
    }

    pub fn is_empty(&self) -> Result<bool, BackendError> {
        Ok(self.len()? == 0)
    }
}

impl Backend for InMemoryBackend {
    fn read(&self, key: &ModelKey) -> Result<Option<Vec<u8>>, BackendError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| BackendError::Unavailable("lock poisoned".into()))?;
        Ok(storage.get(key).cloned())
    }

    fn write(&self, key: &ModelKey, bytes: &[u8]) -> Result<(), BackendError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| BackendError::Unavailable("lock poisoned".into()))?;
        storage.insert(key.clone(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &ModelKey) -> Result<bool, BackendError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| BackendError::Unavailable("lock poisoned".into()))?;
        Ok(storage.remove(key).is_some())
    }

    fn keys(&self, collection: &str) -> Result<Vec<String>, BackendError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| BackendError::Unavailable("lock poisoned".into()))?;
        let mut ids: Vec<String> = storage
            .keys()
            .filter(|key| key.collection() == collection)
            .map(|key| key.id().to_string())
            .collect();
        ids.sort();
        Ok(ids)
    }
}
