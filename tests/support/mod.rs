#![allow(dead_code)]

pub mod game;

use std::sync::Arc;

use model_store::{InMemoryBackend, LockedModelStore};

pub fn shared_store() -> Arc<LockedModelStore<InMemoryBackend>> {
    Arc::new(LockedModelStore::in_memory())
}
