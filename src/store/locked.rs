//! LockedModelStore - the store that serializes every call behind one lock.

use crate::backend::{Backend, FileArchiveBackend, InMemoryBackend};
use crate::config::{BackendConfig, FileArchiveConfig, StoreConfig};
use crate::error::StoreError;
use crate::lock::ReentrantLock;
use crate::model::{validate_collection, Codec, Model, ModelKey};

use super::registry::CollectionRegistry;
use super::ModelStore;

/// Model store over a byte-level [`Backend`].
///
/// One [`ReentrantLock`] guards the backend: lookups, saves and deletes on
/// the same instance never interleave, whichever identifiers they target.
/// Each collection belongs to the first model type that uses it.
/// Share it between threads behind an `Arc`.
pub struct LockedModelStore<B = InMemoryBackend> {
    backend: B,
    codec: Codec,
    lock: ReentrantLock,
    collections: CollectionRegistry,
}

impl LockedModelStore<InMemoryBackend> {
    /// Store over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(InMemoryBackend::new())
    }
}

impl LockedModelStore<FileArchiveBackend> {
    /// Store over a file archive opened from `config`.
    pub fn open_file_archive(config: &FileArchiveConfig) -> Result<Self, StoreError> {
        let backend = FileArchiveBackend::open(config).map_err(StoreError::Open)?;
        Ok(Self::new(backend))
    }
}

impl LockedModelStore<Box<dyn Backend>> {
    /// Store built from configuration, with the backend chosen at runtime.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let backend: Box<dyn Backend> = match &config.backend {
            BackendConfig::Memory => Box::new(InMemoryBackend::new()),
            BackendConfig::FileArchive(archive) => {
                Box::new(FileArchiveBackend::open(archive).map_err(StoreError::Open)?)
            }
        };
        Ok(Self::new(backend).with_codec(config.codec))
    }
}

impl<B: Backend> LockedModelStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            codec: Codec::default(),
            lock: ReentrantLock::new(),
            collections: CollectionRegistry::default(),
        }
    }

    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run `f` with the store lock held. Store calls made inside `f` on this
    /// thread re-enter the lock; other threads wait until `f` returns.
    pub fn exclusive<R>(&self, f: impl FnOnce(&Self) -> R) -> Result<R, StoreError> {
        let _guard = self.lock.acquire()?;
        Ok(f(self))
    }
}

impl<B: Backend> ModelStore for LockedModelStore<B> {
    fn lookup<M: Model>(&self, id: &M::Id) -> Result<Option<M>, StoreError> {
        let key = ModelKey::for_id::<M>(id)?;
        self.collections.claim::<M>()?;

        let bytes = {
            let _guard = self.lock.acquire()?;
            self.backend
                .read(&key)
                .map_err(|e| StoreError::backend(&key, e))?
        };

        let Some(bytes) = bytes else {
            log::debug!("event=model_lookup status=not_found key={}", key);
            return Ok(None);
        };
        let model = self
            .codec
            .decode::<M>(&bytes)
            .map_err(|e| StoreError::serialization(&key, e))?;
        log::debug!("event=model_lookup status=ok key={}", key);
        Ok(Some(model))
    }

    fn save<M: Model>(&self, model: &M) -> Result<(), StoreError> {
        let key = ModelKey::for_model(model)?;
        self.collections.claim::<M>()?;
        let bytes = self
            .codec
            .encode(model)
            .map_err(|e| StoreError::serialization(&key, e))?;

        let _guard = self.lock.acquire()?;
        match self.backend.write(&key, &bytes) {
            Ok(()) => {
                log::debug!(
                    "event=model_save status=ok key={} bytes={}",
                    key,
                    bytes.len()
                );
                Ok(())
            }
            Err(err) => {
                log::warn!("event=model_save status=error key={} error={}", key, err);
                Err(StoreError::backend(&key, err))
            }
        }
    }

    fn delete_by_id<M: Model>(&self, id: &M::Id) -> Result<bool, StoreError> {
        let key = ModelKey::for_id::<M>(id)?;
        self.collections.claim::<M>()?;

        let _guard = self.lock.acquire()?;
        match self.backend.remove(&key) {
            Ok(existed) => {
                log::debug!("event=model_delete status=ok key={} existed={}", key, existed);
                Ok(existed)
            }
            Err(err) => {
                log::warn!("event=model_delete status=error key={} error={}", key, err);
                Err(StoreError::backend(&key, err))
            }
        }
    }

    fn identifiers<M: Model>(&self) -> Result<Vec<String>, StoreError> {
        validate_collection(M::COLLECTION)?;
        self.collections.claim::<M>()?;

        let _guard = self.lock.acquire()?;
        self.backend
            .keys(M::COLLECTION)
            .map_err(|source| StoreError::Listing {
                collection: M::COLLECTION.to_string(),
                source,
            })
    }

    fn modification_lock(&self) -> &ReentrantLock {
        &self.lock
    }
}
