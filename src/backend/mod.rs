//! Backends - byte-level durable storage consumed by a model store.
//!
//! A backend only ever sees a [`ModelKey`] and opaque bytes; encoding is the
//! store's job. Backends are always called with the store lock held, so they
//! do not have to order concurrent calls themselves.

mod file_archive;
mod in_memory;

use crate::error::BackendError;
use crate::model::ModelKey;

pub use file_archive::{FileArchiveBackend, NAME_SEGMENT_LEN};
pub use in_memory::InMemoryBackend;

/// Durable read/write/remove of byte records keyed by [`ModelKey`].
pub trait Backend: Send + Sync {
    /// Read the record for `key`. `Ok(None)` when no record exists.
    fn read(&self, key: &ModelKey) -> Result<Option<Vec<u8>>, BackendError>;

    /// Create or fully replace the record for `key`.
    ///
    /// Must be atomic: when this returns an error the previous record, if
    /// any, is still intact.
    fn write(&self, key: &ModelKey, bytes: &[u8]) -> Result<(), BackendError>;

    /// Remove the record for `key`. Returns true if it existed; `Ok(false)`
    /// confirms the record is absent.
    fn remove(&self, key: &ModelKey) -> Result<bool, BackendError>;

    /// Identifiers stored in `collection`, sorted.
    fn keys(&self, collection: &str) -> Result<Vec<String>, BackendError>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn read(&self, key: &ModelKey) -> Result<Option<Vec<u8>>, BackendError> {
        (**self).read(key)
    }

    fn write(&self, key: &ModelKey, bytes: &[u8]) -> Result<(), BackendError> {
        (**self).write(key, bytes)
    }

    fn remove(&self, key: &ModelKey) -> Result<bool, BackendError> {
        (**self).remove(key)
    }

    fn keys(&self, collection: &str) -> Result<Vec<String>, BackendError> {
        (**self).keys(collection)
    }
}
