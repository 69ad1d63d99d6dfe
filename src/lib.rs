//! Identifier-keyed persistence for plain Rust structs.
//!
//! A [`ModelStore`] maps models to durable records keyed by
//! (collection, identifier). Every store call runs under one reentrant lock,
//! so backends never see interleaved calls and may call back into the store.

// Lets `#[derive(Model)]` expand to `model_store::Model` inside this crate too.
extern crate self as model_store;

mod backend;
mod config;
mod error;
mod lock;
mod model;
mod store;

pub use backend::{Backend, FileArchiveBackend, InMemoryBackend, NAME_SEGMENT_LEN};
pub use config::{BackendConfig, FileArchiveConfig, StoreConfig, DEFAULT_EXTENSION};
pub use error::{BackendError, StoreError};
pub use lock::{Lock, LockError, LockGuard, ReentrantLock};
pub use model::{Codec, Identifier, Model, ModelKey, MAX_COLLECTION_LEN, MAX_IDENTIFIER_LEN};
pub use store::{LockedModelStore, ModelRepository, ModelStore, ModelsExt};

// Re-export the derive macro under the trait's name.
pub use model_store_macros::Model;
