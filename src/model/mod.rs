//! Models - identified, serializable records eligible for persistence.
//!
//! A model is a plain Rust struct with an identifier field. Identity is the
//! pair (collection, identifier): two model types may reuse an identifier
//! without colliding because each type stores under its own collection.
//!
//! ## Example
//!
//! ```ignore
//! use model_store::{Model, ModelStore, LockedModelStore};
//!
//! #[derive(Serialize, Deserialize, Clone, Model)]
//! #[model(collection = "games")]
//! struct Game {
//!     pub id: String,
//!     pub name: String,
//!     pub platform: String,
//! }
//!
//! let store = LockedModelStore::in_memory();
//! store.save(&game)?;
//! let loaded = store.lookup::<Game>(&"g1".to_string())?;
//! ```

mod codec;
mod key;

use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::{de::DeserializeOwned, Serialize};

pub use codec::Codec;
pub use key::{ModelKey, MAX_COLLECTION_LEN, MAX_IDENTIFIER_LEN};
pub(crate) use key::validate_collection;

/// An opaque model identifier.
///
/// The `Display` form is the identifier's storage key, so it must be stable
/// across process restarts. Implemented for every type with the listed bounds
/// (`String`, integers, `uuid::Uuid`, ...).
pub trait Identifier: Display + Debug + Clone + Eq + Hash + Send + Sync {}

impl<T> Identifier for T where T: Display + Debug + Clone + Eq + Hash + Send + Sync {}

/// Trait for types that can be stored as models.
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection name for this model type (e.g., "games", "user_profiles").
    /// Acts as the type tag of every storage key, so each store accepts only
    /// one model type per collection.
    const COLLECTION: &'static str;

    /// The identifier type chosen by the concrete model.
    type Id: Identifier;

    /// Returns the unique identifier for this model instance.
    fn id(&self) -> &Self::Id;
}
