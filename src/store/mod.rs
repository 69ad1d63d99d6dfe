//! ModelStore - identifier-keyed persistence with store-scoped locking.

mod locked;
mod registry;
mod repository;

use crate::error::StoreError;
use crate::lock::ReentrantLock;
use crate::model::Model;

pub use locked::LockedModelStore;
pub use repository::{ModelRepository, ModelsExt};

/// Lookup, save and delete of models by (collection, identifier).
///
/// Every operation on one store instance is mutually exclusive with every
/// other, whatever identifiers they touch. The lock is reentrant, so an
/// operation may call back into the store on the same thread.
pub trait ModelStore: Send + Sync {
    /// Get a model by identifier. `Ok(None)` if no record exists.
    fn lookup<M: Model>(&self, id: &M::Id) -> Result<Option<M>, StoreError>;

    /// Create or fully replace the model's record. On error the previous
    /// record is unchanged.
    fn save<M: Model>(&self, model: &M) -> Result<(), StoreError>;

    /// Delete a record by identifier. Deleting a missing record succeeds;
    /// the returned flag says whether a record was removed.
    fn delete_by_id<M: Model>(&self, id: &M::Id) -> Result<bool, StoreError>;

    /// Identifiers stored for model type `M`, sorted by their rendered form.
    fn identifiers<M: Model>(&self) -> Result<Vec<String>, StoreError>;

    /// The store's reentrant lock. Hold it to make a group of calls atomic
    /// with respect to other threads.
    fn modification_lock(&self) -> &ReentrantLock;

    /// Delete the model's record. See [`ModelStore::delete_by_id`].
    fn delete<M: Model>(&self, model: &M) -> Result<bool, StoreError> {
        self.delete_by_id::<M>(model.id())
    }

    /// Whether a record exists for the identifier.
    fn contains<M: Model>(&self, id: &M::Id) -> Result<bool, StoreError> {
        Ok(self.lookup::<M>(id)?.is_some())
    }
}
