//! ModelRepository - Typed accessor for model operations.

use std::marker::PhantomData;

use crate::error::StoreError;
use crate::model::Model;

use super::ModelStore;

/// Typed repository wrapper for accessing models of a specific type.
pub struct ModelRepository<'a, S, M> {
    store: &'a S,
    _marker: PhantomData<M>,
}

impl<'a, S: ModelStore, M: Model> ModelRepository<'a, S, M> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Get a model by ID.
    pub fn get(&self, id: &M::Id) -> Result<Option<M>, StoreError> {
        self.store.lookup::<M>(id)
    }

    /// Create or replace a model.
    pub fn save(&self, model: &M) -> Result<(), StoreError> {
        self.store.save(model)
    }

    /// Delete a model. Returns true if it existed.
    pub fn delete(&self, model: &M) -> Result<bool, StoreError> {
        self.store.delete(model)
    }

    /// Delete a model by ID. Returns true if it existed.
    pub fn delete_by_id(&self, id: &M::Id) -> Result<bool, StoreError> {
        self.store.delete_by_id::<M>(id)
    }

    pub fn contains(&self, id: &M::Id) -> Result<bool, StoreError> {
        self.store.contains::<M>(id)
    }

    /// Identifiers of every stored model of this type.
    pub fn ids(&self) -> Result<Vec<String>, StoreError> {
        self.store.identifiers::<M>()
    }
}

/// Extension trait for typed model access on any ModelStore.
pub trait ModelsExt: ModelStore + Sized {
    /// Get a typed model repository.
    fn models<M: Model>(&self) -> ModelRepository<'_, Self, M> {
        ModelRepository::new(self)
    }
}

impl<S: ModelStore> ModelsExt for S {}
