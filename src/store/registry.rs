//! CollectionRegistry - one model type per collection per store.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::lock::LockError;
use crate::model::Model;

#[derive(Clone, Copy)]
struct Claim {
    type_id: TypeId,
    type_name: &'static str,
}

/// Records which model type first used each collection of a store.
///
/// A second type naming the same collection would read and overwrite the
/// first type's records, so it is rejected as invalid input instead.
#[derive(Default)]
pub(crate) struct CollectionRegistry {
    claims: Mutex<HashMap<&'static str, Claim>>,
}

impl CollectionRegistry {
    pub(crate) fn claim<M: Model>(&self) -> Result<(), StoreError> {
        let mut claims = self
            .claims
            .lock()
            .map_err(|_| LockError::Poisoned("collection registry poisoned".into()))?;

        let claim = *claims.entry(M::COLLECTION).or_insert_with(|| Claim {
            type_id: TypeId::of::<M>(),
            type_name: type_name::<M>(),
        });

        if claim.type_id == TypeId::of::<M>() {
            Ok(())
        } else {
            Err(StoreError::InvalidInput(format!(
                "collection {} already holds {}; {} needs its own collection",
                M::COLLECTION,
                claim.type_name,
                type_name::<M>()
            )))
        }
    }
}
