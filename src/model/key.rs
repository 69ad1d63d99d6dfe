use std::fmt;

use crate::error::StoreError;

use super::Model;

/// Longest accepted identifier, in bytes of its rendered form.
pub const MAX_IDENTIFIER_LEN: usize = 512;

/// Longest accepted collection name.
pub const MAX_COLLECTION_LEN: usize = 64;

/// Storage key combining a model's collection (type tag) with its identifier.
///
/// Displays as `collection:id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelKey {
    collection: String,
    id: String,
}

impl ModelKey {
    /// Build a key without validation. Backends receive keys built by
    /// [`ModelKey::for_id`], so this is mostly useful in tests.
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Validated key for the model type `M` and identifier `id`.
    pub fn for_id<M: Model>(id: &M::Id) -> Result<Self, StoreError> {
        validate_collection(M::COLLECTION)?;
        let id = id.to_string();
        validate_identifier(M::COLLECTION, &id)?;
        Ok(Self::new(M::COLLECTION, id))
    }

    /// Validated key for a model instance.
    pub fn for_model<M: Model>(model: &M) -> Result<Self, StoreError> {
        Self::for_id::<M>(model.id())
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.collection, self.id)
    }
}

pub(crate) fn validate_collection(collection: &str) -> Result<(), StoreError> {
    if collection.is_empty() {
        return Err(StoreError::InvalidInput("collection name is empty".into()));
    }
    if collection.len() > MAX_COLLECTION_LEN {
        return Err(StoreError::InvalidInput(format!(
            "collection {:?} is {} bytes (max {})",
            collection,
            collection.len(),
            MAX_COLLECTION_LEN
        )));
    }
    if let Some(ch) = collection
        .chars()
        .find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-'))
    {
        return Err(StoreError::InvalidInput(format!(
            "collection {:?} contains {:?}; only [A-Za-z0-9_-] is allowed",
            collection, ch
        )));
    }
    Ok(())
}

fn validate_identifier(collection: &str, id: &str) -> Result<(), StoreError> {
    if id.is_empty() {
        return Err(StoreError::InvalidInput(format!(
            "empty identifier for collection {}",
            collection
        )));
    }
    if id.len() > MAX_IDENTIFIER_LEN {
        return Err(StoreError::InvalidInput(format!(
            "identifier for collection {} is {} bytes (max {})",
            collection,
            id.len(),
            MAX_IDENTIFIER_LEN
        )));
    }
    if id.chars().any(char::is_control) {
        return Err(StoreError::InvalidInput(format!(
            "identifier {:?} for collection {} contains control characters",
            id, collection
        )));
    }
    Ok(())
}
