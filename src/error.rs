use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::lock::LockError;
use crate::model::ModelKey;

/// Error type for backend byte-level operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The storage medium rejected a read, write or remove.
    #[error("backend i/o error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The backend cannot serve requests (e.g. its internal lock was poisoned).
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    /// Stored state that the backend cannot interpret.
    #[error("backend state corrupt: {0}")]
    Corrupt(String),
    /// The backend was configured with unusable settings.
    #[error("invalid backend config: {0}")]
    Config(String),
}

impl BackendError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BackendError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure may clear up on its own (busy, timed out, full).
    pub fn is_transient(&self) -> bool {
        match self {
            BackendError::Io { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::Interrupted
                    | io::ErrorKind::WouldBlock
                    | io::ErrorKind::TimedOut
                    | io::ErrorKind::ResourceBusy
                    | io::ErrorKind::StorageFull
            ),
            BackendError::Unavailable(_) => true,
            BackendError::Corrupt(_) | BackendError::Config(_) => false,
        }
    }
}

/// Error type for model store operations.
///
/// A missing record is never an error: lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed identifier, collection or configuration.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The model could not be converted to or from its stored bytes.
    #[error("serialization error for {key}: {message}")]
    Serialization { key: ModelKey, message: String },
    /// The backend rejected the operation.
    #[error("backend error for {key}: {source}")]
    Backend {
        key: ModelKey,
        #[source]
        source: BackendError,
    },
    /// The backend could not be opened.
    #[error("failed to open backend: {0}")]
    Open(#[source] BackendError),
    /// The backend failed while listing a collection.
    #[error("backend error listing collection {collection}: {source}")]
    Listing {
        collection: String,
        #[source]
        source: BackendError,
    },
    /// The store lock could not be acquired.
    #[error(transparent)]
    Lock(#[from] LockError),
}

impl StoreError {
    pub(crate) fn backend(key: &ModelKey, source: BackendError) -> Self {
        StoreError::Backend {
            key: key.clone(),
            source,
        }
    }

    pub(crate) fn serialization(key: &ModelKey, message: impl ToString) -> Self {
        StoreError::Serialization {
            key: key.clone(),
            message: message.to_string(),
        }
    }

    /// Whether repeating the same call could succeed.
    ///
    /// The store never retries on its own; this only informs caller policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Backend { source, .. }
            | StoreError::Listing { source, .. }
            | StoreError::Open(source) => source.is_transient(),
            StoreError::Lock(_) => true,
            StoreError::InvalidInput(_) | StoreError::Serialization { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ModelKey {
        ModelKey::new("games", "g1")
    }

    fn io_error(kind: io::ErrorKind) -> StoreError {
        StoreError::backend(&key(), BackendError::io("/tmp/x", io::Error::from(kind)))
    }

    #[test]
    fn transient_io_errors_are_retryable() {
        for kind in [
            io::ErrorKind::Interrupted,
            io::ErrorKind::WouldBlock,
            io::ErrorKind::TimedOut,
            io::ErrorKind::StorageFull,
        ] {
            let err = io_error(kind);
            assert!(err.is_retryable(), "{:?}", kind);
            assert!(err.to_string().contains("games:g1"));
        }
    }

    #[test]
    fn permanent_io_errors_are_not_retryable() {
        for kind in [
            io::ErrorKind::PermissionDenied,
            io::ErrorKind::NotFound,
            io::ErrorKind::IsADirectory,
            io::ErrorKind::Other,
        ] {
            assert!(!io_error(kind).is_retryable(), "{:?}", kind);
        }
        assert!(!StoreError::Open(BackendError::Config("bad extension".into())).is_retryable());
    }

    #[test]
    fn corrupt_and_serialization_errors_are_not_retryable() {
        let corrupt = StoreError::backend(&key(), BackendError::Corrupt("bad name".into()));
        assert!(!corrupt.is_retryable());

        let serde = StoreError::serialization(&key(), "expected struct");
        assert!(!serde.is_retryable());
        assert_eq!(
            serde.to_string(),
            "serialization error for games:g1: expected struct"
        );
    }

    #[test]
    fn lock_errors_convert() {
        let err: StoreError = LockError::Poisoned("panicked".into()).into();
        assert!(matches!(err, StoreError::Lock(_)));
        assert_eq!(err.to_string(), "lock poisoned: panicked");
    }
}
