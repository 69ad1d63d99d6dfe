//! Store configuration.
//!
//! Configuration is plain serde data so it can be embedded in an
//! application's own config file:
//!
//! ```json
//! {
//!   "codec": "json",
//!   "backend": { "kind": "file_archive", "root": "/var/lib/app/models" }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::Codec;

/// Default file extension for archived records.
pub const DEFAULT_EXTENSION: &str = "model";

/// Which backend a store is built on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    #[default]
    Memory,
    FileArchive(FileArchiveConfig),
}

/// Top-level store configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: BackendConfig,
    pub codec: Codec,
}

impl StoreConfig {
    pub fn memory() -> Self {
        Self::default()
    }

    pub fn file_archive(root: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendConfig::FileArchive(FileArchiveConfig::new(root)),
            codec: Codec::default(),
        }
    }

    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self, StoreError> {
        serde_json::from_str(raw)
            .map_err(|e| StoreError::InvalidInput(format!("invalid store config: {}", e)))
    }
}

/// Settings for the file-archiving backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileArchiveConfig {
    /// Directory holding one sub-directory per collection.
    pub root: PathBuf,
    /// Record file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Create `root` when it does not exist.
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
    /// fsync each record before renaming it into place.
    #[serde(default = "default_true")]
    pub sync: bool,
}

impl FileArchiveConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: default_extension(),
            create_if_missing: true,
            sync: true,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.root.as_os_str().is_empty() {
            return Err("file archive root is empty".into());
        }
        if self.extension.is_empty()
            || !self.extension.chars().all(|ch| ch.is_ascii_alphanumeric())
            || self.extension == "tmp"
        {
            return Err(format!(
                "file archive extension {:?} must be non-empty ascii alphanumeric and not \"tmp\"",
                self.extension
            ));
        }
        Ok(())
    }
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_in_memory_json() {
        let config = StoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, StoreConfig::memory());
        assert_eq!(config.codec, Codec::Json);
    }

    #[test]
    fn file_archive_defaults_fill_in() {
        let config = StoreConfig::from_json_str(
            r#"{ "backend": { "kind": "file_archive", "root": "/data/models" } }"#,
        )
        .unwrap();
        assert_eq!(config, StoreConfig::file_archive("/data/models"));
        match config.backend {
            BackendConfig::FileArchive(archive) => {
                assert_eq!(archive.extension, "model");
                assert!(archive.create_if_missing);
                assert!(archive.sync);
            }
            other => panic!("unexpected backend {:?}", other),
        }
    }

    #[test]
    fn unknown_backend_kind_is_invalid_input() {
        let err = StoreConfig::from_json_str(r#"{ "backend": { "kind": "postgres" } }"#)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }

    #[test]
    fn extension_validation() {
        assert!(FileArchiveConfig::new("/x").validate().is_ok());
        assert!(FileArchiveConfig::new("/x").with_extension("").validate().is_err());
        assert!(FileArchiveConfig::new("/x").with_extension("a.b").validate().is_err());
        assert!(FileArchiveConfig::new("/x").with_extension("tmp").validate().is_err());
        assert!(FileArchiveConfig::new("").validate().is_err());
    }
}
