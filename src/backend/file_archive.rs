//! FileArchiveBackend - one archived file per record.
//!
//! Layout: `<root>/<collection>/<base64url(id)>.<extension>`. Identifiers are
//! base64url-encoded so any identifier maps to a portable file name. Encoded
//! names longer than `NAME_SEGMENT_LEN` are split into nested directories of
//! exactly `NAME_SEGMENT_LEN` characters, keeping every path component well
//! under the usual 255-byte file name limit.
//!
//! Writes go to a sibling `.tmp` file which is renamed over the record, so a
//! failed write never leaves a torn record behind.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::config::FileArchiveConfig;
use crate::error::BackendError;
use crate::model::{ModelKey, MAX_IDENTIFIER_LEN};

use super::Backend;

const TMP_SUFFIX: &str = "tmp";

/// Longest encoded name stored in a single path component.
pub const NAME_SEGMENT_LEN: usize = 128;

/// Deepest directory nesting `keys` follows: enough for any valid identifier.
const MAX_SEGMENT_DEPTH: usize = MAX_IDENTIFIER_LEN * 4 / 3 / NAME_SEGMENT_LEN + 1;

/// Backend that archives each record as its own file under a root directory.
#[derive(Debug, Clone)]
pub struct FileArchiveBackend {
    root: PathBuf,
    extension: String,
    sync: bool,
}

impl FileArchiveBackend {
    /// Open (and optionally create) the archive described by `config`.
    pub fn open(config: &FileArchiveConfig) -> Result<Self, BackendError> {
        config.validate().map_err(BackendError::Config)?;

        match fs::metadata(&config.root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(BackendError::Config(format!(
                    "archive root {} is not a directory",
                    config.root.display()
                )))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound && config.create_if_missing => {
                fs::create_dir_all(&config.root)
                    .map_err(|e| BackendError::io(&config.root, e))?;
            }
            Err(err) => return Err(BackendError::io(&config.root, err)),
        }

        log::info!(
            "event=archive_open status=ok root={} extension={} sync={}",
            config.root.display(),
            config.extension,
            config.sync
        );

        Ok(Self {
            root: config.root.clone(),
            extension: config.extension.clone(),
            sync: config.sync,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding the record for `key`.
    pub fn path_for(&self, key: &ModelKey) -> PathBuf {
        let encoded = URL_SAFE_NO_PAD.encode(key.id());
        let mut path = self.collection_dir(key.collection());
        let mut rest = encoded.as_str();
        while rest.len() > NAME_SEGMENT_LEN {
            let (segment, tail) = rest.split_at(NAME_SEGMENT_LEN);
            path.push(segment);
            rest = tail;
        }
        path.push(format!("{}.{}", rest, self.extension));
        path
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join(collection)
    }

    /// Remove now-empty segment directories between `path` and its collection.
    fn prune_segments(&self, path: &Path, collection: &str) {
        let collection_dir = self.collection_dir(collection);
        let mut dir = path.parent();
        while let Some(current) = dir {
            if current == collection_dir || fs::remove_dir(current).is_err() {
                break;
            }
            dir = current.parent();
        }
    }

    fn collect_ids(
        &self,
        dir: &Path,
        prefix: &str,
        depth: usize,
        ids: &mut Vec<String>,
    ) -> Result<(), BackendError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(BackendError::io(dir, err)),
        };

        for entry in entries {
            let entry = entry.map_err(|e| BackendError::io(dir, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| BackendError::io(&path, e))?;
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };

            if file_type.is_dir() {
                if name.len() == NAME_SEGMENT_LEN && depth < MAX_SEGMENT_DEPTH {
                    self.collect_ids(&path, &format!("{}{}", prefix, name), depth + 1, ids)?;
                }
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match URL_SAFE_NO_PAD
                .decode(format!("{}{}", prefix, stem))
                .ok()
                .and_then(|raw| String::from_utf8(raw).ok())
            {
                Some(id) => ids.push(id),
                None => log::warn!(
                    "event=archive_keys status=skipped path={} reason=undecodable_name",
                    path.display()
                ),
            }
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(bytes)?;
        if self.sync {
            file.sync_all()?;
        }
        Ok(())
    }
}

impl Backend for FileArchiveBackend {
    fn read(&self, key: &ModelKey) -> Result<Option<Vec<u8>>, BackendError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(BackendError::io(path, err)),
        }
    }

    fn write(&self, key: &ModelKey, bytes: &[u8]) -> Result<(), BackendError> {
        let path = self.path_for(key);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| BackendError::io(dir, e))?;
        }
        let temp_path = path.with_extension(format!("{}.{}", self.extension, TMP_SUFFIX));

        // Write to temp file first
        if let Err(err) = self.write_file(&temp_path, bytes) {
            let _ = fs::remove_file(&temp_path);
            return Err(BackendError::io(temp_path, err));
        }

        // Atomic rename
        if let Err(err) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(BackendError::io(path, err));
        }
        Ok(())
    }

    fn remove(&self, key: &ModelKey) -> Result<bool, BackendError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                self.prune_segments(&path, key.collection());
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(BackendError::io(path, err)),
        }
    }

    fn keys(&self, collection: &str) -> Result<Vec<String>, BackendError> {
        let mut ids = Vec::new();
        self.collect_ids(&self.collection_dir(collection), "", 0, &mut ids)?;
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_in(dir: &TempDir) -> FileArchiveBackend {
        FileArchiveBackend::open(&FileArchiveConfig::new(dir.path().join("archive"))).unwrap()
    }

    #[test]
    fn open_creates_missing_root() {
        let dir = TempDir::new().unwrap();
        let backend = open_in(&dir);
        assert!(backend.root().is_dir());
    }

    #[test]
    fn open_refuses_missing_root_without_create() {
        let dir = TempDir::new().unwrap();
        let config = FileArchiveConfig::new(dir.path().join("absent")).create_if_missing(false);
        let err = FileArchiveBackend::open(&config).unwrap_err();
        assert!(matches!(err, BackendError::Io { .. }));
    }

    #[test]
    fn open_refuses_file_root() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, b"x").unwrap();
        let err = FileArchiveBackend::open(&FileArchiveConfig::new(file)).unwrap_err();
        assert!(matches!(err, BackendError::Config(_)));
    }

    #[test]
    fn write_read_remove() {
        let dir = TempDir::new().unwrap();
        let backend = open_in(&dir);
        let key = ModelKey::new("games", "g1");

        assert!(backend.read(&key).unwrap().is_none());
        backend.write(&key, b"snes").unwrap();
        assert_eq!(backend.read(&key).unwrap().unwrap(), b"snes");
        backend.write(&key, b"sfc").unwrap();
        assert_eq!(backend.read(&key).unwrap().unwrap(), b"sfc");

        assert!(backend.remove(&key).unwrap());
        assert!(!backend.remove(&key).unwrap());
        assert!(backend.read(&key).unwrap().is_none());
    }

    #[test]
    fn record_file_name_is_base64url() {
        let dir = TempDir::new().unwrap();
        let backend = open_in(&dir);
        let key = ModelKey::new("games", "a/b");
        let path = backend.path_for(&key);
        assert_eq!(path.file_name().unwrap(), "YS9i.model");
        assert_eq!(path.parent().unwrap(), backend.root().join("games"));
    }

    #[test]
    fn failed_write_keeps_previous_record() {
        let dir = TempDir::new().unwrap();
        let backend = open_in(&dir);
        let key = ModelKey::new("games", "g1");
        backend.write(&key, b"original").unwrap();

        // A directory squatting on the temp path makes File::create fail.
        let temp_path = backend.path_for(&key).with_extension("model.tmp");
        fs::create_dir(&temp_path).unwrap();

        let err = backend.write(&key, b"replacement").unwrap_err();
        assert!(matches!(err, BackendError::Io { .. }));
        assert_eq!(backend.read(&key).unwrap().unwrap(), b"original");
    }

    #[test]
    fn keys_skip_temp_and_foreign_files() {
        let dir = TempDir::new().unwrap();
        let backend = open_in(&dir);
        backend.write(&ModelKey::new("games", "g2"), b"2").unwrap();
        backend.write(&ModelKey::new("games", "g1"), b"1").unwrap();

        let games = backend.root().join("games");
        fs::write(games.join("Zzg.model.tmp"), b"torn").unwrap();
        fs::write(games.join("notes.txt"), b"readme").unwrap();
        fs::write(games.join("%%%.model"), b"bad name").unwrap();

        assert_eq!(backend.keys("games").unwrap(), vec!["g1", "g2"]);
        assert!(backend.keys("consoles").unwrap().is_empty());
    }

    #[test]
    fn long_identifiers_nest_into_segments() {
        let dir = TempDir::new().unwrap();
        let backend = open_in(&dir);
        let id = "y".repeat(MAX_IDENTIFIER_LEN);
        let key = ModelKey::new("games", id.clone());

        let path = backend.path_for(&key);
        let games = backend.root().join("games");
        let relative = path.strip_prefix(&games).unwrap();
        assert!(relative.components().count() > 1);
        for component in relative.components() {
            assert!(component.as_os_str().len() <= NAME_SEGMENT_LEN + ".model".len());
        }

        backend.write(&key, b"long").unwrap();
        assert_eq!(backend.read(&key).unwrap().unwrap(), b"long");
        assert_eq!(backend.keys("games").unwrap(), vec![id]);

        assert!(backend.remove(&key).unwrap());
        assert!(backend.keys("games").unwrap().is_empty());
        assert_eq!(fs::read_dir(&games).unwrap().count(), 0);
    }

    #[test]
    fn short_and_long_identifiers_share_a_collection() {
        let dir = TempDir::new().unwrap();
        let backend = open_in(&dir);
        let long = "z".repeat(300);
        backend.write(&ModelKey::new("games", "g1"), b"1").unwrap();
        backend.write(&ModelKey::new("games", long.clone()), b"2").unwrap();

        let mut expected = vec!["g1".to_string(), long];
        expected.sort();
        assert_eq!(backend.keys("games").unwrap(), expected);
    }

    #[test]
    fn custom_extension() {
        let dir = TempDir::new().unwrap();
        let config = FileArchiveConfig::new(dir.path()).with_extension("json").sync(false);
        let backend = FileArchiveBackend::open(&config).unwrap();
        let key = ModelKey::new("games", "g1");
        backend.write(&key, b"{}").unwrap();
        assert!(backend.path_for(&key).to_string_lossy().ends_with(".json"));
        assert_eq!(backend.keys("games").unwrap(), vec!["g1"]);
    }
}
