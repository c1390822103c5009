use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to prepare store directory {path}: {source}", path = path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write store {path}: {source}", path = path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode store payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Namespaced string entries persisted as one JSON object file.
///
/// - reads are tolerant: a missing or unparseable file reads as empty
/// - every read refreshes from disk, so separate instances see each other's writes
/// - writes merge only the touched key into the on-disk object and replace the
///   file by rename, so readers see the old or the new file, never a partial one
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<String> {
        read_json_object(&self.path)?
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut on_disk = read_json_object(&self.path).unwrap_or_default();
        if on_disk.get(key).and_then(Value::as_str) == Some(value) {
            return Ok(());
        }
        on_disk.insert(key.to_string(), Value::String(value.to_string()));
        write_json_object(&self.path, &on_disk)
    }

    /// Removes `key`. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let Some(mut on_disk) = read_json_object(&self.path) else {
            return Ok(());
        };
        if on_disk.remove(key).is_none() {
            return Ok(());
        }
        write_json_object(&self.path, &on_disk)
    }
}

fn read_json_object(path: &Path) -> Option<Map<String, Value>> {
    let raw = std::fs::read_to_string(path).ok()?;
    let parsed: Value = serde_json::from_str(&raw).ok()?;
    parsed.as_object().cloned()
}

fn write_json_object(path: &Path, payload: &Map<String, Value>) -> Result<(), StoreError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(|source| StoreError::CreateDir {
        path: parent.clone(),
        source,
    })?;

    let body = serde_json::to_string_pretty(&Value::Object(payload.clone()))?;
    let write_err = |source: std::io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut staged = NamedTempFile::new_in(&parent).map_err(write_err)?;
    staged.write_all(body.as_bytes()).map_err(write_err)?;
    staged.flush().map_err(write_err)?;
    staged.persist(path).map_err(|err| write_err(err.error))?;
    Ok(())
}
