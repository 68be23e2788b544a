//! Directory-backed store: one `<key>.json` file per key.
//!
//! Writes land in a temp file in the same directory and are renamed over the
//! target, so a reader never sees a half-written value. The [`LOCK_FILE`] is
//! held exclusively for the duration of each write.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use tempfile::NamedTempFile;
use tokio::fs;

use super::{validate_key, KvStore, StoreError};

/// Name of the lock file inside the store directory
pub const LOCK_FILE: &str = ".lock";

/// File-based key-value store
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory holding one file per key
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    /// Get the store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn key_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_path(key)?;

        if !path.exists() {
            tracing::debug!(key, "No stored value");
            return Ok(None);
        }

        let bytes = fs::read(&path).await?;
        tracing::debug!(key, bytes = bytes.len(), "Read stored value");

        let value = String::from_utf8(bytes)
            .map_err(|_| StoreError::NotUtf8(key.to_string()))?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.key_path(key)?;
        let dir = self.dir.clone();
        let value = value.to_string();
        let len = value.len();

        tokio::task::spawn_blocking(move || write_replace(&dir, &path, &value))
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))??;

        tracing::debug!(key, bytes = len, "Wrote stored value");
        Ok(())
    }
}

/// Replace `path` with `value` under the directory lock
fn write_replace(dir: &Path, path: &Path, value: &str) -> Result<(), StoreError> {
    let lock = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(dir.join(LOCK_FILE))?;
    lock.lock_exclusive()?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(value.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    // Dropping the handle releases the lock
    drop(lock);
    Ok(())
}
