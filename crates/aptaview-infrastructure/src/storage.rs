//! Atomic TOML persistence.
//!
//! Values are written to a temporary file in the target directory and
//! renamed into place, so readers never observe a half-written file.
//! Cross-process mutations go through [`TomlStore::lock`].

use std::fs::{self, File};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use aptaview_core::error::{AptaError, Result};

/// A single TOML file holding one serializable value.
pub struct TomlStore<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> TomlStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored value. A missing or empty file yields `None`.
    pub fn load(&self) -> Result<Option<T>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(toml::from_str(&content)?))
    }

    /// Serializes the value and atomically replaces the file.
    pub fn save(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(value)?;
        let tmp_path = self.tmp_path();

        let mut file = File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &self.path)?;
        tracing::debug!("Saved {}", self.path.display());
        Ok(())
    }

    /// Deletes the file. Already-absent files are not an error.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Removed {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Takes the exclusive cross-process lock guarding this file.
    ///
    /// Hold the returned guard across a load/save (or load/remove)
    /// pair to keep concurrent processes from interleaving.
    pub fn lock(&self) -> Result<StoreLock> {
        StoreLock::acquire(self.path.with_extension("lock"))
    }

    fn tmp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "store".to_string());
        self.path.with_file_name(format!(".{file_name}.tmp"))
    }
}

/// Exclusive advisory lock on a sidecar `.lock` file.
///
/// Released on drop; the sidecar file is removed best-effort.
pub struct StoreLock {
    _file: File,
    path: PathBuf,
}

impl StoreLock {
    fn acquire(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(&path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| AptaError::io(format!("cannot lock {}: {}", path.display(), e)))?;
        }

        Ok(Self { _file: file, path })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
