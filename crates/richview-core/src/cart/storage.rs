//! Durable backends for [`super::CartStore`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::CartError;

/// Key/value persistence for the serialized cart, modelled on browser local
/// storage: one string under one fixed key.
pub trait CartStorage {
    /// Returns the stored value, or `None` when nothing has been written yet.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Io`] if the backing store exists but cannot be read.
    fn read(&self) -> Result<Option<String>, CartError>;

    /// Replaces the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Io`] if the value cannot be written.
    fn write(&mut self, contents: &str) -> Result<(), CartError>;
}

/// Stores the cart as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileCartStorage {
    path: PathBuf,
}

impl FileCartStorage {
    /// Storage for the default [`super::CART_STORAGE_KEY`] under `dir`.
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self::with_key(dir, super::CART_STORAGE_KEY)
    }

    #[must_use]
    pub fn with_key(dir: &Path, key: &str) -> Self {
        Self {
            path: dir.join(format!("{key}.json")),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> CartError {
        CartError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl CartStorage for FileCartStorage {
    fn read(&self) -> Result<Option<String>, CartError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), CartError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        // Write-then-rename so a crash mid-write never leaves a truncated cart.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

/// In-process storage, used by tests and by callers that do not want
/// persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    contents: Option<String>,
    writes: usize,
}

impl MemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the storage with previously persisted content.
    #[must_use]
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
            writes: 0,
        }
    }

    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Number of writes performed since construction.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl CartStorage for MemoryCartStorage {
    fn read(&self) -> Result<Option<String>, CartError> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, contents: &str) -> Result<(), CartError> {
        self.contents = Some(contents.to_owned());
        self.writes += 1;
        Ok(())
    }
}
