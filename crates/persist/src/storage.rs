//! Storage module - "load bytes / store bytes" behind a trait
//!
//! Paths are `/`-separated and relative to the storage root. The persistence
//! layer never touches the filesystem directly, so sessions can run against
//! [`MemoryStorage`] in tests and headless runs.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StorageError;

pub trait Storage {
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Write the whole file, creating parent directories as needed
    fn write(&mut self, path: &str, bytes: &[u8]) -> Result<(), StorageError>;

    fn remove(&mut self, path: &str) -> Result<(), StorageError>;

    fn rename(&mut self, from: &str, to: &str) -> Result<(), StorageError>;

    /// File names (not paths) directly inside `dir`; a missing dir is empty
    fn list(&self, dir: &str) -> Result<Vec<String>, StorageError>;

    fn exists(&self, path: &str) -> bool;
}

/// Disk-backed storage rooted at a directory
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }

    fn map_err(path: &str, full: PathBuf, source: io::Error) -> StorageError {
        if source.kind() == io::ErrorKind::NotFound {
            StorageError::NotFound {
                path: path.to_string(),
            }
        } else {
            StorageError::Io { path: full, source }
        }
    }
}

impl Storage for FsStorage {
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full = self.resolve(path);
        fs::read(&full).map_err(|e| Self::map_err(path, full, e))
    }

    fn write(&mut self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&full, bytes).map_err(|e| Self::map_err(path, full, e))?;
        debug!(path, bytes = bytes.len(), "wrote file");
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<(), StorageError> {
        let full = self.resolve(path);
        fs::remove_file(&full).map_err(|e| Self::map_err(path, full, e))
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), StorageError> {
        let src = self.resolve(from);
        let dst = self.resolve(to);
        fs::rename(&src, &dst).map_err(|e| Self::map_err(from, src, e))
    }

    fn list(&self, dir: &str) -> Result<Vec<String>, StorageError> {
        let full = self.resolve(dir);
        let entries = match fs::read_dir(&full) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StorageError::Io { path: full, source }),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StorageError::Io {
                path: full.clone(),
                source,
            })?;
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }
}

/// In-memory storage keyed by path
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    fn not_found(path: &str) -> StorageError {
        StorageError::NotFound {
            path: path.to_string(),
        }
    }
}

impl Storage for MemoryStorage {
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found(path))
    }

    fn write(&mut self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.files.insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<(), StorageError> {
        self.files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(path))
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), StorageError> {
        let bytes = self.files.remove(from).ok_or_else(|| Self::not_found(from))?;
        self.files.insert(to.to_string(), bytes);
        Ok(())
    }

    fn list(&self, dir: &str) -> Result<Vec<String>, StorageError> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        Ok(self
            .files
            .keys()
            .filter_map(|path| path.strip_prefix(&prefix))
            .filter(|name| !name.contains('/'))
            .map(str::to_string)
            .collect())
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}
