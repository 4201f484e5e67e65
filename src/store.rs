use crate::error::{Result, StampError};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Keyed byte storage the dispatcher reads sources from and writes
/// transformed artifacts back into.
///
/// The transform itself never touches a store; it only sees byte
/// slices. Implementations decide where the bytes actually live.
pub trait ObjectStore {
    fn get(&self, key: &str) -> Result<Vec<u8>>;
    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<()>;
    /// Remove an object. Deleting a key that does not exist is not an
    /// error; the end state is the same.
    fn delete(&mut self, key: &str) -> Result<()>;
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ObjectStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.objects
            .get(key)
            .cloned()
            .ok_or_else(|| StampError::ObjectNotFound(key.to_string()))
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        self.objects.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.objects.remove(key);
        Ok(())
    }
}

/// Store backed by a directory tree. Keys map to paths relative to the
/// root; keys that try to escape the root are rejected.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|_| StampError::DirectoryCreationFailed(root.clone()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            return Err(StampError::InvalidKey("empty key".to_string()));
        }

        let relative = Path::new(key);
        if relative.is_absolute() {
            return Err(StampError::InvalidKey(format!(
                "absolute path not allowed: {key}"
            )));
        }
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                _ => {
                    return Err(StampError::InvalidKey(format!(
                        "suspicious component in key: {key}"
                    )))
                }
            }
        }

        Ok(self.root.join(relative))
    }
}

impl ObjectStore for FsStore {
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(key)?;
        fs::read(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StampError::ObjectNotFound(key.to_string())
            } else {
                StampError::Io(e)
            }
        })
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|_| StampError::DirectoryCreationFailed(parent.to_path_buf()))?;
        }
        fs::write(&path, bytes)?;
        debug!(key, bytes = bytes.len(), "stored object");
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        let path = self.object_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(key, "deleted object");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StampError::Io(e)),
        }
    }
}
