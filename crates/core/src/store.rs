//! Blob stores
//!
//! Whole-value key/string storage standing in for browser local storage.
//! Callers serialize to JSON themselves; a write always replaces the previous
//! value for the key, and there is no locking between processes sharing a
//! [`FileStore`] directory (last write wins).

use std::{
    cell::RefCell,
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};

use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::warn;

/// Errors raised by blob store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Value could not be serialized
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Key contains characters that cannot be stored
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A key-value store of whole string values.
///
/// All methods take `&self`; backends that keep state in memory use interior
/// mutability so that several owners can share one store.
pub trait BlobStore: Debug {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be written.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be written.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: BlobStore + ?Sized> BlobStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}

impl<T: BlobStore + ?Sized> BlobStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}

/// In-memory store, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<FxHashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    /// Whether no keys are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.values.borrow_mut().remove(key);

        Ok(())
    }
}

/// Memory store whose writes can be made to fail.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingStore {
    inner: MemoryStore,
    fail_writes: std::cell::Cell<bool>,
}

#[cfg(test)]
impl FailingStore {
    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(io::Error::other("disk full").into());
        }

        Ok(())
    }
}

#[cfg(test)]
impl BlobStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_writable()?;

        self.inner.put(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.check_writable()?;

        self.inner.delete(key)
    }
}

/// Directory-backed store keeping one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();

        fs::create_dir_all(&root)?;

        Ok(Self { root })
    }

    /// Directory holding the value files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }

        Ok(self.root.join(format!("{key}.json")))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::write(self.path_for(key)?, value)?;

        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// Read and decode a JSON value, falling back to the default when the key is
/// absent, unreadable or does not decode.
pub fn load_json_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: BlobStore + ?Sized,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(error) => {
            warn!(key, %error, "failed to read stored value, using empty default");

            return T::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|error| {
        warn!(key, %error, "malformed stored value, using empty default");

        T::default()
    })
}

/// Encode a value as JSON and replace the stored value.
///
/// # Errors
///
/// Returns a [`StoreError`] if encoding or writing fails.
pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: BlobStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;

    store.put(key, &raw)
}
