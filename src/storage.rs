use parking_lot::RwLock;
use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

/// StorageError
///
/// Failures raised by a session storage backend. The AuthGate never lets these escape from a
/// read; writes report them so the HTTP layer can answer with a 500.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("mock storage error: simulation requested")]
    Simulated,
}

// 1. SessionStorage Contract
/// SessionStorage
///
/// Key-value port behind which the persisted session lives. Implementations are swapped
/// without touching the AuthGate: `MemoryStorage` in tests and local runs, `FileStorage`
/// on a single host, `ScopedStorage` to partition one backend per client.
///
/// Every call is synchronous and replaces whole values; there are no partial updates.
pub trait SessionStorage: Send + Sync {
    /// Returns the raw value stored under `key`, or `None` when nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// StorageState
///
/// The concrete type used to share session storage across the application state.
pub type StorageState = Arc<dyn SessionStorage>;

// 2. The File Implementation
/// FileStorage
///
/// Persists each key as a JSON document under a root directory. Keys containing `/` map to
/// nested directories, so scoped keys (`<scope>/auth`) land in one directory per client.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Opens (and creates when missing) the storage root.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let sanitized = sanitize_key(key);
        let relative = if sanitized.is_empty() {
            "_".to_string()
        } else {
            sanitized
        };
        self.root.join(format!("{}.json", relative))
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a reader never observes a half-written session.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// sanitize_key
///
/// Removes directory navigation components (`..`, `.`) and empty segments from a key so a
/// crafted scope can never escape the storage root.
pub fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

// 3. Scoped view over another backend
/// ScopedStorage
///
/// Prefixes every key with a client scope, giving each client its own live session on top of
/// a shared backend.
pub struct ScopedStorage {
    inner: StorageState,
    scope: String,
}

impl ScopedStorage {
    pub fn new(inner: StorageState, scope: impl Into<String>) -> Self {
        Self {
            inner,
            scope: scope.into(),
        }
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}/{}", self.scope, key)
    }
}

impl SessionStorage for ScopedStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(&self.scoped(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(&self.scoped(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(&self.scoped(key))
    }
}

// 4. The In-Memory Implementation (tests and local runs)
/// MemoryStorage
///
/// In-process key-value map. `new_failing` builds an instance whose every call fails, used to
/// exercise the AuthGate's recovery paths.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            should_fail: true,
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.should_fail {
            return Err(StorageError::Simulated);
        }
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError::Simulated);
        }
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError::Simulated);
        }
        self.entries.write().remove(key);
        Ok(())
    }
}
