//! Persisted session storage
//!
//! The session is three string keys in a [`KeyValueStore`]. [`SessionStore`]
//! is the typed handle the rest of the client uses; it is cheap to clone and
//! every clone sees the same backend.

use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use common::models::{TokenResponse, User};
use thiserror::Error;
use tracing::{debug, warn};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "user";

/// Backend failures
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String key/value backend for the session
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Process-local store; the session ends with the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        read_lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        write_lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        write_lock(&self.entries).remove(key);
        Ok(())
    }
}

/// JSON object on disk, rewritten atomically on every change
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`; a missing file is an empty session
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => HashMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened session file {}", path.display());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        read_lock(&self.entries).get(key).cloned()
    }

    // Memory only changes once the file has been rewritten.
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = write_lock(&self.entries);
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = write_lock(&self.entries);
        let mut next = entries.clone();
        if next.remove(key).is_some() {
            self.persist(&next)?;
            *entries = next;
        }
        Ok(())
    }
}

/// Typed handle over the three session keys
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn file(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self::new(Arc::new(FileStore::open(path)?)))
    }

    pub fn access_token(&self) -> Option<String> {
        self.backend.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.backend.get(REFRESH_TOKEN_KEY)
    }

    /// Cached profile; `None` when absent or unparsable
    pub fn user(&self) -> Option<User> {
        let raw = self.backend.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Ignoring unparsable cached user: {}", e);
                None
            }
        }
    }

    /// Store a token pair; the refresh token is written first so a stored
    /// access token always has its refresh token
    pub fn save_tokens(&self, tokens: &TokenResponse) -> StorageResult<()> {
        self.backend.set(REFRESH_TOKEN_KEY, &tokens.refresh_token)?;
        self.backend.set(ACCESS_TOKEN_KEY, &tokens.access_token)
    }

    pub fn save_user(&self, user: &User) -> StorageResult<()> {
        self.backend.set(USER_KEY, &serde_json::to_string(user)?)
    }

    /// Remove every session key, access token first
    pub fn clear(&self) -> StorageResult<()> {
        self.backend.remove(ACCESS_TOKEN_KEY)?;
        self.backend.remove(REFRESH_TOKEN_KEY)?;
        self.backend.remove(USER_KEY)
    }

    /// Presence of an access token; freshness is not checked
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Raw value of a session key
    pub fn get(&self, key: &str) -> Option<String> {
        self.backend.get(key)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tokens() -> TokenResponse {
        TokenResponse {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            token_type: "bearer".to_string(),
        }
    }

    fn user() -> User {
        User {
            user_id: "1".to_string(),
            username: "johndoe".to_string(),
            email: "john@example.com".to_string(),
            full_name: None,
            bio: None,
            profile_picture: None,
            is_active: true,
            is_superuser: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_tokens_round_trip_and_clear() {
        let store = SessionStore::in_memory();
        assert!(!store.is_authenticated());

        store.save_tokens(&tokens()).unwrap();
        store.save_user(&user()).unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.refresh_token().as_deref(), Some("refresh"));
        assert_eq!(store.user().map(|u| u.username), Some("johndoe".to_string()));

        store.clear().unwrap();
        assert!(!store.is_authenticated());
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            assert_eq!(store.get(key), None);
        }
    }

    #[test]
    fn test_unparsable_user_is_none() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(USER_KEY, "{not json").unwrap();
        let store = SessionStore::new(backend);
        assert!(store.user().is_none());
    }

    /// Records write order
    #[derive(Default)]
    struct Recording {
        inner: MemoryStore,
        writes: RwLock<Vec<String>>,
    }

    impl KeyValueStore for Recording {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            write_lock(&self.writes).push(key.to_string());
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_refresh_token_written_before_access_token() {
        let backend = Arc::new(Recording::default());
        let store = SessionStore::new(backend.clone());
        store.save_tokens(&tokens()).unwrap();

        assert_eq!(
            *read_lock(&backend.writes),
            vec![REFRESH_TOKEN_KEY.to_string(), ACCESS_TOKEN_KEY.to_string()]
        );
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = SessionStore::file(&path).unwrap();
        store.save_tokens(&tokens()).unwrap();

        let reopened = SessionStore::file(&path).unwrap();
        assert_eq!(reopened.access_token().as_deref(), Some("access"));

        reopened.clear().unwrap();
        let reopened = SessionStore::file(&path).unwrap();
        assert!(!reopened.is_authenticated());
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        let store = FileStore::open(blocker.join("session.json")).unwrap();

        // a plain file where the parent directory should be
        fs::write(&blocker, "").unwrap();

        assert!(matches!(
            store.set(ACCESS_TOKEN_KEY, "access"),
            Err(StorageError::Io(_))
        ));
        assert_eq!(store.get(ACCESS_TOKEN_KEY), None);
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileStore::open(&path),
            Err(StorageError::Format(_))
        ));
    }
}
