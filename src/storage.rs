//! # Key-Value Persistence
//!
//! Storage for the user state that survives between sessions: the recipe
//! selections and the checked shopping list items.
//!
//! Store backends implement [`KeyValueStore`] over raw strings and report
//! failures as [`StorageError`]. Callers go through the typed helpers
//! ([`get_from_storage`], [`set_to_storage`], [`remove_from_storage`]) which
//! encode values as JSON and never surface a failure: reads fall back to the
//! supplied default, writes and removals are logged and dropped.

use log::{debug, error, info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Keys under which user state is stored
pub struct StorageKeys;

impl StorageKeys {
    pub const RECIPE_SELECTIONS: &'static str = "recipe-selections";
    pub const CHECKED_ITEMS: &'static str = "checked-items";
}

/// Errors raised by store backends
#[derive(Debug, Clone)]
pub enum StorageError {
    /// The backend could not read or write
    Backend(String),
    /// A value could not be encoded or decoded
    Serialization(String),
    /// The store is no longer usable (e.g., a poisoned lock)
    Unavailable(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Backend(msg) => write!(f, "Storage backend error: {msg}"),
            StorageError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            StorageError::Unavailable(msg) => write!(f, "Storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// A string-to-string store
pub trait KeyValueStore {
    /// Read the raw value stored under `key`
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`; deleting a missing key is not an error
    fn remove_raw(&self, key: &str) -> Result<(), StorageError>;
}

/// Read a JSON value, returning `default` when it is missing or unreadable
pub fn get_from_storage<T, S>(store: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get_raw(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No stored value for '{}', using default", key);
            return default;
        }
        Err(e) => {
            warn!("Failed to read '{}' from storage: {}", key, e);
            return default;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Ignoring malformed stored value for '{}': {}", key, e);
            default
        }
    }
}

/// Write a value as JSON; failures are logged and swallowed
pub fn set_to_storage<T, S>(store: &S, key: &str, value: &T)
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let result = serde_json::to_string(value)
        .map_err(StorageError::from)
        .and_then(|raw| store.set_raw(key, &raw));

    if let Err(e) = result {
        error!("Failed to save to storage: {} ({})", key, e);
    }
}

/// Remove a value; failures are logged and swallowed
pub fn remove_from_storage<S>(store: &S, key: &str)
where
    S: KeyValueStore + ?Sized,
{
    if let Err(e) = store.remove_raw(key) {
        error!("Failed to remove from storage: {} ({})", key, e);
    }
}

/// In-process store, used for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.values
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// SQLite-backed store, one row per key
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file and make sure the schema exists
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        info!("Opening key-value store at: {}", path.display());
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Store living only for the lifetime of the connection
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        init_store_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Create the key-value table if it does not exist yet
pub fn init_store_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;
    debug!("Key-value store schema ready");
    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        debug!("Stored value for '{}'", key);
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::NamedTempFile;

    /// Store whose every operation fails
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get_raw(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Backend("disk on fire".to_string()))
        }

        fn set_raw(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("quota exceeded".to_string()))
        }

        fn remove_raw(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("read-only".to_string()))
        }
    }

    #[test]
    fn test_missing_key_returns_default() {
        let store = MemoryStore::new();
        let value: Vec<String> = get_from_storage(&store, "nope", vec!["x".to_string()]);
        assert_eq!(value, vec!["x".to_string()]);
    }

    #[test]
    fn test_round_trip_through_memory_store() {
        let store = MemoryStore::new();
        set_to_storage(&store, StorageKeys::CHECKED_ITEMS, &vec!["a", "b"]);
        let value: Vec<String> = get_from_storage(&store, StorageKeys::CHECKED_ITEMS, Vec::new());
        assert_eq!(value, vec!["a", "b"]);
    }

    #[test]
    fn test_malformed_value_returns_default() {
        let store = MemoryStore::new();
        store.set_raw("bad", "{not json").unwrap();
        let value: Vec<u32> = get_from_storage(&store, "bad", vec![7]);
        assert_eq!(value, vec![7]);
    }

    #[test]
    fn test_wrong_shape_returns_default() {
        let store = MemoryStore::new();
        store.set_raw("shape", r#"{"a": 1}"#).unwrap();
        let value: Vec<u32> = get_from_storage(&store, "shape", Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn test_failures_are_swallowed() {
        let store = BrokenStore;
        let value: u32 = get_from_storage(&store, "k", 42);
        assert_eq!(value, 42);

        set_to_storage(&store, "k", &1);
        remove_from_storage(&store, "k");
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();
        set_to_storage(&store, "k", &1);
        remove_from_storage(&store, "k");
        assert_eq!(store.get_raw("k").unwrap(), None);

        // removing again is fine
        remove_from_storage(&store, "k");
    }

    #[test]
    fn test_sqlite_store_persists_across_connections() -> Result<()> {
        let temp_file = NamedTempFile::new()?;

        {
            let store = SqliteStore::open(temp_file.path())?;
            set_to_storage(&store, "greeting", &"hello");
            set_to_storage(&store, "greeting", &"bonjour");
        }

        let store = SqliteStore::open(temp_file.path())?;
        let value: String = get_from_storage(&store, "greeting", String::new());
        assert_eq!(value, "bonjour");

        store.remove_raw("greeting")?;
        assert_eq!(store.get_raw("greeting")?, None);
        Ok(())
    }

    #[test]
    fn test_sqlite_in_memory() -> Result<()> {
        let store = SqliteStore::open_in_memory()?;
        assert_eq!(store.get_raw("missing")?, None);
        store.set_raw("k", "[1,2]")?;
        let value: Vec<u8> = get_from_storage(&store, "k", Vec::new());
        assert_eq!(value, vec![1, 2]);
        Ok(())
    }
}
