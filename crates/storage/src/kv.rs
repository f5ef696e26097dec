//! Key-value store for device preferences
//!
//! This module provides a small, type-safe key-value store on top of sled,
//! a device-scoped view over it, and the [`PreferenceStore`] seam that the
//! theme engine persists the active theme key through.

use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use sled::Db;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Key-value store error types
#[derive(Debug, Error)]
pub enum KvError {
    /// Sled database error
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage is not available (disabled, full, or closed)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for key-value operations
pub type Result<T> = std::result::Result<T, KvError>;

/// Key-value store configuration
#[derive(Debug, Clone)]
pub struct KvConfig {
    /// Database path
    pub path: String,
    /// Cache capacity in bytes
    pub cache_capacity: u64,
    /// Enable compression
    pub use_compression: bool,
    /// Flush interval in milliseconds (None for immediate flush)
    pub flush_every_ms: Option<u64>,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            path: "presence_kv.db".to_string(),
            cache_capacity: 8 * 1024 * 1024, // 8MB
            use_compression: true,
            flush_every_ms: Some(500),
        }
    }
}

impl KvConfig {
    /// Create a new configuration with a custom path
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    /// Set cache capacity in bytes
    pub fn cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity = bytes;
        self
    }

    /// Enable or disable compression
    pub fn use_compression(mut self, enabled: bool) -> Self {
        self.use_compression = enabled;
        self
    }

    /// Set flush interval in milliseconds
    pub fn flush_every_ms(mut self, ms: Option<u64>) -> Self {
        self.flush_every_ms = ms;
        self
    }
}

/// Key-value store implementation
pub struct KvStore {
    db: Arc<Db>,
    separator: &'static str,
}

impl KvStore {
    /// Create a new key-value store with configuration
    pub fn new(config: KvConfig) -> Result<Self> {
        let mut db_config = sled::Config::new()
            .path(&config.path)
            .cache_capacity(config.cache_capacity)
            .use_compression(config.use_compression);

        if let Some(ms) = config.flush_every_ms {
            db_config = db_config.flush_every_ms(Some(ms));
        }

        let db = db_config.open()?;
        tracing::debug!(path = %config.path, "opened key-value store");

        Ok(Self { db: Arc::new(db), separator: ":" })
    }

    /// Create an in-memory key-value store (for testing)
    pub fn in_memory() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;

        Ok(Self { db: Arc::new(db), separator: ":" })
    }

    /// Get a value by key
    pub fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.db.get(key.as_bytes())? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Get a value by scoped key (e.g., ["device", "presence-theme"])
    pub fn get_scoped<T>(&self, scopes: &[&str]) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let key = scopes.join(self.separator);
        self.get(&key)
    }

    /// Set a value by key
    pub fn set<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.db.insert(key.as_bytes(), bytes)?;
        Ok(())
    }

    /// Set a value by scoped key
    pub fn set_scoped<T>(&self, scopes: &[&str], value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let key = scopes.join(self.separator);
        self.set(&key, value)
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

/// Durable string preferences keyed by a fixed name
///
/// The theme engine is the only writer of the persisted theme key; it goes
/// through this trait so tests can swap in an in-memory or failing store.
pub trait PreferenceStore: Send + Sync {
    /// Read a stored preference, `None` when it was never written
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Write a preference, replacing any previous value
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// Scoped key-value store for device-level settings
///
/// Preferences here are local to the device and never synced.
pub struct DeviceStore {
    kv: Arc<KvStore>,
}

impl DeviceStore {
    /// Create a new device store
    pub fn new(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }

    /// Get a device-level value
    pub fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        self.kv.get_scoped(&["device", key])
    }

    /// Set a device-level value
    pub fn set<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        self.kv.set_scoped(&["device", key], value)
    }
}

impl PreferenceStore for DeviceStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.get(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.set(key, &value)?;
        // Preferences are written rarely; make them durable right away.
        self.kv.flush()
    }
}

/// Volatile preference store, used for tests and for sessions without disk
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with one preference
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.values.write().insert(key.into(), value.into());
        store
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        name: String,
        count: i32,
    }

    #[test]
    fn test_set_and_get_struct() {
        let kv = KvStore::in_memory().unwrap();

        let data = TestData { name: "emerald".to_string(), count: 1 };
        kv.set("theme", &data).unwrap();

        let retrieved: Option<TestData> = kv.get("theme").unwrap();
        assert_eq!(retrieved, Some(data));
    }

    #[test]
    fn test_get_nonexistent() {
        let kv = KvStore::in_memory().unwrap();
        let value: Option<String> = kv.get("nonexistent").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_scoped_keys_are_joined() {
        let kv = KvStore::in_memory().unwrap();

        kv.set_scoped(&["device", "presence-theme"], &"sunset".to_string())
            .unwrap();

        let raw: Option<String> = kv.get("device:presence-theme").unwrap();
        assert_eq!(raw, Some("sunset".to_string()));
    }

    #[test]
    fn test_device_store_preferences() {
        let kv = Arc::new(KvStore::in_memory().unwrap());
        let device = DeviceStore::new(kv);

        assert_eq!(device.load("presence-theme").unwrap(), None);

        device.save("presence-theme", "midnight").unwrap();
        assert_eq!(device.load("presence-theme").unwrap(), Some("midnight".to_string()));

        device.save("presence-theme", "storm").unwrap();
        assert_eq!(device.load("presence-theme").unwrap(), Some("storm".to_string()));
    }

    #[test]
    fn test_device_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.db").to_string_lossy().to_string();

        {
            let kv = Arc::new(KvStore::new(KvConfig::new(&path).flush_every_ms(None)).unwrap());
            DeviceStore::new(kv).save("presence-theme", "sepia").unwrap();
        }

        let kv = Arc::new(KvStore::new(KvConfig::new(&path).flush_every_ms(None)).unwrap());
        let device = DeviceStore::new(kv);
        assert_eq!(device.load("presence-theme").unwrap(), Some("sepia".to_string()));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryPreferenceStore::with_value("presence-theme", "coral");
        assert_eq!(store.load("presence-theme").unwrap(), Some("coral".to_string()));
        assert_eq!(store.load("other").unwrap(), None);

        store.save("presence-theme", "maya").unwrap();
        assert_eq!(store.load("presence-theme").unwrap(), Some("maya".to_string()));
    }

    #[test]
    fn test_config_builder() {
        let config = KvConfig::new("test.db")
            .cache_capacity(1024)
            .use_compression(false)
            .flush_every_ms(None);

        assert_eq!(config.path, "test.db");
        assert_eq!(config.cache_capacity, 1024);
        assert!(!config.use_compression);
        assert_eq!(config.flush_every_ms, None);
    }
}
