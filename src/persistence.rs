//! JSON persistence behind a small key-value interface.
//!
//! Save data lives in `~/.flappy-snake/<key>.json`. The [`KvStore`] trait
//! keeps the game logic independent of the filesystem so tests run against
//! an in-memory fake.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Minimal key-value persistence interface.
pub trait KvStore {
    /// Read the raw value for a key, if present.
    fn get(&self, key: &str) -> Option<String>;
    /// Write the raw value for a key.
    fn put(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// Filesystem-backed store; each key maps to `<dir>/<key>.json`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the default store in `~/.flappy-snake/`, creating it if needed.
    pub fn open() -> io::Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine home directory",
            )
        })?;
        Self::at(home_dir.join(".flappy-snake"))
    }

    /// Open a store rooted at an explicit directory.
    pub fn at(dir: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn put(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::write(self.path_for(key), value)
    }
}

/// In-memory store for tests and headless simulation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Load a JSON value from the store, returning `T::default()` if the key is
/// missing or the payload no longer parses.
pub fn load_json_or_default<T: Default + serde::de::DeserializeOwned>(
    store: &dyn KvStore,
    key: &str,
) -> T {
    match store.get(key) {
        Some(json) => serde_json::from_str(&json).unwrap_or_default(),
        None => T::default(),
    }
}

/// Save a value as pretty-printed JSON under the given key.
pub fn save_json<T: serde::Serialize>(
    store: &mut dyn KvStore,
    key: &str,
    value: &T,
) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    store.put(key, &json)
}
