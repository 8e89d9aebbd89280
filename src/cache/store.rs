//! Disk-backed store for raw API responses
//!
//! Provides a `CacheStore` that maps logical keys ("contracts", a city code)
//! to JSON files under a cache root directory, with age inspection and a
//! recursive purge operation.

use chrono::Utc;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;
use thiserror::Error;

/// One day expressed in milliseconds, the unit of the cache age computation.
const DAY_IN_MILLIS: i64 = 1000 * 60 * 60 * 24;

/// Errors that can occur when accessing the cache store
#[derive(Debug, Error)]
pub enum StoreError {
    /// No cache file exists for the requested key
    #[error("no cache entry for '{0}'")]
    Missing(String),

    /// Underlying filesystem error
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of the current time in milliseconds since the Unix epoch.
///
/// The store measures cache-entry age against this clock, which lets tests
/// advance time without waiting out the TTL.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Default clock backed by the system time
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manages raw response bodies persisted as files on disk
///
/// Each logical key maps to `<root>/<key>.json` containing the raw bytes of
/// the last successfully fetched response for that key. The root is an
/// XDG-compliant cache directory (`~/.cache/bikemee/` on Linux) unless
/// overridden with [`CacheStore::with_dir`].
#[derive(Clone)]
pub struct CacheStore {
    /// Directory where cache files are stored
    root: PathBuf,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    /// Creates a new CacheStore using the platform cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no
    /// home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "bikemee")?;
        Some(Self::with_dir(project_dirs.cache_dir().to_path_buf()))
    }

    /// Creates a new CacheStore rooted at a custom directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_dir(root: PathBuf) -> Self {
        Self {
            root,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for age computations
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path to the cache file for the given key
    fn cache_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    /// Ensures the cache root directory exists
    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.root)
    }

    /// Checks whether a cache file for `key` is present
    pub fn exists(&self, key: &str) -> bool {
        self.cache_path(key).is_file()
    }

    /// Computes the age of the cache file for `key` in whole days
    ///
    /// Elapsed milliseconds since the file was last written, floor-divided by
    /// one day. An entry written 14 days and 23 hours ago therefore still has
    /// an age of 14. Fails with [`StoreError::Missing`] if there is no file;
    /// callers should check [`CacheStore::exists`] first.
    pub fn age_in_days(&self, key: &str) -> Result<i64, StoreError> {
        let path = self.cache_path(key);
        if !path.is_file() {
            return Err(StoreError::Missing(key.to_string()));
        }

        let modified = fs::metadata(&path)?.modified()?;
        let modified_ms = modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        Ok((self.clock.now_ms() - modified_ms) / DAY_IN_MILLIS)
    }

    /// Returns the full content of the cache file for `key`
    pub fn read(&self, key: &str) -> Result<String, StoreError> {
        let path = self.cache_path(key);
        if !path.is_file() {
            return Err(StoreError::Missing(key.to_string()));
        }
        Ok(fs::read_to_string(path)?)
    }

    /// Writes `bytes` as the cache file for `key`, replacing any prior content
    ///
    /// Creates the full cache root hierarchy if absent. The write completes
    /// in full before this returns, so a success notification emitted
    /// afterwards never observes a partial file.
    pub fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.ensure_dir()?;
        fs::write(self.cache_path(key), bytes)?;
        Ok(())
    }

    /// Deletes the cache file for `key` if present
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.cache_path(key);
        if path.is_file() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Recursively deletes everything under the cache root, then the root
    ///
    /// Children are removed before their parents. Stops at the first deletion
    /// failure and returns false, leaving the remaining entries in place.
    /// Returns true when the root is already absent.
    pub fn purge_all(&self) -> bool {
        if !self.root.exists() {
            return true;
        }
        remove_tree(&self.root)
    }
}

/// Depth-first removal of a directory and its contents
///
/// Only actual directories are recursed into; a symlink is deleted as an
/// entry, never followed, so the purge cannot reach outside the cache root.
fn remove_tree(dir: &Path) -> bool {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return false,
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => return false,
        };
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(_) => return false,
        };
        let path = entry.path();

        let removed = if file_type.is_dir() {
            remove_tree(&path)
        } else {
            fs::remove_file(&path).is_ok()
        };

        if !removed {
            return false;
        }
    }

    fs::remove_dir(dir).is_ok()
}
