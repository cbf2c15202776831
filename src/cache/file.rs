//! Directory-backed cache: one file per key.

use super::KeyValueCache;
use crate::error::{CacheError, Result};
use fs2::FileExt;
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension of entry files.
const ENTRY_EXT: &str = "json";

/// Cache storing each key as `<dir>/<key>.json`.
///
/// Holds an exclusive lock on `<dir>/LOCK` while open, so only one process
/// writes snapshots at a time. Writes land in a temporary file that is then
/// renamed over the entry.
pub struct FileCache {
    /// Base directory.
    path: PathBuf,

    /// Lock file for exclusive access.
    _lock_file: File,

    /// Serializes writers within this process.
    write_lock: Mutex<()>,
}

impl FileCache {
    /// Open (creating if needed) a cache rooted at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(&path)?;

        let lock_file = Self::acquire_lock(&path)?;
        debug!(?path, "file cache opened");

        Ok(Self {
            path,
            _lock_file: lock_file,
            write_lock: Mutex::new(()),
        })
    }

    /// Base directory of this cache.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full path of the file backing `key`.
    pub fn entry_path(&self, key: &str) -> Result<PathBuf> {
        Self::validate_key(key)?;
        Ok(self.path.join(format!("{key}.{ENTRY_EXT}")))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.path.join(format!(".{key}.{ENTRY_EXT}.tmp"))
    }

    /// Keys become file names, so only a conservative character set is allowed.
    fn validate_key(key: &str) -> Result<()> {
        let ok = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if ok {
            Ok(())
        } else {
            Err(CacheError::InvalidKey(key.to_string()))
        }
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        let lock_path = path.join("LOCK");
        let lock_file = File::create(lock_path)?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| CacheError::Locked)?;

        Ok(lock_file)
    }
}

impl KeyValueCache for FileCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entry = self.entry_path(key)?;
        match fs::read(&entry) {
            Ok(bytes) => {
                debug!(key, bytes = bytes.len(), "cache entry read");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let entry = self.entry_path(key)?;
        let tmp = self.temp_path(key);
        let _lock = self.write_lock.lock();

        let mut file = File::create(&tmp)?;
        file.write_all(value)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, &entry)?;
        debug!(key, bytes = value.len(), "cache entry written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let entry = self.entry_path(key)?;
        let _lock = self.write_lock.lock();

        match fs::remove_file(&entry) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_and_get() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::open(dir.path().join("cache")).unwrap();

        cache.set("slots", b"[1,2,3]").unwrap();
        assert_eq!(cache.get("slots").unwrap().unwrap(), b"[1,2,3]");
        assert!(cache.path().join("slots.json").exists());
    }

    #[test]
    fn test_missing_key() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::open(dir.path()).unwrap();
        assert!(cache.get("nothing").unwrap().is_none());
    }

    #[test]
    fn test_overwrite_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::open(dir.path()).unwrap();

        cache.set("k", b"first").unwrap();
        cache.set("k", b"second").unwrap();

        assert_eq!(cache.get("k").unwrap().unwrap(), b"second");
        assert!(!cache.temp_path("k").exists());
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::open(dir.path()).unwrap();

        cache.set("k", b"v").unwrap();
        assert!(cache.remove("k").unwrap());
        assert!(!cache.remove("k").unwrap());
        assert!(cache.get("k").unwrap().is_none());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::open(dir.path()).unwrap();

        for key in ["", "../escape", ".hidden", "a/b"] {
            assert!(matches!(cache.get(key), Err(CacheError::InvalidKey(_))));
        }
    }

    #[test]
    fn test_second_open_is_locked() {
        let dir = TempDir::new().unwrap();
        let _first = FileCache::open(dir.path()).unwrap();

        let second = FileCache::open(dir.path());
        assert!(matches!(second, Err(CacheError::Locked)));
    }

    #[test]
    fn test_lock_released_on_drop() {
        let dir = TempDir::new().unwrap();
        drop(FileCache::open(dir.path()).unwrap());
        assert!(FileCache::open(dir.path()).is_ok());
    }
}
