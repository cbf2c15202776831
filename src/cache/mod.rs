//! Client-local key-value cache holding the slot snapshot.
//!
//! Values are opaque bytes under string keys. Every write replaces the
//! whole value; there are no partial updates.

mod file;
mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

use crate::error::Result;
use std::sync::Arc;

/// A flat key-value store.
pub trait KeyValueCache: Send + Sync {
    /// Read the value under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Overwrite the value under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key`. Returns whether it existed.
    fn remove(&self, key: &str) -> Result<bool>;
}

impl<C: KeyValueCache + ?Sized> KeyValueCache for Arc<C> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }
}

impl<C: KeyValueCache + ?Sized> KeyValueCache for Box<C> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }
}
