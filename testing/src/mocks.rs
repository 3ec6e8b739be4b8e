//! Storage doubles for fast, deterministic tests.
//!
//! - [`InMemoryStorage`]: `HashMap`-backed key-value storage
//! - [`FailingStorage`]: wraps an [`InMemoryStorage`] and can be switched to
//!   reject writes, simulating an exhausted quota

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use todomvc_core::storage::{KeyValueStorage, Result, StorageError};

/// In-memory key-value storage.
///
/// # Example
///
/// ```
/// use todomvc_core::KeyValueStorage;
/// use todomvc_testing::InMemoryStorage;
///
/// let storage = InMemoryStorage::new();
/// storage.set_item("todos", "[]").unwrap();
///
/// assert_eq!(storage.raw("todos").as_deref(), Some("[]"));
/// assert_eq!(storage.write_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    data: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
}

impl InMemoryStorage {
    /// Create an empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with one value (not counted as a write)
    #[must_use]
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        storage
    }

    /// The raw value currently stored under `key`
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.data.borrow().get(key).cloned()
    }

    /// Number of successful `set_item` calls
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Whether `key` holds a value
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.borrow().contains_key(key)
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.data.borrow_mut().remove(key);
        Ok(())
    }
}

/// Storage whose writes can be made to fail.
///
/// Reads always succeed. While failing, `set_item` returns
/// [`StorageError::QuotaExceeded`] and leaves the stored value untouched.
#[derive(Debug, Default)]
pub struct FailingStorage {
    inner: InMemoryStorage,
    failing: Cell<bool>,
    rejected: Cell<usize>,
}

impl FailingStorage {
    /// Storage that accepts writes until [`FailingStorage::fail_writes`] is called
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects every write from the start
    #[must_use]
    pub fn always() -> Self {
        let storage = Self::new();
        storage.fail_writes(true);
        storage
    }

    /// Switch write failures on or off
    pub fn fail_writes(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// Number of rejected writes
    #[must_use]
    pub fn rejected_count(&self) -> usize {
        self.rejected.get()
    }

    /// The wrapped storage
    #[must_use]
    pub const fn inner(&self) -> &InMemoryStorage {
        &self.inner
    }
}

impl KeyValueStorage for FailingStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if self.failing.get() {
            self.rejected.set(self.rejected.get() + 1);
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                bytes: value.len(),
            });
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.inner.remove_item(key)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn in_memory_round_trip() {
        let storage = InMemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);

        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));

        storage.remove_item("k").unwrap();
        assert!(!storage.contains_key("k"));
    }

    #[test]
    fn with_item_is_not_a_write() {
        let storage = InMemoryStorage::with_item("k", "v");
        assert_eq!(storage.write_count(), 0);
        assert_eq!(storage.raw("k").as_deref(), Some("v"));
    }

    #[test]
    fn failing_storage_rejects_and_preserves_value() {
        let storage = FailingStorage::new();
        storage.set_item("k", "first").unwrap();

        storage.fail_writes(true);
        let error = storage.set_item("k", "second").unwrap_err();
        assert!(matches!(error, StorageError::QuotaExceeded { bytes: 6, .. }));

        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("first"));
        assert_eq!(storage.rejected_count(), 1);
    }
}
