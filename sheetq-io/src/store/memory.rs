//! In-memory object store with injectable failures

use super::{ObjectStore, StoreError, StoredObject};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

type ObjectKey = (String, String);

/// Object store holding objects and failures in memory
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<ObjectKey, Result<StoredObject, StoreError>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MemoryObjectStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every `get_object` call by `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Store an object
    pub fn put(&self, container: &str, key: &str, object: StoredObject) {
        self.insert(container, key, Ok(object));
    }

    /// Make reads of `key` fail with `error`
    pub fn fail(&self, container: &str, key: &str, error: StoreError) {
        self.insert(container, key, Err(error));
    }

    /// Number of `get_object` calls served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn insert(&self, container: &str, key: &str, entry: Result<StoredObject, StoreError>) {
        let mut objects = match self.objects.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        objects.insert((container.to_string(), key.to_string()), entry);
    }
}

impl ObjectStore for MemoryObjectStore {
    fn get_object(&self, container: &str, key: &str) -> Result<StoredObject, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        let objects = match self.objects.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        objects
            .get(&(container.to_string(), key.to_string()))
            .cloned()
            .unwrap_or_else(|| Err(StoreError::no_such_key(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_and_get() {
        let store = MemoryObjectStore::new();
        store.put("b", "k", StoredObject::new("{}"));
        assert_eq!(store.get_object("b", "k").unwrap().body, "{}");
        assert_eq!(store.calls(), 1);
    }

    #[test]
    fn missing_objects_are_no_such_key() {
        let err = MemoryObjectStore::new().get_object("b", "k").unwrap_err();
        assert_eq!(err.code.as_deref(), Some("NoSuchKey"));
    }

    #[test]
    fn injected_failures_are_returned() {
        let store = MemoryObjectStore::new();
        store.fail("b", "k", StoreError::status(500));
        assert_eq!(store.get_object("b", "k").unwrap_err(), StoreError::status(500));
    }
}
