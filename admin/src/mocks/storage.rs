//! In-memory session storage.

use crate::error::{AdminError, Result};
use crate::providers::SessionStorage;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// [`SessionStorage`] over a shared map.
///
/// Clones share the same map, so a test can keep one clone to inspect what
/// the session manager wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
    unavailable: Arc<Mutex<bool>>,
}

impl MemoryStorage {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with `key = value`.
    #[must_use]
    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Make every operation fail with `AdminError::Storage`.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap_or_else(PoisonError::into_inner) = unavailable;
    }

    /// Raw stored value.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Nothing stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self) -> Result<()> {
        if *self.unavailable.lock().unwrap_or_else(PoisonError::into_inner) {
            Err(AdminError::Storage("storage unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.value(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check()?;
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
