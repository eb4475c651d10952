//! Durable session storage trait.

use crate::error::Result;

/// String key-value store that survives restarts.
///
/// Writers replace values wholesale; there are no partial updates and a
/// single writer is assumed.
pub trait SessionStorage: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if the backing store cannot be read and
    /// `AdminError::StorageCorrupted` if it cannot be parsed.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<()>;
}
