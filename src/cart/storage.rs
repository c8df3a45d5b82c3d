//! Cart persistence
//!
//! The cart is mirrored into a key-value store as a JSON array of lines. The store
//! itself (browser storage, a file, a test double) is supplied by the caller.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::items::LineItem;

/// Errors raised by a key-value store or while (de)serialising a snapshot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The snapshot could not be encoded or decoded.
    #[error("invalid cart snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Keys under which local state is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Cart snapshot
    Cart,

    /// Auth token
    AuthToken,

    /// Whether the push notification prompt was dismissed
    NotificationPromptDismissed,
}

impl StorageKey {
    /// The key as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StorageKey::Cart => "cart",
            StorageKey::AuthToken => "auth_token",
            StorageKey::NotificationPromptDismissed => "notification_prompt_dismissed",
        }
    }
}

/// A string key-value store.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read.
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be written.
    fn set(&mut self, key: StorageKey, value: String) -> Result<(), StorageError>;

    /// Remove any value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be written.
    fn remove(&mut self, key: StorageKey) -> Result<(), StorageError>;
}

/// In-memory store, used when no persistent store is available and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: FxHashMap<StorageKey, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(&key).cloned())
    }

    fn set(&mut self, key: StorageKey, value: String) -> Result<(), StorageError> {
        self.values.insert(key, value);

        Ok(())
    }

    fn remove(&mut self, key: StorageKey) -> Result<(), StorageError> {
        self.values.remove(&key);

        Ok(())
    }
}

/// Write the cart lines to the store.
///
/// # Errors
///
/// Returns a [`StorageError`] if encoding or writing fails.
pub fn save_snapshot<S: KeyValueStore + ?Sized>(
    store: &mut S,
    items: &[LineItem],
) -> Result<(), StorageError> {
    let json = serde_json::to_string(items)?;

    store.set(StorageKey::Cart, json)
}

/// Read the cart lines from the store. A missing snapshot is an empty cart.
///
/// # Errors
///
/// Returns a [`StorageError`] if reading or decoding fails.
pub fn load_snapshot<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<LineItem>, StorageError> {
    match store.get(StorageKey::Cart)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}
