//! Session persistence for cart line items.
//!
//! Only the item collection is persisted, never the panel flag or derived
//! views. Items are written under a single fixed key as a versioned JSON
//! envelope:
//!
//! ```json
//! {"state": {"cartItems": [{"id": 1, "quantity": 2}]}, "version": 0}
//! ```
//!
//! Restoring never fails: absent, unreadable, or malformed data yields an
//! empty cart and a warning in the logs.

mod storage;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use cart_core::CartItem;

use crate::state::ensure_unique;

pub use storage::{FileStorage, MemoryStorage};

/// Key the cart is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "cart-storage";

/// Envelope version written by this crate. Blobs with any other version are
/// discarded on restore.
const STORAGE_VERSION: u32 = 0;

/// Errors raised by a [`SessionStorage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A session-scoped string key-value store.
pub trait SessionStorage {
    /// Read the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: SessionStorage + ?Sized> SessionStorage for &mut S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// Why a stored blob was discarded.
#[derive(Debug, Error)]
enum RestoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("malformed cart data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unsupported cart data version {found}")]
    Version { found: u32 },

    #[error(transparent)]
    Invalid(#[from] crate::error::ValidationError),
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedCart<'a> {
    state: PersistedState<'a>,
    version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState<'a> {
    cart_items: Cow<'a, [CartItem]>,
}

/// Mirrors cart items into a [`SessionStorage`] under a fixed key.
#[derive(Debug, Clone)]
pub struct CartPersistence<S> {
    storage: S,
    key: String,
}

impl<S: SessionStorage> CartPersistence<S> {
    /// Persist under [`DEFAULT_STORAGE_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Persist under a custom key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Load persisted items.
    ///
    /// Absent, unreadable, or malformed data yields an empty collection.
    pub fn restore(&self) -> Vec<CartItem> {
        match self.try_restore() {
            Ok(Some(items)) => {
                debug!(key = %self.key, items = items.len(), "Restored cart from session storage");
                items
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding persisted cart");
                Vec::new()
            }
        }
    }

    /// Write the item collection.
    ///
    /// Write failures are logged and swallowed; the in-memory cart stays
    /// authoritative.
    pub fn persist(&mut self, items: &[CartItem]) {
        let blob = match encode(items) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to encode cart");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(&self.key, &blob) {
            warn!(key = %self.key, error = %e, "Failed to persist cart");
        }
    }

    fn try_restore(&self) -> Result<Option<Vec<CartItem>>, RestoreError> {
        let Some(blob) = self.storage.get_item(&self.key)? else {
            return Ok(None);
        };

        let persisted: PersistedCart<'static> = serde_json::from_str(&blob)?;
        if persisted.version != STORAGE_VERSION {
            return Err(RestoreError::Version {
                found: persisted.version,
            });
        }

        let items = persisted.state.cart_items.into_owned();
        ensure_unique(&items)?;
        Ok(Some(items))
    }
}

fn encode(items: &[CartItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&PersistedCart {
        state: PersistedState {
            cart_items: Cow::Borrowed(items),
        },
        version: STORAGE_VERSION,
    })
}
