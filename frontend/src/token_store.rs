use std::cell::RefCell;
use thiserror::Error;
use web_sys::{window, Storage};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("local storage is unavailable")]
    Unavailable,
    #[error("failed to write token: {0}")]
    Write(String),
}

/// Holds the single opaque session token. No expiry tracking: a stale
/// token is only discovered when the backend rejects it.
pub trait TokenStore {
    fn save(&self, token: &str) -> Result<(), StoreError>;
    fn read(&self) -> Option<String>;
    fn clear(&self);
}

/// Token kept in the browser's `localStorage` under a fixed key.
pub struct LocalStorageTokenStore {
    storage: Storage,
    key: String,
}

impl LocalStorageTokenStore {
    pub fn open(key: impl Into<String>) -> Result<Self, StoreError> {
        let storage = window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StoreError::Unavailable)?;
        Ok(Self { storage, key: key.into() })
    }
}

impl TokenStore for LocalStorageTokenStore {
    fn save(&self, token: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(&self.key, token)
            .map_err(|e| StoreError::Write(format!("{:?}", e)))
    }

    fn read(&self) -> Option<String> {
        self.storage
            .get_item(&self.key)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    fn clear(&self) {
        if let Err(e) = self.storage.remove_item(&self.key) {
            log::warn!("failed to remove stored token: {:?}", e);
        }
    }
}

/// Token held for the lifetime of the page only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self { token: RefCell::new(Some(token.to_string())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, token: &str) -> Result<(), StoreError> {
        *self.token.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    fn read(&self) -> Option<String> {
        self.token.borrow().clone().filter(|token| !token.is_empty())
    }

    fn clear(&self) {
        self.token.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::default();
        assert_eq!(store.read(), None);

        store.save("t1").unwrap();
        assert_eq!(store.read().as_deref(), Some("t1"));

        store.clear();
        assert_eq!(store.read(), None);
        store.clear();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn empty_token_reads_as_absent() {
        let store = MemoryTokenStore::with_token("");
        assert_eq!(store.read(), None);
    }
}
