//! Durable key/value storage behind a small trait.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session adapter persists into `localStorage`; the assessment flow keeps
//! weak phonemes and the last assessment report in `sessionStorage`. Both can
//! be disabled or sandboxed, so every access goes through the fallible
//! `KeyValueStorage` trait and the `read`/`write`/`remove` helpers, which log
//! and swallow failures.
//!
//! `MemoryStorage` backs native tests and any non-browser build.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const AUTH_USER_KEY: &str = "authUser";
pub const USER_ID_KEY: &str = "user_id";
pub const WEAK_PHONEMES_KEY: &str = "weak_Phoneme";
pub const LAST_ASSESSMENT_KEY: &str = "last_assessment";

/// String-keyed, string-valued durable storage.
pub trait KeyValueStorage {
    /// # Errors
    ///
    /// Returns an error if the storage area is missing or the read throws.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns an error if the storage area is missing or the write throws.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns an error if the storage area is missing or the removal throws.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Read `key`, treating any storage failure as absence.
pub fn read(storage: &impl KeyValueStorage, key: &str) -> Option<String> {
    match storage.get_item(key) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("storage read of {key} failed: {e}");
            None
        }
    }
}

/// Write `key`, dropping the value if storage is unavailable.
pub fn write(storage: &impl KeyValueStorage, key: &str, value: &str) {
    if let Err(e) = storage.set_item(key, value) {
        log::debug!("storage write of {key} failed: {e}");
    }
}

/// Remove `key`, ignoring storage failures.
pub fn remove(storage: &impl KeyValueStorage, key: &str) {
    if let Err(e) = storage.remove_item(key) {
        log::debug!("storage removal of {key} failed: {e}");
    }
}

/// Load a JSON value for `key`; missing, unreadable, or malformed yields `None`.
pub fn load_json<T: DeserializeOwned>(storage: &impl KeyValueStorage, key: &str) -> Option<T> {
    let raw = read(storage, key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("stored {key} is not valid JSON: {e}");
            None
        }
    }
}

/// Save a JSON value for `key`.
pub fn save_json<T: Serialize>(storage: &impl KeyValueStorage, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => write(storage, key, &raw),
        Err(e) => log::debug!("could not serialize {key}: {e}"),
    }
}

/// One of the browser's `Storage` areas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrowserStorage {
    Local,
    Session,
}

#[cfg(feature = "csr")]
impl BrowserStorage {
    fn area(self) -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        let area = match self {
            Self::Local => window.local_storage(),
            Self::Session => window.session_storage(),
        };
        area.map_err(|e| StorageError::Access(format!("{e:?}")))?
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "csr")]
        {
            self.area()?
                .get_item(key)
                .map_err(|e| StorageError::Access(format!("{e:?}")))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            self.area()?
                .set_item(key, value)
                .map_err(|e| StorageError::Access(format!("{e:?}")))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (key, value);
            Err(StorageError::Unavailable)
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            self.area()?
                .remove_item(key)
                .map_err(|e| StorageError::Access(format!("{e:?}")))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }
}

/// In-memory storage. Clones share the same map, so a clone handed to a fresh
/// store behaves like the same browser profile after a reload.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<BTreeMap<String, String>>>,
    unavailable: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose every access fails, like a browser with storage disabled.
    pub fn unavailable() -> Self {
        Self { items: Rc::default(), unavailable: true }
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.unavailable { Err(StorageError::Unavailable) } else { Ok(()) }
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
