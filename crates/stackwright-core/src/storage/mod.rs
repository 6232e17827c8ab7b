//! # Local Storage
//!
//! A string key/value store in the shape of a browser's `localStorage`, with
//! an in-memory backend for tests and a redb backend for the app.
//!
//! Stores report failures as [`StackError`]; turning those into a boolean or
//! an empty result is the job of [`crate::library::StackLibrary`].

mod redb_store;

pub use redb_store::RedbStore;

use crate::types::StackError;
use std::collections::BTreeMap;

/// String key/value persistence.
pub trait LocalStore {
    /// Read the value stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, StackError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StackError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_item(&mut self, key: &str) -> Result<(), StackError>;
}

impl<S: LocalStore + ?Sized> LocalStore for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StackError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StackError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StackError> {
        (**self).remove_item(key)
    }
}

/// Process-local store, lost on exit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl LocalStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StackError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StackError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StackError> {
        self.items.remove(key);
        Ok(())
    }
}
