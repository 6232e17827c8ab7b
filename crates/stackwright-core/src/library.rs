//! # Stack Library
//!
//! Named, saved stacks on top of a [`LocalStore`].
//!
//! All stacks are kept as one JSON array under [`STACKS_KEY`]. Storage is a
//! convenience feature: every failure is logged and reported as `false` or
//! an empty list, never as an error.

use crate::primitives::STACKS_KEY;
use crate::storage::LocalStore;
use crate::types::{Stack, StackError, StackId};

/// Saved stacks backed by a local store.
#[derive(Debug)]
pub struct StackLibrary<S: LocalStore> {
    store: S,
}

impl<S: LocalStore> StackLibrary<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// All saved stacks, in save order.
    ///
    /// Missing or unreadable data yields an empty list.
    pub fn load_stacks(&self) -> Vec<Stack> {
        match self.read_all() {
            Ok(stacks) => stacks,
            Err(e) => {
                tracing::warn!(error = %e, "Could not load saved stacks");
                Vec::new()
            }
        }
    }

    /// Insert the stack, or replace the saved stack with the same id.
    pub fn save_stack(&mut self, stack: &Stack) -> bool {
        let mut stacks = self.load_stacks();
        match stacks.iter_mut().find(|s| s.id == stack.id) {
            Some(existing) => *existing = stack.clone(),
            None => stacks.push(stack.clone()),
        }
        match self.write_all(&stacks) {
            Ok(()) => {
                tracing::info!(stack = %stack.id, name = %stack.name, "Saved stack");
                true
            }
            Err(e) => {
                tracing::warn!(stack = %stack.id, error = %e, "Could not save stack");
                false
            }
        }
    }

    /// Remove the stack with this id. Deleting a missing stack succeeds.
    pub fn delete_stack(&mut self, id: &StackId) -> bool {
        let mut stacks = self.load_stacks();
        let before = stacks.len();
        stacks.retain(|s| &s.id != id);
        if stacks.len() == before {
            return true;
        }
        match self.write_all(&stacks) {
            Ok(()) => {
                tracing::info!(stack = %id, "Deleted stack");
                true
            }
            Err(e) => {
                tracing::warn!(stack = %id, error = %e, "Could not delete stack");
                false
            }
        }
    }

    /// Find one saved stack by id.
    pub fn get_stack(&self, id: &StackId) -> Option<Stack> {
        self.load_stacks().into_iter().find(|s| &s.id == id)
    }

    fn read_all(&self) -> Result<Vec<Stack>, StackError> {
        match self.store.get_item(STACKS_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| StackError::DeserializationError(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    fn write_all(&mut self, stacks: &[Stack]) -> Result<(), StackError> {
        let raw = serde_json::to_string(stacks)
            .map_err(|e| StackError::SerializationError(e.to_string()))?;
        self.store.set_item(STACKS_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::templates::template;
    use chrono::Utc;

    /// A store whose writes always fail.
    struct BrokenStore;

    impl LocalStore for BrokenStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StackError> {
            Err(StackError::IoError("disk on fire".to_string()))
        }
        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StackError> {
            Err(StackError::IoError("disk on fire".to_string()))
        }
        fn remove_item(&mut self, _key: &str) -> Result<(), StackError> {
            Err(StackError::IoError("disk on fire".to_string()))
        }
    }

    fn sample() -> Stack {
        template("web-app").expect("template").instantiate(Utc::now())
    }

    #[test]
    fn save_then_load_contains_equal_stack() {
        let mut library = StackLibrary::new(MemoryStore::new());
        let stack = sample();
        assert!(library.save_stack(&stack));
        let loaded = library.load_stacks();
        assert_eq!(loaded, vec![stack.clone()]);
        assert_eq!(library.get_stack(&stack.id), Some(stack));
    }

    #[test]
    fn save_upserts_by_id() {
        let mut library = StackLibrary::new(MemoryStore::new());
        let mut stack = sample();
        let other = sample();
        assert!(library.save_stack(&stack));
        assert!(library.save_stack(&other));

        stack.name = "Renamed".to_string();
        assert!(library.save_stack(&stack));

        let loaded = library.load_stacks();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "Renamed");
        assert_eq!(loaded[1].id, other.id);
    }

    #[test]
    fn delete_removes_and_tolerates_missing() {
        let mut library = StackLibrary::new(MemoryStore::new());
        let stack = sample();
        library.save_stack(&stack);
        assert!(library.delete_stack(&stack.id));
        assert!(library.load_stacks().is_empty());
        assert!(library.delete_stack(&StackId::from("never-saved")));
    }

    #[test]
    fn corrupt_data_loads_as_empty() {
        let mut store = MemoryStore::new();
        store.set_item(STACKS_KEY, "{not json").expect("set");
        let library = StackLibrary::new(store);
        assert!(library.load_stacks().is_empty());
        assert!(library.get_stack(&StackId::from("x")).is_none());
    }

    #[test]
    fn storage_failures_become_false() {
        let mut library = StackLibrary::new(BrokenStore);
        assert!(!library.save_stack(&sample()));
        assert!(library.load_stacks().is_empty());
    }

    #[test]
    fn uses_the_shared_key() {
        let mut library = StackLibrary::new(MemoryStore::new());
        library.save_stack(&sample());
        let raw = library
            .store()
            .get_item(STACKS_KEY)
            .expect("get")
            .expect("present");
        assert!(raw.starts_with('['));
        assert!(raw.contains("\"createdAt\""));
    }
}
