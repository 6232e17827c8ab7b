//! # redb-backed Local Storage
//!
//! Disk persistence for [`LocalStore`] using the redb embedded database. All
//! items live in a single `local_storage` table; every write is its own
//! transaction.

use super::LocalStore;
use crate::types::StackError;
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::{Path, PathBuf};

/// Table for items: key -> value
const LOCAL_STORAGE: TableDefinition<&str, &str> = TableDefinition::new("local_storage");

fn io(e: impl std::fmt::Display) -> StackError {
    StackError::IoError(e.to_string())
}

/// A disk-backed key/value store.
pub struct RedbStore {
    db: Database,
    path: PathBuf,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StackError> {
        let path = path.as_ref().to_path_buf();
        let db = Database::create(&path).map_err(io)?;

        {
            let write_txn = db.begin_write().map_err(io)?;
            let _ = write_txn.open_table(LOCAL_STORAGE).map_err(io)?;
            write_txn.commit().map_err(io)?;
        }

        tracing::debug!(path = %path.display(), "Opened local storage");
        Ok(Self { db, path })
    }

    /// Location of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocalStore for RedbStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StackError> {
        let read_txn = self.db.begin_read().map_err(io)?;
        let table = read_txn.open_table(LOCAL_STORAGE).map_err(io)?;
        let value = table.get(key).map_err(io)?.map(|v| v.value().to_string());
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StackError> {
        let write_txn = self.db.begin_write().map_err(io)?;
        {
            let mut table = write_txn.open_table(LOCAL_STORAGE).map_err(io)?;
            table.insert(key, value).map_err(io)?;
        }
        write_txn.commit().map_err(io)?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StackError> {
        let write_txn = self.db.begin_write().map_err(io)?;
        {
            let mut table = write_txn.open_table(LOCAL_STORAGE).map_err(io)?;
            table.remove(key).map_err(io)?;
        }
        write_txn.commit().map_err(io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn set_get_remove() {
        let temp = tempdir().expect("temp dir");
        let mut store = RedbStore::open(temp.path().join("store.redb")).expect("open");

        assert!(store.get_item("missing").expect("get").is_none());
        store.set_item("a", "1").expect("set");
        store.set_item("a", "2").expect("overwrite");
        assert_eq!(store.get_item("a").expect("get").as_deref(), Some("2"));

        store.remove_item("a").expect("remove");
        store.remove_item("a").expect("remove missing");
        assert!(store.get_item("a").expect("get").is_none());
    }

    #[test]
    fn survives_reopen() {
        let temp = tempdir().expect("temp dir");
        let path = temp.path().join("store.redb");

        {
            let mut store = RedbStore::open(&path).expect("open");
            store.set_item("tech-stacks", "[]").expect("set");
        }

        {
            let store = RedbStore::open(&path).expect("reopen");
            assert_eq!(store.get_item("tech-stacks").expect("get").as_deref(), Some("[]"));
            assert_eq!(store.path(), path.as_path());
        }
    }
}
