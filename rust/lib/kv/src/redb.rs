use std::path::Path;
use std::sync::Arc;

use redb::{Database, TableDefinition};

use crate::error::KVError;
use crate::traits::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("session");

fn storage<E: std::fmt::Display>(e: E) -> KVError {
    KVError::Storage(e.to_string())
}

/// RedbStore is a KVStore implementation backed by redb, a pure-Rust embedded
/// key-value database. Every write is its own committed transaction, so a
/// batch either lands completely or not at all.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        let db = Database::create(path).map_err(storage)?;

        // Ensure the table exists so that reads on a fresh file succeed.
        let write_txn = db.begin_write().map_err(storage)?;
        {
            let _table = write_txn.open_table(TABLE).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;

        tracing::debug!(path = %path.display(), "opened session store");
        Ok(Self { db: Arc::new(db) })
    }

    fn write<F>(&self, apply: F) -> Result<(), KVError>
    where
        F: FnOnce(&mut redb::Table<'_, &'static str, &'static [u8]>) -> Result<(), redb::StorageError>,
    {
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(storage)?;
            apply(&mut table).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let read_txn = self.db.begin_read().map_err(storage)?;
        let table = read_txn.open_table(TABLE).map_err(storage)?;
        let value = table.get(key).map_err(storage)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        self.write(|table| table.insert(key, value).map(|_| ()))
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        self.write(|table| table.remove(key).map(|_| ()))
    }

    fn batch_set(&self, entries: &[(&str, &[u8])]) -> Result<(), KVError> {
        self.write(|table| {
            for (key, value) in entries {
                table.insert(*key, *value)?;
            }
            Ok(())
        })
    }

    fn batch_delete(&self, keys: &[&str]) -> Result<(), KVError> {
        self.write(|table| {
            for key in keys {
                table.remove(*key)?;
            }
            Ok(())
        })
    }

    fn batch_write(&self, sets: &[(&str, &[u8])], deletes: &[&str]) -> Result<(), KVError> {
        self.write(|table| {
            for (key, value) in sets {
                table.insert(*key, *value)?;
            }
            for key in deletes {
                table.remove(*key)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, RedbStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("session.redb")).unwrap();
        (dir, store)
    }

    #[test]
    fn get_missing_key_on_fresh_file() {
        let (_dir, store) = open_temp();
        assert_eq!(store.get("user_id").unwrap(), None);
    }

    #[test]
    fn set_get_delete() {
        let (_dir, store) = open_temp();
        store.set("user_id", b"uid-1").unwrap();
        assert_eq!(store.get("user_id").unwrap(), Some(b"uid-1".to_vec()));

        store.delete("user_id").unwrap();
        assert_eq!(store.get("user_id").unwrap(), None);
    }

    #[test]
    fn delete_missing_key_is_ok() {
        let (_dir, store) = open_temp();
        store.delete("nothing-here").unwrap();
    }

    #[test]
    fn batch_set_and_delete() {
        let (_dir, store) = open_temp();
        store
            .batch_set(&[
                ("user_id", b"uid-1".as_slice()),
                ("user_email", b"eko@example.com".as_slice()),
            ])
            .unwrap();
        assert_eq!(store.get_string("user_email").unwrap().as_deref(), Some("eko@example.com"));

        store.batch_delete(&["user_id", "user_email"]).unwrap();
        assert_eq!(store.get("user_id").unwrap(), None);
        assert_eq!(store.get("user_email").unwrap(), None);
    }

    #[test]
    fn batch_write_sets_and_deletes_together() {
        let (_dir, store) = open_temp();
        store.set_string("user_name", "Budi").unwrap();

        store
            .batch_write(&[("user_id", b"uid-eko".as_slice())], &["user_name"])
            .unwrap();
        assert_eq!(store.get_string("user_id").unwrap().as_deref(), Some("uid-eko"));
        assert_eq!(store.get("user_name").unwrap(), None);
    }

    #[test]
    fn typed_accessors() {
        let (_dir, store) = open_temp();
        store.set_bool("is_logged_in", true).unwrap();
        store.set_string("user_name", "Eko").unwrap();

        assert_eq!(store.get_bool("is_logged_in").unwrap(), Some(true));
        assert_eq!(store.get_string("user_name").unwrap().as_deref(), Some("Eko"));

        store.set_bool("is_logged_in", false).unwrap();
        assert_eq!(store.get_bool("is_logged_in").unwrap(), Some(false));
    }

    #[test]
    fn get_bool_rejects_foreign_bytes() {
        let (_dir, store) = open_temp();
        store.set("is_logged_in", b"yes").unwrap();
        assert!(matches!(
            store.get_bool("is_logged_in"),
            Err(KVError::Decode { .. })
        ));
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.redb");
        {
            let store = RedbStore::open(&path).unwrap();
            store.set_string("user_email", "eko@example.com").unwrap();
            store.set_bool("is_logged_in", true).unwrap();
        }

        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.get_string("user_email").unwrap().as_deref(), Some("eko@example.com"));
        assert_eq!(store.get_bool("is_logged_in").unwrap(), Some(true));
    }
}
