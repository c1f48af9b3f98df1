use std::path::Path;
use std::sync::Arc;

use redb::{Database, TableDefinition};

use crate::kv::{KvError, KvStore};

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// KvStore backed by redb, a pure-Rust embedded key-value database. This is
/// the durable storage behind the application's two collection keys.
pub struct RedbKv {
    db: Arc<Database>,
}

impl RedbKv {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KvError> {
        let db = Database::create(path).map_err(|e| KvError::Storage(e.to_string()))?;

        // Ensure the table exists by doing a write transaction.
        let write_txn = db
            .begin_write()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        {
            let _table = write_txn
                .open_table(TABLE)
                .map_err(|e| KvError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| KvError::Storage(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl KvStore for RedbKv {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        let table = read_txn
            .open_table(TABLE)
            .map_err(|e| KvError::Storage(e.to_string()))?;

        match table.get(key) {
            Ok(Some(val)) => Ok(Some(val.value().to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(KvError::Storage(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KvError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| KvError::Storage(e.to_string()))?;
            table
                .insert(key, value)
                .map_err(|e| KvError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KvError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| KvError::Storage(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| KvError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redb_kv_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let kv = RedbKv::open(&dir.path().join("kv.redb")).unwrap();

        assert!(kv.get("products").unwrap().is_none());
        kv.set("products", b"[]").unwrap();
        assert_eq!(kv.get("products").unwrap().as_deref(), Some(&b"[]"[..]));
        kv.delete("products").unwrap();
        assert!(kv.get("products").unwrap().is_none());
    }

    #[test]
    fn test_redb_kv_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.redb");

        {
            let kv = RedbKv::open(&path).unwrap();
            kv.set("products", b"[1]").unwrap();
        }
        let kv = RedbKv::open(&path).unwrap();
        assert_eq!(kv.get("products").unwrap().as_deref(), Some(&b"[1]"[..]));
    }
}
