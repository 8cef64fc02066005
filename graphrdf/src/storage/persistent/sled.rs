// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Sled storage driver implementation

use super::types::{StorageDriverError, StorageResult, StorageType};
use super::{StorageDriver, StorageTree, TreeIter};
use sled::{Db, Tree};
use std::path::Path;

/// Sled driver implementation
pub struct SledDriver {
    db: Db,
}

impl SledDriver {
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let db = sled::open(path.as_ref())?;
        Ok(SledDriver { db })
    }
}

/// Sled tree wrapper that implements the StorageTree trait
pub struct SledTree {
    tree: Tree,
}

impl StorageTree for SledTree {
    fn insert(&self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.tree.insert(key, value)?;
        Ok(())
    }

    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.tree.get(key)?.map(|ivec| ivec.to_vec()))
    }

    fn remove(&self, key: &[u8]) -> StorageResult<()> {
        self.tree.remove(key)?;
        Ok(())
    }

    fn contains_key(&self, key: &[u8]) -> StorageResult<bool> {
        Ok(self.tree.contains_key(key)?)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> StorageResult<TreeIter<'_>> {
        let iter = self.tree.scan_prefix(prefix).map(|result| {
            result
                .map(|(k, v)| (k.to_vec(), v.to_vec()))
                .map_err(StorageDriverError::from)
        });
        Ok(Box::new(iter))
    }

    fn clear(&self) -> StorageResult<()> {
        self.tree.clear()?;
        Ok(())
    }

    fn flush(&self) -> StorageResult<()> {
        self.tree.flush()?;
        Ok(())
    }
}

impl StorageDriver for SledDriver {
    fn open_tree(&self, name: &str) -> StorageResult<Box<dyn StorageTree>> {
        let tree = self.db.open_tree(name)?;
        Ok(Box::new(SledTree { tree }))
    }

    fn flush(&self) -> StorageResult<()> {
        self.db.flush()?;
        Ok(())
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Sled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sled_basic_operations() {
        let temp_dir = TempDir::new().unwrap();
        let driver = SledDriver::open(temp_dir.path()).unwrap();
        let tree = driver.open_tree("test_tree").unwrap();

        tree.insert(b"key1", b"value1").unwrap();
        assert_eq!(tree.get(b"key1").unwrap(), Some(b"value1".to_vec()));
        assert!(tree.contains_key(b"key1").unwrap());

        tree.remove(b"key1").unwrap();
        assert!(!tree.contains_key(b"key1").unwrap());
    }

    #[test]
    fn test_sled_prefix_scan_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let driver = SledDriver::open(temp_dir.path()).unwrap();
        let tree = driver.open_tree("prefix_test").unwrap();

        tree.insert(b"user:1", b"alice").unwrap();
        tree.insert(b"user:2", b"bob").unwrap();
        tree.insert(b"post:1", b"hello").unwrap();

        let items: Vec<_> = tree
            .scan_prefix(b"user:")
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(items.len(), 2);

        tree.clear().unwrap();
        assert_eq!(tree.get(b"post:1").unwrap(), None);
        assert_eq!(driver.storage_type(), StorageType::Sled);
    }
}
