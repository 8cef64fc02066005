// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Pluggable key/value drivers underneath the graph store
//!
//! A driver hands out named trees; the graph layer keeps nodes, relationships
//! and adjacency in separate trees and never touches the engine directly.

pub mod memory;
#[cfg(feature = "sled-backend")]
pub mod sled;
pub mod types;

use log::info;
use std::path::Path;

pub use types::{StorageDriverError, StorageResult, StorageType};

/// Iterator over `(key, value)` pairs produced by a tree scan
pub type TreeIter<'a> = Box<dyn Iterator<Item = StorageResult<(Vec<u8>, Vec<u8>)>> + 'a>;

/// An ordered byte-keyed map
pub trait StorageTree: Send + Sync {
    fn insert(&self, key: &[u8], value: &[u8]) -> StorageResult<()>;

    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    fn remove(&self, key: &[u8]) -> StorageResult<()>;

    fn contains_key(&self, key: &[u8]) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// All entries whose key starts with `prefix`, in key order
    fn scan_prefix(&self, prefix: &[u8]) -> StorageResult<TreeIter<'_>>;

    fn batch_get(&self, keys: &[&[u8]]) -> StorageResult<Vec<Option<Vec<u8>>>> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    fn clear(&self) -> StorageResult<()>;

    fn flush(&self) -> StorageResult<()>;
}

/// A storage engine handing out named trees
pub trait StorageDriver: Send + Sync {
    fn open_tree(&self, name: &str) -> StorageResult<Box<dyn StorageTree>>;

    fn flush(&self) -> StorageResult<()>;

    fn storage_type(&self) -> StorageType;
}

/// Open the driver for `storage_type`
///
/// With `create` set, any existing on-disk data at `path` is removed first.
pub fn open_driver(
    storage_type: StorageType,
    path: Option<&Path>,
    create: bool,
) -> StorageResult<Box<dyn StorageDriver>> {
    info!("Opening {} storage driver", storage_type);
    match storage_type {
        StorageType::Memory => Ok(Box::new(memory::MemoryDriver::new())),
        #[cfg(feature = "sled-backend")]
        StorageType::Sled => {
            let path = path.ok_or_else(|| {
                StorageDriverError::Unsupported("sled storage requires a path".to_string())
            })?;
            if create && path.exists() {
                log::warn!("Removing existing store at {:?}", path);
                std::fs::remove_dir_all(path)?;
            }
            Ok(Box::new(self::sled::SledDriver::open(path)?))
        }
        #[cfg(not(feature = "sled-backend"))]
        StorageType::Sled => {
            let _ = (path, create);
            Err(StorageDriverError::Unsupported(
                "sled backend not compiled in (enable the 'sled-backend' feature)".to_string(),
            ))
        }
    }
}
