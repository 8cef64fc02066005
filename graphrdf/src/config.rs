// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Store configuration
//!
//! Settings can come from a flat `graphrdf.*` key/value map or from a JSON
//! document whose fields mirror [`StoreConfig`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{RdfError, Result};
use crate::storage::StorageType;

/// Prefix of every settings key
pub const SETTINGS_PREFIX: &str = "graphrdf.";

pub const DEFAULT_NODE_NAMESPACE_BASE: &str = "https://graphrdf.dev/nodes/";
pub const DEFAULT_RELATIONSHIP_NAMESPACE_BASE: &str = "https://graphrdf.dev/rels/";

/// Configuration of an [`RdfStore`](crate::RdfStore)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub storage: StorageType,
    /// Directory of an on-disk store
    pub path: Option<PathBuf>,
    pub node_namespace_base: String,
    pub relationship_namespace_base: String,
    /// Hide reference nodes from query results
    pub ignore_reference_nodes: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage: StorageType::Memory,
            path: None,
            node_namespace_base: DEFAULT_NODE_NAMESPACE_BASE.to_string(),
            relationship_namespace_base: DEFAULT_RELATIONSHIP_NAMESPACE_BASE.to_string(),
            ignore_reference_nodes: true,
        }
    }
}

impl StoreConfig {
    /// An on-disk configuration rooted at `path`
    pub fn sled(path: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageType::Sled,
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Build from flat settings; keys outside `graphrdf.` are ignored
    pub fn from_settings(settings: &HashMap<String, String>) -> Result<Self> {
        let mut config = Self::default();
        for (key, value) in settings {
            let Some(name) = key.strip_prefix(SETTINGS_PREFIX) else {
                continue;
            };
            match name {
                "storage" => {
                    config.storage = value.parse().map_err(RdfError::Config)?;
                }
                "path" => config.path = Some(PathBuf::from(value)),
                "rdf_node_namespace_base" => config.node_namespace_base = value.clone(),
                "rdf_relationship_namespace_base" => {
                    config.relationship_namespace_base = value.clone()
                }
                "rdf_ignore_reference_nodes" => {
                    config.ignore_reference_nodes = parse_flag(key, value)?;
                }
                _ => log::debug!("Ignoring unknown setting {}", key),
            }
        }
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| RdfError::Config(format!("invalid configuration: {}", e)))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| RdfError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(RdfError::Config(format!(
            "{} must be a boolean, got '{}'",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.storage, StorageType::Memory);
        assert!(config.ignore_reference_nodes);
        assert_eq!(config.node_namespace_base, DEFAULT_NODE_NAMESPACE_BASE);
    }

    #[test]
    fn test_from_settings() {
        let config = StoreConfig::from_settings(&settings(&[
            ("graphrdf.storage", "SLED"),
            ("graphrdf.path", "/tmp/graph"),
            ("graphrdf.rdf_relationship_namespace_base", "http://rels/"),
            ("graphrdf.rdf_ignore_reference_nodes", "false"),
            ("other.setting", "x"),
        ]))
        .unwrap();
        assert_eq!(config.storage, StorageType::Sled);
        assert_eq!(config.path, Some(PathBuf::from("/tmp/graph")));
        assert_eq!(config.relationship_namespace_base, "http://rels/");
        assert_eq!(config.node_namespace_base, DEFAULT_NODE_NAMESPACE_BASE);
        assert!(!config.ignore_reference_nodes);
    }

    #[test]
    fn test_from_settings_rejects_bad_values() {
        let err = StoreConfig::from_settings(&settings(&[("graphrdf.storage", "cassandra")]))
            .unwrap_err();
        assert!(matches!(err, RdfError::Config(_)));

        let err = StoreConfig::from_settings(&settings(&[(
            "graphrdf.rdf_ignore_reference_nodes",
            "maybe",
        )]))
        .unwrap_err();
        assert!(matches!(err, RdfError::Config(_)));
    }

    #[test]
    fn test_from_json() {
        let config =
            StoreConfig::from_json_str(r#"{"storage": "sled", "path": "data/graph"}"#).unwrap();
        assert_eq!(config.storage, StorageType::Sled);
        assert_eq!(config.path, Some(PathBuf::from("data/graph")));
        assert!(config.ignore_reference_nodes);

        assert!(StoreConfig::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graphrdf.json");
        std::fs::write(&path, r#"{"node_namespace_base": "http://nodes/"}"#).unwrap();
        let config = StoreConfig::from_json_file(&path).unwrap();
        assert_eq!(config.node_namespace_base, "http://nodes/");

        let err = StoreConfig::from_json_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, RdfError::Config(_)));
    }
}
