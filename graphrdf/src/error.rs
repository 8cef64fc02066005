// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for GraphRDF

use thiserror::Error;

use crate::storage::StorageDriverError;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, RdfError>;

/// Main error type for GraphRDF operations
#[derive(Error, Debug)]
pub enum RdfError {
    /// Lookup of a node by identity failed
    #[error("Node not found: {node_type}/{key}")]
    NodeNotFound { node_type: String, key: String },

    /// Lookup of a relationship by identity failed
    #[error("Relationship not found: {rel_type}/{key}")]
    RelationshipNotFound { rel_type: String, key: String },

    /// A literal was used where only a resource is allowed
    #[error("Invalid term position: {0} can't be a literal")]
    InvalidTermPosition(&'static str),

    /// The graph store collaborator failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StorageDriverError),

    /// The store has not been opened
    #[error("Store is not open")]
    StoreClosed,

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RdfError {
    pub fn node_not_found(node_type: impl Into<String>, key: impl Into<String>) -> Self {
        RdfError::NodeNotFound {
            node_type: node_type.into(),
            key: key.into(),
        }
    }

    /// True for the "nothing there" outcome that queries treat as an empty result
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RdfError::NodeNotFound { .. } | RdfError::RelationshipNotFound { .. }
        )
    }
}

impl From<bincode::Error> for RdfError {
    fn from(e: bincode::Error) -> Self {
        RdfError::StoreUnavailable(e.into())
    }
}
