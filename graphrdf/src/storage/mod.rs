// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph storage for the RDF view
//!
//! This module provides:
//! - The `GraphStore` contract the triple engine consumes
//! - Node and relationship types with explicit attribute maps
//! - Reference-node containment for whole-store enumeration
//! - `GraphDataStore`, a graph layer over pluggable key/value drivers
//! - Change notifications for external indexes

pub mod graph;
mod keys;
pub mod observer;
pub mod persistent;
pub mod types;

pub use graph::GraphDataStore;
pub use observer::NodeObserver;
pub use persistent::{open_driver, StorageDriver, StorageDriverError, StorageTree, StorageType};
pub use types::{
    is_internal_attribute, Attributes, Direction, Node, NodeRef, Relationship, INSTANCE_REL,
    INTERNAL_PREFIX, REFERENCE_TYPE,
};

use std::sync::Arc;

use crate::error::Result;

/// The graph store collaborator consumed by the triple engine
///
/// Lookups of absent nodes fail with `RdfError::NodeNotFound`; reading the
/// relationships of an absent node yields an empty list.
pub trait GraphStore: Send + Sync {
    fn get_node(&self, node_type: &str, key: &str) -> Result<Node>;

    /// Batch fetch; absent keys are skipped and order is not preserved
    fn get_nodes(&self, node_type: &str, keys: &[String]) -> Result<Vec<Node>>;

    fn create_node(&self, node_type: &str, key: &str, attributes: Attributes) -> Result<Node>;

    /// The root reference node when `node_type` is `None`, else the one for that type
    fn get_reference_node(&self, node_type: Option<&str>) -> Result<Node>;

    /// Persist the node's current attributes
    fn save_node(&self, node: &Node) -> Result<()>;

    fn delete_node(&self, node: &NodeRef) -> Result<()>;

    fn create_relationship(
        &self,
        rel_type: &str,
        source: &NodeRef,
        target: &NodeRef,
        attributes: Attributes,
    ) -> Result<Relationship>;

    fn get_relationship(&self, rel_type: &str, key: &str) -> Result<Relationship>;

    /// Incident relationships of `node`, optionally restricted to one type
    fn relationships(
        &self,
        node: &NodeRef,
        rel_type: Option<&str>,
        direction: Direction,
    ) -> Result<Vec<Relationship>>;

    /// Relationships of `rel_type` between `node` and any node keyed `other_key`
    fn relationships_with(
        &self,
        node: &NodeRef,
        rel_type: &str,
        other_key: &str,
    ) -> Result<Vec<Relationship>> {
        Ok(self
            .relationships(node, Some(rel_type), Direction::Both)?
            .into_iter()
            .filter(|rel| {
                rel.other_end(node)
                    .map_or(false, |other| other.key == other_key)
            })
            .collect())
    }

    fn save_relationship(&self, rel: &Relationship) -> Result<()>;

    fn delete_relationship(&self, rel: &Relationship) -> Result<()>;

    fn add_observer(&self, observer: Arc<dyn NodeObserver>);

    /// Remove every node and relationship
    fn truncate(&self) -> Result<()>;

    fn flush(&self) -> Result<()>;
}
