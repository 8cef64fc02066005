// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph data store over a key/value driver
//!
//! Layout, one tree each:
//! - `nodes`: node key -> bincode attributes
//! - `relationships`: relationship key -> bincode `Relationship`
//! - `adjacency`: outgoing and incoming index entries, empty values
//!
//! Every node is contained by the reference node of its type through an
//! `instance` relationship, and every reference node is contained by the
//! root reference node (which contains itself). Walking those two levels
//! enumerates the whole store.

use log::{debug, info};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use super::keys::{self, Side};
use super::observer::ObserverList;
use super::persistent::{open_driver, StorageDriver, StorageTree, StorageType};
use super::{
    Attributes, Direction, GraphStore, Node, NodeObserver, NodeRef, Relationship, INSTANCE_REL,
    REFERENCE_TYPE,
};
use crate::error::{RdfError, Result};

const NODES_TREE: &str = "nodes";
const RELATIONSHIPS_TREE: &str = "relationships";
const ADJACENCY_TREE: &str = "adjacency";

/// Property graph stored in three driver trees
pub struct GraphDataStore {
    driver: Box<dyn StorageDriver>,
    nodes: Box<dyn StorageTree>,
    relationships: Box<dyn StorageTree>,
    adjacency: Box<dyn StorageTree>,
    observers: ObserverList,
}

impl GraphDataStore {
    pub fn new(driver: Box<dyn StorageDriver>) -> Result<Self> {
        let nodes = driver.open_tree(NODES_TREE)?;
        let relationships = driver.open_tree(RELATIONSHIPS_TREE)?;
        let adjacency = driver.open_tree(ADJACENCY_TREE)?;
        info!("Graph data store ready on {} driver", driver.storage_type());
        Ok(Self {
            driver,
            nodes,
            relationships,
            adjacency,
            observers: ObserverList::default(),
        })
    }

    /// A fresh store that lives only in memory
    pub fn in_memory() -> Result<Self> {
        Self::open(StorageType::Memory, None, true)
    }

    pub fn open(storage_type: StorageType, path: Option<&Path>, create: bool) -> Result<Self> {
        Self::new(open_driver(storage_type, path, create)?)
    }

    pub fn storage_type(&self) -> StorageType {
        self.driver.storage_type()
    }

    fn read_node(&self, node: &NodeRef) -> Result<Option<Node>> {
        match self.nodes.get(&keys::node_key(node))? {
            Some(bytes) => {
                let attributes: Attributes = bincode::deserialize(&bytes)?;
                Ok(Some(Node::new(node.clone(), attributes)))
            }
            None => Ok(None),
        }
    }

    fn write_node(&self, node: &NodeRef, attributes: &Attributes) -> Result<()> {
        let bytes = bincode::serialize(attributes)?;
        self.nodes.insert(&keys::node_key(node), &bytes)?;
        Ok(())
    }

    fn node_exists(&self, node: &NodeRef) -> Result<bool> {
        Ok(self.nodes.contains_key(&keys::node_key(node))?)
    }

    fn write_relationship(&self, rel: &Relationship) -> Result<()> {
        let bytes = bincode::serialize(rel)?;
        self.relationships
            .insert(&keys::relationship_key(&rel.rel_type, &rel.key), &bytes)?;
        Ok(())
    }

    fn read_relationship(&self, rel_type: &str, key: &str) -> Result<Option<Relationship>> {
        match self
            .relationships
            .get(&keys::relationship_key(rel_type, key))?
        {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn link(
        &self,
        rel_type: &str,
        source: &NodeRef,
        target: &NodeRef,
        attributes: Attributes,
    ) -> Result<Relationship> {
        let rel = Relationship {
            rel_type: rel_type.to_string(),
            key: Uuid::new_v4().to_string(),
            source: source.clone(),
            target: target.clone(),
            attributes,
        };
        self.write_relationship(&rel)?;
        self.adjacency.insert(
            &keys::adjacency_key(Side::Outgoing, source, rel_type, &rel.key),
            &[],
        )?;
        self.adjacency.insert(
            &keys::adjacency_key(Side::Incoming, target, rel_type, &rel.key),
            &[],
        )?;
        Ok(rel)
    }

    /// Reference node for `node_type`, creating it (and the root) on first use
    fn ensure_reference_node(&self, node_type: &str) -> Result<NodeRef> {
        let root = NodeRef::reference(REFERENCE_TYPE);
        if !self.node_exists(&root)? {
            debug!("Creating root reference node");
            self.write_node(&root, &Attributes::new())?;
            self.link(INSTANCE_REL, &root, &root, Attributes::new())?;
        }
        if node_type == REFERENCE_TYPE {
            return Ok(root);
        }

        let reference = NodeRef::reference(node_type);
        if !self.node_exists(&reference)? {
            debug!("Creating reference node for type '{}'", node_type);
            self.write_node(&reference, &Attributes::new())?;
            self.link(INSTANCE_REL, &root, &reference, Attributes::new())?;
        }
        Ok(reference)
    }

    fn scan_side(
        &self,
        side: Side,
        node: &NodeRef,
        rel_type: Option<&str>,
    ) -> Result<Vec<Relationship>> {
        let prefix = keys::adjacency_prefix(side, node, rel_type);
        let mut found = Vec::new();
        for entry in self.adjacency.scan_prefix(&prefix)? {
            let (key, _) = entry?;
            let (rel_type, rel_key) = keys::decode_adjacency(&key)?;
            match self.read_relationship(&rel_type, &rel_key)? {
                Some(rel) => found.push(rel),
                None => debug!("Dangling adjacency entry {}/{}", rel_type, rel_key),
            }
        }
        Ok(found)
    }
}

impl GraphStore for GraphDataStore {
    fn get_node(&self, node_type: &str, key: &str) -> Result<Node> {
        let node_ref = NodeRef::new(node_type, key);
        self.read_node(&node_ref)?
            .ok_or_else(|| RdfError::node_not_found(node_type, key))
    }

    fn get_nodes(&self, node_type: &str, node_keys: &[String]) -> Result<Vec<Node>> {
        let refs: Vec<NodeRef> = node_keys
            .iter().map(|k| NodeRef::new(node_type, k)).collect();
        let encoded: Vec<Vec<u8>> = refs.iter().map(keys::node_key).collect();
        let borrowed: Vec<&[u8]> = encoded.iter().map(Vec::as_slice).collect();

        let mut nodes = Vec::with_capacity(refs.len());
        for (node_ref, bytes) in refs.into_iter().zip(self.nodes.batch_get(&borrowed)?) {
            if let Some(bytes) = bytes {
                let attributes: Attributes = bincode::deserialize(&bytes)?;
                nodes.push(Node::new(node_ref, attributes));
            }
        }
        Ok(nodes)
    }

    fn create_node(&self, node_type: &str, key: &str, attributes: Attributes) -> Result<Node> {
        let node_ref = NodeRef::new(node_type, key);
        let existed = self.node_exists(&node_ref)?;
        self.write_node(&node_ref, &attributes)?;

        let node = Node::new(node_ref, attributes);
        if existed {
            self.observers.notify_modify(&node);
            return Ok(node);
        }

        let reference = self.ensure_reference_node(node_type)?;
        if reference != node.node_ref {
            self.link(INSTANCE_REL, &reference, &node.node_ref, Attributes::new())?;
        }
        debug!("Created {}", node);
        self.observers.notify_create(&node);
        Ok(node)
    }

    fn get_reference_node(&self, node_type: Option<&str>) -> Result<Node> {
        let reference = self.ensure_reference_node(node_type.unwrap_or(REFERENCE_TYPE))?;
        self.read_node(&reference)?
            .ok_or_else(|| RdfError::node_not_found(&reference.node_type, &reference.key))
    }

    fn save_node(&self, node: &Node) -> Result<()> {
        if !self.node_exists(&node.node_ref)? {
            return Err(RdfError::node_not_found(node.node_type(), node.key()));
        }
        self.write_node(&node.node_ref, &node.attributes)?;
        self.observers.notify_modify(node);
        Ok(())
    }

    fn delete_node(&self, node_ref: &NodeRef) -> Result<()> {
        let node = self
            .read_node(node_ref)?
            .ok_or_else(|| RdfError::node_not_found(&node_ref.node_type, &node_ref.key))?;
        self.observers.notify_delete(&node);

        for rel in self.relationships(node_ref, None, Direction::Both)? {
            self.delete_relationship(&rel)?;
        }
        self.nodes.remove(&keys::node_key(node_ref))?;
        debug!("Deleted {}", node);
        Ok(())
    }

    fn create_relationship(
        &self,
        rel_type: &str,
        source: &NodeRef,
        target: &NodeRef,
        attributes: Attributes,
    ) -> Result<Relationship> {
        for endpoint in [source, target] {
            if !self.node_exists(endpoint)? {
                return Err(RdfError::node_not_found(&endpoint.node_type, &endpoint.key));
            }
        }
        let rel = self.link(rel_type, source, target, attributes)?;
        debug!("Created relationship {}", rel);
        Ok(rel)
    }

    fn get_relationship(&self, rel_type: &str, key: &str) -> Result<Relationship> {
        self.read_relationship(rel_type, key)?
            .ok_or_else(|| RdfError::RelationshipNotFound {
                rel_type: rel_type.to_string(),
                key: key.to_string(),
            })
    }

    fn relationships(
        &self,
        node: &NodeRef,
        rel_type: Option<&str>,
        direction: Direction,
    ) -> Result<Vec<Relationship>> {
        match direction {
            Direction::Outgoing => self.scan_side(Side::Outgoing, node, rel_type),
            Direction::Incoming => self.scan_side(Side::Incoming, node, rel_type),
            Direction::Both => {
                let mut all = self.scan_side(Side::Outgoing, node, rel_type)?;
                let mut seen: HashSet<(String, String)> = all
                    .iter()
                    .map(|rel| (rel.rel_type.clone(), rel.key.clone()))
                    .collect();
                for rel in self.scan_side(Side::Incoming, node, rel_type)? {
                    // self-loops appear on both sides
                    if seen.insert((rel.rel_type.clone(), rel.key.clone())) {
                        all.push(rel);
                    }
                }
                Ok(all)
            }
        }
    }

    fn save_relationship(&self, rel: &Relationship) -> Result<()> {
        let stored = self.get_relationship(&rel.rel_type, &rel.key)?;
        if stored.source != rel.source || stored.target != rel.target {
            return Err(RdfError::RelationshipNotFound {
                rel_type: rel.rel_type.clone(),
                key: rel.key.clone(),
            });
        }
        self.write_relationship(rel)
    }

    fn delete_relationship(&self, rel: &Relationship) -> Result<()> {
        self.relationships
            .remove(&keys::relationship_key(&rel.rel_type, &rel.key))?;
        self.adjacency.remove(&keys::adjacency_key(
            Side::Outgoing,
            &rel.source,
            &rel.rel_type,
            &rel.key,
        ))?;
        self.adjacency.remove(&keys::adjacency_key(
            Side::Incoming,
            &rel.target,
            &rel.rel_type,
            &rel.key,
        ))?;
        debug!("Deleted relationship {}", rel);
        Ok(())
    }

    fn add_observer(&self, observer: Arc<dyn NodeObserver>) {
        self.observers.add(observer);
    }

    fn truncate(&self) -> Result<()> {
        info!("Truncating graph data store");
        self.nodes.clear()?;
        self.relationships.clear()?;
        self.adjacency.clear()?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.driver.flush()?;
        Ok(())
    }
}
