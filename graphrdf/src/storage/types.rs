// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Node and relationship types for the property graph

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::GraphStore;
use crate::error::Result;
use crate::term::Value;

/// Node type of the bookkeeping nodes that enumerate each type
pub const REFERENCE_TYPE: &str = "reference";

/// Relationship type linking a reference node to its members
pub const INSTANCE_REL: &str = "instance";

/// Attribute names with this prefix are store-internal
pub const INTERNAL_PREFIX: &str = "__";

/// Attribute name -> scalar value
pub type Attributes = BTreeMap<String, Value>;

/// Identity of a node: its type and its key within that type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeRef {
    pub node_type: String,
    pub key: String,
}

impl NodeRef {
    pub fn new(node_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            key: key.into(),
        }
    }

    /// Reference node for `node_type`; the root reference node is the one for `"reference"`
    pub fn reference(node_type: &str) -> Self {
        Self::new(REFERENCE_TYPE, node_type)
    }

    pub fn is_reference(&self) -> bool {
        self.node_type == REFERENCE_TYPE
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.node_type, self.key)
    }
}

/// A node and the attribute values read with it
///
/// Attribute changes are local until [`Node::commit`] writes them back.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub node_ref: NodeRef,
    pub attributes: Attributes,
}

impl Node {
    pub fn new(node_ref: NodeRef, attributes: Attributes) -> Self {
        Self {
            node_ref,
            attributes,
        }
    }

    pub fn node_type(&self) -> &str {
        &self.node_ref.node_type
    }

    pub fn key(&self) -> &str {
        &self.node_ref.key
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    /// Attributes visible through the RDF view
    pub fn public_attributes(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.attributes
            .iter()
            .filter(|(name, _)| !is_internal_attribute(name))
    }

    /// Persist pending attribute changes
    pub fn commit(&self, store: &dyn GraphStore) -> Result<()> {
        store.save_node(self)
    }

    /// Remove the node and every incident relationship
    pub fn delete(self, store: &dyn GraphStore) -> Result<()> {
        store.delete_node(&self.node_ref)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.node_ref)
    }
}

/// A typed, directed edge between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub rel_type: String,
    /// Store-assigned key, unique within `rel_type`
    pub key: String,
    pub source: NodeRef,
    pub target: NodeRef,
    pub attributes: Attributes,
}

impl Relationship {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    /// The endpoint opposite `node`, or `None` if `node` is not an endpoint
    pub fn other_end(&self, node: &NodeRef) -> Option<&NodeRef> {
        if self.source == *node {
            Some(&self.target)
        } else if self.target == *node {
            Some(&self.source)
        } else {
            None
        }
    }

    pub fn commit(&self, store: &dyn GraphStore) -> Result<()> {
        store.save_relationship(self)
    }

    pub fn delete(self, store: &dyn GraphStore) -> Result<()> {
        store.delete_relationship(&self)
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({})-[{}:{}]->({})",
            self.source, self.rel_type, self.key, self.target
        )
    }
}

/// Which incident relationships of a node to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

pub fn is_internal_attribute(name: &str) -> bool {
    name.starts_with(INTERNAL_PREFIX)
}
