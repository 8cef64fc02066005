// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Conversion between URIs and graph identifiers
//!
//! A node `(type, key)` is written as `namespace(type) + key`. Types without
//! a bound namespace get one under the node namespace base, bound with the
//! type itself as prefix. A relationship type `prefix:local` is written as
//! `namespace(prefix) + local`; an unprefixed type lives under the
//! relationship namespace base, which is bound to the empty prefix.
//!
//! A key under a namespace ending in its only `#` is written verbatim, since a
//! node URI always splits at its first `#`. Other keys, and relationship
//! local names, escape only the delimiters `/`, `#` and `:` (plus a `%` that
//! would read as one of those escapes). Any other text, including non-ASCII
//! and foreign percent escapes, is left alone, so a URI read from a node
//! comes back unchanged.

use log::debug;
use parking_lot::RwLock;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::{RdfError, Result};
use crate::namespace::{Namespace, NamespaceRegistry};
use crate::storage::{Attributes, GraphStore, Node, NodeRef};

/// Characters escaped inside a type name synthesized into a namespace
const TYPE_NAME: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b':')
    .add(b'?');

/// Escapes written into local names, and the characters they stand for
const ESCAPES: [(&str, char); 4] = [("%25", '%'), ("%2F", '/'), ("%23", '#'), ("%3A", ':')];

/// Prefix the node namespace base is bound under
pub const NODE_BASE_PREFIX: &str = "node";

/// Prefix the relationship namespace base is bound under
pub const RELATIONSHIP_BASE_PREFIX: &str = "";

fn encode_type_name(node_type: &str) -> String {
    utf8_percent_encode(node_type, TYPE_NAME).to_string()
}

fn escape_at(s: &str) -> Option<(&'static str, char)> {
    ESCAPES
        .iter()
        .copied()
        .find(|(escape, _)| s.starts_with(escape))
}

/// Escape the URI delimiters in a local name
///
/// A `%` is escaped only when the text after it already reads as one of the
/// escapes, which keeps `decode_local_name` an exact inverse.
fn encode_local_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, c) in name.char_indices() {
        match c {
            '/' => out.push_str("%2F"),
            '#' => out.push_str("%23"),
            ':' => out.push_str("%3A"),
            '%' if escape_at(&name[i..]).is_some() => out.push_str("%25"),
            c => out.push(c),
        }
    }
    out
}

fn decode_local_name(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len());
    let mut rest = encoded;
    while let Some(c) = rest.chars().next() {
        match escape_at(rest) {
            Some((escape, raw)) => {
                out.push(raw);
                rest = &rest[escape.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

/// Whether keys under `namespace` can be written verbatim
fn is_fragment_namespace(namespace: &str) -> bool {
    namespace.ends_with('#') && namespace.find('#') == Some(namespace.len() - 1)
}

/// Split after the last `/`, `#` or `:`; the namespace keeps the delimiter
fn split_local_name(uri: &str) -> (&str, &str) {
    match uri.rfind(|c: char| matches!(c, '/' | '#' | ':')) {
        Some(pos) => uri.split_at(pos + 1),
        None => ("", uri),
    }
}

/// Split a node URI at its first `#`, or at the local name boundary
fn split_node_uri(uri: &str) -> (&str, &str) {
    match uri.find('#') {
        Some(pos) => uri.split_at(pos + 1),
        None => split_local_name(uri),
    }
}

/// Term <-> identifier codec backed by a namespace registry
#[derive(Debug)]
pub struct TermCodec {
    namespaces: RwLock<NamespaceRegistry>,
    node_namespace_base: Namespace,
    relationship_namespace_base: Namespace,
}

impl TermCodec {
    pub fn new(node_namespace_base: &str, relationship_namespace_base: &str) -> Self {
        let mut namespaces = NamespaceRegistry::new();
        namespaces.bind(NODE_BASE_PREFIX, node_namespace_base);
        namespaces.bind(RELATIONSHIP_BASE_PREFIX, relationship_namespace_base);
        Self {
            namespaces: RwLock::new(namespaces),
            node_namespace_base: Namespace::new(node_namespace_base),
            relationship_namespace_base: Namespace::new(relationship_namespace_base),
        }
    }

    pub fn node_namespace_base(&self) -> &Namespace {
        &self.node_namespace_base
    }

    pub fn set_node_namespace_base(&mut self, base: &str) {
        self.node_namespace_base = Namespace::new(base);
        self.bind(NODE_BASE_PREFIX, base);
    }

    pub fn relationship_namespace_base(&self) -> &Namespace {
        &self.relationship_namespace_base
    }

    pub fn set_relationship_namespace_base(&mut self, base: &str) {
        self.relationship_namespace_base = Namespace::new(base);
        self.bind(RELATIONSHIP_BASE_PREFIX, base);
    }

    pub fn bind(&self, prefix: &str, namespace: &str) {
        self.namespaces.write().bind(prefix, namespace);
    }

    pub fn namespace(&self, prefix: &str) -> Option<String> {
        self.namespaces.read().namespace(prefix).map(str::to_string)
    }

    pub fn prefix(&self, namespace: &str) -> Option<String> {
        self.namespaces.read().prefix(namespace).map(str::to_string)
    }

    pub fn bindings(&self) -> Vec<(String, String)> {
        self.namespaces.read().bindings()
    }

    /// Prefix bound to `namespace`, binding a generated one if there is none
    fn prefix_or_generate(&self, namespace: &str) -> String {
        if let Some(prefix) = self.prefix(namespace) {
            return prefix;
        }
        let mut namespaces = self.namespaces.write();
        match namespaces.prefix(namespace) {
            Some(prefix) => prefix.to_string(),
            None => namespaces.bind_generated(namespace),
        }
    }

    pub fn node_to_uri(&self, node: &NodeRef) -> String {
        let namespace = match self.namespace(&node.node_type) {
            Some(namespace) => namespace,
            None => {
                let namespace = self
                    .node_namespace_base
                    .uri(&format!("{}#", encode_type_name(&node.node_type)));
                self.bind(&node.node_type, &namespace);
                namespace
            }
        };
        let uri = if is_fragment_namespace(&namespace) {
            format!("{}{}", namespace, node.key)
        } else {
            format!("{}{}", namespace, encode_local_name(&node.key))
        };
        debug!("Converted node {} to uri {}", node, uri);
        uri
    }

    /// Node identity named by `uri`; does not touch the graph store
    pub fn uri_to_node_ref(&self, uri: &str) -> NodeRef {
        let (namespace, local_name) = split_node_uri(uri);
        let node_type = self.prefix_or_generate(namespace);
        let key = if is_fragment_namespace(namespace) {
            local_name.to_string()
        } else {
            decode_local_name(local_name)
        };
        NodeRef::new(node_type, key)
    }

    /// Fetch the node named by `uri`, creating it when `create` is set
    pub fn uri_to_node(&self, store: &dyn GraphStore, uri: &str, create: bool) -> Result<Node> {
        let node_ref = self.uri_to_node_ref(uri);
        debug!("Looking up node: {}", node_ref);
        match store.get_node(&node_ref.node_type, &node_ref.key) {
            Err(RdfError::NodeNotFound { .. }) if create => {
                let node =
                    store.create_node(&node_ref.node_type, &node_ref.key, Attributes::new())?;
                debug!("Created node: {}", node);
                Ok(node)
            }
            other => other,
        }
    }

    /// URI for a relationship type or attribute name
    ///
    /// A `prefix:local` name with an unbound prefix is returned as is.
    pub fn rel_type_to_uri(&self, rel_type: &str) -> String {
        match rel_type.split_once(':') {
            Some((prefix, local_name)) => match self.namespace(prefix) {
                Some(namespace) => format!("{}{}", namespace, encode_local_name(local_name)),
                None => rel_type.to_string(),
            },
            None => self.relationship_namespace_base.uri(&encode_local_name(rel_type)),
        }
    }

    pub fn uri_to_rel_type(&self, uri: &str) -> String {
        let (namespace, local_name) = split_local_name(uri);
        let prefix = self.prefix_or_generate(namespace);
        let local_name = decode_local_name(local_name);
        if prefix.is_empty() {
            local_name
        } else {
            format!("{}:{}", prefix, local_name)
        }
    }
}
