// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! The RDF store facade
//!
//! `RdfStore` ties together the namespace bindings, the term codec, the
//! ignored-type filter and a graph store, and exposes the triple-store
//! contract: open/close, add, remove, triples, bind and len.

use log::info;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

use crate::codec::TermCodec;
use crate::config::StoreConfig;
use crate::error::{RdfError, Result};
use crate::mutation::MutationEngine;
use crate::query::TripleIter;
use crate::storage::{GraphDataStore, GraphStore, Node, NodeRef, REFERENCE_TYPE};
use crate::term::{Triple, TriplePattern};

/// Node types hidden from the triple view
#[derive(Debug, Default)]
pub struct IgnoredTypes {
    types: RwLock<HashSet<String>>,
}

impl IgnoredTypes {
    pub fn new(ignore_reference_nodes: bool) -> Self {
        let ignored = Self::default();
        if ignore_reference_nodes {
            ignored.ignore(REFERENCE_TYPE);
        }
        ignored
    }

    pub fn ignore(&self, node_type: &str) {
        self.types.write().insert(node_type.to_string());
    }

    /// Stop ignoring `node_type`; returns whether it was ignored
    pub fn unignore(&self, node_type: &str) -> bool {
        self.types.write().remove(node_type)
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.types.read().contains(node_type)
    }

    pub fn snapshot(&self) -> HashSet<String> {
        self.types.read().clone()
    }
}

/// RDF triple store over a property graph
pub struct RdfStore {
    config: StoreConfig,
    codec: TermCodec,
    ignored: IgnoredTypes,
    data_store: Option<Arc<dyn GraphStore>>,
}

impl RdfStore {
    /// A closed store; call [`RdfStore::open`] before use
    pub fn new(config: StoreConfig) -> Self {
        let codec = TermCodec::new(
            &config.node_namespace_base,
            &config.relationship_namespace_base,
        );
        let ignored = IgnoredTypes::new(config.ignore_reference_nodes);
        Self {
            config,
            codec,
            ignored,
            data_store: None,
        }
    }

    /// A store over an existing graph store, ready for use
    pub fn with_data_store(config: StoreConfig, data_store: Arc<dyn GraphStore>) -> Self {
        let mut store = Self::new(config);
        store.data_store = Some(data_store);
        store
    }

    /// Open the graph store named by the configuration
    ///
    /// A given `config` replaces the current one. With `create` set, an
    /// existing on-disk store is removed first. An already open graph store
    /// is closed before the new one is opened.
    pub fn open(&mut self, config: Option<StoreConfig>, create: bool) -> Result<()> {
        self.close()?;
        if let Some(config) = config {
            self.apply_config(config);
        }
        let data_store = GraphDataStore::open(
            self.config.storage,
            self.config.path.as_deref(),
            create,
        )?;
        info!(
            "Opened {} store{}",
            self.config.storage,
            self.config
                .path
                .as_ref()
                .map(|p| format!(" at {}", p.display()))
                .unwrap_or_default()
        );
        self.data_store = Some(Arc::new(data_store));
        Ok(())
    }

    /// Flush and release the graph store; the store may be opened again
    pub fn close(&mut self) -> Result<()> {
        if let Some(data_store) = self.data_store.take() {
            data_store.flush()?;
            info!("Closed {} store", self.config.storage);
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.data_store.is_some()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn apply_config(&mut self, config: StoreConfig) {
        if config.node_namespace_base != self.config.node_namespace_base {
            self.codec
                .set_node_namespace_base(&config.node_namespace_base);
        }
        if config.relationship_namespace_base != self.config.relationship_namespace_base {
            self.codec
                .set_relationship_namespace_base(&config.relationship_namespace_base);
        }
        self.set_ignore_reference_nodes(config.ignore_reference_nodes);
        self.config = config;
    }

    pub fn data_store(&self) -> Result<&dyn GraphStore> {
        self.data_store.as_deref().ok_or(RdfError::StoreClosed)
    }

    pub fn codec(&self) -> &TermCodec {
        &self.codec
    }

    fn mutation_engine(&self) -> Result<MutationEngine<'_>> {
        Ok(MutationEngine::new(
            self.data_store()?,
            &self.codec,
            self.ignored.snapshot(),
        ))
    }

    pub fn add(&self, triple: &Triple) -> Result<()> {
        self.mutation_engine()?.add(triple)
    }

    /// Remove all triples matching `pattern`; returns the number removed
    pub fn remove(&self, pattern: &TriplePattern) -> Result<usize> {
        self.mutation_engine()?.remove(pattern)
    }

    /// Lazy sequence of triples matching `pattern`
    pub fn triples(&self, pattern: &TriplePattern) -> Result<TripleIter<'_>> {
        Ok(TripleIter::new(
            self.data_store()?,
            &self.codec,
            self.ignored.snapshot(),
            pattern.clone(),
        ))
    }

    pub fn contains(&self, triple: &Triple) -> Result<bool> {
        let found = self.triples(&TriplePattern::from(triple))?.next();
        found.transpose().map(|t| t.is_some())
    }

    /// Number of triples in the store, counted with a full scan
    pub fn len(&self) -> Result<usize> {
        self.triples(&TriplePattern::any())?
            .try_fold(0, |count, triple| triple.map(|_| count + 1))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.triples(&TriplePattern::any())?.next().transpose()?.is_none())
    }

    pub fn bind(&self, prefix: &str, namespace: &str) {
        self.codec.bind(prefix, namespace);
    }

    pub fn namespace(&self, prefix: &str) -> Option<String> {
        self.codec.namespace(prefix)
    }

    pub fn prefix(&self, namespace: &str) -> Option<String> {
        self.codec.prefix(namespace)
    }

    /// All `(prefix, namespace)` bindings
    pub fn namespaces(&self) -> Vec<(String, String)> {
        self.codec.bindings()
    }

    pub fn ignore(&self, node_type: &str) {
        self.ignored.ignore(node_type);
    }

    pub fn unignore(&self, node_type: &str) -> bool {
        self.ignored.unignore(node_type)
    }

    pub fn is_ignored(&self, node_type: &str) -> bool {
        self.ignored.contains(node_type)
    }

    pub fn ignores_reference_nodes(&self) -> bool {
        self.ignored.contains(REFERENCE_TYPE)
    }

    pub fn set_ignore_reference_nodes(&self, ignore: bool) {
        if ignore {
            self.ignored.ignore(REFERENCE_TYPE);
        } else {
            self.ignored.unignore(REFERENCE_TYPE);
        }
    }

    pub fn set_node_namespace_base(&mut self, base: &str) {
        self.config.node_namespace_base = base.to_string();
        self.codec.set_node_namespace_base(base);
    }

    pub fn set_relationship_namespace_base(&mut self, base: &str) {
        self.config.relationship_namespace_base = base.to_string();
        self.codec.set_relationship_namespace_base(base);
    }

    pub fn node_to_uri(&self, node: &NodeRef) -> String {
        self.codec.node_to_uri(node)
    }

    /// Node named by `uri`, created when missing if `create` is set
    pub fn uri_to_node(&self, uri: &str, create: bool) -> Result<Node> {
        self.codec.uri_to_node(self.data_store()?, uri, create)
    }
}
