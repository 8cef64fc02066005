// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Triple insertion and removal
//!
//! A literal object is stored as an attribute of the subject node named by
//! the predicate's relationship type; a resource object becomes a
//! relationship of that type from subject to object. Nodes are created on
//! demand when adding.

use log::debug;
use std::collections::HashSet;

use crate::codec::TermCodec;
use crate::error::{RdfError, Result};
use crate::query::TripleIter;
use crate::storage::{Attributes, GraphStore};
use crate::term::{Term, Triple, TriplePattern};

/// Writes triples into a graph store
pub struct MutationEngine<'a> {
    store: &'a dyn GraphStore,
    codec: &'a TermCodec,
    ignored: HashSet<String>,
}

impl<'a> MutationEngine<'a> {
    pub fn new(store: &'a dyn GraphStore, codec: &'a TermCodec, ignored: HashSet<String>) -> Self {
        Self {
            store,
            codec,
            ignored,
        }
    }

    /// Add one triple
    ///
    /// Adding the same resource triple twice creates two relationships.
    pub fn add(&self, triple: &Triple) -> Result<()> {
        let Term::Uri(subject) = &triple.subject else {
            return Err(RdfError::InvalidTermPosition("subject"));
        };
        let Term::Uri(predicate) = &triple.predicate else {
            return Err(RdfError::InvalidTermPosition("predicate"));
        };

        let rel_type = self.codec.uri_to_rel_type(predicate);
        let mut s_node = self.codec.uri_to_node(self.store, subject, true)?;

        match &triple.object {
            Term::Literal(value) => {
                debug!("Setting {} = {} on {}", rel_type, value, s_node);
                s_node.set(rel_type, value.clone());
                s_node.commit(self.store)
            }
            Term::Uri(object) => {
                let o_node = self.codec.uri_to_node(self.store, object, true)?;
                debug!(
                    "Creating relationship of type {} from {} to {}",
                    rel_type, s_node, o_node
                );
                self.store
                    .create_relationship(
                        &rel_type,
                        &s_node.node_ref,
                        &o_node.node_ref,
                        Attributes::new(),
                    )
                    .map(|_| ())
            }
        }
    }

    /// Remove every triple matching `pattern`, returning how many were removed
    ///
    /// Matches are collected before anything is changed. An attribute is only
    /// cleared while it still holds the matched value; a relationship is only
    /// deleted when its target is exactly the matched node.
    pub fn remove(&self, pattern: &TriplePattern) -> Result<usize> {
        let matches = TripleIter::new(
            self.store,
            self.codec,
            self.ignored.clone(),
            pattern.clone(),
        )
        .collect::<Result<Vec<Triple>>>()?;

        let mut removed = 0;
        for triple in matches {
            let (Some(subject), Some(predicate)) =
                (triple.subject.as_uri(), triple.predicate.as_uri())
            else {
                continue;
            };
            let rel_type = self.codec.uri_to_rel_type(predicate);
            let mut s_node = match self.codec.uri_to_node(self.store, subject, false) {
                Ok(node) => node,
                Err(RdfError::NodeNotFound { .. }) => continue,
                Err(e) => return Err(e),
            };

            match &triple.object {
                Term::Literal(value) => {
                    if s_node.get(&rel_type) == Some(value) {
                        s_node.remove(&rel_type);
                        s_node.commit(self.store)?;
                        debug!("Removed {}", triple);
                        removed += 1;
                    }
                }
                Term::Uri(object) => {
                    let o_ref = self.codec.uri_to_node_ref(object);
                    if self.ignored.contains(&o_ref.node_type) {
                        continue;
                    }
                    let mut deleted = 0;
                    for rel in
                        self.store
                            .relationships_with(&s_node.node_ref, &rel_type, &o_ref.key)?
                    {
                        if rel.source == s_node.node_ref && rel.target == o_ref {
                            rel.delete(self.store)?;
                            deleted += 1;
                        }
                    }
                    if deleted > 0 {
                        debug!("Removed {} ({} relationship(s))", triple, deleted);
                        removed += deleted;
                    }
                }
            }
        }
        Ok(removed)
    }
}
