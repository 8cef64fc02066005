// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Strategy evaluation against one store, codec and ignored-type set

use log::{debug, warn};
use std::collections::{HashSet, VecDeque};

use super::scan::NodeScan;
use super::{State, Strategy};
use crate::codec::TermCodec;
use crate::error::Result;
use crate::storage::{is_internal_attribute, Direction, GraphStore, Node};
use crate::term::{Term, Triple, TriplePattern, Value};

/// Which triples of a node to produce
///
/// `rel_type` restricts both edges and attributes to that name; `value`
/// keeps only attributes equal to it. A fixed `predicate` term is reused
/// instead of re-encoding the name.
#[derive(Debug, Clone, Default)]
pub(crate) struct Selector {
    pub rel_type: Option<String>,
    pub predicate: Option<Term>,
    pub value: Option<Value>,
    pub edges: bool,
}

impl Selector {
    fn everything() -> Self {
        Self {
            edges: true,
            ..Self::default()
        }
    }

    fn named(rel_type: String, predicate: Term) -> Self {
        Self {
            rel_type: Some(rel_type),
            predicate: Some(predicate),
            edges: true,
            ..Self::default()
        }
    }

    fn attributes_equal(value: Value) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }
}

pub(crate) struct QueryContext<'a> {
    pub store: &'a dyn GraphStore,
    pub codec: &'a TermCodec,
    ignored: HashSet<String>,
}

impl<'a> QueryContext<'a> {
    pub fn new(store: &'a dyn GraphStore, codec: &'a TermCodec, ignored: HashSet<String>) -> Self {
        Self {
            store,
            codec,
            ignored,
        }
    }

    pub fn is_ignored(&self, node_type: &str) -> bool {
        self.ignored.contains(node_type)
    }

    pub fn subject_term(&self, node: &Node) -> Term {
        Term::Uri(self.codec.node_to_uri(&node.node_ref))
    }

    /// Existing node named by `term`, or `None` for an ignored type
    fn resource_node(&self, term: &Term) -> Result<Option<Node>> {
        let Some(uri) = term.as_uri() else {
            return Ok(None);
        };
        let node = self.codec.uri_to_node(self.store, uri, false)?;
        if self.is_ignored(node.node_type()) {
            debug!("{} is of an ignored type", node);
            return Ok(None);
        }
        Ok(Some(node))
    }

    fn rel_type(&self, predicate: &Term) -> Option<String> {
        predicate
            .as_uri()
            .map(|uri| self.codec.uri_to_rel_type(uri))
    }

    fn emit(out: &mut VecDeque<Triple>, triple: Triple) {
        debug!("Found {}", triple);
        out.push_back(triple);
    }

    /// Outgoing edges then attributes of `node`, as selected
    pub fn node_triples(
        &self,
        node: &Node,
        subject: &Term,
        selector: &Selector,
        out: &mut VecDeque<Triple>,
    ) -> Result<()> {
        if selector.edges {
            let rels = self.store.relationships(
                &node.node_ref,
                selector.rel_type.as_deref(),
                Direction::Outgoing,
            )?;
            for rel in rels {
                if self.is_ignored(&rel.target.node_type) {
                    continue;
                }
                let predicate = match &selector.predicate {
                    Some(predicate) => predicate.clone(),
                    None => Term::Uri(self.codec.rel_type_to_uri(&rel.rel_type)),
                };
                let object = Term::Uri(self.codec.node_to_uri(&rel.target));
                Self::emit(out, Triple::new(subject.clone(), predicate, object));
            }
        }

        for (name, value) in node.public_attributes() {
            if selector.rel_type.as_ref().map_or(false, |n| n != name) {
                continue;
            }
            if selector.value.as_ref().map_or(false, |v| v != value) {
                continue;
            }
            let predicate = match &selector.predicate {
                Some(predicate) => predicate.clone(),
                None => Term::Uri(self.codec.rel_type_to_uri(name)),
            };
            Self::emit(
                out,
                Triple::new(subject.clone(), predicate, Term::Literal(value.clone())),
            );
        }
        Ok(())
    }

    fn scan(&self, strategy: Strategy, selector: Selector) -> Result<State> {
        warn!(
            "Query by {} requires full store traversal",
            strategy.name()
        );
        Ok(State::Scanning {
            scan: NodeScan::start(self)?,
            selector,
            pending: VecDeque::new(),
        })
    }

    /// Evaluate `strategy` up to its first store-wide step
    pub fn start(&self, strategy: Strategy, pattern: TriplePattern) -> Result<State> {
        debug!("Finding triples by {}", strategy);
        let mut out = VecDeque::new();
        let TriplePattern {
            subject,
            predicate,
            object,
        } = pattern;

        match (subject, predicate, object) {
            (Some(s), Some(p), Some(o)) => {
                let (Some(s_node), Some(rel_type)) = (self.resource_node(&s)?, self.rel_type(&p))
                else {
                    return Ok(State::Done);
                };
                match &o {
                    Term::Literal(value) => {
                        if s_node.get(&rel_type) == Some(value)
                            && !is_internal_attribute(&rel_type)
                        {
                            Self::emit(&mut out, Triple::new(s, p, o.clone()));
                        }
                    }
                    Term::Uri(uri) => {
                        let o_ref = self.codec.uri_to_node_ref(uri);
                        if self.is_ignored(&o_ref.node_type) {
                            return Ok(State::Done);
                        }
                        let rels =
                            self.store
                                .relationships_with(&s_node.node_ref, &rel_type, &o_ref.key)?;
                        for rel in rels {
                            if rel.source == s_node.node_ref && rel.target == o_ref {
                                Self::emit(&mut out, Triple::new(s.clone(), p.clone(), o.clone()));
                            }
                        }
                    }
                }
            }
            (Some(s), Some(p), None) => {
                let (Some(s_node), Some(rel_type)) = (self.resource_node(&s)?, self.rel_type(&p))
                else {
                    return Ok(State::Done);
                };
                self.node_triples(&s_node, &s, &Selector::named(rel_type, p), &mut out)?;
            }
            (Some(s), None, Some(o)) => {
                let Some(s_node) = self.resource_node(&s)? else {
                    return Ok(State::Done);
                };
                match &o {
                    Term::Literal(value) => {
                        self.node_triples(
                            &s_node,
                            &s,
                            &Selector::attributes_equal(value.clone()),
                            &mut out,
                        )?;
                    }
                    Term::Uri(_) => {
                        let Some(o_node) = self.resource_node(&o)? else {
                            return Ok(State::Done);
                        };
                        let rels =
                            self.store
                                .relationships(&s_node.node_ref, None, Direction::Outgoing)?;
                        for rel in rels {
                            if rel.target == o_node.node_ref {
                                let predicate =
                                    Term::Uri(self.codec.rel_type_to_uri(&rel.rel_type));
                                Self::emit(&mut out, Triple::new(s.clone(), predicate, o.clone()));
                            }
                        }
                    }
                }
            }
            (Some(s), None, None) => {
                let Some(s_node) = self.resource_node(&s)? else {
                    return Ok(State::Done);
                };
                self.node_triples(&s_node, &s, &Selector::everything(), &mut out)?;
            }
            (None, Some(p), Some(o)) => {
                let Some(rel_type) = self.rel_type(&p) else {
                    return Ok(State::Done);
                };
                match &o {
                    Term::Literal(value) => {
                        let selector = Selector {
                            rel_type: Some(rel_type),
                            predicate: Some(p),
                            value: Some(value.clone()),
                            edges: false,
                        };
                        return self.scan(strategy, selector);
                    }
                    Term::Uri(_) => {
                        let Some(o_node) = self.resource_node(&o)? else {
                            return Ok(State::Done);
                        };
                        let rels = self.store.relationships(
                            &o_node.node_ref,
                            Some(&rel_type),
                            Direction::Incoming,
                        )?;
                        for rel in rels {
                            if self.is_ignored(&rel.source.node_type) {
                                continue;
                            }
                            let subject = Term::Uri(self.codec.node_to_uri(&rel.source));
                            Self::emit(&mut out, Triple::new(subject, p.clone(), o.clone()));
                        }
                    }
                }
            }
            (None, Some(p), None) => {
                let Some(rel_type) = self.rel_type(&p) else {
                    return Ok(State::Done);
                };
                return self.scan(strategy, Selector::named(rel_type, p));
            }
            (None, None, Some(o)) => match &o {
                Term::Literal(value) => {
                    return self.scan(strategy, Selector::attributes_equal(value.clone()));
                }
                Term::Uri(_) => {
                    let Some(o_node) = self.resource_node(&o)? else {
                        return Ok(State::Done);
                    };
                    let rels = self
                        .store
                        .relationships(&o_node.node_ref, None, Direction::Incoming)?;
                    for rel in rels {
                        if self.is_ignored(&rel.source.node_type) {
                            continue;
                        }
                        let subject = Term::Uri(self.codec.node_to_uri(&rel.source));
                        let predicate = Term::Uri(self.codec.rel_type_to_uri(&rel.rel_type));
                        Self::emit(&mut out, Triple::new(subject, predicate, o.clone()));
                    }
                }
            },
            (None, None, None) => {
                return self.scan(strategy, Selector::everything());
            }
        }
        Ok(State::Ready(out))
    }
}
