// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Triple-pattern dispatch over the graph
//!
//! A pattern is answered by one of eight strategies chosen purely by which of
//! subject, predicate and object are bound. Results come out of a lazy
//! [`TripleIter`]: nothing touches the store until the first `next()`, and a
//! full-store scan reads one node per step, so a caller that stops early does
//! no further I/O. Iteration reads live store state; there is no snapshot.

mod context;
mod scan;

use log::debug;
use std::collections::{HashSet, VecDeque};
use std::fmt;

use crate::codec::TermCodec;
use crate::error::{RdfError, Result};
use crate::storage::GraphStore;
use crate::term::{Triple, TriplePattern};

pub(crate) use context::QueryContext;
use context::Selector;
use scan::NodeScan;

/// Traversal chosen for a pattern, named by its bound positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Spo,
    Sp,
    So,
    S,
    Po,
    P,
    O,
    All,
}

impl Strategy {
    pub fn select(pattern: &TriplePattern) -> Self {
        match (
            pattern.subject.is_some(),
            pattern.predicate.is_some(),
            pattern.object.is_some(),
        ) {
            (true, true, true) => Strategy::Spo,
            (true, true, false) => Strategy::Sp,
            (true, false, true) => Strategy::So,
            (true, false, false) => Strategy::S,
            (false, true, true) => Strategy::Po,
            (false, true, false) => Strategy::P,
            (false, false, true) => Strategy::O,
            (false, false, false) => Strategy::All,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Spo => "spo",
            Strategy::Sp => "sp",
            Strategy::So => "so",
            Strategy::S => "s",
            Strategy::Po => "po",
            Strategy::P => "p",
            Strategy::O => "o",
            Strategy::All => "all",
        }
    }

    /// Whether every node may have to be visited
    ///
    /// `Po` and `O` only scan when the object is a literal.
    pub fn may_scan(&self) -> bool {
        matches!(
            self,
            Strategy::Po | Strategy::P | Strategy::O | Strategy::All
        )
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Evaluation state of a [`TripleIter`]
pub(crate) enum State {
    /// Not started; the store has not been read
    Pending(Strategy, TriplePattern),
    /// Triples of a strategy answered from one node's neighbourhood
    Ready(VecDeque<Triple>),
    /// A full-store scan with the triples of the current node
    Scanning {
        scan: NodeScan,
        selector: Selector,
        pending: VecDeque<Triple>,
    },
    Done,
}

/// Lazy sequence of triples matching a pattern
///
/// A `NodeNotFound` met while evaluating ends the sequence without an error.
/// Any other error is yielded once and the sequence ends after it.
pub struct TripleIter<'a> {
    ctx: QueryContext<'a>,
    state: State,
}

impl<'a> TripleIter<'a> {
    pub(crate) fn new(
        store: &'a dyn GraphStore,
        codec: &'a TermCodec,
        ignored: HashSet<String>,
        pattern: TriplePattern,
    ) -> Self {
        debug!("Looking for triple {}", pattern);
        let ctx = QueryContext::new(store, codec, ignored);
        let state = if pattern.subject.as_ref().map_or(false, |t| t.is_literal())
            || pattern.predicate.as_ref().map_or(false, |t| t.is_literal())
        {
            debug!("Subject and predicate can't be literals; no triples");
            State::Done
        } else {
            State::Pending(Strategy::select(&pattern), pattern)
        };
        Self { ctx, state }
    }

    /// Strategy this iterator runs, or `None` once it is exhausted
    pub fn strategy(&self) -> Option<Strategy> {
        match &self.state {
            State::Pending(strategy, _) => Some(*strategy),
            _ => None,
        }
    }

    fn advance(&mut self) -> Result<Option<Triple>> {
        loop {
            match &mut self.state {
                State::Pending(strategy, pattern) => {
                    let strategy = *strategy;
                    let pattern = std::mem::take(pattern);
                    self.state = self.ctx.start(strategy, pattern)?;
                }
                State::Ready(triples) => return Ok(triples.pop_front()),
                State::Scanning {
                    scan,
                    selector,
                    pending,
                } => {
                    if let Some(triple) = pending.pop_front() {
                        return Ok(Some(triple));
                    }
                    match scan.next_node(&self.ctx)? {
                        Some(node) => {
                            let subject = self.ctx.subject_term(&node);
                            self.ctx
                                .node_triples(&node, &subject, selector, pending)?;
                        }
                        None => return Ok(None),
                    }
                }
                State::Done => return Ok(None),
            }
        }
    }
}

impl Iterator for TripleIter<'_> {
    type Item = Result<Triple>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(Some(triple)) => Some(Ok(triple)),
            Ok(None) => {
                self.state = State::Done;
                None
            }
            Err(RdfError::NodeNotFound { node_type, key }) => {
                debug!(
                    "Failed to find any triples; no node {}/{}",
                    node_type, key
                );
                self.state = State::Done;
                None
            }
            Err(e) => {
                self.state = State::Done;
                Some(Err(e))
            }
        }
    }
}
