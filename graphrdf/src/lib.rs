// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! GraphRDF - an RDF triple-store view over a property graph
//!
//! Callers add, remove and query `(subject, predicate, object)` triples while
//! the data itself lives as typed nodes joined by typed relationships:
//!
//! - a literal object becomes a scalar attribute on the subject node
//! - a resource object becomes a relationship from subject to object
//!
//! # Quick Start
//!
//! ```no_run
//! use graphrdf::{Namespace, RdfStore, StoreConfig, Term, Triple, TriplePattern};
//!
//! # fn main() -> graphrdf::Result<()> {
//! let mut store = RdfStore::new(StoreConfig::default());
//! store.open(None, true)?;
//!
//! let people = Namespace::new("http://www.example.org/people#");
//! let rels = Namespace::new("http://www.example.org/relations/");
//! store.bind("people", people.as_str());
//! store.bind("relations", rels.as_str());
//!
//! store.add(&Triple::new(people.term("bob"), rels.term("named"), Term::literal("Bob")))?;
//!
//! for triple in store.triples(&TriplePattern::new(Some(people.term("bob")), None, None))? {
//!     println!("{}", triple?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`namespace`] - prefix and namespace bindings
//! - [`codec`] - conversion between URIs and graph identifiers
//! - [`query`] - triple-pattern dispatch over the graph
//! - [`mutation`] - triple insertion and removal
//! - [`store`] - the RDF store facade
//! - [`storage`] - the graph store contract and its bundled implementation

pub mod codec;
pub mod config;
pub mod error;
pub mod mutation;
pub mod namespace;
pub mod query;
pub mod storage;
pub mod store;
pub mod term;

pub use codec::TermCodec;
pub use config::StoreConfig;
pub use error::{RdfError, Result};
pub use mutation::MutationEngine;
pub use namespace::{Namespace, NamespaceRegistry};
pub use query::{Strategy, TripleIter};
pub use storage::{
    Attributes, Direction, GraphDataStore, GraphStore, Node, NodeObserver, NodeRef, Relationship,
    StorageDriverError, StorageType,
};
pub use store::{IgnoredTypes, RdfStore};
pub use term::{Term, Triple, TriplePattern, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
