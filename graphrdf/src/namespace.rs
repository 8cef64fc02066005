// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Prefix and namespace bindings
//!
//! Bindings are bidirectional and one-to-one. Rebinding either side replaces
//! the old pair entirely: after `bind("a", X)` then `bind("a", Y)`, `X` no
//! longer resolves to a prefix.

use log::debug;
use std::collections::HashMap;
use uuid::Uuid;

use crate::term::Term;

/// A URI stem that builds resource terms by appending a local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full URI for a local name in this namespace
    pub fn uri(&self, local_name: &str) -> String {
        format!("{}{}", self.0, local_name)
    }

    pub fn term(&self, local_name: &str) -> Term {
        Term::Uri(self.uri(local_name))
    }
}

impl From<&str> for Namespace {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

/// Bidirectional prefix <-> namespace map
#[derive(Debug, Clone, Default)]
pub struct NamespaceRegistry {
    by_prefix: HashMap<String, String>,
    by_namespace: HashMap<String, String>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `namespace`, replacing any binding of either side
    pub fn bind(&mut self, prefix: &str, namespace: &str) {
        if let Some(old_namespace) = self.by_prefix.remove(prefix) {
            if old_namespace != namespace {
                debug!(
                    "Rebinding prefix '{}' from {} to {}",
                    prefix, old_namespace, namespace
                );
            }
            self.by_namespace.remove(&old_namespace);
        }
        if let Some(old_prefix) = self.by_namespace.remove(namespace) {
            self.by_prefix.remove(&old_prefix);
        }

        self.by_prefix
            .insert(prefix.to_string(), namespace.to_string());
        self.by_namespace
            .insert(namespace.to_string(), prefix.to_string());
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.by_prefix.get(prefix).map(String::as_str)
    }

    pub fn prefix(&self, namespace: &str) -> Option<&str> {
        self.by_namespace.get(namespace).map(String::as_str)
    }

    /// Bind the generated prefix for `namespace` and return it
    pub fn bind_generated(&mut self, namespace: &str) -> String {
        let prefix = generate_prefix(namespace);
        debug!("Generated prefix '{}' for namespace {}", prefix, namespace);
        self.bind(&prefix, namespace);
        prefix
    }

    /// All `(prefix, namespace)` pairs, sorted by prefix
    pub fn bindings(&self) -> Vec<(String, String)> {
        let mut all: Vec<(String, String)> = self
            .by_prefix
            .iter()
            .map(|(p, ns)| (p.clone(), ns.clone()))
            .collect();
        all.sort();
        all
    }

    pub fn len(&self) -> usize {
        self.by_prefix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_prefix.is_empty()
    }
}

/// A collision-resistant prefix usable as a node type or relationship prefix
///
/// Derived from the namespace alone, so a graph written in one session is
/// found again in the next without any binding being kept.
pub fn generate_prefix(namespace: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, namespace.as_bytes())
        .to_string()
        .replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_both_directions() {
        let mut registry = NamespaceRegistry::new();
        registry.bind("people", "http://www.example.org/people#");

        assert_eq!(
            registry.namespace("people"),
            Some("http://www.example.org/people#")
        );
        assert_eq!(
            registry.prefix("http://www.example.org/people#"),
            Some("people")
        );
        assert_eq!(registry.namespace("things"), None);
        assert_eq!(registry.prefix("http://nowhere/"), None);
    }

    #[test]
    fn test_rebind_prefix_clears_old_namespace() {
        let mut registry = NamespaceRegistry::new();
        registry.bind("a", "http://x/");
        registry.bind("a", "http://y/");

        assert_eq!(registry.namespace("a"), Some("http://y/"));
        assert_eq!(registry.prefix("http://y/"), Some("a"));
        assert_eq!(registry.prefix("http://x/"), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_rebind_namespace_clears_old_prefix() {
        let mut registry = NamespaceRegistry::new();
        registry.bind("a", "http://x/");
        registry.bind("b", "http://x/");

        assert_eq!(registry.prefix("http://x/"), Some("b"));
        assert_eq!(registry.namespace("b"), Some("http://x/"));
        assert_eq!(registry.namespace("a"), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_bind_generated() {
        let mut registry = NamespaceRegistry::new();
        let prefix = registry.bind_generated("http://unknown/");

        assert!(Uuid::parse_str(&prefix.replace('_', "-")).is_ok());
        assert_eq!(registry.prefix("http://unknown/"), Some(prefix.as_str()));

        assert_eq!(generate_prefix("http://unknown/"), prefix);
        assert_ne!(generate_prefix("http://other/"), prefix);
    }

    #[test]
    fn test_bindings_sorted() {
        let mut registry = NamespaceRegistry::new();
        registry.bind("b", "http://b/");
        registry.bind("", "http://rels/");
        registry.bind("a", "http://a/");

        let prefixes: Vec<String> = registry.bindings().into_iter().map(|(p, _)| p).collect();
        assert_eq!(prefixes, vec!["", "a", "b"]);
    }

    #[test]
    fn test_namespace_terms() {
        let ns = Namespace::new("http://www.example.org/people#");
        assert_eq!(ns.uri("bob"), "http://www.example.org/people#bob");
        assert_eq!(
            ns.term("bob"),
            Term::uri("http://www.example.org/people#bob")
        );
    }
}
