// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Tree key layout for the graph data store
//!
//! Every component is written as a big-endian `u32` length followed by its
//! bytes, so identifiers may contain any byte and prefixes stop exactly at
//! component boundaries.

use super::persistent::{StorageDriverError, StorageResult};
use super::NodeRef;

const OUTGOING: u8 = b'o';
const INCOMING: u8 = b'i';

/// Side of an adjacency entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Outgoing,
    Incoming,
}

impl Side {
    fn tag(self) -> u8 {
        match self {
            Side::Outgoing => OUTGOING,
            Side::Incoming => INCOMING,
        }
    }
}

fn push_component(buf: &mut Vec<u8>, part: &str) {
    buf.extend_from_slice(&(part.len() as u32).to_be_bytes());
    buf.extend_from_slice(part.as_bytes());
}

pub(crate) fn encode(parts: &[&str]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(parts.iter().map(|p| p.len() + 4).sum());
    for part in parts {
        push_component(&mut buf, part);
    }
    buf
}

pub(crate) fn decode(mut bytes: &[u8]) -> StorageResult<Vec<String>> {
    let mut parts = Vec::new();
    while !bytes.is_empty() {
        if bytes.len() < 4 {
            return Err(StorageDriverError::InvalidKey(
                "truncated length header".to_string(),
            ));
        }
        let len = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        let rest = &bytes[4..];
        if rest.len() < len {
            return Err(StorageDriverError::InvalidKey(
                "truncated component".to_string(),
            ));
        }
        let part = std::str::from_utf8(&rest[..len])
            .map_err(|e| StorageDriverError::InvalidKey(e.to_string()))?;
        parts.push(part.to_string());
        bytes = &rest[len..];
    }
    Ok(parts)
}

pub(crate) fn node_key(node: &NodeRef) -> Vec<u8> {
    encode(&[&node.node_type, &node.key])
}

pub(crate) fn relationship_key(rel_type: &str, key: &str) -> Vec<u8> {
    encode(&[rel_type, key])
}

pub(crate) fn adjacency_key(side: Side, node: &NodeRef, rel_type: &str, rel_key: &str) -> Vec<u8> {
    let mut buf = vec![side.tag()];
    buf.extend(encode(&[&node.node_type, &node.key, rel_type, rel_key]));
    buf
}

pub(crate) fn adjacency_prefix(side: Side, node: &NodeRef, rel_type: Option<&str>) -> Vec<u8> {
    let mut buf = vec![side.tag()];
    push_component(&mut buf, &node.node_type);
    push_component(&mut buf, &node.key);
    if let Some(rel_type) = rel_type {
        push_component(&mut buf, rel_type);
    }
    buf
}

/// `(rel_type, rel_key)` named by an adjacency key
pub(crate) fn decode_adjacency(key: &[u8]) -> StorageResult<(String, String)> {
    let body = key
        .get(1..)
        .ok_or_else(|| StorageDriverError::InvalidKey("empty adjacency key".to_string()))?;
    let mut parts = decode(body)?;
    if parts.len() != 4 {
        return Err(StorageDriverError::InvalidKey(format!(
            "adjacency key has {} components",
            parts.len()
        )));
    }
    let rel_key = parts.pop().unwrap_or_default();
    let rel_type = parts.pop().unwrap_or_default();
    Ok((rel_type, rel_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_with_separators_stay_distinct() {
        let a = encode(&["a\0b", "c"]);
        let b = encode(&["a", "b\0c"]);
        assert_ne!(a, b);
        assert_eq!(decode(&a).unwrap(), vec!["a\0b", "c"]);
    }

    #[test]
    fn test_prefix_stops_at_component_boundary() {
        let bob = NodeRef::new("people", "bob");
        let bobby = NodeRef::new("people", "bobby");
        let key = adjacency_key(Side::Outgoing, &bobby, "likes", "r1");
        let prefix = adjacency_prefix(Side::Outgoing, &bob, None);
        assert!(!key.starts_with(&prefix));

        let own = adjacency_key(Side::Outgoing, &bob, "likes", "r1");
        assert!(own.starts_with(&prefix));
        assert!(own.starts_with(&adjacency_prefix(Side::Outgoing, &bob, Some("likes"))));
        assert!(!own.starts_with(&adjacency_prefix(Side::Incoming, &bob, None)));
    }

    #[test]
    fn test_decode_adjacency() {
        let node = NodeRef::new("people", "bob");
        let key = adjacency_key(Side::Incoming, &node, "relations:hates", "r-9");
        assert_eq!(
            decode_adjacency(&key).unwrap(),
            ("relations:hates".to_string(), "r-9".to_string())
        );
        assert!(decode_adjacency(&[OUTGOING, 0, 0]).is_err());
    }
}
