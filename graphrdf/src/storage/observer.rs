// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Node change notifications
//!
//! Search indexes and similar mirrors register a `NodeObserver` with the
//! graph store and are told about every create, modify and delete of a
//! non-reference node.

use parking_lot::RwLock;
use std::sync::Arc;

use super::Node;

/// Receiver of node change notifications
pub trait NodeObserver: Send + Sync {
    fn on_create(&self, node: &Node);

    fn on_delete(&self, node: &Node);

    fn on_modify(&self, node: &Node);
}

/// Registered observers of one graph store
#[derive(Default)]
pub(crate) struct ObserverList {
    observers: RwLock<Vec<Arc<dyn NodeObserver>>>,
}

impl ObserverList {
    pub fn add(&self, observer: Arc<dyn NodeObserver>) {
        self.observers.write().push(observer);
    }

    pub fn notify_create(&self, node: &Node) {
        if node.node_ref.is_reference() {
            return;
        }
        for observer in self.observers.read().iter() {
            observer.on_create(node);
        }
    }

    pub fn notify_delete(&self, node: &Node) {
        if node.node_ref.is_reference() {
            return;
        }
        for observer in self.observers.read().iter() {
            observer.on_delete(node);
        }
    }

    pub fn notify_modify(&self, node: &Node) {
        if node.node_ref.is_reference() {
            return;
        }
        for observer in self.observers.read().iter() {
            observer.on_modify(node);
        }
    }
}
