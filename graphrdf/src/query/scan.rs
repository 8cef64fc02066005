// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Full-store node enumeration through reference containment

use log::debug;
use std::collections::VecDeque;

use super::QueryContext;
use crate::error::{RdfError, Result};
use crate::storage::{Direction, Node, NodeRef, INSTANCE_REL};

/// Cursor over every node of every non-ignored type
///
/// The root reference node lists one reference node per type; each of those
/// lists its members. Members are fetched one at a time, and a member deleted
/// since its reference node was read is skipped.
pub(crate) struct NodeScan {
    references: VecDeque<NodeRef>,
    members: VecDeque<NodeRef>,
}

impl NodeScan {
    pub fn start(ctx: &QueryContext<'_>) -> Result<Self> {
        let root = ctx.store.get_reference_node(None)?;
        let references = ctx
            .store
            .relationships(&root.node_ref, Some(INSTANCE_REL), Direction::Outgoing)?
            .into_iter()
            .map(|rel| rel.target)
            .filter(|reference| !ctx.is_ignored(&reference.key))
            .collect();
        Ok(Self {
            references,
            members: VecDeque::new(),
        })
    }

    pub fn next_node(&mut self, ctx: &QueryContext<'_>) -> Result<Option<Node>> {
        loop {
            if let Some(member) = self.members.pop_front() {
                match ctx.store.get_node(&member.node_type, &member.key) {
                    Ok(node) => return Ok(Some(node)),
                    Err(RdfError::NodeNotFound { .. }) => {
                        debug!("{} disappeared during scan", member);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            let Some(reference) = self.references.pop_front() else {
                return Ok(None);
            };
            debug!("Scanning members of {}", reference);
            self.members = ctx
                .store
                .relationships(&reference, Some(INSTANCE_REL), Direction::Outgoing)?
                .into_iter()
                .map(|rel| rel.target)
                .filter(|member| !ctx.is_ignored(&member.node_type))
                .collect();
        }
    }
}
