// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for GraphRDF
//!
//! Provides one-off triple commands over an on-disk or in-memory store and an
//! interactive triple console (REPL).

pub mod commands;
pub mod handlers;
pub mod output;
pub mod terms;

pub use commands::{Cli, Commands};
pub use handlers::{
    handle_add, handle_len, handle_namespaces, handle_remove, handle_shell, handle_triples,
    handle_version, StoreOptions,
};
