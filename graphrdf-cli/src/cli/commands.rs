// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command definitions for GraphRDF

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only errors
    Error,
    /// Warnings and errors
    Warn,
    /// Info, warnings, and errors
    Info,
    /// Debug messages and above (verbose)
    Debug,
    /// All messages including trace (very verbose)
    Trace,
    /// Disable all logging
    Off,
}

impl LogLevel {
    /// Convert to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// Default on-disk store location
pub const DEFAULT_PATH: &str = "./graphrdf.db";

/// GraphRDF CLI - RDF triples over a property graph
#[derive(Parser)]
#[command(name = "graphrdf")]
#[command(about = "GraphRDF - an RDF triple store over a property graph")]
#[command(version)]
pub struct Cli {
    /// Store directory (on-disk sled store)
    #[arg(long, global = true, conflicts_with = "memory")]
    pub path: Option<PathBuf>,

    /// Use a throwaway in-memory store
    #[arg(long, global = true)]
    pub memory: bool,

    /// JSON configuration file
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Bind a namespace prefix, as PREFIX=URI (repeatable)
    #[arg(short = 'b', long = "bind", global = true, value_parser = parse_binding)]
    pub bind: Vec<(String, String)>,

    /// Set log level (error, warn, info, debug, trace, off)
    #[arg(short = 'l', long = "log-level", global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Verbose mode (equivalent to --log-level debug)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show detailed version information
    Version,

    /// Add one triple
    Add {
        subject: String,
        predicate: String,
        object: String,
    },

    /// Remove every triple matching a pattern (`_` is a wildcard)
    Remove {
        subject: String,
        predicate: String,
        object: String,
    },

    /// List triples matching a pattern (`_` is a wildcard)
    Triples {
        #[arg(default_value = "_")]
        subject: String,
        #[arg(default_value = "_")]
        predicate: String,
        #[arg(default_value = "_")]
        object: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Count all triples
    Len,

    /// List namespace bindings
    Namespaces {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Interactive triple console (REPL)
    Shell,
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Parse a `PREFIX=URI` binding
pub fn parse_binding(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((prefix, uri)) if !uri.is_empty() => Ok((prefix.to_string(), uri.to_string())),
        _ => Err(format!("Expected PREFIX=URI, got '{}'", s)),
    }
}
