// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for GraphRDF

use colored::Colorize;
use rustyline::{error::ReadlineError, CompletionType, Config, EditMode, Editor};
use std::path::{Path, PathBuf};

use super::commands::{OutputFormat, DEFAULT_PATH};
use super::output::ResultFormatter;
use super::terms::{parse_bound_term, parse_term, split_words};
use graphrdf::{RdfStore, StoreConfig, Triple, TriplePattern};

/// Where and how to open the store, as given on the command line
pub struct StoreOptions {
    pub path: Option<PathBuf>,
    pub memory: bool,
    pub config: Option<PathBuf>,
    pub bind: Vec<(String, String)>,
}

/// Open the store described by `options`
///
/// A configuration file is read first; `--path` and `--memory` override its
/// storage settings, and `--bind` bindings are applied last.
pub fn open_store(options: &StoreOptions) -> Result<RdfStore, Box<dyn std::error::Error>> {
    let mut config = match &options.config {
        Some(file) => StoreConfig::from_json_file(file)?,
        None => StoreConfig::sled(DEFAULT_PATH),
    };
    if options.memory {
        config.storage = graphrdf::StorageType::Memory;
        config.path = None;
    } else if let Some(path) = &options.path {
        config.storage = graphrdf::StorageType::Sled;
        config.path = Some(path.clone());
    }

    let mut store = RdfStore::new(config);
    store
        .open(None, false)
        .map_err(|e| format!("Failed to open store: {}", e))?;
    for (prefix, namespace) in &options.bind {
        store.bind(prefix, namespace);
    }
    Ok(store)
}

fn resolver(store: &RdfStore) -> impl Fn(&str) -> Option<String> + '_ {
    move |prefix| store.namespace(prefix)
}

fn parse_triple(
    store: &RdfStore,
    subject: &str,
    predicate: &str,
    object: &str,
) -> Result<Triple, String> {
    let resolve = resolver(store);
    Ok(Triple::new(
        parse_bound_term(subject, &resolve)?,
        parse_bound_term(predicate, &resolve)?,
        parse_bound_term(object, &resolve)?,
    ))
}

fn parse_pattern(
    store: &RdfStore,
    subject: &str,
    predicate: &str,
    object: &str,
) -> Result<TriplePattern, String> {
    let resolve = resolver(store);
    Ok(TriplePattern::new(
        parse_term(subject, &resolve)?,
        parse_term(predicate, &resolve)?,
        parse_term(object, &resolve)?,
    ))
}

/// Handle the add command
pub fn handle_add(
    options: &StoreOptions,
    subject: &str,
    predicate: &str,
    object: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(options)?;
    add_triple(&store, subject, predicate, object)?;
    store.close()?;
    Ok(())
}

fn add_triple(
    store: &RdfStore,
    subject: &str,
    predicate: &str,
    object: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let triple = parse_triple(store, subject, predicate, object)?;
    store.add(&triple)?;
    println!("{}", format!("Added {}", triple).green());
    Ok(())
}

/// Handle the remove command
pub fn handle_remove(
    options: &StoreOptions,
    subject: &str,
    predicate: &str,
    object: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(options)?;
    remove_triples(&store, subject, predicate, object)?;
    store.close()?;
    Ok(())
}

fn remove_triples(
    store: &RdfStore,
    subject: &str,
    predicate: &str,
    object: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let pattern = parse_pattern(store, subject, predicate, object)?;
    let removed = store.remove(&pattern)?;
    println!("{}", format!("Removed {} triple(s)", removed).green());
    Ok(())
}

/// Handle the triples command
pub fn handle_triples(
    options: &StoreOptions,
    subject: &str,
    predicate: &str,
    object: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(options)?;
    print_triples(&store, subject, predicate, object, format)
}

fn print_triples(
    store: &RdfStore,
    subject: &str,
    predicate: &str,
    object: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let pattern = parse_pattern(store, subject, predicate, object)?;
    let triples = store
        .triples(&pattern)?
        .collect::<graphrdf::Result<Vec<_>>>()?;
    println!(
        "{}",
        ResultFormatter::triples(&triples, &store.namespaces(), format)
    );
    Ok(())
}

/// Handle the len command
pub fn handle_len(options: &StoreOptions) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(options)?;
    println!("{}", store.len()?);
    Ok(())
}

/// Handle the namespaces command
pub fn handle_namespaces(
    options: &StoreOptions,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(options)?;
    println!(
        "{}",
        ResultFormatter::namespaces(&sorted_namespaces(&store), format)
    );
    Ok(())
}

fn sorted_namespaces(store: &RdfStore) -> Vec<(String, String)> {
    let mut bindings = store.namespaces();
    bindings.sort();
    bindings
}

/// Handle the version command
pub fn handle_version() {
    println!("{} {}", "graphrdf".bold().green(), env!("CARGO_PKG_VERSION"));
    println!("Library version: {}", graphrdf::VERSION);
    println!(
        "Default node namespace base: {}",
        graphrdf::config::DEFAULT_NODE_NAMESPACE_BASE
    );
    println!(
        "Default relationship namespace base: {}",
        graphrdf::config::DEFAULT_RELATIONSHIP_NAMESPACE_BASE
    );
}

/// Handle the shell command (REPL)
pub fn handle_shell(options: &StoreOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(options)?;

    println!("{}", "GraphRDF".bold().green());
    println!("Type 'help' for commands, 'exit' or 'quit' to exit");
    println!(
        "{}",
        format!("Storage: {}", describe_storage(store.config())).cyan()
    );

    let config = Config::builder()
        .edit_mode(EditMode::Emacs)
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .auto_add_history(false)
        .build();

    let mut rl = Editor::<(), _>::with_config(config)?;

    let history_path = ".graphrdf/.shell_history.txt";
    if let Some(parent) = Path::new(&history_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let _ = rl.load_history(&history_path);

    loop {
        let line = match rl.readline(&format!("{} ", "rdf>".cyan())) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        rl.add_history_entry(trimmed)?;

        match run_shell_line(&store, trimmed) {
            Ok(ShellFlow::Continue) => {}
            Ok(ShellFlow::Exit) => {
                println!("{}", "Goodbye!".green());
                break;
            }
            Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
        }
    }

    let _ = rl.save_history(&history_path);
    store.close()?;

    Ok(())
}

#[derive(Debug, PartialEq)]
enum ShellFlow {
    Continue,
    Exit,
}

fn run_shell_line(store: &RdfStore, line: &str) -> Result<ShellFlow, Box<dyn std::error::Error>> {
    let words = split_words(line)?;
    let Some((verb, args)) = words.split_first() else {
        return Ok(ShellFlow::Continue);
    };
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match (verb.to_lowercase().as_str(), args.as_slice()) {
        ("exit" | "quit", _) => return Ok(ShellFlow::Exit),
        ("help", _) => print_help(),
        ("clear", _) => {
            print!("\x1B[2J\x1B[1;1H");
            std::io::Write::flush(&mut std::io::stdout())?;
        }
        ("add", [s, p, o]) => add_triple(store, s, p, o)?,
        ("remove", [s, p, o]) => remove_triples(store, s, p, o)?,
        ("triples", pattern) if pattern.len() <= 3 => {
            let term = |i: usize| pattern.get(i).copied().unwrap_or("_");
            print_triples(store, term(0), term(1), term(2), OutputFormat::Table)?;
        }
        ("len", []) => println!("{}", store.len()?),
        ("namespaces", []) => println!(
            "{}",
            ResultFormatter::namespaces(&sorted_namespaces(store), OutputFormat::Table)
        ),
        ("bind", [prefix, namespace]) => {
            let namespace = namespace
                .strip_prefix('<')
                .and_then(|n| n.strip_suffix('>'))
                .unwrap_or(*namespace);
            store.bind(prefix, namespace);
            println!("{}", format!("Bound {} to {}", prefix, namespace).green());
        }
        ("ignore", [node_type]) => {
            store.ignore(node_type);
            println!("{}", format!("Ignoring node type {}", node_type).green());
        }
        ("unignore", [node_type]) => {
            if store.unignore(node_type) {
                println!("{}", format!("No longer ignoring {}", node_type).green());
            } else {
                println!("{}", format!("{} was not ignored", node_type).yellow());
            }
        }
        (verb, _) => {
            return Err(format!("Unknown command or wrong arguments: {} (try 'help')", verb).into())
        }
    }
    Ok(ShellFlow::Continue)
}

fn describe_storage(config: &StoreConfig) -> String {
    match &config.path {
        Some(path) => format!("{} at {}", config.storage, path.display()),
        None => config.storage.to_string(),
    }
}

/// Print help message
fn print_help() {
    println!("{}", "Available commands:".bold().green());
    println!("  {}  - Add a triple", "add <s> <p> <o>".cyan());
    println!("  {}  - Remove matching triples", "remove <s> <p> <o>".cyan());
    println!("  {}  - List matching triples", "triples [s] [p] [o]".cyan());
    println!("  {}  - Count all triples", "len".cyan());
    println!("  {}  - List namespace bindings", "namespaces".cyan());
    println!("  {}  - Bind a prefix", "bind <prefix> <uri>".cyan());
    println!("  {}  - Hide a node type", "ignore <type>".cyan());
    println!("  {}  - Show a hidden node type", "unignore <type>".cyan());
    println!("  {}  - Show this help message", "help".cyan());
    println!("  {}  - Clear the screen", "clear".cyan());
    println!("  {}  - Exit the console", "exit/quit".cyan());
    println!("\n{}", "Terms:".bold().green());
    println!("  {}  resource", "<http://example.org/a>".yellow());
    println!("  {}  resource through a bound prefix", "people:bob".yellow());
    println!("  {}  string, number or boolean literal", "\"Bob\" 42 1.5 true".yellow());
    println!("  {}  wildcard in patterns", "_".yellow());
}
