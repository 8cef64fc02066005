// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! GraphRDF command-line entry point

mod cli;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands, StoreOptions};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        cli.log_level
            .map(|l| l.to_level_filter())
            .unwrap_or(log::LevelFilter::Warn)
    };
    env_logger::Builder::new().filter_level(level).init();

    let options = StoreOptions {
        path: cli.path,
        memory: cli.memory,
        config: cli.config,
        bind: cli.bind,
    };

    let result = match cli.command {
        Commands::Version => {
            cli::handle_version();
            Ok(())
        }
        Commands::Add {
            subject,
            predicate,
            object,
        } => cli::handle_add(&options, &subject, &predicate, &object),
        Commands::Remove {
            subject,
            predicate,
            object,
        } => cli::handle_remove(&options, &subject, &predicate, &object),
        Commands::Triples {
            subject,
            predicate,
            object,
            format,
        } => cli::handle_triples(&options, &subject, &predicate, &object, format),
        Commands::Len => cli::handle_len(&options),
        Commands::Namespaces { format } => cli::handle_namespaces(&options, format),
        Commands::Shell => cli::handle_shell(&options),
    };

    if let Err(e) = result {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}
