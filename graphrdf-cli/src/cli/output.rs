// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result formatting for the CLI

use comfy_table::{Cell, Color, ContentArrangement, Table};
use graphrdf::{Term, Triple, Value};
use serde::Serialize;

use super::commands::OutputFormat;

/// A term as written to JSON output
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum JsonTerm<'a> {
    Uri { value: &'a str },
    Literal { datatype: &'static str, value: serde_json::Value },
}

impl<'a> From<&'a Term> for JsonTerm<'a> {
    fn from(term: &'a Term) -> Self {
        match term {
            Term::Uri(uri) => JsonTerm::Uri { value: uri },
            Term::Literal(value) => JsonTerm::Literal {
                datatype: value.type_name(),
                value: literal_json(value),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonTriple<'a> {
    subject: JsonTerm<'a>,
    predicate: JsonTerm<'a>,
    object: JsonTerm<'a>,
}

fn literal_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Boolean(b) => serde_json::Value::from(*b),
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Long(l) => serde_json::Value::from(*l),
        Value::Float(x) => serde_json::Value::from(*x),
        Value::String(s) => serde_json::Value::from(s.as_str()),
    }
}

/// Formats query results for display
pub struct ResultFormatter;

impl ResultFormatter {
    /// Format triples, shortening URIs with the given `(prefix, namespace)` bindings
    pub fn triples(triples: &[Triple], bindings: &[(String, String)], format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => {
                let rows: Vec<JsonTriple<'_>> = triples
                    .iter()
                    .map(|t| JsonTriple {
                        subject: (&t.subject).into(),
                        predicate: (&t.predicate).into(),
                        object: (&t.object).into(),
                    })
                    .collect();
                serde_json::to_string_pretty(&rows).unwrap_or_else(|e| e.to_string())
            }
            OutputFormat::Table => {
                let mut table = create_table();
                add_header(&mut table, &["Subject", "Predicate", "Object"]);
                for triple in triples {
                    table.add_row(vec![
                        Cell::new(shorten(&triple.subject, bindings)),
                        Cell::new(shorten(&triple.predicate, bindings)).fg(Color::Green),
                        Cell::new(shorten(&triple.object, bindings)),
                    ]);
                }
                format!("{}\n{} triple(s)", table, triples.len())
            }
        }
    }

    pub fn namespaces(bindings: &[(String, String)], format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = bindings
                    .iter()
                    .map(|(prefix, ns)| (prefix.clone(), serde_json::Value::from(ns.as_str())))
                    .collect();
                serde_json::to_string_pretty(&map).unwrap_or_else(|e| e.to_string())
            }
            OutputFormat::Table => {
                let mut table = create_table();
                add_header(&mut table, &["Prefix", "Namespace"]);
                for (prefix, namespace) in bindings {
                    table.add_row(vec![
                        Cell::new(prefix).fg(Color::Green),
                        Cell::new(namespace),
                    ]);
                }
                table.to_string()
            }
        }
    }
}

fn create_table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    table
}

fn add_header(table: &mut Table, headers: &[&str]) {
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
}

/// `prefix:local` for a URI under the longest matching namespace, else `<uri>`
pub fn shorten(term: &Term, bindings: &[(String, String)]) -> String {
    let Term::Uri(uri) = term else {
        return term.to_string();
    };
    bindings
        .iter()
        .filter(|(_, namespace)| !namespace.is_empty() && uri.starts_with(namespace.as_str()))
        .max_by_key(|(_, namespace)| namespace.len())
        .map(|(prefix, namespace)| format!("{}:{}", prefix, &uri[namespace.len()..]))
        .unwrap_or_else(|| term.to_string())
}
