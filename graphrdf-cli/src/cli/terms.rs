// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Term syntax for the command line
//!
//! - `<uri>` is a resource
//! - `prefix:local` is a resource expanded through a bound prefix
//! - `"text"` is a string literal
//! - `true` / `false` are boolean literals
//! - integers are 64-bit literals, decimals are float literals
//! - `_` and `?` leave a pattern position unbound

use graphrdf::{Term, Value};

/// Parse a term, returning `None` for a wildcard
pub fn parse_term<F>(input: &str, resolve: F) -> Result<Option<Term>, String>
where
    F: Fn(&str) -> Option<String>,
{
    let input = input.trim();
    if input == "_" || input == "?" {
        return Ok(None);
    }
    if let Some(uri) = input.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        return Ok(Some(Term::uri(uri)));
    }
    if input.len() >= 2 && input.starts_with('"') && input.ends_with('"') {
        return Ok(Some(Term::literal(unescape(&input[1..input.len() - 1]))));
    }
    match input {
        "true" => return Ok(Some(Term::Literal(Value::Boolean(true)))),
        "false" => return Ok(Some(Term::Literal(Value::Boolean(false)))),
        _ => {}
    }
    if let Ok(n) = input.parse::<i64>() {
        return Ok(Some(Term::Literal(Value::Long(n))));
    }
    if input.contains(|c: char| c.is_ascii_digit()) {
        if let Ok(x) = input.parse::<f64>() {
            return Ok(Some(Term::Literal(Value::Float(x))));
        }
    }
    if let Some((prefix, local)) = input.split_once(':') {
        return match resolve(prefix) {
            Some(namespace) => Ok(Some(Term::uri(format!("{}{}", namespace, local)))),
            None => Err(format!("Unknown prefix '{}' in {}", prefix, input)),
        };
    }
    Err(format!(
        "Cannot read term '{}': use <uri>, prefix:local, \"text\", a number or true/false",
        input
    ))
}

/// Parse a term that must be bound
pub fn parse_bound_term<F>(input: &str, resolve: F) -> Result<Term, String>
where
    F: Fn(&str) -> Option<String>,
{
    parse_term(input, resolve)?.ok_or_else(|| format!("'{}' is not allowed here", input))
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Split a console line into words, keeping quoted strings and `<...>` whole
pub fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                current.push(c);
                let mut closed = false;
                while let Some(c) = chars.next() {
                    current.push(c);
                    if c == '\\' {
                        if let Some(escaped) = chars.next() {
                            current.push(escaped);
                        }
                    } else if c == '"' {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err("Unterminated string literal".to_string());
                }
            }
            '<' if current.is_empty() => {
                current.push(c);
                let mut closed = false;
                for c in chars.by_ref() {
                    current.push(c);
                    if c == '>' {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err("Unterminated <uri>".to_string());
                }
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolver() -> impl Fn(&str) -> Option<String> {
        let bindings: HashMap<String, String> = [
            ("people", "http://www.example.org/people#"),
            ("", "https://graphrdf.dev/rels/"),
        ]
        .iter()
        .map(|(p, ns)| (p.to_string(), ns.to_string()))
        .collect();
        move |prefix| bindings.get(prefix).cloned()
    }

    #[test]
    fn test_parse_resources() {
        let resolve = resolver();
        assert_eq!(
            parse_term("<http://x.org/a>", &resolve).unwrap(),
            Some(Term::uri("http://x.org/a"))
        );
        assert_eq!(
            parse_term("people:bob", &resolve).unwrap(),
            Some(Term::uri("http://www.example.org/people#bob"))
        );
        assert_eq!(
            parse_term(":likes", &resolve).unwrap(),
            Some(Term::uri("https://graphrdf.dev/rels/likes"))
        );
        assert!(parse_term("things:pizza", &resolve).is_err());
    }

    #[test]
    fn test_parse_literals() {
        let resolve = resolver();
        assert_eq!(
            parse_term("\"Bob\"", &resolve).unwrap(),
            Some(Term::literal("Bob"))
        );
        assert_eq!(
            parse_term(r#""say \"hi\"""#, &resolve).unwrap(),
            Some(Term::literal("say \"hi\""))
        );
        assert_eq!(
            parse_term("true", &resolve).unwrap(),
            Some(Term::literal(true))
        );
        assert_eq!(
            parse_term("42", &resolve).unwrap(),
            Some(Term::literal(42i64))
        );
        assert_eq!(
            parse_term("-1.5", &resolve).unwrap(),
            Some(Term::literal(-1.5))
        );
    }

    #[test]
    fn test_wildcards() {
        let resolve = resolver();
        assert_eq!(parse_term("_", &resolve).unwrap(), None);
        assert_eq!(parse_term("?", &resolve).unwrap(), None);
        assert!(parse_bound_term("_", &resolve).is_err());
        assert!(parse_term("bareword", &resolve).is_err());
    }

    #[test]
    fn test_non_numeric_words_are_not_floats() {
        let resolve = resolver();
        for word in ["nan", "NaN", "inf", "-inf", "infinity"] {
            assert!(parse_term(word, &resolve).is_err(), "{}", word);
        }
        assert_eq!(
            parse_term("1e3", &resolve).unwrap(),
            Some(Term::literal(1000.0))
        );
    }

    #[test]
    fn test_split_words() {
        assert_eq!(
            split_words(r#"add people:bob :named "Bob Smith""#).unwrap(),
            vec!["add", "people:bob", ":named", "\"Bob Smith\""]
        );
        assert_eq!(
            split_words("triples <http://x.org/a b> _ _").unwrap(),
            vec!["triples", "<http://x.org/a b>", "_", "_"]
        );
        assert!(split_words("add a b \"open").is_err());
        assert!(split_words("").unwrap().is_empty());
    }
}
