// crates/qcalc-parse/src/calculus.rs

//! Parser for the calculus text format (spec.md §6 "Calculus file format").

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]

use qcalc_core::calculus::Calculus;
use qcalc_core::error::Error;
use std::collections::{HashMap, HashSet};

/// Strip a trailing `# ...` comment from a line, if present.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn malformed(msg: impl Into<String>) -> Error {
    Error::MalformedCalculus(msg.into())
}

/// Strip the glued `(`/`)` brackets from a composition or CSP-edge
/// right-hand-side token list (spec.md §6: "the opening `(` is glued to
/// the first right-hand-side token and the closing `)` to the last").
///
/// An empty bracketed list (`( )`) yields an empty `Vec`.
pub(crate) fn strip_brackets<'a>(tokens: &[&'a str]) -> Result<Vec<&'a str>, Error> {
    let mut tokens = tokens.to_vec();
    let Some(first) = tokens.first_mut() else {
        return Err(malformed("bracketed list has no tokens"));
    };
    *first = first
        .strip_prefix('(')
        .ok_or_else(|| malformed(format!("expected '(' to open bracketed list, got {first}")))?;
    let last = tokens.last_mut().expect("checked non-empty above");
    *last = last
        .strip_suffix(')')
        .ok_or_else(|| malformed(format!("expected ')' to close bracketed list, got {last}")))?;
    Ok(tokens.into_iter().filter(|t| !t.is_empty()).collect())
}

/// Parse a calculus description in the line-oriented text format of
/// spec.md §6.
///
/// # Errors
/// [`Error::MalformedCalculus`] if the format is violated, a name is
/// unknown, or the converse/composition tables are not total.
pub fn parse_calculus(input: &str) -> Result<Calculus, Error> {
    let mut lines = input.lines();

    let _relations_header = lines
        .next()
        .ok_or_else(|| malformed("missing relations section header"))?;
    let relations_line = lines
        .next()
        .ok_or_else(|| malformed("missing relations list"))?;
    let base_names: Vec<String> = strip_comment(relations_line)
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if base_names.is_empty() {
        return Err(malformed("relations list is empty"));
    }
    let known: HashSet<&str> = base_names.iter().map(String::as_str).collect();

    // Blank line separating the relations section from the converse header.
    let _blank = lines.next();
    let _converse_header = lines
        .next()
        .ok_or_else(|| malformed("missing converse section header"))?;

    let mut converse: HashMap<String, String> = HashMap::new();
    loop {
        let Some(line) = lines.next() else { break };
        let raw = line.trim();
        if raw.is_empty() {
            break;
        }
        let content = strip_comment(raw).trim();
        if content.is_empty() {
            continue;
        }
        let parts: Vec<&str> = content.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(malformed(format!(
                "converse line must have exactly 2 fields: {content}"
            )));
        }
        if !parts.iter().all(|rel| known.contains(rel)) {
            return Err(malformed(format!(
                "converse line names an undeclared relation: {content}"
            )));
        }
        converse.insert(parts[0].to_string(), parts[1].to_string());
    }

    let _composition_header = lines
        .next()
        .ok_or_else(|| malformed("missing composition section header"))?;

    let mut composition: HashMap<(String, String), Vec<String>> = HashMap::new();
    loop {
        let Some(line) = lines.next() else { break };
        let raw = line.trim();
        if raw.is_empty() {
            break;
        }
        let content = strip_comment(raw).trim();
        if content.is_empty() {
            continue;
        }
        let parts: Vec<&str> = content.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(malformed(format!(
                "composition line needs 'from to ( ... )': {content}"
            )));
        }
        if !known.contains(parts[0]) || !known.contains(parts[1]) {
            return Err(malformed(format!(
                "composition line names an undeclared relation: {content}"
            )));
        }
        let from = parts[0].to_string();
        let to = parts[1].to_string();
        let rhs: Vec<String> = strip_brackets(&parts[2..])?
            .into_iter()
            .map(str::to_string)
            .collect();
        if let Some(unknown) = rhs.iter().find(|rel| !known.contains(rel.as_str())) {
            return Err(malformed(format!(
                "composition line names an undeclared relation: {unknown}"
            )));
        }
        composition.insert((from, to), rhs);
    }

    Calculus::new(base_names, &converse, &composition)
}
