// crates/qcalc-parse/src/csp.rs

//! Parser for the CSP instance text format (spec.md §6 "CSP instance file
//! format").

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]

use crate::calculus::strip_brackets;
use qcalc_core::calculus::Calculus;
use qcalc_core::error::Error;
use qcalc_core::network::Network;

fn malformed(msg: impl Into<String>) -> Error {
    Error::MalformedCsp(msg.into())
}

/// One parsed CSP instance: its free-form info line, the ground-truth
/// oracle tag if present, and the resulting network.
#[derive(Debug)]
pub struct CspInstance {
    /// The instance's free-form info line, verbatim.
    pub additional_info: String,
    /// `Some(true)` / `Some(false)` if `additional_info` ends with
    /// `": consistent"` / `": not consistent"`; `None` otherwise.
    pub oracle: Option<bool>,
    /// The parsed network.
    pub network: Network,
}

/// Parse the oracle tag from an info line the way
/// `original_source/assignment4bit.py` does: split on the last `:` and
/// compare the trimmed tail against the literal strings.
fn parse_oracle(additional_info: &str) -> Option<bool> {
    let tail = additional_info.rsplit(':').next()?.trim();
    match tail {
        "consistent" => Some(true),
        "not consistent" => Some(false),
        _ => None,
    }
}

/// Parse every instance out of a CSP-instance-file's contents (spec.md
/// §6). Instances are separated by lines whose sole content is `.`; a
/// final group not terminated by `.` is discarded (matching the reference
/// parser it was distilled from).
///
/// # Errors
/// [`Error::MalformedCsp`] if an edge line is malformed or names a base
/// relation the calculus does not declare.
pub fn parse_csp(calculus: &Calculus, input: &str) -> Result<Vec<CspInstance>, Error> {
    let mut instances = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim();
        if trimmed == "." {
            instances.push(parse_instance(calculus, &current)?);
            current.clear();
        } else {
            current.push(trimmed);
        }
    }

    Ok(instances)
}

fn parse_instance(calculus: &Calculus, lines: &[&str]) -> Result<CspInstance, Error> {
    let (&additional_info, edges) = lines
        .split_first()
        .ok_or_else(|| malformed("instance has no info line"))?;
    let oracle = parse_oracle(additional_info);

    let mut network = Network::new(calculus);
    for line in edges {
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(malformed(format!("edge line needs 'from to ( ... )': {line}")));
        }
        let from = parts[0];
        let to = parts[1];
        let label = if parts.len() == 2 {
            qcalc_core::calculus::EMPTY
        } else {
            let names = strip_brackets(&parts[2..]).map_err(|e| malformed(e.to_string()))?;
            let mut label = qcalc_core::calculus::EMPTY;
            for name in names {
                label |= calculus
                    .encode(name)
                    .map_err(|_| malformed(format!("unknown base relation: {name}")))?;
            }
            label
        };
        network.insert(calculus, from, to, label);
    }

    Ok(CspInstance {
        additional_info: additional_info.to_string(),
        oracle,
        network,
    })
}
