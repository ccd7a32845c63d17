// crates/qcalc-core/src/error.rs

//! Error kinds shared by the calculus and network layers.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use thiserror::Error;

/// Errors raised while building or querying the relation algebra.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A calculus description violated the external format or referenced an
    /// unknown base relation (spec.md §4.B / §6).
    #[error("malformed calculus: {0}")]
    MalformedCalculus(String),

    /// A CSP instance file violated the external format (spec.md §6).
    #[error("malformed csp: {0}")]
    MalformedCsp(String),

    /// `encode`/`encode_set` was asked about a name not declared by the
    /// calculus (spec.md §4.B).
    #[error("unknown relation: {0}")]
    UnknownRelation(String),
}

/// Convenience alias used throughout `qcalc-core`.
pub type Result<T> = std::result::Result<T, Error>;
