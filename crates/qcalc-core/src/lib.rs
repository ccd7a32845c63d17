// crates/qcalc-core/src/lib.rs

//! Bitmask relation algebra and constraint networks for qualitative
//! reasoning over binary relations (point calculus, Allen's interval
//! algebra, and the like).
//!
//! This crate has no I/O: it owns the [`Calculus`] algebra, the [`Network`]
//! data structure, and the bit utilities they share. Parsing the external
//! calculus/CSP text formats lives in `qcalc-parse`; closure and refinement
//! search live in `qcalc-closure`.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod bits;
pub mod calculus;
pub mod error;
pub mod network;

pub use bits::{bases, popcount};
pub use calculus::{Calculus, Label, EMPTY, MAX_BASES};
pub use error::{Error, Result};
pub use network::Network;
