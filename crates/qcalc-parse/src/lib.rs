// crates/qcalc-parse/src/lib.rs

//! Text formats for calculi and CSP instances, and the random CSP
//! generator.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod calculus;
pub mod csp;
pub mod generator;

pub use calculus::parse_calculus;
pub use csp::{parse_csp, CspInstance};
pub use generator::{generate, generate_instance, GeneratorConfig};
