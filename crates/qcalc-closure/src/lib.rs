// crates/qcalc-closure/src/lib.rs

//! Path-consistency (algebraic closure) engines and backtracking
//! refinement search over `qcalc-core` networks.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod engine;
pub mod refine;

pub use engine::{aclosure_naive, aclosure_pq, aclosure_queue, closure, Engine};
pub use refine::refine;
