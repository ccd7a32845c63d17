// crates/qcalc-parse/src/generator.rs

//! Random CSP instance generator used by the CLI `generate` subcommand.
//! Produces CSP-instance-file text (spec.md §6) for a given calculus.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

use rand::{rngs::StdRng, Rng as _, SeedableRng};
use qcalc_core::calculus::Calculus;

/// Parameters of a random instance, following the `n`/`d`/`l` naming of
/// the generator this module was distilled from:
/// - `n`: number of variables (variables are named `0..n`)
/// - `d`: average degree — expected non-universal constraints per variable
/// - `l`: average label size — expected base relations per constraint
#[derive(Debug, Clone, Copy)]
pub struct GeneratorConfig {
    /// Number of instances to emit.
    pub count: u32,
    /// Network size parameter.
    pub n: u32,
    /// Average degree parameter.
    pub d: u32,
    /// Average label size parameter.
    pub l: u32,
}

/// Pick a random non-empty subset of base relation names, biasing each
/// base relation's inclusion probability to `l / k`. Falls back to a
/// single uniformly-chosen base relation if the draw comes up empty.
fn random_label_names(calculus: &Calculus, l: u32, rng: &mut StdRng) -> Vec<String> {
    let names = calculus.base_names();
    let p = f64::from(l) / names.len() as f64;
    let mut picked: Vec<String> = names
        .iter()
        .filter(|_| rng.random_bool(p.clamp(0.0, 1.0)))
        .cloned()
        .collect();
    if picked.is_empty() {
        let idx = rng.random_range(0..names.len());
        picked.push(names[idx].clone());
    }
    picked
}

/// Generate the text of one random CSP instance (spec.md §6). The
/// `additional_info` line carries no oracle tag: random instances have no
/// known ground truth.
#[must_use]
pub fn generate_instance(calculus: &Calculus, config: &GeneratorConfig, rng: &mut StdRng) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} # {} {}\n", config.n, config.d, config.l));

    let edge_p = f64::from(config.d) / f64::from(config.n.saturating_sub(1)).max(1.0);
    for i in 0..config.n {
        for j in 0..config.n {
            if i == j {
                continue;
            }
            if rng.random_bool(edge_p.clamp(0.0, 1.0)) {
                let names = random_label_names(calculus, config.l, rng);
                out.push_str(&format!("{i} {j} ( {} )\n", names.join(" ")));
            }
        }
    }
    out.push_str(".\n");
    out
}

/// Generate `config.count` instances, seeded deterministically, and
/// concatenate their text.
#[must_use]
pub fn generate(calculus: &Calculus, config: &GeneratorConfig, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = String::new();
    for _ in 0..config.count {
        out.push_str(&generate_instance(calculus, config, &mut rng));
    }
    out
}
