// crates/qcalc-closure/src/refine.rs

//! Backtracking refinement search (spec.md §4.E).
//!
//! After algebraic closure, any edge left with a non-base (multi-bit) label
//! is resolved by branching over its base relations, re-closing, and
//! recursing. The chosen closure engine is the priority-queue variant
//! (spec.md §4.E).

use crate::engine::aclosure_pq;
use qcalc_core::calculus::{Calculus, Label};
use qcalc_core::network::Network;
use tracing::debug;

/// Decide full consistency of `network`. Returns `true` iff `network` has
/// at least one base-refinement that is algebraically closed (spec.md
/// §4.E, §8 Property 7). Does not mutate the caller's network; each branch
/// operates on its own clone.
#[must_use]
pub fn refine(calculus: &Calculus, network: &Network) -> bool {
    let mut working = network.deep_clone();
    refine_in_place(calculus, &mut working)
}

fn refine_in_place(calculus: &Calculus, network: &mut Network) -> bool {
    if !aclosure_pq(calculus, network) {
        return false;
    }
    if network.all_base_labels() {
        return true;
    }
    let Some((i, j, label)) = find_non_base_edge(network) else {
        return true;
    };
    debug!(i = %i, j = %j, popcount = calculus.popcount(label), "branching on non-base edge");
    for base in calculus.base_relations(label) {
        let mut child = network.deep_clone();
        child.insert(calculus, &i, &j, base);
        if refine_in_place(calculus, &mut child) {
            return true;
        }
    }
    false
}

/// First stored edge whose label has more than one base relation, found by
/// scanning nodes in insertion order and, for each node, its stored
/// neighbours in insertion order (spec.md §4.E determinism requirement).
fn find_non_base_edge(network: &Network) -> Option<(String, String, Label)> {
    for i in network.nodes() {
        for (j, label) in network.edges_from(&i) {
            if qcalc_core::popcount(label) > 1 {
                return Some((i, j, label));
            }
        }
    }
    None
}
