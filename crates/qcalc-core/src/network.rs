// crates/qcalc-core/src/network.rs

//! The constraint network (spec.md §3 "Network", §4.C).
//!
//! A [`Network`] is a symmetric partial map from ordered variable pairs to
//! [`Label`]s. `insert` is the only mutator and keeps the converse-symmetry
//! invariant; `lookup` on a missing pair returns the calculus universe.

use crate::calculus::{Calculus, Label};
use indexmap::IndexMap;

/// A symmetric labelling of variable pairs (spec.md §3 "Network").
///
/// Variables are interned in an [`IndexMap`] so [`Network::nodes`] always
/// iterates in first-insertion order, and edges are likewise kept in an
/// [`IndexMap`] so a given node's neighbours can be walked in the order
/// they were first connected — required for the deterministic edge
/// selection and enumeration order used by refinement search (spec.md
/// §4.E).
#[derive(Clone, Debug)]
pub struct Network {
    universe: Label,
    node_index: IndexMap<String, usize>,
    edges: IndexMap<(usize, usize), Label>,
}

impl Network {
    /// Create an empty network over the given calculus's universe.
    #[must_use]
    pub fn new(calculus: &Calculus) -> Self {
        Self {
            universe: calculus.universe(),
            node_index: IndexMap::new(),
            edges: IndexMap::new(),
        }
    }

    fn intern(&mut self, var: &str) -> usize {
        if let Some(&idx) = self.node_index.get(var) {
            return idx;
        }
        let idx = self.node_index.len();
        self.node_index.insert(var.to_string(), idx);
        idx
    }

    /// Look up the stored label for `(i, j)`, or the calculus universe if
    /// absent. `lookup(i, i)` is unspecified and never consulted by the
    /// closure engines.
    #[must_use]
    pub fn lookup(&self, i: &str, j: &str) -> Label {
        let (Some(&ii), Some(&jj)) = (self.node_index.get(i), self.node_index.get(j)) else {
            return self.universe;
        };
        self.edges.get(&(ii, jj)).copied().unwrap_or(self.universe)
    }

    /// Set `M(i, j) := label` and `M(j, i) := calculus.converse(label)`
    /// atomically (spec.md §4.C). Inserting [`crate::calculus::EMPTY`] is
    /// legal and records inconsistency.
    pub fn insert(&mut self, calculus: &Calculus, i: &str, j: &str, label: Label) {
        let ii = self.intern(i);
        let jj = self.intern(j);
        self.edges.insert((ii, jj), label);
        self.edges.insert((jj, ii), calculus.converse(label));
    }

    /// The variables mentioned by any stored edge, in first-insertion
    /// order.
    #[must_use]
    pub fn nodes(&self) -> Vec<String> {
        self.node_index.keys().cloned().collect()
    }

    /// Number of distinct variables mentioned.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_index.len()
    }

    /// All stored `(i, j, label)` triples, in insertion order. Useful for
    /// printing and for soundness checks.
    #[must_use]
    pub fn edges(&self) -> Vec<(String, String, Label)> {
        let names: Vec<&String> = self.node_index.keys().collect();
        self.edges
            .iter()
            .map(|(&(i, j), &label)| (names[i].clone(), names[j].clone(), label))
            .collect()
    }

    /// Stored neighbours of `i`, as `(neighbour, label)` pairs, in the
    /// order the edges touching `i` were first inserted.
    ///
    /// Used by refinement search (spec.md §4.E) to pick a non-base edge
    /// deterministically: "first non-base edge found by scanning nodes in
    /// insertion order, then neighbours in insertion order".
    #[must_use]
    pub fn edges_from(&self, i: &str) -> Vec<(String, Label)> {
        let Some(&ii) = self.node_index.get(i) else {
            return Vec::new();
        };
        let names: Vec<&String> = self.node_index.keys().collect();
        self.edges
            .iter()
            .filter(|&(&(from, _), _)| from == ii)
            .map(|(&(_, to), &label)| (names[to].clone(), label))
            .collect()
    }

    /// `true` if every stored label has exactly one bit set (spec.md
    /// §4.E).
    #[must_use]
    pub fn all_base_labels(&self) -> bool {
        self.edges.values().all(|&l| crate::bits::popcount(l) == 1)
    }

    /// Deep copy whose subsequent mutations do not affect `self`
    /// (spec.md §4.C). Equivalent to [`Clone::clone`], named to match the
    /// spec's vocabulary.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        self.clone()
    }
}
