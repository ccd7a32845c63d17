// crates/qcalc-closure/src/engine.rs

//! Algebraic-closure (path-consistency) engines (spec.md §4.D).
//!
//! Three variants — naive/PC-1, queue-driven/PC-2, priority-queue — are
//! provided. All three mutate a [`Network`] in place and must return the
//! same verdict on the same input (spec.md §8 Property 5); only the order
//! in which tightenings are applied differs.

use qcalc_core::calculus::{Calculus, EMPTY};
use qcalc_core::network::Network;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use tracing::{debug, trace};

/// Selects which of the three closure algorithms to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Engine {
    /// Naive fixed-point iteration over all ordered triples (PC-1 style).
    Naive,
    /// FIFO work-queue over ordered pairs (PC-2 style).
    Queue,
    /// Priority-queue variant, ordered by `popcount` at enqueue time.
    PriorityQueue,
}

/// Run the chosen engine. Returns `true` iff algebraic closure was reached
/// without deriving `EMPTY` anywhere; mutates `network` in place either
/// way (spec.md §4.D).
pub fn closure(engine: Engine, calculus: &Calculus, network: &mut Network) -> bool {
    match engine {
        Engine::Naive => aclosure_naive(calculus, network),
        Engine::Queue => aclosure_queue(calculus, network),
        Engine::PriorityQueue => aclosure_pq(calculus, network),
    }
}

/// Triangle-refinement step that tightens the edge `(a, c)` through
/// intermediate `b`: `new = lookup(a,c) ∩ compose(lookup(a,b), lookup(b,c))`
/// (spec.md §4.D's `new_ik = lookup(i,k) ∩ compose(lookup(i,j),
/// lookup(j,k))`, with `a=i, b=j, c=k`). Applies the tightening via
/// `insert` iff it is strictly tighter. Returns `Some(new_label)` if a
/// tightening happened, `None` if the label did not change.
fn tighten(calculus: &Calculus, network: &mut Network, a: &str, c: &str, b: &str) -> Option<u32> {
    let cab = network.lookup(a, b);
    let cbc = network.lookup(b, c);
    let cac = network.lookup(a, c);
    let new_ac = cac & calculus.compose(cab, cbc);
    if new_ac == cac {
        return None;
    }
    trace!(a, c, b, old = cac, new = new_ac, "tightened edge");
    network.insert(calculus, a, c, new_ac);
    Some(new_ac)
}

/// Naive fixed-point closure (spec.md §4.D.1, PC-1 style).
pub fn aclosure_naive(calculus: &Calculus, network: &mut Network) -> bool {
    let nodes = network.nodes();
    loop {
        let mut changed = false;
        for i in &nodes {
            for j in &nodes {
                if i == j {
                    continue;
                }
                for k in &nodes {
                    if i == k || j == k {
                        continue;
                    }
                    if let Some(new_ik) = tighten(calculus, network, i, k, j) {
                        changed = true;
                        if new_ik == EMPTY {
                            debug!(i, j, k, "naive closure derived EMPTY");
                            return false;
                        }
                    }
                }
            }
        }
        if !changed {
            return true;
        }
    }
}

/// Queue-driven closure (spec.md §4.D.2, PC-2 style).
pub fn aclosure_queue(calculus: &Calculus, network: &mut Network) -> bool {
    let nodes = network.nodes();
    let mut queue: VecDeque<(String, String)> = VecDeque::new();
    for i in &nodes {
        for j in &nodes {
            if i != j {
                queue.push_back((i.clone(), j.clone()));
            }
        }
    }

    while let Some((i, j)) = queue.pop_front() {
        trace!(i = %i, j = %j, "dequeued pair");
        for k in &nodes {
            if k == &i || k == &j {
                continue;
            }
            if let Some(new_ik) = tighten(calculus, network, &i, k, &j) {
                if new_ik == EMPTY {
                    debug!(i = %i, k = %k, "queue closure derived EMPTY");
                    return false;
                }
                queue.push_back((i.clone(), k.clone()));
            }
            if let Some(new_kj) = tighten(calculus, network, k, &j, &i) {
                if new_kj == EMPTY {
                    debug!(k = %k, j = %j, "queue closure derived EMPTY");
                    return false;
                }
                queue.push_back((k.clone(), j.clone()));
            }
        }
    }
    true
}

/// Priority-queue closure (spec.md §4.D.3). Tighter (lower-popcount) edges
/// are processed first; the heap may hold stale entries for the same pair,
/// which is safe because the triangle step is idempotent when the edge's
/// label has not changed since the entry was pushed.
pub fn aclosure_pq(calculus: &Calculus, network: &mut Network) -> bool {
    let nodes = network.nodes();
    // Reverse(popcount) for a min-heap on popcount via std's max-heap BinaryHeap.
    let mut heap: BinaryHeap<Reverse<(u32, String, String)>> = BinaryHeap::new();
    for i in &nodes {
        for j in &nodes {
            if i != j {
                let priority = qcalc_core::popcount(network.lookup(i, j));
                heap.push(Reverse((priority, i.clone(), j.clone())));
            }
        }
    }

    while let Some(Reverse((_, i, j))) = heap.pop() {
        trace!(i = %i, j = %j, "popped pair");
        for k in &nodes {
            if k == &i || k == &j {
                continue;
            }
            if let Some(new_ik) = tighten(calculus, network, &i, k, &j) {
                if new_ik == EMPTY {
                    debug!(i = %i, k = %k, "priority-queue closure derived EMPTY");
                    return false;
                }
                heap.push(Reverse((qcalc_core::popcount(new_ik), i.clone(), k.clone())));
            }
            if let Some(new_kj) = tighten(calculus, network, k, &j, &i) {
                if new_kj == EMPTY {
                    debug!(k = %k, j = %j, "priority-queue closure derived EMPTY");
                    return false;
                }
                heap.push(Reverse((qcalc_core::popcount(new_kj), k.clone(), j.clone())));
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Linear point calculus: `<, =, >` (spec.md §8 S1–S4).
    fn point_calculus() -> Calculus {
        let base_names = vec!["<".to_string(), "=".to_string(), ">".to_string()];
        let mut converse = HashMap::new();
        converse.insert("<".to_string(), ">".to_string());
        converse.insert("=".to_string(), "=".to_string());
        converse.insert(">".to_string(), "<".to_string());

        let mut composition = HashMap::new();
        let lt = vec!["<".to_string()];
        let eq = vec!["=".to_string()];
        let gt = vec![">".to_string()];
        let all = vec!["<".to_string(), "=".to_string(), ">".to_string()];
        composition.insert(("<".to_string(), "<".to_string()), lt.clone());
        composition.insert(("<".to_string(), "=".to_string()), lt.clone());
        composition.insert(("<".to_string(), ">".to_string()), all.clone());
        composition.insert(("=".to_string(), "<".to_string()), lt);
        composition.insert(("=".to_string(), "=".to_string()), eq);
        composition.insert(("=".to_string(), ">".to_string()), gt.clone());
        composition.insert((">".to_string(), "<".to_string()), all);
        composition.insert((">".to_string(), "=".to_string()), gt);
        composition.insert((">".to_string(), ">".to_string()), vec![">".to_string()]);

        Calculus::new(base_names, &converse, &composition).unwrap()
    }

    /// Allen's interval algebra restricted to the handful of relations and
    /// compositions exercised by spec.md §8 S5–S6: `b` (before) composed
    /// with itself is `b`; everything else defaults to the universe so the
    /// table stays total.
    fn allen_calculus() -> Calculus {
        let base_names = vec![
            "b".to_string(),
            "bi".to_string(),
            "m".to_string(),
            "mi".to_string(),
            "o".to_string(),
            "oi".to_string(),
            "eq".to_string(),
            "f".to_string(),
            "fi".to_string(),
            "s".to_string(),
            "si".to_string(),
            "d".to_string(),
            "di".to_string(),
        ];
        let mut converse = HashMap::new();
        converse.insert("b".to_string(), "bi".to_string());
        converse.insert("bi".to_string(), "b".to_string());
        converse.insert("m".to_string(), "mi".to_string());
        converse.insert("mi".to_string(), "m".to_string());
        converse.insert("o".to_string(), "oi".to_string());
        converse.insert("oi".to_string(), "o".to_string());
        converse.insert("eq".to_string(), "eq".to_string());
        converse.insert("f".to_string(), "fi".to_string());
        converse.insert("fi".to_string(), "f".to_string());
        converse.insert("s".to_string(), "si".to_string());
        converse.insert("si".to_string(), "s".to_string());
        converse.insert("d".to_string(), "di".to_string());
        converse.insert("di".to_string(), "d".to_string());

        let all: Vec<String> = base_names.clone();
        let mut composition = HashMap::new();
        for a in &base_names {
            for b in &base_names {
                composition.insert((a.clone(), b.clone()), all.clone());
            }
        }
        // The one composition spec.md's S5/S6 actually exercise: b ; b = b.
        composition.insert(("b".to_string(), "b".to_string()), vec!["b".to_string()]);

        Calculus::new(base_names, &converse, &composition).unwrap()
    }

    #[test]
    fn s1_violates_transitivity_of_less_than() {
        let c = point_calculus();
        let mut net = Network::new(&c);
        net.insert(&c, "a", "b", c.encode("<").unwrap());
        net.insert(&c, "b", "c", c.encode("<").unwrap());
        net.insert(&c, "a", "c", c.encode(">").unwrap());
        assert!(!aclosure_naive(&c, &mut net.deep_clone()));
        assert!(!aclosure_queue(&c, &mut net.deep_clone()));
        assert!(!aclosure_pq(&c, &mut net.deep_clone()));
    }

    #[test]
    fn s2_closes_and_tightens_ac_to_less_than() {
        let c = point_calculus();
        let mut net = Network::new(&c);
        net.insert(&c, "a", "b", c.encode("<").unwrap());
        net.insert(&c, "b", "c", c.encode("<").unwrap());
        assert!(aclosure_pq(&c, &mut net));
        assert_eq!(net.lookup("a", "c"), c.encode("<").unwrap());
    }

    #[test]
    fn s3_keeps_disjunctive_label_le() {
        let c = point_calculus();
        let mut net = Network::new(&c);
        let le = c.encode_set(["<", "="]).unwrap();
        net.insert(&c, "a", "b", le);
        net.insert(&c, "b", "c", le);
        assert!(aclosure_pq(&c, &mut net));
        assert_eq!(net.lookup("a", "c"), le);
    }

    #[test]
    fn s4_empty_network_over_four_nodes_is_consistent() {
        let c = point_calculus();
        let mut net = Network::new(&c);
        net.insert(&c, "a", "b", c.universe());
        net.insert(&c, "c", "d", c.universe());
        assert!(aclosure_pq(&c, &mut net));
        for i in net.nodes() {
            for j in net.nodes() {
                if i != j {
                    assert_eq!(net.lookup(&i, &j), c.universe());
                }
            }
        }
    }

    #[test]
    fn s5_allen_before_triangle_is_inconsistent() {
        let c = allen_calculus();
        let mut net = Network::new(&c);
        let b = c.encode("b").unwrap();
        let bi = c.encode("bi").unwrap();
        net.insert(&c, "a", "b", b);
        net.insert(&c, "b", "c", b);
        net.insert(&c, "a", "c", bi);
        assert!(!aclosure_pq(&c, &mut net));
    }

    #[test]
    fn s6_allen_before_composes_to_before() {
        let c = allen_calculus();
        let mut net = Network::new(&c);
        let b = c.encode("b").unwrap();
        net.insert(&c, "a", "b", b);
        net.insert(&c, "b", "c", b);
        assert!(aclosure_pq(&c, &mut net));
        assert_eq!(net.lookup("a", "c"), b);
    }

    #[test]
    fn engines_agree_on_verdict() {
        let c = point_calculus();
        let mut net = Network::new(&c);
        net.insert(&c, "a", "b", c.encode("<").unwrap());
        net.insert(&c, "b", "c", c.encode("<").unwrap());
        net.insert(&c, "a", "c", c.encode(">").unwrap());
        let r1 = aclosure_naive(&c, &mut net.deep_clone());
        let r2 = aclosure_queue(&c, &mut net.deep_clone());
        let r3 = aclosure_pq(&c, &mut net.deep_clone());
        assert_eq!(r1, r2);
        assert_eq!(r2, r3);
    }

    #[test]
    fn closure_is_monotone() {
        let c = point_calculus();
        let mut net = Network::new(&c);
        let le = c.encode_set(["<", "="]).unwrap();
        net.insert(&c, "a", "b", le);
        net.insert(&c, "b", "c", le);
        let before = net.lookup("a", "c");
        aclosure_pq(&c, &mut net);
        let after = net.lookup("a", "c");
        assert_eq!(after & before, after, "closure must only tighten labels");
    }
}
