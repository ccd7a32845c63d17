//! Cross-module invariants for the closure engines and refinement search
//! (spec.md §8, Properties 4–7).

use qcalc_closure::{aclosure_naive, aclosure_pq, aclosure_queue, refine};
use qcalc_core::calculus::Calculus;
use qcalc_core::network::Network;
use std::collections::HashMap;

fn point_calculus() -> Calculus {
    let base_names = vec!["<".to_string(), "=".to_string(), ">".to_string()];
    let mut converse = HashMap::new();
    converse.insert("<".to_string(), ">".to_string());
    converse.insert("=".to_string(), "=".to_string());
    converse.insert(">".to_string(), "<".to_string());

    let mut composition = HashMap::new();
    composition.insert(("<".to_string(), "<".to_string()), vec!["<".to_string()]);
    composition.insert(("<".to_string(), "=".to_string()), vec!["<".to_string()]);
    composition.insert(
        ("<".to_string(), ">".to_string()),
        vec!["<".to_string(), "=".to_string(), ">".to_string()],
    );
    composition.insert(("=".to_string(), "<".to_string()), vec!["<".to_string()]);
    composition.insert(("=".to_string(), "=".to_string()), vec!["=".to_string()]);
    composition.insert(("=".to_string(), ">".to_string()), vec![">".to_string()]);
    composition.insert(
        (">".to_string(), "<".to_string()),
        vec!["<".to_string(), "=".to_string(), ">".to_string()],
    );
    composition.insert((">".to_string(), "=".to_string()), vec![">".to_string()]);
    composition.insert((">".to_string(), ">".to_string()), vec![">".to_string()]);

    Calculus::new(base_names, &converse, &composition).unwrap()
}

/// Property 4: every closure call only shrinks labels.
#[test]
fn closure_only_tightens_never_widens() {
    let c = point_calculus();
    let mut net = Network::new(&c);
    let le = c.encode_set(["<", "="]).unwrap();
    net.insert(&c, "a", "b", le);
    net.insert(&c, "b", "c", le);
    let original: HashMap<(String, String), u32> = net
        .edges()
        .into_iter()
        .map(|(i, j, l)| ((i, j), l))
        .collect();

    aclosure_pq(&c, &mut net);

    for (i, j, tightened) in net.edges() {
        if let Some(&orig) = original.get(&(i, j)) {
            assert_eq!(tightened & orig, tightened, "closure must only tighten");
        }
    }
}

/// Property 5: the three engines agree on verdict across a handful of
/// inputs, including inconsistent and consistent ones.
#[test]
fn engines_agree_on_verdict_across_inputs() {
    let c = point_calculus();

    let mut consistent = Network::new(&c);
    consistent.insert(&c, "a", "b", c.encode("<").unwrap());
    consistent.insert(&c, "b", "c", c.encode("<").unwrap());

    let mut inconsistent = Network::new(&c);
    inconsistent.insert(&c, "a", "b", c.encode("<").unwrap());
    inconsistent.insert(&c, "b", "c", c.encode("<").unwrap());
    inconsistent.insert(&c, "a", "c", c.encode(">").unwrap());

    for net in [consistent, inconsistent] {
        let r1 = aclosure_naive(&c, &mut net.deep_clone());
        let r2 = aclosure_queue(&c, &mut net.deep_clone());
        let r3 = aclosure_pq(&c, &mut net.deep_clone());
        assert_eq!(r1, r2);
        assert_eq!(r2, r3);
    }
}

/// Property 6: if closure returns `true`, every distinct triple is
/// triangle-consistent.
#[test]
fn closure_success_implies_triangle_consistency() {
    let c = point_calculus();
    let mut net = Network::new(&c);
    let le = c.encode_set(["<", "="]).unwrap();
    net.insert(&c, "a", "b", le);
    net.insert(&c, "b", "c", le);
    net.insert(&c, "c", "d", le);
    assert!(aclosure_pq(&c, &mut net));

    let nodes = net.nodes();
    for i in &nodes {
        for j in &nodes {
            if i == j {
                continue;
            }
            for k in &nodes {
                if i == k || j == k {
                    continue;
                }
                let lik = net.lookup(i, k);
                let composed = c.compose(net.lookup(i, j), net.lookup(j, k));
                assert_eq!(lik & composed, lik, "triangle {i},{j},{k} not consistent");
            }
        }
    }
}

/// Property 7: `refine` returns `true` iff some base-refinement closes.
#[test]
fn refine_matches_exhaustive_base_scenario_search() {
    let c = point_calculus();
    let mut net = Network::new(&c);
    let le = c.encode_set(["<", "="]).unwrap();
    net.insert(&c, "a", "b", le);
    net.insert(&c, "b", "c", le);

    let verdict = refine(&c, &net);

    // Exhaustively try every base scenario for the two disjunctive edges
    // and confirm `verdict` agrees with "some scenario closes".
    let bases = c.base_relations(le);
    let mut any_closed = false;
    for &b1 in &bases {
        for &b2 in &bases {
            let mut scenario = Network::new(&c);
            scenario.insert(&c, "a", "b", b1);
            scenario.insert(&c, "b", "c", b2);
            if aclosure_pq(&c, &mut scenario) {
                any_closed = true;
            }
        }
    }
    assert_eq!(verdict, any_closed);
}
