//! Cross-solver and view-composition tests on fixed and randomized graphs.

use std::collections::{BTreeMap, BTreeSet};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use graphflow::{
    edmonds_karp, kolmogorov, maximum_cardinality_matching, min_cut_from_flow, push_relabel,
    DirectedGraph, EdgeId, EdgeList, EdmondsKarp, FlowResult, Incidence, Kolmogorov, MaxFlow,
    PropertyMap, PushRelabel, UndirectedView, VertexId, VertexList,
};

fn random_graph(
    rng: &mut Pcg64,
    n: usize,
    m: usize,
) -> (DirectedGraph<i64>, Vec<VertexId>, BTreeMap<EdgeId, i64>) {
    let edges: Vec<(usize, usize)> = (0..m)
        .map(|_| (rng.gen_range(0..n), rng.gen_range(0..n)))
        .collect();
    let (g, vs, es) = DirectedGraph::from_edges(n, edges);
    let cap = es.iter().map(|e| (*e, rng.gen_range(0..20_i64))).collect();
    (g, vs, cap)
}

/// Conservation at interior vertices plus the per-edge capacity bound.
fn assert_valid_flow(
    g: &DirectedGraph<i64>,
    cap: &BTreeMap<EdgeId, i64>,
    res: &FlowResult<EdgeId, i64>,
    source: VertexId,
    sink: VertexId,
) {
    for (e, f) in res.flow.iter() {
        assert!(f > 0 && f <= cap.value(e), "flow out of bounds on {e:?}");
    }
    for v in g.vertices() {
        if v == source || v == sink {
            continue;
        }
        let balance: i64 = res
            .flow
            .iter()
            .map(|(e, f)| {
                let mut d = 0;
                if g.target(e) == v {
                    d += f;
                }
                if g.source(e) == v {
                    d -= f;
                }
                d
            })
            .sum();
        assert_eq!(balance, 0, "conservation violated at {v:?}");
    }
}

#[test]
fn solvers_agree_on_random_graphs() {
    for seed in 0..20 {
        let mut rng = Pcg64::seed_from_u64(seed);
        let (g, vs, cap) = random_graph(&mut rng, 10, 30);
        let (s, t) = (vs[0], vs[9]);

        let ek = edmonds_karp(&g, &cap, s, t).unwrap();
        let pr = push_relabel(&g, &cap, s, t).unwrap();
        let bk = kolmogorov(&g, &cap, s, t).unwrap();

        assert_eq!(ek.value, pr.value, "push-relabel disagrees on seed {seed}");
        assert_eq!(ek.value, bk.value, "kolmogorov disagrees on seed {seed}");
        assert_valid_flow(&g, &cap, &ek, s, t);
        assert_valid_flow(&g, &cap, &pr, s, t);
        assert_valid_flow(&g, &cap, &bk, s, t);
    }
}

#[test]
fn cut_value_equals_flow_value_on_random_graphs() {
    for seed in 100..115 {
        let mut rng = Pcg64::seed_from_u64(seed);
        let (g, vs, cap) = random_graph(&mut rng, 12, 40);
        let (s, t) = (vs[0], vs[11]);

        let res = edmonds_karp(&g, &cap, s, t).unwrap();
        let cut = min_cut_from_flow(&g, &cap, &res.flow, s).unwrap();

        assert_eq!(cut.value, res.value, "duality violated on seed {seed}");
        assert!(cut.source_side.contains(&s));
        assert!(!cut.source_side.contains(&t));
        for e in &cut.edges {
            assert_eq!(res.flow.value(*e), cap[e], "cut edge not saturated");
        }
    }
}

#[test]
fn all_solvers_are_usable_through_the_trait() {
    fn value_of<S: MaxFlow>(
        solver: S,
        g: &DirectedGraph<i64>,
        cap: &BTreeMap<EdgeId, i64>,
        s: VertexId,
        t: VertexId,
    ) -> i64 {
        solver.max_flow(g, cap, s, t).unwrap().value
    }

    let (g, vs, es) = DirectedGraph::<i64>::from_edges(4, [(0, 1), (1, 3), (0, 2), (2, 3)]);
    let caps = [3, 2, 4, 4];
    let cap: BTreeMap<_, _> = es.iter().zip(caps).map(|(e, c)| (*e, c)).collect();

    assert_eq!(value_of(EdmondsKarp, &g, &cap, vs[0], vs[3]), 6);
    assert_eq!(value_of(PushRelabel, &g, &cap, vs[0], vs[3]), 6);
    assert_eq!(value_of(Kolmogorov, &g, &cap, vs[0], vs[3]), 6);
}

#[test]
fn flow_composes_with_the_undirected_view() {
    // In the undirected diamond both branches carry a unit regardless of how
    // the underlying edges are oriented.
    let (g, vs, _) = DirectedGraph::<i64>::from_edges(4, [(1, 0), (0, 2), (3, 1), (2, 3)]);
    let view = UndirectedView::new(&g);
    let cap: BTreeMap<_, _> = view.edges().map(|e| (e, 1_i64)).collect();

    let res = edmonds_karp(&view, &cap, vs[0], vs[3]).unwrap();
    assert_eq!(res.value, 2);
}

#[test]
fn opposing_edges_keep_their_own_capacity() {
    let (g, vs, es) = DirectedGraph::<i64>::from_edges(2, [(0, 1), (1, 0)]);
    let cap: BTreeMap<_, _> = [(es[0], 3_i64), (es[1], 5_i64)].into();

    assert_eq!(edmonds_karp(&g, &cap, vs[0], vs[1]).unwrap().value, 3);
    assert_eq!(push_relabel(&g, &cap, vs[1], vs[0]).unwrap().value, 5);
}

#[test]
fn matchings_on_random_graphs_are_consistent() {
    for seed in 7..17 {
        let mut rng = Pcg64::seed_from_u64(seed);
        let (g, vs, _) = random_graph(&mut rng, 14, 25);

        let adjacent: BTreeSet<(VertexId, VertexId)> = g
            .edges()
            .flat_map(|e| {
                let (u, v) = (g.source(e), g.target(e));
                [(u, v), (v, u)]
            })
            .collect();

        let m = maximum_cardinality_matching(&g);
        assert!(m.len() <= vs.len() / 2);
        for (v, w) in m.pairs() {
            assert_eq!(m.partner(w), Some(v));
            assert!(adjacent.contains(&(v, w)), "matched a non-edge");
        }
    }
}
