//! Shortest-augmenting-path maximum flow (Edmonds–Karp).
//!
//! Repeats a breadth-first search from the source over residual-positive
//! edges and pushes the bottleneck capacity along the discovered path until
//! the sink becomes unreachable. The shortest-path selection rule bounds the
//! number of augmentations by O(V·E) for integer capacities.

use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::vec::Vec;

use num_traits::CheckedAdd;

use crate::algo::{check_flow_inputs, FlowResult, MaxFlow};
use crate::capacity::Capacity;
use crate::error::Error;
use crate::graph::residual::{FlowState, ResidualEdge, ResidualView};
use crate::graph::{BidirIncidence, EdgeList, Incidence, VertexList};
use crate::property::PropertyMap;

/// Unit solver type for [`edmonds_karp`].
#[derive(Clone, Copy, Debug, Default)]
pub struct EdmondsKarp;

impl MaxFlow for EdmondsKarp {
    fn max_flow<G, W, C>(
        &self,
        g: &G,
        capacity: &W,
        source: G::Vertex,
        sink: G::Vertex,
    ) -> Result<FlowResult<G::Edge, C>, Error>
    where
        G: VertexList + EdgeList + BidirIncidence,
        W: PropertyMap<G::Edge, Value = C>,
        C: Capacity + CheckedAdd,
    {
        edmonds_karp(g, capacity, source, sink)
    }
}

/// Computes a maximum flow from `source` to `sink` using shortest augmenting
/// paths over the residual view of `g`.
///
/// A disconnected source/sink pair yields zero flow and an empty edge-flow
/// mapping; `source == sink` and negative capacities are configuration
/// errors.
pub fn edmonds_karp<G, W, C>(
    g: &G,
    capacity: &W,
    source: G::Vertex,
    sink: G::Vertex,
) -> Result<FlowResult<G::Edge, C>, Error>
where
    G: VertexList + EdgeList + BidirIncidence,
    W: PropertyMap<G::Edge, Value = C>,
    C: Capacity + CheckedAdd,
{
    check_flow_inputs(g, capacity, source, sink)?;

    let residual = ResidualView::new(g);
    let mut state = FlowState::new(capacity);
    let mut value = C::zero();
    let mut augmentations = 0_usize;

    while let Some(path) = shortest_augmenting_path(&residual, &state, source, sink) {
        let bottleneck = path
            .iter()
            .map(|e| state.residual(*e))
            .min()
            .expect("augmenting path has at least one edge");
        for e in &path {
            state.push(*e, bottleneck);
        }
        value = value
            .checked_add(&bottleneck)
            .ok_or(Error::ArithmeticOverflow)?;
        augmentations += 1;
        log::trace!(
            "augmented by {bottleneck} along a path of {} edges",
            path.len()
        );
    }

    log::debug!("edmonds-karp: flow {value} after {augmentations} augmentations");
    Ok(FlowResult {
        value,
        flow: state.into_flow(),
    })
}

/// Breadth-first search over residual-positive edges, tracking the parent
/// edge of every visited vertex. Returns the sink-to-source parent chain (in
/// reverse order) or `None` once the sink is unreachable.
fn shortest_augmenting_path<G, W, C>(
    residual: &ResidualView<&G>,
    state: &FlowState<'_, W, G::Edge, C>,
    source: G::Vertex,
    sink: G::Vertex,
) -> Option<Vec<ResidualEdge<G::Edge>>>
where
    G: VertexList + EdgeList + BidirIncidence,
    W: PropertyMap<G::Edge, Value = C>,
    C: Capacity,
{
    let mut parent: BTreeMap<G::Vertex, ResidualEdge<G::Edge>> = BTreeMap::new();
    let mut seen = BTreeSet::from([source]);
    let mut queue = VecDeque::from([source]);

    'bfs: while let Some(u) = queue.pop_front() {
        for e in residual.out_edges(u) {
            if state.residual(e) <= C::zero() {
                continue;
            }
            let v = residual.target(e);
            if !seen.insert(v) {
                continue;
            }
            parent.insert(v, e);
            if v == sink {
                break 'bfs;
            }
            queue.push_back(v);
        }
    }

    parent.contains_key(&sink).then(|| {
        let mut path = Vec::new();
        let mut v = sink;
        while v != source {
            let e = parent[&v];
            v = residual.source(e);
            path.push(e);
        }
        path
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::tests_support::assert_conserved;
    use crate::graph::digraph::DirectedGraph;

    #[test]
    fn unit_diamond_carries_two_units() {
        let (g, vs, es) =
            DirectedGraph::<i64>::from_edges(4, [(0, 1), (0, 2), (1, 3), (2, 3)]);
        let cap: BTreeMap<_, _> = es.iter().map(|e| (*e, 1_i64)).collect();
        let res = edmonds_karp(&g, &cap, vs[0], vs[3]).unwrap();
        assert_eq!(res.value, 2);
        assert_eq!(res.flow.len(), 4);
        assert_conserved(&g, &res, vs[0], vs[3]);
    }

    #[test]
    fn bottleneck_limits_the_flow() {
        // Two branches plus a narrow crossing edge that admits one extra unit.
        let (g, vs, es) = DirectedGraph::<i64>::from_edges(
            4,
            [(0, 1), (1, 3), (0, 2), (2, 3), (1, 2)],
        );
        let caps = [4, 2, 3, 5, 1];
        let cap: BTreeMap<_, _> = es.iter().zip(caps).map(|(e, c)| (*e, c)).collect();
        let res = edmonds_karp(&g, &cap, vs[0], vs[3]).unwrap();
        assert_eq!(res.value, 6);
        assert_conserved(&g, &res, vs[0], vs[3]);
    }

    #[test]
    fn crossing_edge_does_not_change_value() {
        let (g, vs, es) = DirectedGraph::<i64>::from_edges(
            4,
            [(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)],
        );
        let cap: BTreeMap<_, _> = es.iter().map(|e| (*e, 1_i64)).collect();
        let res = edmonds_karp(&g, &cap, vs[0], vs[3]).unwrap();
        assert_eq!(res.value, 2);
        assert_conserved(&g, &res, vs[0], vs[3]);
    }

    #[test]
    fn disconnected_sink_is_zero_flow() {
        let (g, vs, es) = DirectedGraph::<i64>::from_edges(4, [(0, 1), (2, 3)]);
        let cap: BTreeMap<_, _> = es.iter().map(|e| (*e, 5_i64)).collect();
        let res = edmonds_karp(&g, &cap, vs[0], vs[3]).unwrap();
        assert_eq!(res.value, 0);
        assert!(res.flow.is_empty());
    }

    #[test]
    fn source_equals_sink_is_rejected() {
        let (g, vs, _) = DirectedGraph::<i64>::from_edges(2, [(0, 1)]);
        let cap = BTreeMap::<_, i64>::new();
        assert_eq!(
            edmonds_karp(&g, &cap, vs[0], vs[0]).unwrap_err(),
            Error::SourceIsSink
        );
    }

    #[test]
    fn negative_capacity_is_rejected() {
        let (g, vs, es) = DirectedGraph::<i64>::from_edges(2, [(0, 1)]);
        let cap: BTreeMap<_, _> = [(es[0], -1_i64)].into();
        assert_eq!(
            edmonds_karp(&g, &cap, vs[0], vs[1]).unwrap_err(),
            Error::NegativeCapacity
        );
    }
}
