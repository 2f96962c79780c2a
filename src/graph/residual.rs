//! The augmenting/residual view traversed by all flow solvers.
//!
//! For every underlying edge the view exposes a synthetic companion edge in
//! the opposite direction. Neither the reverse edge nor its capacity is
//! materialized anywhere: a [`ResidualEdge`] is the underlying handle plus a
//! direction flag, and both directions read and write the single flow cell
//! kept per underlying edge in [`FlowState`]. Solvers never distinguish real
//! from reverse edges beyond this one read/write contract.

use alloc::collections::BTreeMap;



use crate::capacity::Capacity;
use crate::graph::{BidirIncidence, EdgeList, GraphBase, Incidence, VertexList};
use crate::property::{EdgeFlow, PropertyMap};

/// An edge of the residual view: forward (`reversed == false`) or the
/// synthetic reverse companion of the same underlying edge. Unlike
/// [`UndirectedEdge`](crate::graph::undirected::UndirectedEdge), the two
/// directions are *distinct* edges and compare unequal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResidualEdge<E> {
    edge: E,
    reversed: bool,
}

impl<E: Copy> ResidualEdge<E> {
    pub(crate) fn forward(e: E) -> Self {
        Self {
            edge: e,
            reversed: false,
        }
    }

    pub(crate) fn reverse(e: E) -> Self {
        Self {
            edge: e,
            reversed: true,
        }
    }

    /// The underlying edge whose flow cell this residual edge reads.
    pub fn underlying(&self) -> E {
        self.edge
    }

    pub fn is_reverse(&self) -> bool {
        self.reversed
    }

    /// The companion edge in the opposite direction.
    pub fn companion(&self) -> Self {
        Self {
            edge: self.edge,
            reversed: !self.reversed,
        }
    }
}

/// Residual view over a capacitated directed graph.
#[derive(Clone, Copy, Debug)]
pub struct ResidualView<G> {
    g: G,
}

impl<G> ResidualView<G> {
    pub fn new(g: G) -> Self {
        Self { g }
    }

    pub fn underlying(&self) -> &G {
        &self.g
    }
}

impl<G: GraphBase> GraphBase for ResidualView<G> {
    type Vertex = G::Vertex;
    type Edge = ResidualEdge<G::Edge>;
}

impl<G: VertexList> VertexList for ResidualView<G> {
    type VertexIter<'a>
        = G::VertexIter<'a>
    where
        Self: 'a;

    fn vertices(&self) -> Self::VertexIter<'_> {
        self.g.vertices()
    }

    fn vertex_count(&self) -> usize {
        self.g.vertex_count()
    }

    fn contains_vertex(&self, v: Self::Vertex) -> bool {
        self.g.contains_vertex(v)
    }
}

/// All forward edges followed by all reverse companions.
pub struct ResidualEdgeIter<I> {
    forward: I,
    reverse: I,
}

impl<E: Copy, I: Iterator<Item = E>> Iterator for ResidualEdgeIter<I> {
    type Item = ResidualEdge<E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.forward
            .next()
            .map(ResidualEdge::forward)
            .or_else(|| self.reverse.next().map(ResidualEdge::reverse))
    }
}

impl<G: EdgeList> EdgeList for ResidualView<G> {
    type EdgeIter<'a>
        = ResidualEdgeIter<G::EdgeIter<'a>>
    where
        Self: 'a;

    fn edges(&self) -> Self::EdgeIter<'_> {
        ResidualEdgeIter {
            forward: self.g.edges(),
            reverse: self.g.edges(),
        }
    }

    fn edge_count(&self) -> usize {
        2 * self.g.edge_count()
    }
}

/// Out-edges of `v` in the residual view: the underlying out-edges forward,
/// plus the reverse companions of the underlying in-edges.
pub struct ResidualIncidentIter<I, J> {
    forward: I,
    reverse: J,
}

impl<E, I, J> Iterator for ResidualIncidentIter<I, J>
where
    E: Copy,
    I: Iterator<Item = E>,
    J: Iterator<Item = E>,
{
    type Item = ResidualEdge<E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.forward
            .next()
            .map(ResidualEdge::forward)
            .or_else(|| self.reverse.next().map(ResidualEdge::reverse))
    }
}

impl<G: BidirIncidence> Incidence for ResidualView<G> {
    type OutEdgeIter<'a>
        = ResidualIncidentIter<G::OutEdgeIter<'a>, G::InEdgeIter<'a>>
    where
        Self: 'a;

    fn out_edges(&self, v: Self::Vertex) -> Self::OutEdgeIter<'_> {
        ResidualIncidentIter {
            forward: self.g.out_edges(v),
            reverse: self.g.in_edges(v),
        }
    }

    fn source(&self, e: Self::Edge) -> Self::Vertex {
        if e.reversed {
            self.g.target(e.edge)
        } else {
            self.g.source(e.edge)
        }
    }

    fn target(&self, e: Self::Edge) -> Self::Vertex {
        if e.reversed {
            self.g.source(e.edge)
        } else {
            self.g.target(e.edge)
        }
    }
}

impl<G: BidirIncidence> BidirIncidence for ResidualView<G> {
    type InEdgeIter<'a>
        = ResidualIncidentIter<G::InEdgeIter<'a>, G::OutEdgeIter<'a>>
    where
        Self: 'a;

    fn in_edges(&self, v: Self::Vertex) -> Self::InEdgeIter<'_> {
        ResidualIncidentIter {
            forward: self.g.in_edges(v),
            reverse: self.g.out_edges(v),
        }
    }
}

/// The per-run flow bookkeeping shared by both directions of every edge.
///
/// One signed flow value is owned per underlying edge; the residual capacity
/// of the forward direction is `capacity - flow` and of the reverse direction
/// is `flow` itself, so pushing across either direction writes through to the
/// same cell and the invariant `flow(e) + flow(e') = 0` holds by
/// construction.
pub struct FlowState<'a, W, E: Ord, C> {
    capacity: &'a W,
    flow: BTreeMap<E, C>,
}

impl<'a, W, E, C> FlowState<'a, W, E, C>
where
    W: PropertyMap<E, Value = C>,
    E: Copy + Ord + core::fmt::Debug,
    C: Capacity,
{
    pub fn new(capacity: &'a W) -> Self {
        Self {
            capacity,
            flow: BTreeMap::new(),
        }
    }

    /// Rebuilds the bookkeeping from a previously computed flow, e.g. to
    /// extract a minimum cut from a finished solver run.
    pub fn with_flow(capacity: &'a W, flow: &EdgeFlow<E, C>) -> Self {
        Self {
            capacity,
            flow: flow.iter().collect(),
        }
    }

    /// Current flow on the underlying (forward) edge.
    pub fn flow(&self, e: E) -> C {
        self.flow.value(e)
    }

    /// Remaining capacity of a residual edge.
    pub fn residual(&self, e: ResidualEdge<E>) -> C {
        let f = self.flow(e.edge);
        if e.reversed {
            f
        } else {
            self.capacity.value(e.edge) - f
        }
    }

    /// Pushes `delta` units across a residual edge by updating the shared
    /// flow cell. `delta` must be positive and no larger than the edge's
    /// current residual capacity.
    pub fn push(&mut self, e: ResidualEdge<E>, delta: C) {
        debug_assert!(delta > C::zero());
        debug_assert!(delta <= self.residual(e), "push exceeds residual capacity");

        let cell = self.flow.entry(e.edge).or_insert_with(C::zero);
        if e.reversed {
            *cell -= delta;
        } else {
            *cell += delta;
        }

        debug_assert!(*cell >= C::zero());
        debug_assert!(*cell <= self.capacity.value(e.edge));
    }

    /// Finishes the run, keeping only edges with positive flow.
    pub fn into_flow(self) -> EdgeFlow<E, C> {
        EdgeFlow::from_positive(self.flow)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::graph::digraph::DirectedGraph;
    use crate::graph::MutableGraph;

    #[test]
    fn reverse_edges_share_the_forward_cell() {
        let mut g = DirectedGraph::<i64>::new();
        let a = g.add_vertex();
        let b = g.add_vertex();
        let e = g.add_edge(a, b);
        let mut cap = BTreeMap::new();
        cap.insert(e, 10_i64);

        let mut state = FlowState::new(&cap);
        let fwd = ResidualEdge::forward(e);
        let rev = fwd.companion();

        assert_eq!(state.residual(fwd), 10);
        assert_eq!(state.residual(rev), 0);

        state.push(fwd, 7);
        assert_eq!(state.flow(e), 7);
        assert_eq!(state.residual(fwd), 3);
        assert_eq!(state.residual(rev), 7);

        state.push(rev, 4);
        assert_eq!(state.flow(e), 3);
        assert_eq!(state.residual(fwd), 7);
        assert_eq!(state.residual(rev), 3);
    }

    #[test]
    fn out_edges_include_reverse_companions() {
        let (g, vs, es) = DirectedGraph::<i64>::from_edges(3, [(0, 1), (2, 1)]);
        let r = ResidualView::new(&g);

        let from_middle: Vec<_> = r.out_edges(vs[1]).collect();
        assert_eq!(from_middle.len(), 2);
        assert!(from_middle.iter().all(|e| e.is_reverse()));
        assert_eq!(r.source(from_middle[0]), vs[1]);

        let forward: Vec<_> = r.out_edges(vs[0]).collect();
        assert_eq!(forward, [ResidualEdge::forward(es[0])]);
    }

    #[test]
    fn forward_and_reverse_are_distinct_edges() {
        let (g, _, es) = DirectedGraph::<i64>::from_edges(2, [(0, 1)]);
        let r = ResidualView::new(&g);
        let fwd = ResidualEdge::forward(es[0]);
        assert_ne!(fwd, fwd.companion());
        assert_eq!(r.source(fwd), r.target(fwd.companion()));
        assert_eq!(r.edge_count(), 2);
    }
}
